use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::error::{DataError, Result};

// ---------------------------------------------------------------------------
// Cell – a single value in a survey column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as it arrives from CSV, JSON or Parquet.
///
/// Equality used by filters, facets and aggregates always goes through
/// [`Cell::canonical`], never through the derived `PartialEq`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    #[default]
    Empty,
}

impl Cell {
    /// Canonical string form of the cell.
    ///
    /// Integral floats print without a fraction so that `20`, `20.0` and
    /// `"20"` all normalize to `"20"`. Text is kept verbatim: `"20.0"` stays
    /// `"20.0"` and does not match `20`.
    pub fn canonical(&self) -> Cow<'_, str> {
        match self {
            Cell::Text(s) => Cow::Borrowed(s.as_str()),
            Cell::Integer(i) => Cow::Owned(i.to_string()),
            Cell::Float(f) => Cow::Owned(canonical_float(*f)),
            Cell::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Cell::Empty => Cow::Borrowed(""),
        }
    }

    /// `Empty` and zero-length text both count as missing data.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

fn canonical_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        // also folds -0.0 into "0"
        format!("{}", f as i64)
    } else if f.is_infinite() {
        if f > 0.0 { "Infinity".into() } else { "-Infinity".into() }
    } else {
        format!("{f}")
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Integer(i)
    }
}

impl From<f64> for Cell {
    fn from(f: f64) -> Self {
        Cell::Float(f)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

// ---------------------------------------------------------------------------
// Row – one survey response
// ---------------------------------------------------------------------------

/// One row of the source table: column name → cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub cells: BTreeMap<String, Cell>,
}

impl Row {
    /// Cell stored under `column`, if the row has that key.
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.get(column)
    }
}

impl<K: Into<String>, V: Into<Cell>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the loaded survey table
// ---------------------------------------------------------------------------

/// The full loaded table. Immutable once built; loading a new file means
/// building a new `Dataset` and dropping every view derived from the old one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Validate and build a dataset.
    ///
    /// Every row must carry a key for every declared column; missing cells
    /// have to be normalized to [`Cell::Empty`] by the caller beforehand.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for col in &columns {
            if !seen.insert(col.as_str()) {
                return Err(DataError::DuplicateColumn {
                    column: col.clone(),
                });
            }
        }

        for (i, row) in rows.iter().enumerate() {
            if let Some(missing) = columns.iter().find(|c| !row.cells.contains_key(*c)) {
                return Err(DataError::SchemaMismatch {
                    row: i,
                    column: missing.clone(),
                });
            }
        }

        Ok(Dataset { columns, rows })
    }

    /// Ordered column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in source order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Zero rows or zero columns. A valid state: every derived view is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    /// Cell at (`row`, `column`), `None` when either is out of range.
    pub fn value_at(&self, row: usize, column: &str) -> Option<&Cell> {
        self.rows.get(row)?.get(column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_canonical_numeric_forms_agree() {
        assert_eq!(Cell::Integer(20).canonical(), "20");
        assert_eq!(Cell::Float(20.0).canonical(), "20");
        assert_eq!(Cell::from("20").canonical(), "20");
        assert_eq!(Cell::Float(2.5).canonical(), "2.5");
        assert_eq!(Cell::Float(-0.0).canonical(), "0");
    }

    #[test]
    fn test_canonical_text_is_verbatim() {
        assert_eq!(Cell::from("20.0").canonical(), "20.0");
        assert_ne!(Cell::from("20.0").canonical(), Cell::Integer(20).canonical());
        assert_eq!(Cell::from(" NYC ").canonical(), " NYC ");
    }

    #[test]
    fn test_empty_cells() {
        assert!(Cell::Empty.is_empty());
        assert!(Cell::from("").is_empty());
        assert!(!Cell::Integer(0).is_empty());
        assert!(!Cell::Bool(false).is_empty());
        assert_eq!(Cell::Empty.to_string(), "");
    }

    #[test]
    fn test_new_dataset_accessors() {
        let ds = Dataset::new(
            vec!["age".into(), "city".into()],
            vec![
                row(&[("age", "20"), ("city", "NYC")]),
                row(&[("age", "30"), ("city", "LA")]),
            ],
        )
        .unwrap();

        assert_eq!(ds.columns(), ["age", "city"]);
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.value_at(1, "city"), Some(&Cell::from("LA")));
        assert_eq!(ds.value_at(2, "city"), None);
        assert_eq!(ds.value_at(0, "zip"), None);
        assert!(ds.has_column("age"));
        assert!(!ds.is_empty());
    }

    #[test]
    fn test_missing_column_is_schema_mismatch() {
        let err = Dataset::new(
            vec!["age".into(), "city".into()],
            vec![
                row(&[("age", "20"), ("city", "NYC")]),
                row(&[("age", "30")]),
            ],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            DataError::SchemaMismatch { row: 1, ref column } if column == "city"
        ));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = Dataset::new(vec!["a".into(), "a".into()], Vec::new()).unwrap_err();
        assert!(matches!(err, DataError::DuplicateColumn { .. }));
    }

    #[test]
    fn test_empty_dataset_is_valid() {
        let ds = Dataset::new(vec!["age".into()], Vec::new()).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.row_count(), 0);

        let no_columns = Dataset::new(Vec::new(), vec![Row::default()]).unwrap();
        assert!(no_columns.is_empty());
    }
}
