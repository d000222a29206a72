use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use calamine::{open_workbook_auto, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use super::model::{Cell, Dataset, Row};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a survey table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with column names, one response per record
/// * `.json`    – `{ "columns": [...], "data": [{...}, ...] }` or `[{...}, ...]`
/// * `.xlsx` / `.xls` – first worksheet, header in its first row
/// * `.parquet` – any flat table of string / numeric / boolean columns
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "xlsx" | "xls" => load_excel(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::debug!(
        "parsed {} ({} rows × {} columns)",
        path.display(),
        dataset.row_count(),
        dataset.columns().len()
    );
    Ok(dataset)
}

/// Build a row keeping only the declared columns; absent keys become
/// [`Cell::Empty`] so the dataset schema check always passes.
fn normalized_row(columns: &[String], mut cells: BTreeMap<String, Cell>) -> Row {
    columns
        .iter()
        .map(|col| (col.clone(), cells.remove(col).unwrap_or(Cell::Empty)))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Document stored by the upload service for each survey.
#[derive(Debug, Deserialize)]
struct SurveyDocument {
    columns: Vec<String>,
    data: Vec<Map<String, JsonValue>>,
}

fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    dataset_from_document(root)
}

/// Build a dataset from an already parsed JSON value.
///
/// Accepts the survey document shape
///
/// ```json
/// { "columns": ["age", "city"], "data": [{ "age": 20, "city": "NYC" }] }
/// ```
///
/// or a bare array of records, whose columns are the keys in first-seen order.
pub fn dataset_from_document(root: JsonValue) -> Result<Dataset> {
    let (columns, records) = match root {
        JsonValue::Object(_) => {
            let doc: SurveyDocument =
                serde_json::from_value(root).context("Expected {\"columns\", \"data\"} object")?;
            (doc.columns, doc.data)
        }
        JsonValue::Array(items) => {
            let records = items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    JsonValue::Object(obj) => Ok(obj),
                    _ => bail!("Row {i} is not a JSON object"),
                })
                .collect::<Result<Vec<_>>>()?;
            let mut columns: Vec<String> = Vec::new();
            for rec in &records {
                for key in rec.keys() {
                    if !columns.contains(key) {
                        columns.push(key.clone());
                    }
                }
            }
            (columns, records)
        }
        _ => bail!("Expected a JSON object or array at top level"),
    };

    let columns: Vec<String> = columns.iter().map(|c| c.trim().to_string()).collect();

    let rows = records
        .into_iter()
        .map(|rec| {
            let cells = rec
                .into_iter()
                .map(|(k, v)| (k.trim().to_string(), json_to_cell(&v)))
                .collect();
            normalized_row(&columns, cells)
        })
        .collect();

    Ok(Dataset::new(columns, rows)?)
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) if s.is_empty() => Cell::Empty,
        JsonValue::String(s) => Cell::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Cell::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Cell::Float(f)
            } else {
                Cell::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => Cell::Bool(*b),
        JsonValue::Null => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names (surrounding whitespace and a
/// UTF-8 BOM are stripped). Short records are padded with empty cells.
fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let columns = unique_headers(
        reader
            .headers()
            .context("reading CSV headers")?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string()),
    );

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() > columns.len() {
            log::warn!(
                "CSV row {row_no}: {} fields for {} columns, extra fields ignored",
                record.len(),
                columns.len()
            );
        }
        records.push(record);
    }

    let mut by_column: Vec<std::vec::IntoIter<Cell>> = (0..columns.len())
        .map(|idx| {
            let raw: Vec<&str> = records.iter().map(|r| r.get(idx).unwrap_or("")).collect();
            column_cells(&raw).into_iter()
        })
        .collect();

    let rows = (0..records.len())
        .map(|_| {
            columns
                .iter()
                .zip(by_column.iter_mut())
                .map(|(col, cells)| (col.clone(), cells.next().unwrap_or_default()))
                .collect()
        })
        .collect();

    Ok(Dataset::new(columns, rows)?)
}

/// Make header names usable as column keys: a blank name becomes
/// `Unnamed: <position>` and repeats get a `.1`, `.2`, ... suffix.
fn unique_headers(raw: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut suffixes: BTreeMap<String, usize> = BTreeMap::new();
    let mut columns = Vec::new();

    for (idx, name) in raw.into_iter().enumerate() {
        let name = if name.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name
        };
        let mut unique = name.clone();
        let suffix = suffixes.entry(name.clone()).or_insert(0);
        while seen.contains(&unique) {
            *suffix += 1;
            unique = format!("{name}.{suffix}");
        }
        if unique != name {
            log::warn!("column {idx} renamed from '{name}' to '{unique}'");
        }
        seen.insert(unique.clone());
        columns.push(unique);
    }
    columns
}

/// Type the cells of one column as a whole. Numbers or booleans are used
/// only when every non-empty entry parses to the same kind and prints back
/// unchanged; otherwise the column stays text, so `02134` next to `N/A`
/// keeps its leading zero.
fn column_cells(raw: &[&str]) -> Vec<Cell> {
    let guessed: Vec<Cell> = raw.iter().map(|s| guess_cell(s)).collect();

    let mut numeric = false;
    let mut boolean = false;
    let typed = raw.iter().zip(&guessed).all(|(text, cell)| match cell {
        Cell::Empty => true,
        Cell::Integer(_) | Cell::Float(_) => {
            numeric = true;
            cell.canonical() == *text
        }
        Cell::Bool(_) => {
            boolean = true;
            true
        }
        Cell::Text(_) => false,
    });

    if typed && !(numeric && boolean) {
        guessed
    } else {
        raw.iter()
            .map(|&s| if s.is_empty() { Cell::Empty } else { Cell::from(s) })
            .collect()
    }
}

fn guess_cell(s: &str) -> Cell {
    if s.is_empty() {
        return Cell::Empty;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Cell::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        if f.is_finite() {
            return Cell::Float(f);
        }
    }
    if s == "true" || s == "false" {
        return Cell::Bool(s == "true");
    }
    Cell::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// Excel loader
// ---------------------------------------------------------------------------

/// Read the first worksheet. Its first row holds the column names; cells
/// keep the types the workbook stores.
fn load_excel(path: &Path) -> Result<Dataset> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("workbook has no sheets")?;
    let range = workbook
        .worksheet_range(&sheet)
        .with_context(|| format!("reading sheet '{sheet}'"))?;

    let mut records = range.rows();
    let Some(header) = records.next() else {
        return Ok(Dataset::new(Vec::new(), Vec::new())?);
    };
    let columns = unique_headers(header.iter().map(|h| h.to_string().trim().to_string()));

    let rows = records
        .map(|record| {
            let cells = columns
                .iter()
                .zip(record)
                .map(|(col, value)| (col.clone(), excel_cell(value)))
                .collect();
            normalized_row(&columns, cells)
        })
        .collect();

    Ok(Dataset::new(columns, rows)?)
}

fn excel_cell(value: &Data) -> Cell {
    match value {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Integer(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        // dates, durations and error values keep their display text
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file; every column becomes a survey column.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        for row in 0..batch.num_rows() {
            let mut cells = BTreeMap::new();
            for (col_idx, col_name) in columns.iter().enumerate() {
                let value = extract_cell(batch.column(col_idx), row)
                    .with_context(|| format!("Row {row}: failed to read '{col_name}'"))?;
                cells.insert(col_name.clone(), value);
            }
            rows.push(normalized_row(&columns, cells));
        }
    }

    Ok(Dataset::new(columns, rows)?)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<Cell> {
    if col.is_null(row) {
        return Ok(Cell::Empty);
    }
    let cell: Option<Cell> = match col.data_type() {
        DataType::Utf8 => col.as_string_opt::<i32>().map(|s| s.value(row).into()),
        DataType::LargeUtf8 => col.as_string_opt::<i64>().map(|s| s.value(row).into()),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|a| Cell::Integer(a.value(row) as i64)),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| Cell::Integer(a.value(row))),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| Cell::Float(a.value(row) as f64)),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| Cell::Float(a.value(row))),
        DataType::Boolean => col.as_boolean_opt().map(|a| Cell::Bool(a.value(row))),
        _ => None,
    };

    match cell {
        Some(Cell::Text(s)) if s.is_empty() => Ok(Cell::Empty),
        Some(cell) => Ok(cell),
        // dates, decimals, dictionaries, ... are kept as their display text
        None => Ok(Cell::Text(
            array_value_to_string(col, row).context("formatting arrow value")?,
        )),
    }
}
