use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Number, Value as JsonValue};

use super::filter::RowView;
use super::model::Cell;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

enum ExportFormat {
    Csv,
    Json,
}

/// Write the rows of `view` to `path`, format picked by extension
/// (`.csv` or `.json`).
pub fn export_to_path(path: &Path, columns: &[String], view: &RowView<'_>) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let format = match ext.as_str() {
        "csv" => ExportFormat::Csv,
        "json" => ExportFormat::Json,
        other => bail!("Unsupported export extension: .{other}"),
    };
    if view.is_empty() {
        bail!("No data to export");
    }

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    match format {
        ExportFormat::Csv => write_csv(&mut out, columns, view)?,
        ExportFormat::Json => write_json(&mut out, columns, view)?,
    }
    out.flush().context("flushing export file")?;

    log::info!("exported {} rows to {}", view.len(), path.display());
    Ok(())
}

/// Suggested file name for an export of the survey loaded from `source`.
pub fn default_export_name(source: &Path, extension: &str) -> String {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("survey");
    format!("survey_{stem}_export.{extension}")
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Header plus one record per row, cells in canonical form.
pub fn write_csv<W: Write>(writer: W, columns: &[String], view: &RowView<'_>) -> Result<()> {
    if view.is_empty() {
        bail!("No data to export");
    }

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(columns)
        .context("writing CSV header")?;

    for (n, row) in view.rows().enumerate() {
        let record = columns
            .iter()
            .map(|c| row.get(c).map(|cell| cell.canonical().into_owned()).unwrap_or_default());
        csv_writer
            .write_record(record)
            .with_context(|| format!("writing CSV row {n}"))?;
    }
    csv_writer.flush().context("flushing CSV")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Pretty-printed array of objects, keys in column order.
pub fn write_json<W: Write>(writer: W, columns: &[String], view: &RowView<'_>) -> Result<()> {
    if view.is_empty() {
        bail!("No data to export");
    }

    let records: Vec<JsonValue> = view
        .rows()
        .map(|row| {
            let obj: Map<String, JsonValue> = columns
                .iter()
                .map(|c| (c.clone(), row.get(c).map(cell_to_json).unwrap_or_default()))
                .collect();
            JsonValue::Object(obj)
        })
        .collect();

    serde_json::to_writer_pretty(writer, &records).context("writing JSON")?;
    Ok(())
}

fn cell_to_json(cell: &Cell) -> JsonValue {
    match cell {
        Cell::Text(s) => JsonValue::String(s.clone()),
        Cell::Integer(i) => JsonValue::from(*i),
        Cell::Float(f) => Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(cell.canonical().into_owned())),
        Cell::Bool(b) => JsonValue::Bool(*b),
        Cell::Empty => JsonValue::String(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply, FilterSet};
    use crate::data::model::{Dataset, Row};
    use pretty_assertions::assert_eq;

    fn survey() -> Dataset {
        let rows = vec![
            Row::from_iter([
                ("name", Cell::from("Smith, Jane")),
                ("age", Cell::Integer(20)),
                ("city", Cell::from("NYC")),
            ]),
            Row::from_iter([
                ("name", Cell::from("Lee")),
                ("age", Cell::Float(30.5)),
                ("city", Cell::Empty),
            ]),
        ];
        Dataset::new(vec!["name".into(), "age".into(), "city".into()], rows).unwrap()
    }

    #[test]
    fn test_write_csv_quotes_and_orders() {
        let ds = survey();
        let mut out = Vec::new();
        write_csv(&mut out, ds.columns(), &RowView::full(&ds)).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "name,age,city\n\"Smith, Jane\",20,NYC\nLee,30.5,\n"
        );
    }

    #[test]
    fn test_write_json_filtered_rows() {
        let ds = survey();
        let view = apply(&ds, &FilterSet::from_iter([("name", "Lee")]));
        let mut out = Vec::new();
        write_json(&mut out, ds.columns(), &view).unwrap();

        let parsed: JsonValue = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!([{"name": "Lee", "age": 30.5, "city": ""}])
        );
        let keys: Vec<&String> = parsed[0].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["name", "age", "city"]);
    }

    #[test]
    fn test_empty_view_is_refused() {
        let ds = survey();
        let view = apply(&ds, &FilterSet::from_iter([("city", "Paris")]));
        let err = write_csv(Vec::new(), ds.columns(), &view).unwrap_err();
        assert_eq!(err.to_string(), "No data to export");
    }

    #[test]
    fn test_export_to_path_by_extension() {
        let ds = survey();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        export_to_path(&path, ds.columns(), &RowView::full(&ds)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: JsonValue = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);

        let bad = dir.path().join("out.txt");
        assert!(export_to_path(&bad, ds.columns(), &RowView::full(&ds)).is_err());
    }

    #[test]
    fn test_default_export_name() {
        assert_eq!(
            default_export_name(Path::new("/tmp/q1 results.csv"), "json"),
            "survey_q1 results_export.json"
        );
    }
}
