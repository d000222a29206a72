use std::path::PathBuf;

use clap::Parser;

/// Explore a survey table: filter by column values, chart value counts and
/// compare two groups side by side.
#[derive(Debug, Parser)]
#[command(name = "survey-explorer", version, about)]
pub struct Args {
    /// Survey file to open at startup (.csv, .json, .parquet)
    pub file: Option<PathBuf>,

    /// Initial column filter, repeatable
    #[arg(long = "filter", value_name = "COLUMN=VALUE", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,
}

fn parse_filter(s: &str) -> Result<(String, String), String> {
    let (column, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=VALUE, got '{s}'"))?;
    if column.trim().is_empty() {
        return Err(format!("empty column name in '{s}'"));
    }
    Ok((column.trim().to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = Args::parse_from([
            "survey-explorer",
            "survey.csv",
            "--filter",
            "city=New York",
            "--filter",
            "age=",
        ]);
        assert_eq!(args.file, Some(PathBuf::from("survey.csv")));
        assert_eq!(
            args.filters,
            vec![
                ("city".to_string(), "New York".to_string()),
                ("age".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_parse_filter_rejects_bad_input() {
        assert!(parse_filter("city").is_err());
        assert!(parse_filter("=NYC").is_err());
        assert_eq!(
            parse_filter("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
    }
}
