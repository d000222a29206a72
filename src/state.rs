use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use survey_explorer::data::{export, loader};
use survey_explorer::{Dataset, ExplorationSession};

use crate::color::{chart_color_maps, ColorMap};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Current exploration (None until user loads a file).
    pub session: Option<ExplorationSession>,

    /// File the current dataset was loaded from.
    pub source: Option<PathBuf>,

    /// Bar colours per chartable column, fixed for the loaded dataset.
    pub color_maps: BTreeMap<String, ColorMap>,

    /// Text in the search box.
    pub search_input: String,

    /// Whether the chart grid is shown above the table.
    pub charts_visible: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: None,
            source: None,
            color_maps: BTreeMap::new(),
            search_input: String::new(),
            charts_visible: true,
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset. Everything derived from the previous
    /// one is dropped.
    pub fn set_dataset(&mut self, dataset: Dataset, source: Option<PathBuf>) {
        let session = ExplorationSession::new(dataset);
        self.color_maps = chart_color_maps(session.chart_facets());
        self.session = Some(session);
        self.source = source;
        self.search_input.clear();
        self.status_message = None;
    }

    /// Load `path` and replace the current dataset; on failure the previous
    /// dataset stays and the error is shown.
    pub fn load_path(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    dataset.row_count(),
                    dataset.columns()
                );
                self.set_dataset(dataset, Some(path.to_path_buf()));
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Apply `COLUMN=VALUE` pairs given on the command line.
    pub fn apply_initial_filters(&mut self, filters: &[(String, String)]) {
        let Some(session) = &mut self.session else {
            if !filters.is_empty() {
                log::warn!("--filter ignored: no dataset loaded");
            }
            return;
        };
        for (column, value) in filters {
            if !session.dataset().has_column(column) {
                log::warn!("--filter on unknown column '{column}' will match no rows");
            }
            session.set_filter(column.as_str(), value.as_str());
        }
    }

    /// Push the search box text into the session.
    pub fn update_search(&mut self) {
        if let Some(session) = &mut self.session {
            session.set_search(self.search_input.as_str());
        }
    }

    /// Clear column filters and search.
    pub fn clear_filters(&mut self) {
        self.search_input.clear();
        if let Some(session) = &mut self.session {
            session.clear_filters();
        }
    }

    /// Write the visible rows to `path` (format from its extension).
    pub fn export_visible(&mut self, path: &Path) {
        let result = self
            .session
            .as_ref()
            .context("No dataset loaded")
            .and_then(|session| {
                export::export_to_path(path, session.dataset().columns(), &session.visible())
            });
        if let Err(e) = result {
            log::error!("Export failed: {e:#}");
            self.status_message = Some(format!("Error: {e:#}"));
        } else {
            self.status_message = None;
        }
    }

    /// Suggested export file name for the current source file.
    pub fn export_file_name(&self, extension: &str) -> String {
        let source = self.source.as_deref().unwrap_or(Path::new("survey"));
        export::default_export_name(source, extension)
    }

    pub fn color_map(&self, column: &str) -> Option<&ColorMap> {
        self.color_maps.get(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_load_filter_and_export() {
        let file = write_csv("age,city\n20,NYC\n20,LA\n30,NYC\n");
        let mut state = AppState::default();
        state.load_path(file.path());
        assert!(state.status_message.is_none());
        assert!(state.color_map("city").is_some());

        state.apply_initial_filters(&[("city".into(), "NYC".into())]);
        assert_eq!(state.session.as_ref().unwrap().visible_count(), 2);

        state.search_input = "30".into();
        state.update_search();
        assert_eq!(state.session.as_ref().unwrap().visible_count(), 1);

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.csv");
        state.export_visible(&out);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "age,city\n30,NYC\n");

        state.clear_filters();
        assert_eq!(state.search_input, "");
        assert_eq!(state.session.as_ref().unwrap().visible_count(), 3);
    }

    #[test]
    fn test_failed_load_keeps_previous_dataset() {
        let file = write_csv("a\n1\n");
        let mut state = AppState::default();
        state.load_path(file.path());

        state.load_path(Path::new("/nonexistent/survey.csv"));
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
        assert_eq!(state.session.as_ref().unwrap().visible_count(), 1);
    }

    #[test]
    fn test_export_without_dataset_reports_error() {
        let mut state = AppState::default();
        state.export_visible(Path::new("out.csv"));
        assert_eq!(
            state.status_message.as_deref(),
            Some("Error: No dataset loaded")
        );
        assert_eq!(state.export_file_name("json"), "survey_survey_export.json");
    }
}
