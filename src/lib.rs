//! Survey explorer engine.
//!
//! Loads a rectangular survey table, filters it by per-column values and
//! counts values per column, for one filtered view or two compared groups.
//! The desktop front end lives in the `survey-explorer` binary.

pub mod data;
pub mod session;

pub use data::aggregate::{
    chart_tables, compare_columns, comparison_frequencies, frequencies, Comparison,
    ComparisonTable, FrequencyTable, EMPTY_BUCKET,
};
pub use data::error::DataError;
pub use data::facet::{FacetIndex, CHART_FACET_CAP, FILTER_FACET_CAP};
pub use data::filter::{apply, apply_dual, FilterSet, RowView, TextSearch};
pub use data::model::{Cell, Dataset, Row};
pub use session::{ExplorationSession, Group};
