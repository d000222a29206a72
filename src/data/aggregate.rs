use std::collections::BTreeMap;

use super::facet::{FacetIndex, CHART_FACET_CAP};
use super::filter::RowView;
use super::model::Cell;

/// Bucket label for missing cells, so they show up in charts instead of
/// silently disappearing. A cell whose text is literally `(empty)` is
/// counted in the same bucket.
pub const EMPTY_BUCKET: &str = "(empty)";

fn bucket_of(cell: Option<&Cell>) -> String {
    match cell {
        Some(cell) if !cell.is_empty() => cell.canonical().into_owned(),
        _ => EMPTY_BUCKET.to_string(),
    }
}

fn count_values(view: &RowView<'_>, column: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for row in view.rows() {
        *counts.entry(bucket_of(row.get(column))).or_insert(0) += 1;
    }
    counts
}

// ---------------------------------------------------------------------------
// Single view: value → count
// ---------------------------------------------------------------------------

/// Value → count over one column of a [`RowView`]. Keys are sorted; counts
/// sum to the length of the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    pub column: String,
    pub counts: BTreeMap<String, usize>,
}

impl FrequencyTable {
    pub fn get(&self, value: &str) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(v, c)| (v.as_str(), *c))
    }
}

/// Count the values of `column` across `view`, one pass.
pub fn frequencies(view: &RowView<'_>, column: &str) -> FrequencyTable {
    FrequencyTable {
        column: column.to_string(),
        counts: count_values(view, column),
    }
}

/// Frequency tables for every chartable column, in dataset order.
///
/// Chart membership comes from `chart_facets`, which is built over the whole
/// dataset at load time; only the counts follow the filtered view.
pub fn chart_tables(view: &RowView<'_>, chart_facets: &FacetIndex) -> Vec<FrequencyTable> {
    chart_facets
        .columns()
        .map(|column| frequencies(view, column))
        .collect()
}

// ---------------------------------------------------------------------------
// Two views: shared value domain
// ---------------------------------------------------------------------------

/// Side-by-side counts for one column. `counts_a[i]` and `counts_b[i]` are
/// the counts of `domain[i]` in each group, 0 when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonTable {
    pub column: String,
    pub domain: Vec<String>,
    pub counts_a: Vec<usize>,
    pub counts_b: Vec<usize>,
}

impl ComparisonTable {
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize, usize)> {
        self.domain
            .iter()
            .zip(self.counts_a.iter().zip(&self.counts_b))
            .map(|(v, (a, b))| (v.as_str(), *a, *b))
    }
}

/// Counts of `column` in both views over the sorted union of the values
/// either view contains.
pub fn comparison_frequencies(
    view_a: &RowView<'_>,
    view_b: &RowView<'_>,
    column: &str,
) -> ComparisonTable {
    let counts_a = count_values(view_a, column);
    let counts_b = count_values(view_b, column);

    let mut domain: Vec<String> = counts_a.keys().chain(counts_b.keys()).cloned().collect();
    domain.sort();
    domain.dedup();

    let lookup = |counts: &BTreeMap<String, usize>| -> Vec<usize> {
        domain
            .iter()
            .map(|v| counts.get(v).copied().unwrap_or(0))
            .collect()
    };

    ComparisonTable {
        column: column.to_string(),
        counts_a: lookup(&counts_a),
        counts_b: lookup(&counts_b),
        domain,
    }
}

/// Outcome of comparing two groups across every column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Both groups are empty.
    NoData,
    /// No column has between 1 and 20 values across the two groups.
    NoComparableColumns,
    Charts(Vec<ComparisonTable>),
}

impl Comparison {
    pub fn tables(&self) -> &[ComparisonTable] {
        match self {
            Comparison::Charts(tables) => tables,
            _ => &[],
        }
    }
}

/// Compare the two views on every dataset column whose combined value
/// domain has `1..=CHART_FACET_CAP` entries.
///
/// Both views must come from the same dataset.
pub fn compare_columns(view_a: &RowView<'_>, view_b: &RowView<'_>) -> Comparison {
    if view_a.is_empty() && view_b.is_empty() {
        return Comparison::NoData;
    }

    let tables: Vec<ComparisonTable> = view_a
        .dataset()
        .columns()
        .iter()
        .map(|column| comparison_frequencies(view_a, view_b, column))
        .filter(|t| (1..=CHART_FACET_CAP).contains(&t.domain.len()))
        .collect();

    if tables.is_empty() {
        Comparison::NoComparableColumns
    } else {
        Comparison::Charts(tables)
    }
}
