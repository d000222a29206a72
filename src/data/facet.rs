use std::collections::{BTreeMap, BTreeSet};

use super::model::Dataset;

/// Cardinality cap for columns offered as filter dropdowns.
pub const FILTER_FACET_CAP: usize = 100;

/// Cardinality cap for columns drawn as bar charts.
pub const CHART_FACET_CAP: usize = 20;

// ---------------------------------------------------------------------------
// FacetIndex – distinct values per low-cardinality column
// ---------------------------------------------------------------------------

/// One facetable column and its distinct non-empty values, sorted
/// lexicographically on the canonical string form (`"10" < "9"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facet {
    pub column: String,
    pub values: Vec<String>,
}

/// Distinct-value index over a [`Dataset`], restricted to columns with
/// `1..=cap` distinct non-empty values. Columns keep dataset order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FacetIndex {
    cap: usize,
    facets: Vec<Facet>,
}

impl FacetIndex {
    /// Scan every column once and keep the ones within `cap`.
    ///
    /// Collection for a column stops as soon as it exceeds the cap, so free
    /// text and ID columns never build large sets.
    pub fn build(dataset: &Dataset, cap: usize) -> Self {
        let mut facets = Vec::new();

        for column in dataset.columns() {
            let mut distinct: BTreeSet<String> = BTreeSet::new();
            let mut overflow = false;

            for row in dataset.rows() {
                let Some(cell) = row.get(column) else {
                    continue;
                };
                if cell.is_empty() {
                    continue;
                }
                let key = cell.canonical();
                if !distinct.contains(&*key) {
                    distinct.insert(key.into_owned());
                    if distinct.len() > cap {
                        overflow = true;
                        break;
                    }
                }
            }

            if overflow || distinct.is_empty() {
                log::debug!(
                    "column '{column}' not facetable at cap {cap} ({})",
                    if overflow { "too many values" } else { "no values" }
                );
                continue;
            }

            facets.push(Facet {
                column: column.clone(),
                values: distinct.into_iter().collect(),
            });
        }

        FacetIndex { cap, facets }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Sorted distinct values of `column`, `None` if it is not facetable.
    pub fn get(&self, column: &str) -> Option<&[String]> {
        self.facets
            .iter()
            .find(|f| f.column == column)
            .map(|f| f.values.as_slice())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Facetable column names in dataset order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.facets.iter().map(|f| f.column.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Facet> {
        self.facets.iter()
    }

    pub fn len(&self) -> usize {
        self.facets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// Plain column → values mapping.
    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.facets
            .into_iter()
            .map(|f| (f.column, f.values))
            .collect()
    }
}
