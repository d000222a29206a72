use std::collections::BTreeMap;

use super::model::{Cell, Dataset, Row};

// ---------------------------------------------------------------------------
// FilterSet: one required value per column
// ---------------------------------------------------------------------------

/// Column → required value. Values are stored in canonical string form
/// (see [`Cell::canonical`]), so a constraint of `20` matches cells holding
/// `20`, `20.0` or `"20"`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSet {
    constraints: BTreeMap<String, String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `column` to equal `value`. An empty value removes the
    /// constraint instead, like picking "All" in a dropdown.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Cell>) {
        let column = column.into();
        let value = value.into();
        if value.is_empty() {
            self.constraints.remove(&column);
        } else {
            self.constraints
                .insert(column, value.canonical().into_owned());
        }
    }

    pub fn clear(&mut self, column: &str) {
        self.constraints.remove(column);
    }

    pub fn clear_all(&mut self) {
        self.constraints.clear();
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.constraints.get(column).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.constraints
            .iter()
            .map(|(c, v)| (c.as_str(), v.as_str()))
    }

    /// A row passes when, for every constraint:
    /// * the row has the column, and
    /// * the cell's canonical form equals the required value.
    ///
    /// No constraints → every row passes. A constraint on a column the row
    /// does not have never matches.
    pub fn is_satisfied_by(&self, row: &Row) -> bool {
        self.constraints.iter().all(|(col, required)| {
            row.get(col)
                .is_some_and(|cell| cell.canonical() == required.as_str())
        })
    }
}

impl<K: Into<String>, V: Into<Cell>> FromIterator<(K, V)> for FilterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = FilterSet::new();
        for (k, v) in iter {
            set.set(k, v);
        }
        set
    }
}

// ---------------------------------------------------------------------------
// RowView: ordered subset of dataset rows
// ---------------------------------------------------------------------------

/// Rows of a [`Dataset`] selected by index, in dataset order. Borrows the
/// dataset; nothing is copied.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> RowView<'a> {
    /// Every row of the dataset.
    pub fn full(dataset: &'a Dataset) -> Self {
        RowView {
            dataset,
            indices: (0..dataset.row_count()).collect(),
        }
    }

    /// View over precomputed row positions. `indices` must be ascending and
    /// in range for `dataset`.
    pub(crate) fn from_indices(dataset: &'a Dataset, indices: Vec<usize>) -> Self {
        debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(indices.last().map_or(true, |&i| i < dataset.row_count()));
        RowView { dataset, indices }
    }

    /// Consume the view, keeping only the row positions.
    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Positions of the selected rows in the dataset.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a Row> + '_ {
        let rows = self.dataset.rows();
        self.indices.iter().map(move |&i| &rows[i])
    }

    /// Narrow the view to rows matching a free-text query. Both restrictions
    /// are conjunctive: the result is a subsequence of `self`.
    pub fn search(&self, query: &str) -> RowView<'a> {
        let search = TextSearch::new(query);
        if search.is_empty() {
            return self.clone();
        }
        let columns = self.dataset.columns();
        let rows = self.dataset.rows();
        RowView {
            dataset: self.dataset,
            indices: self
                .indices
                .iter()
                .copied()
                .filter(|&i| search.matches(&rows[i], columns))
                .collect(),
        }
    }
}

/// Keep the rows of `dataset` that satisfy `filters`, preserving order.
pub fn apply<'a>(dataset: &'a Dataset, filters: &FilterSet) -> RowView<'a> {
    let indices = dataset
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| filters.is_satisfied_by(row))
        .map(|(i, _)| i)
        .collect();
    RowView { dataset, indices }
}

/// Apply two independent filter sets to the same dataset. The views may
/// overlap; the groups are lenses, not a partition.
pub fn apply_dual<'a>(
    dataset: &'a Dataset,
    group_a: &FilterSet,
    group_b: &FilterSet,
) -> (RowView<'a>, RowView<'a>) {
    (apply(dataset, group_a), apply(dataset, group_b))
}

// ---------------------------------------------------------------------------
// Free-text search
// ---------------------------------------------------------------------------

/// Case-insensitive, whitespace-tokenized search. A row matches when every
/// term occurs inside at least one of its cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextSearch {
    terms: Vec<String>,
}

impl TextSearch {
    pub fn new(query: &str) -> Self {
        TextSearch {
            terms: query.split_whitespace().map(str::to_lowercase).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, row: &Row, columns: &[String]) -> bool {
        let cells: Vec<String> = columns
            .iter()
            .filter_map(|c| row.get(c))
            .map(|cell| cell.canonical().to_lowercase())
            .collect();
        self.terms
            .iter()
            .all(|term| cells.iter().any(|cell| cell.contains(term.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn survey() -> Dataset {
        let rows = vec![
            Row::from_iter([("age", "20"), ("city", "NYC")]),
            Row::from_iter([("age", "20"), ("city", "LA")]),
            Row::from_iter([("age", "30"), ("city", "NYC")]),
        ];
        Dataset::new(vec!["age".into(), "city".into()], rows).unwrap()
    }

    #[test]
    fn test_filter_by_city() {
        let ds = survey();
        let filters = FilterSet::from_iter([("city", "NYC")]);
        let view = apply(&ds, &filters);

        assert_eq!(view.indices(), [0, 2]);
        let ages: Vec<String> = view
            .rows()
            .map(|r| r.get("age").unwrap().to_string())
            .collect();
        assert_eq!(ages, ["20", "30"]);
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let ds = survey();
        let view = apply(&ds, &FilterSet::new());
        assert_eq!(view, RowView::full(&ds));
    }

    #[test]
    fn test_constraints_are_conjunctive() {
        let ds = survey();
        let filters = FilterSet::from_iter([("city", "NYC"), ("age", "20")]);
        assert_eq!(apply(&ds, &filters).indices(), [0]);
    }

    #[test]
    fn test_numeric_and_text_cells_compare_as_strings() {
        let rows = vec![
            Row::from_iter([("age", Cell::Integer(20))]),
            Row::from_iter([("age", Cell::Float(20.0))]),
            Row::from_iter([("age", Cell::from("20"))]),
            Row::from_iter([("age", Cell::from("20.0"))]),
        ];
        let ds = Dataset::new(vec!["age".into()], rows).unwrap();

        let by_text = apply(&ds, &FilterSet::from_iter([("age", "20")]));
        assert_eq!(by_text.indices(), [0, 1, 2]);

        let by_number = apply(&ds, &FilterSet::from_iter([("age", 20_i64)]));
        assert_eq!(by_number.indices(), [0, 1, 2]);

        let by_decimal_text = apply(&ds, &FilterSet::from_iter([("age", "20.0")]));
        assert_eq!(by_decimal_text.indices(), [3]);
    }

    #[test]
    fn test_unknown_column_matches_nothing() {
        let ds = survey();
        let view = apply(&ds, &FilterSet::from_iter([("zip", "10001")]));
        assert!(view.is_empty());
    }

    #[test]
    fn test_set_clear_and_empty_value() {
        let mut filters = FilterSet::new();
        filters.set("city", "NYC");
        filters.set("age", "20");
        assert_eq!(filters.len(), 2);
        assert_eq!(filters.get("city"), Some("NYC"));

        filters.set("city", "");
        assert_eq!(filters.get("city"), None);

        filters.clear("age");
        assert!(filters.is_empty());

        filters.set("age", Cell::Float(30.0));
        assert_eq!(filters.get("age"), Some("30"));
        filters.clear_all();
        assert!(filters.is_empty());
    }

    #[test]
    fn test_empty_cell_never_matches_a_value() {
        let rows = vec![Row::from_iter([("city", Cell::Empty)])];
        let ds = Dataset::new(vec!["city".into()], rows).unwrap();
        assert!(apply(&ds, &FilterSet::from_iter([("city", "NYC")])).is_empty());
    }

    #[test]
    fn test_dual_groups_may_overlap() {
        let ds = survey();
        let group_a = FilterSet::from_iter([("city", "NYC")]);
        let group_b = FilterSet::from_iter([("age", "20")]);
        let (a, b) = apply_dual(&ds, &group_a, &group_b);

        assert_eq!(a.indices(), [0, 2]);
        assert_eq!(b.indices(), [0, 1]);
    }

    #[test]
    fn test_empty_dataset_filters_to_nothing() {
        let ds = Dataset::new(vec!["city".into()], Vec::new()).unwrap();
        assert!(apply(&ds, &FilterSet::new()).is_empty());
        assert!(apply(&ds, &FilterSet::from_iter([("city", "NYC")])).is_empty());
    }

    #[test]
    fn test_search_composes_with_filters() {
        let ds = survey();
        let view = apply(&ds, &FilterSet::from_iter([("age", "20")]));

        assert_eq!(view.search("nyc").indices(), [0]);
        assert_eq!(view.search("  ").indices(), [0, 1]);
        assert!(view.search("30").is_empty());
    }

    #[test]
    fn test_search_terms_may_hit_different_cells() {
        let ds = survey();
        let all = RowView::full(&ds);
        assert_eq!(all.search("la 20").indices(), [1]);
        assert!(all.search("la 30").is_empty());
    }
}
