use crate::data::aggregate::{chart_tables, compare_columns, Comparison, FrequencyTable};
use crate::data::facet::{FacetIndex, CHART_FACET_CAP, FILTER_FACET_CAP};
use crate::data::filter::{apply, apply_dual, FilterSet, RowView};
use crate::data::model::{Cell, Dataset};

// ---------------------------------------------------------------------------
// Exploration session
// ---------------------------------------------------------------------------

/// One of the two comparison groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    A,
    B,
}

impl Group {
    pub fn label(self) -> &'static str {
        match self {
            Group::A => "Group A",
            Group::B => "Group B",
        }
    }
}

#[derive(Debug, Clone, Default)]
struct GroupFilters {
    a: FilterSet,
    b: FilterSet,
}

impl GroupFilters {
    fn get_mut(&mut self, group: Group) -> &mut FilterSet {
        match group {
            Group::A => &mut self.a,
            Group::B => &mut self.b,
        }
    }
}

/// Everything one user exploring one dataset has chosen, plus the results
/// derived from it.
///
/// Each mutating call recomputes the affected views synchronously before it
/// returns, so readers always see results for the current choices.
#[derive(Debug, Clone)]
pub struct ExplorationSession {
    dataset: Dataset,
    filter_facets: FacetIndex,
    chart_facets: FacetIndex,
    filters: FilterSet,
    search: String,
    groups: Option<GroupFilters>,

    // derived
    visible: Vec<usize>,
    charts: Vec<FrequencyTable>,
    group_sizes: Option<(usize, usize)>,
    comparison: Option<Comparison>,
}

impl ExplorationSession {
    /// Start exploring `dataset`: index facets and show every row.
    pub fn new(dataset: Dataset) -> Self {
        let filter_facets = FacetIndex::build(&dataset, FILTER_FACET_CAP);
        let chart_facets = FacetIndex::build(&dataset, CHART_FACET_CAP);
        log::debug!(
            "{} filterable and {} chartable columns out of {}",
            filter_facets.len(),
            chart_facets.len(),
            dataset.columns().len()
        );

        let mut session = ExplorationSession {
            dataset,
            filter_facets,
            chart_facets,
            filters: FilterSet::new(),
            search: String::new(),
            groups: None,
            visible: Vec::new(),
            charts: Vec::new(),
            group_sizes: None,
            comparison: None,
        };
        session.refilter();
        session
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Columns offered as filter controls (at most 100 distinct values).
    pub fn filter_facets(&self) -> &FacetIndex {
        &self.filter_facets
    }

    /// Columns drawn as charts (at most 20 distinct values over the whole
    /// dataset).
    pub fn chart_facets(&self) -> &FacetIndex {
        &self.chart_facets
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    // -- main view --

    pub fn set_filter(&mut self, column: impl Into<String>, value: impl Into<Cell>) {
        self.filters.set(column, value);
        self.refilter();
    }

    pub fn clear_filter(&mut self, column: &str) {
        self.filters.clear(column);
        self.refilter();
    }

    /// Drop every column filter and the search query.
    pub fn clear_filters(&mut self) {
        self.filters.clear_all();
        self.search.clear();
        self.refilter();
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
        self.refilter();
    }

    /// Rows passing the column filters and the search query.
    pub fn visible(&self) -> RowView<'_> {
        RowView::from_indices(&self.dataset, self.visible.clone())
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Frequency tables of the visible rows, one per chartable column.
    pub fn charts(&self) -> &[FrequencyTable] {
        &self.charts
    }

    fn refilter(&mut self) {
        let view = apply(&self.dataset, &self.filters).search(&self.search);
        self.charts = chart_tables(&view, &self.chart_facets);
        self.visible = view.into_indices();
        log::debug!(
            "{} of {} rows visible ({} filters, search {:?})",
            self.visible.len(),
            self.dataset.row_count(),
            self.filters.len(),
            self.search
        );
    }

    // -- comparison mode --

    pub fn is_comparing(&self) -> bool {
        self.groups.is_some()
    }

    /// Turn comparison on with two unfiltered groups. No-op when already on.
    pub fn enable_comparison(&mut self) {
        if self.groups.is_none() {
            self.groups = Some(GroupFilters::default());
            self.recompare();
        }
    }

    /// Turn comparison off and forget both groups.
    pub fn disable_comparison(&mut self) {
        self.groups = None;
        self.recompare();
    }

    pub fn group_filters(&self, group: Group) -> Option<&FilterSet> {
        self.groups.as_ref().map(|g| match group {
            Group::A => &g.a,
            Group::B => &g.b,
        })
    }

    /// Constrain one group. Ignored while comparison is off.
    pub fn set_group_filter(
        &mut self,
        group: Group,
        column: impl Into<String>,
        value: impl Into<Cell>,
    ) {
        let column = column.into();
        match self.groups.as_mut() {
            Some(groups) => groups.get_mut(group).set(column, value),
            None => {
                log::warn!("{} filter on '{column}' ignored: comparison is off", group.label());
                return;
            }
        }
        self.recompare();
    }

    pub fn clear_group_filter(&mut self, group: Group, column: &str) {
        if let Some(groups) = self.groups.as_mut() {
            groups.get_mut(group).clear(column);
            self.recompare();
        }
    }

    pub fn clear_group(&mut self, group: Group) {
        if let Some(groups) = self.groups.as_mut() {
            groups.get_mut(group).clear_all();
            self.recompare();
        }
    }

    /// Rows of each group, `None` while comparison is off.
    pub fn group_views(&self) -> Option<(RowView<'_>, RowView<'_>)> {
        let groups = self.groups.as_ref()?;
        Some(apply_dual(&self.dataset, &groups.a, &groups.b))
    }

    /// Row counts of both groups, `None` while comparison is off.
    pub fn group_sizes(&self) -> Option<(usize, usize)> {
        self.group_sizes
    }

    /// Side-by-side aggregation of the two groups, `None` while comparison
    /// is off.
    pub fn comparison(&self) -> Option<&Comparison> {
        self.comparison.as_ref()
    }

    fn recompare(&mut self) {
        let Some((view_a, view_b)) = self.group_views() else {
            self.group_sizes = None;
            self.comparison = None;
            return;
        };
        let sizes = (view_a.len(), view_b.len());
        let comparison = compare_columns(&view_a, &view_b);
        log::debug!("comparison: group A {} rows, group B {} rows", sizes.0, sizes.1);
        self.group_sizes = Some(sizes);
        self.comparison = Some(comparison);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::ComparisonTable;
    use crate::data::model::Row;
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
    fn test_new_session_shows_everything() {
        let session = ExplorationSession::new(survey());
        assert_eq!(session.visible_count(), 3);
        assert_eq!(session.filter_facets().get("city").unwrap(), ["LA", "NYC"]);
        assert_eq!(session.charts().len(), 2);
        assert!(!session.is_comparing());
        assert_eq!(session.comparison(), None);
    }

    #[test]
    fn test_filter_updates_view_and_charts() {
        let mut session = ExplorationSession::new(survey());
        session.set_filter("city", "NYC");

        assert_eq!(session.visible().indices(), [0, 2]);
        let age = &session.charts()[0];
        assert_eq!(age.column, "age");
        assert_eq!(age.get("20"), 1);
        assert_eq!(age.get("30"), 1);

        session.clear_filter("city");
        assert_eq!(session.visible_count(), 3);
    }

    #[test]
    fn test_search_and_clear_filters() {
        let mut session = ExplorationSession::new(survey());
        session.set_filter("age", "20");
        session.set_search("la");
        assert_eq!(session.visible().indices(), [1]);

        session.clear_filters();
        assert_eq!(session.search(), "");
        assert!(session.filters().is_empty());
        assert_eq!(session.visible_count(), 3);
    }

    #[test]
    fn test_chart_membership_fixed_at_load() {
        let mut session = ExplorationSession::new(survey());
        session.set_filter("city", "LA");
        let columns: Vec<&str> = session.charts().iter().map(|t| t.column.as_str()).collect();
        assert_eq!(columns, ["age", "city"]);
        assert_eq!(session.charts()[1].get("NYC"), 0);
    }

    #[test]
    fn test_comparison_lifecycle() {
        let mut session = ExplorationSession::new(survey());
        session.set_group_filter(Group::A, "city", "NYC");
        assert!(session.group_filters(Group::A).is_none());

        session.enable_comparison();
        assert_eq!(session.group_sizes(), Some((3, 3)));

        session.set_group_filter(Group::A, "city", "NYC");
        session.set_group_filter(Group::B, "city", "LA");
        assert_eq!(session.group_sizes(), Some((2, 1)));

        let age = session
            .comparison()
            .unwrap()
            .tables()
            .iter()
            .find(|t| t.column == "age")
            .cloned();
        assert_eq!(
            age,
            Some(ComparisonTable {
                column: "age".into(),
                domain: vec!["20".into(), "30".into()],
                counts_a: vec![1, 1],
                counts_b: vec![1, 0],
            })
        );

        // main view is independent of the groups
        assert_eq!(session.visible_count(), 3);

        session.clear_group(Group::B);
        assert_eq!(session.group_sizes(), Some((2, 3)));

        session.disable_comparison();
        assert_eq!(session.comparison(), None);
        assert!(session.group_views().is_none());

        session.enable_comparison();
        assert_eq!(session.group_filters(Group::A), Some(&FilterSet::new()));
    }

    #[test]
    fn test_comparison_with_no_matches_signals_no_data() {
        let mut session = ExplorationSession::new(survey());
        session.enable_comparison();
        session.set_group_filter(Group::A, "city", "Paris");
        session.set_group_filter(Group::B, "age", "99");
        assert_eq!(session.comparison(), Some(&Comparison::NoData));

        session.clear_group_filter(Group::B, "age");
        assert!(matches!(session.comparison(), Some(Comparison::Charts(_))));
    }

    #[test]
    fn test_empty_dataset_session() {
        let ds = Dataset::new(vec!["age".into()], Vec::new()).unwrap();
        let mut session = ExplorationSession::new(ds);
        assert_eq!(session.visible_count(), 0);
        assert!(session.charts().is_empty());
        assert!(session.filter_facets().is_empty());

        session.set_filter("age", "20");
        assert_eq!(session.visible_count(), 0);

        session.enable_comparison();
        assert_eq!(session.comparison(), Some(&Comparison::NoData));
    }
}
