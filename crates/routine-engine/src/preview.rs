//! Preview sessions over a routine or scope.
//!
//! A session is created each time a preview opens. It normalizes the source's
//! filter specs once, keeps that result as the initial snapshot, and tracks the
//! user's live edits next to it. Nothing outlives the session.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::catalog::FilterSource;
use crate::filter::{ColumnFilter, FilterNormalizer, FilterSetEvaluator, Predicate, Snapshot};
use crate::model::{RowLookup, SortSpec};

/// What the routine-creation flow should do once the user is done.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PreviewOutcome {
    /// Nothing changed: apply the template as is.
    #[serde(rename_all = "camelCase")]
    ApplyTemplate { source_id: String },

    /// The user customized the preview: persist a new routine with this state.
    #[serde(rename_all = "camelCase")]
    SaveCustom {
        based_on: String,
        filters: Vec<ColumnFilter>,
        sort: Vec<SortSpec>,
    },
}

/// Live preview state for one routine or scope.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use routine_engine_rs::filter::{ColumnFilter, Predicate};
/// use routine_engine_rs::preview::{PreviewOutcome, PreviewSession};
/// use routine_engine_rs::Catalog;
///
/// let catalog = Catalog::from_json_str(r#"{"routines": [{
///     "id": "plant-a",
///     "name": "Plant A",
///     "filters": [{"columnId": "plant", "values": ["A"]}]
/// }]}"#).unwrap();
/// let routine = catalog.routine("plant-a").unwrap();
/// let anchor = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
///
/// let mut session = PreviewSession::open(routine, anchor);
/// assert!(!session.has_changed());
///
/// session.set_filters(vec![ColumnFilter::new("plant", Predicate::exact("B"))]);
/// assert!(matches!(session.outcome(), PreviewOutcome::SaveCustom { .. }));
/// ```
#[derive(Debug, Clone)]
pub struct PreviewSession {
    source_id: String,
    source_name: String,
    anchor: NaiveDate,
    initial: Snapshot,
    current: Snapshot,
}

impl PreviewSession {
    /// Opens a preview, resolving relative dates against `anchor`.
    pub fn open<S: FilterSource + ?Sized>(source: &S, anchor: NaiveDate) -> Self {
        let normalizer = FilterNormalizer::new(anchor);
        let filters = normalizer.normalize(source.filter_specs());
        let initial = Snapshot::new(filters, source.default_sort().to_vec());

        debug!(
            source_id = source.id(),
            specs = source.filter_specs().len(),
            filters = initial.filters.len(),
            %anchor,
            "opened preview"
        );

        Self {
            source_id: source.id().to_string(),
            source_name: source.name().to_string(),
            anchor,
            current: initial.clone(),
            initial,
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// The date relative expressions were resolved against.
    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// Filters as normalized when the preview opened.
    pub fn initial_filters(&self) -> &[ColumnFilter] {
        &self.initial.filters
    }

    /// Live filters.
    pub fn filters(&self) -> &[ColumnFilter] {
        &self.current.filters
    }

    /// Live sort order.
    pub fn sort(&self) -> &[SortSpec] {
        &self.current.sort
    }

    /// Replaces the live filters.
    pub fn set_filters(&mut self, filters: Vec<ColumnFilter>) {
        self.current.filters = filters;
    }

    /// Adds a filter; existing filters on the same column are kept (AND).
    pub fn add_filter(&mut self, column_id: impl Into<String>, predicate: Predicate) {
        self.current
            .filters
            .push(ColumnFilter::new(column_id, predicate));
    }

    /// Removes every live filter on `column_id`. Returns how many were removed.
    pub fn remove_column(&mut self, column_id: &str) -> usize {
        let before = self.current.filters.len();
        self.current.filters.retain(|f| f.column_id != column_id);
        before - self.current.filters.len()
    }

    /// Replaces the live sort order.
    pub fn set_sort(&mut self, sort: Vec<SortSpec>) {
        self.current.sort = sort;
    }

    /// Discards every edit.
    pub fn reset(&mut self) {
        self.current = self.initial.clone();
    }

    /// Rows matching the live filters, in dataset order.
    pub fn matched_rows<'b, R: RowLookup>(&self, rows: &'b [R]) -> Vec<&'b R> {
        FilterSetEvaluator::new(&self.current.filters).filtered_rows(rows)
    }

    /// Number of rows matching the live filters.
    pub fn row_count<R: RowLookup>(&self, rows: &[R]) -> usize {
        FilterSetEvaluator::new(&self.current.filters).count(rows)
    }

    /// Returns true if the live state differs from the template defaults.
    pub fn has_changed(&self) -> bool {
        self.initial.differs_from(&self.current)
    }

    /// Decides between applying the template and saving a custom routine.
    pub fn outcome(&self) -> PreviewOutcome {
        if !self.has_changed() {
            return PreviewOutcome::ApplyTemplate {
                source_id: self.source_id.clone(),
            };
        }

        debug!(source_id = %self.source_id, "preview customized");
        PreviewOutcome::SaveCustom {
            based_on: self.source_id.clone(),
            filters: self.current.filters.clone(),
            sort: self.current.sort.clone(),
        }
    }
}
