//! Detection of user edits to a previewed filter/sort state.

use crate::model::SortSpec;

use super::predicate::ColumnFilter;

/// A filter set together with its sort order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub filters: Vec<ColumnFilter>,
    pub sort: Vec<SortSpec>,
}

impl Snapshot {
    pub fn new(filters: Vec<ColumnFilter>, sort: Vec<SortSpec>) -> Self {
        Self { filters, sort }
    }

    /// Returns true if `other` differs from this snapshot in meaning.
    pub fn differs_from(&self, other: &Snapshot) -> bool {
        has_changed(&self.filters, &self.sort, &other.filters, &other.sort)
    }
}

/// Returns true if the current filters or sort differ from the initial ones.
///
/// Filters are compared as a collection keyed by column id: order does not
/// matter, but every initial filter must have a structurally identical
/// counterpart on the same column (duplicates pair up one-to-one). Sort lists
/// must be equal element for element, direction included.
///
/// # Example
///
/// ```
/// use routine_engine_rs::filter::{has_changed, ColumnFilter, Predicate};
/// use routine_engine_rs::SortSpec;
///
/// let a = ColumnFilter::new("plant", Predicate::exact("A"));
/// let b = ColumnFilter::new("status", Predicate::exact("open"));
/// let sort = vec![SortSpec::asc("plant")];
///
/// let initial = vec![a.clone(), b.clone()];
/// assert!(!has_changed(&initial, &sort, &[b, a], &sort));
/// assert!(has_changed(&initial, &sort, &initial, &[SortSpec::desc("plant")]));
/// ```
pub fn has_changed(
    initial_filters: &[ColumnFilter],
    initial_sort: &[SortSpec],
    current_filters: &[ColumnFilter],
    current_sort: &[SortSpec],
) -> bool {
    initial_sort != current_sort || !same_filters(initial_filters, current_filters)
}

fn same_filters(initial: &[ColumnFilter], current: &[ColumnFilter]) -> bool {
    if initial.len() != current.len() {
        return false;
    }

    let mut paired = vec![false; current.len()];
    initial.iter().all(|filter| {
        let counterpart = current
            .iter()
            .enumerate()
            .find(|(i, candidate)| !paired[*i] && *candidate == filter);
        match counterpart {
            Some((i, _)) => {
                paired[i] = true;
                true
            }
            None => false,
        }
    })
}
