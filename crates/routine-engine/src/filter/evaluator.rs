//! Filter evaluation against tabular rows.
//!
//! [`Predicate::matches`] decides a single cell; [`FilterSetEvaluator`]
//! applies a whole filter set to rows with AND semantics. Evaluation is total:
//! it never fails and never panics, whatever the cell or filter values.
//!
//! # Example
//!
//! ```
//! use routine_engine_rs::filter::{ColumnFilter, FilterSetEvaluator, Predicate};
//! use routine_engine_rs::{Row, Scalar};
//!
//! let rows: Vec<Row> = ["A", "B", "A"]
//!     .iter()
//!     .map(|plant| Row::from([("plant".to_string(), Scalar::from(*plant))]))
//!     .collect();
//! let filters = vec![ColumnFilter::new("plant", Predicate::exact("A"))];
//!
//! let evaluator = FilterSetEvaluator::new(&filters);
//! assert_eq!(evaluator.filtered_rows(&rows).len(), 2);
//! ```

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::trace;

use super::normalizer::DEFAULT_DATE_CONDITION;
use super::predicate::{ColumnFilter, Predicate};
use crate::model::{ConditionKind, RowLookup, Scalar};

/// Stand-in for cells missing from a row.
static ABSENT: Scalar = Scalar::Null;

impl Predicate {
    /// Returns true if `cell` satisfies the predicate.
    ///
    /// A `None` cell (column missing from the row) is treated as `Null`.
    pub fn matches(&self, cell: Option<&Scalar>) -> bool {
        if self.is_unconstrained() {
            return true;
        }
        let cell = cell.unwrap_or(&ABSENT);

        match self {
            Predicate::ExactValue { value } => cell == value,
            Predicate::ValueSet { values } => values.contains(cell),
            Predicate::Conditioned { condition, values } => {
                matches_condition(*condition, values, cell)
            }
            Predicate::DateCondition { condition, date } => matches_date(*condition, *date, cell),
        }
    }
}

fn matches_condition(condition: ConditionKind, values: &[Scalar], cell: &Scalar) -> bool {
    match condition {
        ConditionKind::Is | ConditionKind::Equals => values.contains(cell),
        ConditionKind::IsNot | ConditionKind::NotEquals => !values.contains(cell),
        ConditionKind::Contains => contains_any(values, cell),
        ConditionKind::NotContains => !contains_any(values, cell),
        ConditionKind::GreaterThan
        | ConditionKind::LessThan
        | ConditionKind::GreaterThanOrEqual
        | ConditionKind::LessThanOrEqual => {
            // Only the first value takes part in an ordering comparison.
            let Some(target) = values.first().filter(|v| !v.is_null()) else {
                return true;
            };
            compare_scalars(cell, target).is_some_and(|ord| ordering_holds(condition, ord))
        }
    }
}

fn matches_date(condition: ConditionKind, cutoff: NaiveDate, cell: &Scalar) -> bool {
    let Some(cell_date) = parse_cell_date(cell) else {
        return false;
    };

    match condition {
        ConditionKind::Is | ConditionKind::Equals => cell_date == cutoff,
        ConditionKind::IsNot | ConditionKind::NotEquals => cell_date != cutoff,
        ConditionKind::Contains | ConditionKind::NotContains => {
            ordering_holds(DEFAULT_DATE_CONDITION, cell_date.cmp(&cutoff))
        }
        ordering => ordering_holds(ordering, cell_date.cmp(&cutoff)),
    }
}

fn contains_any(values: &[Scalar], cell: &Scalar) -> bool {
    let haystack = cell.to_text();
    values
        .iter()
        .filter(|v| !v.is_null())
        .any(|v| haystack.contains(&v.to_text()))
}

/// Orders two scalars numerically, or by date when either side is not numeric.
fn compare_scalars(cell: &Scalar, target: &Scalar) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (cell.as_number(), target.as_number()) {
        return a.partial_cmp(&b);
    }
    let (a, b) = (parse_cell_date(cell)?, parse_cell_date(target)?);
    Some(a.cmp(&b))
}

fn ordering_holds(condition: ConditionKind, ord: Ordering) -> bool {
    match condition {
        ConditionKind::GreaterThan => ord == Ordering::Greater,
        ConditionKind::GreaterThanOrEqual => ord != Ordering::Less,
        ConditionKind::LessThan => ord == Ordering::Less,
        ConditionKind::LessThanOrEqual => ord != Ordering::Greater,
        _ => false,
    }
}

/// Reads a cell as a calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (date taken in their own offset),
/// naive `YYYY-MM-DDTHH:MM:SS` / `YYYY-MM-DD HH:MM:SS` timestamps with optional
/// fractional seconds, and numbers as epoch milliseconds.
pub fn parse_cell_date(cell: &Scalar) -> Option<NaiveDate> {
    match cell {
        Scalar::Text(text) => parse_date_str(text.trim()),
        Scalar::Number(millis) if millis.is_finite() => {
            DateTime::from_timestamp_millis(*millis as i64).map(|dt| dt.date_naive())
        }
        _ => None,
    }
}

fn parse_date_str(text: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date())
}

/// Applies a filter set to rows.
///
/// Every filter must match (AND), including several filters on the same
/// column. An empty filter set matches every row.
#[derive(Debug, Clone, Copy)]
pub struct FilterSetEvaluator<'a> {
    filters: &'a [ColumnFilter],
}

impl<'a> FilterSetEvaluator<'a> {
    /// Creates an evaluator over the given filter set.
    pub fn new(filters: &'a [ColumnFilter]) -> Self {
        Self { filters }
    }

    /// Returns true if the row matches every filter.
    pub fn matches_all<R: RowLookup + ?Sized>(&self, row: &R) -> bool {
        self.filters
            .iter()
            .all(|f| f.predicate.matches(row.cell(&f.column_id)))
    }

    /// Returns the matching rows in dataset order.
    pub fn filtered_rows<'b, R: RowLookup>(&self, rows: &'b [R]) -> Vec<&'b R> {
        let matched: Vec<&R> = rows.iter().filter(|row| self.matches_all(*row)).collect();
        trace!(
            rows = rows.len(),
            filters = self.filters.len(),
            matched = matched.len(),
            "evaluated filter set"
        );
        matched
    }

    /// Returns how many rows match, for "N rows found" counters.
    pub fn count<R: RowLookup>(&self, rows: &[R]) -> usize {
        rows.iter().filter(|row| self.matches_all(*row)).count()
    }
}

/// Returns true if `row` matches every filter in `filters`.
pub fn matches_all<R: RowLookup + ?Sized>(row: &R, filters: &[ColumnFilter]) -> bool {
    FilterSetEvaluator::new(filters).matches_all(row)
}

/// Returns the rows of `rows` matching every filter in `filters`.
pub fn filtered_rows<'b, R: RowLookup>(rows: &'b [R], filters: &[ColumnFilter]) -> Vec<&'b R> {
    FilterSetEvaluator::new(filters).filtered_rows(rows)
}
