//! Conversion of author-time filter specs into column filters.

use chrono::NaiveDate;
use tracing::debug;

use super::date::{self, resolve};
use super::predicate::{ColumnFilter, Predicate};
use crate::model::{ConditionKind, FilterSpec};

/// Default condition for relative-date specs without an explicit one.
pub const DEFAULT_DATE_CONDITION: ConditionKind = ConditionKind::LessThan;

/// Normalizes filter specs into evaluatable column filters.
///
/// Relative dates are resolved once, against the normalizer's anchor, and
/// frozen into the resulting [`Predicate::DateCondition`]. Row counts therefore
/// stay stable for the life of a preview even as the clock moves on.
///
/// For each filter spec, in order:
///
/// 1. With a date expression: emit `DateCondition(condition or lessThan, date)`
///    if it resolves, otherwise emit nothing.
/// 2. With a condition other than `is`: emit `Conditioned(condition, values)`.
/// 3. Otherwise: `ExactValue` for exactly one value, `ValueSet` for any other
///    count.
///
/// Normalization never fails.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use routine_engine_rs::filter::{FilterNormalizer, Predicate};
/// use routine_engine_rs::{FilterSpec, Scalar};
///
/// let anchor = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
/// let specs = vec![FilterSpec::values("plant", vec![Scalar::from("A")])];
///
/// let filters = FilterNormalizer::new(anchor).normalize(&specs);
/// assert_eq!(filters[0].predicate, Predicate::exact("A"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FilterNormalizer {
    anchor: NaiveDate,
}

impl FilterNormalizer {
    /// Creates a normalizer that resolves relative dates against `anchor`.
    pub fn new(anchor: NaiveDate) -> Self {
        Self { anchor }
    }

    /// Creates a normalizer anchored at the local calendar date.
    pub fn today() -> Self {
        Self::new(date::today())
    }

    /// Returns the anchor date.
    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// Normalizes every spec, preserving order and skipping unresolvable ones.
    pub fn normalize(&self, specs: &[FilterSpec]) -> Vec<ColumnFilter> {
        specs
            .iter()
            .filter_map(|spec| self.normalize_spec(spec))
            .collect()
    }

    /// Normalizes a single spec. Returns `None` when it contributes no filter.
    pub fn normalize_spec(&self, spec: &FilterSpec) -> Option<ColumnFilter> {
        let predicate = match &spec.date_expression {
            Some(expression) => {
                let Some(cutoff) = resolve(expression, self.anchor) else {
                    debug!(
                        column_id = %spec.column_id,
                        expression = %expression,
                        "dropping filter with unresolvable date expression"
                    );
                    return None;
                };
                Predicate::date(spec.condition.unwrap_or(DEFAULT_DATE_CONDITION), cutoff)
            }
            None => match spec.condition {
                Some(condition) if condition != ConditionKind::Is => {
                    Predicate::conditioned(condition, spec.values.clone())
                }
                _ => match spec.values.as_slice() {
                    [single] => Predicate::exact(single.clone()),
                    values => Predicate::one_of(values.to_vec()),
                },
            },
        };

        Some(ColumnFilter::new(spec.column_id.clone(), predicate))
    }
}

impl Default for FilterNormalizer {
    fn default() -> Self {
        Self::today()
    }
}

/// Normalizes specs against the local calendar date.
pub fn normalize(specs: &[FilterSpec]) -> Vec<ColumnFilter> {
    FilterNormalizer::today().normalize(specs)
}
