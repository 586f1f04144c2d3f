//! Authoring-time checks for filter specs.
//!
//! Previews stay lenient: the normalizer drops or degrades questionable specs
//! without complaint. These checks let catalog authors find those specs before
//! anyone opens a preview.

use super::date::{today, RelativeDate};
use super::error::FilterError;
use crate::model::{ConditionKind, FilterSpec};

/// A problem found in one spec of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecIssue {
    /// Position of the spec in its list.
    pub index: usize,
    pub error: FilterError,
}

/// Checks a single spec and returns every problem found.
pub fn validate_spec(spec: &FilterSpec) -> Vec<FilterError> {
    let mut errors = Vec::new();

    if spec.column_id.trim().is_empty() {
        errors.push(FilterError::MissingColumn);
    }

    if let Some(expression) = &spec.date_expression {
        match RelativeDate::parse(expression) {
            // Parses, but a preview opened today would still drop it.
            Ok(relative) if relative.apply(today()).is_none() => {
                errors.push(FilterError::date_out_of_range(expression));
            }
            Ok(_) => {}
            Err(e) => errors.push(e),
        }
        if let Some(condition @ (ConditionKind::Contains | ConditionKind::NotContains)) =
            spec.condition
        {
            errors.push(FilterError::UnsupportedDateCondition {
                column_id: spec.column_id.clone(),
                condition,
            });
        }
        return errors;
    }

    if spec.values.iter().all(|v| v.is_null()) {
        errors.push(FilterError::no_values(&spec.column_id));
    }

    if let Some(condition) = spec.condition.filter(|c| c.is_ordering()) {
        if spec.values.len() > 1 {
            errors.push(FilterError::ExtraOrderingValues {
                column_id: spec.column_id.clone(),
                condition,
                count: spec.values.len(),
            });
        }
    }

    errors
}

/// Checks every spec in a list.
///
/// # Example
///
/// ```
/// use routine_engine_rs::filter::{validate_specs, FilterError};
/// use routine_engine_rs::FilterSpec;
///
/// let specs = vec![FilterSpec::relative_date("orderDate", None, "someday")];
/// let issues = validate_specs(&specs);
/// assert_eq!(issues.len(), 1);
/// assert!(matches!(issues[0].error, FilterError::InvalidDateExpression { .. }));
/// ```
pub fn validate_specs(specs: &[FilterSpec]) -> Vec<SpecIssue> {
    specs
        .iter()
        .enumerate()
        .flat_map(|(index, spec)| {
            validate_spec(spec)
                .into_iter()
                .map(move |error| SpecIssue { index, error })
        })
        .collect()
}
