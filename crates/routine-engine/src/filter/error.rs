//! Error types for date expressions and authoring-time spec validation.
//!
//! None of these errors surface during preview evaluation. Normalization
//! degrades silently; these are reported only by explicit parsing and by
//! [`validate_specs`](super::validate_specs).

use thiserror::Error;

use crate::model::ConditionKind;

/// A specialized Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Problems found in a filter spec or relative date expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The date expression is empty.
    #[error("date expression is empty")]
    EmptyExpression,

    /// The date expression does not match the relative-date grammar.
    #[error("unrecognized date expression: {expression:?}")]
    InvalidDateExpression {
        /// The expression as written.
        expression: String,
    },

    /// The amount in a date expression does not fit the calendar range.
    #[error("date offset out of range: {expression:?}")]
    DateOutOfRange {
        /// The expression as written.
        expression: String,
    },

    /// The spec has no column id.
    #[error("filter has an empty column id")]
    MissingColumn,

    /// The spec has neither values nor a date expression.
    #[error("filter on {column_id:?} has no values")]
    NoValues {
        /// The column the spec targets.
        column_id: String,
    },

    /// An ordering condition was given several values; only the first is used.
    #[error("{condition} on {column_id:?} uses only the first of {count} values")]
    ExtraOrderingValues {
        /// The column the spec targets.
        column_id: String,
        /// The ordering condition.
        condition: ConditionKind,
        /// How many values were given.
        count: usize,
    },

    /// A substring condition was combined with a date expression.
    #[error("{condition} on {column_id:?} cannot apply to a date; lessThan is used instead")]
    UnsupportedDateCondition {
        /// The column the spec targets.
        column_id: String,
        /// The condition that was given.
        condition: ConditionKind,
    },
}

impl FilterError {
    /// Creates an invalid date expression error.
    pub fn invalid_date_expression(expression: impl Into<String>) -> Self {
        FilterError::InvalidDateExpression {
            expression: expression.into(),
        }
    }

    /// Creates a date-out-of-range error.
    pub fn date_out_of_range(expression: impl Into<String>) -> Self {
        FilterError::DateOutOfRange {
            expression: expression.into(),
        }
    }

    /// Creates a no-values error.
    pub fn no_values(column_id: impl Into<String>) -> Self {
        FilterError::NoValues {
            column_id: column_id.into(),
        }
    }
}
