//! Normalized, evaluatable filter representation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{ConditionKind, Scalar};

/// The matching rule carried by a [`ColumnFilter`].
///
/// This is a closed union built once by the normalizer; evaluation and change
/// detection never look at raw spec shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Predicate {
    /// Matches cells strictly equal to the value.
    ExactValue { value: Scalar },

    /// Matches cells equal to any of the values.
    ValueSet { values: Vec<Scalar> },

    /// Matches according to an explicit condition over the values.
    Conditioned {
        condition: ConditionKind,
        values: Vec<Scalar>,
    },

    /// Compares the cell, read as a date, against a frozen cutoff.
    DateCondition {
        condition: ConditionKind,
        date: NaiveDate,
    },
}

impl Predicate {
    /// Creates an exact-value predicate.
    pub fn exact(value: impl Into<Scalar>) -> Self {
        Predicate::ExactValue {
            value: value.into(),
        }
    }

    /// Creates a value-set predicate.
    pub fn one_of(values: Vec<Scalar>) -> Self {
        Predicate::ValueSet { values }
    }

    /// Creates a conditioned predicate.
    pub fn conditioned(condition: ConditionKind, values: Vec<Scalar>) -> Self {
        Predicate::Conditioned { condition, values }
    }

    /// Creates a date predicate.
    pub fn date(condition: ConditionKind, date: NaiveDate) -> Self {
        Predicate::DateCondition { condition, date }
    }

    /// Returns true when the predicate places no constraint on the column.
    ///
    /// A null exact value, or a value set or conditioned predicate whose values
    /// are all null (or absent), always matches.
    pub fn is_unconstrained(&self) -> bool {
        match self {
            Predicate::ExactValue { value } => value.is_null(),
            Predicate::ValueSet { values } => values.iter().all(Scalar::is_null),
            Predicate::Conditioned { values, .. } => values.iter().all(Scalar::is_null),
            Predicate::DateCondition { .. } => false,
        }
    }
}

/// A predicate bound to one column.
///
/// # Example
///
/// ```
/// use routine_engine_rs::filter::{ColumnFilter, Predicate};
///
/// let filter = ColumnFilter::new("plant", Predicate::exact("A"));
/// let json = serde_json::to_string(&filter).unwrap();
/// assert_eq!(
///     json,
///     r#"{"columnId":"plant","predicate":{"kind":"exactValue","value":"A"}}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnFilter {
    pub column_id: String,
    pub predicate: Predicate,
}

impl ColumnFilter {
    pub fn new(column_id: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            column_id: column_id.into(),
            predicate,
        }
    }
}
