//! Author-time model types shared by routines, scopes and the filter engine.
//!
//! These types mirror the JSON shape of routine-library entries and saved
//! scopes, so they deserialize directly from catalog files.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single cell value or filter value.
///
/// Deserializes untagged from JSON `null`, booleans, numbers and strings.
/// Equality is strict: `Number(1.0)` is not equal to `Text("1")`.
///
/// # Example
///
/// ```
/// use routine_engine_rs::Scalar;
///
/// let value: Scalar = serde_json::from_str("\"Plant A\"").unwrap();
/// assert_eq!(value, Scalar::from("Plant A"));
///
/// let value: Scalar = serde_json::from_str("null").unwrap();
/// assert!(value.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Absent or explicitly null value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value (all JSON numbers are held as `f64`).
    Number(f64),
    /// Text value.
    Text(String),
}

impl Scalar {
    /// Returns true if the value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Returns the numeric reading of the value, if it has one.
    ///
    /// Numeric text (e.g. `" 42.5 "`) counts as a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Scalar::Null | Scalar::Bool(_) => None,
        }
    }

    /// Returns the text rendering used by substring matching.
    ///
    /// `Null` renders as the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value as f64)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// The comparison a filter spec asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionKind {
    Is,
    IsNot,
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
}

impl ConditionKind {
    /// Returns true for the four ordering operators.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            ConditionKind::GreaterThan
                | ConditionKind::LessThan
                | ConditionKind::GreaterThanOrEqual
                | ConditionKind::LessThanOrEqual
        )
    }

    /// Returns the camelCase name used in catalog files.
    pub fn as_str(self) -> &'static str {
        match self {
            ConditionKind::Is => "is",
            ConditionKind::IsNot => "isNot",
            ConditionKind::Equals => "equals",
            ConditionKind::NotEquals => "notEquals",
            ConditionKind::Contains => "contains",
            ConditionKind::NotContains => "notContains",
            ConditionKind::GreaterThan => "greaterThan",
            ConditionKind::LessThan => "lessThan",
            ConditionKind::GreaterThanOrEqual => "greaterThanOrEqual",
            ConditionKind::LessThanOrEqual => "lessThanOrEqual",
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative, author-time filter definition.
///
/// Attached to routine-library templates and saved scopes. Normalized into a
/// [`ColumnFilter`](crate::filter::ColumnFilter) when a preview opens.
///
/// # Example
///
/// ```
/// use routine_engine_rs::{ConditionKind, FilterSpec};
///
/// let json = r#"{
///     "columnId": "orderDate",
///     "condition": "lessThan",
///     "dateExpression": "1 month ago"
/// }"#;
/// let spec: FilterSpec = serde_json::from_str(json).unwrap();
/// assert_eq!(spec.condition, Some(ConditionKind::LessThan));
/// assert!(spec.values.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// Opaque column key; never validated against a schema.
    pub column_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionKind>,

    #[serde(default)]
    pub values: Vec<Scalar>,

    /// Relative date phrase such as `"3 weeks ago"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_expression: Option<String>,
}

impl FilterSpec {
    /// Creates a spec with no condition for the given values.
    pub fn values(column_id: impl Into<String>, values: Vec<Scalar>) -> Self {
        Self {
            column_id: column_id.into(),
            condition: None,
            values,
            date_expression: None,
        }
    }

    /// Creates a spec with an explicit condition.
    pub fn conditioned(
        column_id: impl Into<String>,
        condition: ConditionKind,
        values: Vec<Scalar>,
    ) -> Self {
        Self {
            column_id: column_id.into(),
            condition: Some(condition),
            values,
            date_expression: None,
        }
    }

    /// Creates a relative-date spec.
    pub fn relative_date(
        column_id: impl Into<String>,
        condition: Option<ConditionKind>,
        expression: impl Into<String>,
    ) -> Self {
        Self {
            column_id: column_id.into(),
            condition,
            values: Vec::new(),
            date_expression: Some(expression.into()),
        }
    }
}

/// Sort direction of one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("asc"),
            SortDirection::Desc => f.write_str("desc"),
        }
    }
}

/// One `(columnId, direction)` sort key. Order within a sort list matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    pub column_id: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Key lookup into a tabular row.
///
/// The engine never inspects row shape beyond this lookup. A `None` result
/// behaves like an absent cell.
pub trait RowLookup {
    /// Returns the cell for `column_id`, if present.
    fn cell(&self, column_id: &str) -> Option<&Scalar>;
}

/// Default row representation used by datasets loaded from JSON.
pub type Row = BTreeMap<String, Scalar>;

impl RowLookup for BTreeMap<String, Scalar> {
    fn cell(&self, column_id: &str) -> Option<&Scalar> {
        self.get(column_id)
    }
}

impl RowLookup for HashMap<String, Scalar> {
    fn cell(&self, column_id: &str) -> Option<&Scalar> {
        self.get(column_id)
    }
}
