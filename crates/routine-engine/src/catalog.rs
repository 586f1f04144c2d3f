//! Routine-library templates and saved scopes.
//!
//! A catalog is static, author-time data. It parses from JSON or TOML text;
//! reading the file is left to the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filter::{validate_specs, SpecIssue};
use crate::model::{FilterSpec, SortSpec};

/// Minimum Jaro-Winkler similarity for an id suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Errors that can occur while parsing a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// JSON parse error.
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error.
    #[error("invalid catalog TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Two entries of the same kind share an id.
    #[error("duplicate {kind} id: {id}")]
    DuplicateId {
        /// "routine" or "scope".
        kind: &'static str,
        /// The repeated id.
        id: String,
    },
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Anything a preview can be opened from.
pub trait FilterSource {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn filter_specs(&self) -> &[FilterSpec];

    /// Default sort applied when the preview opens.
    fn default_sort(&self) -> &[SortSpec] {
        &[]
    }
}

/// A routine-library template: a saved view configuration users can apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineTemplate {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Library grouping shown when browsing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default)]
    pub filters: Vec<FilterSpec>,

    #[serde(default)]
    pub sort: Vec<SortSpec>,

    /// Visible columns, in display order.
    #[serde(default)]
    pub columns: Vec<String>,
}

impl FilterSource for RoutineTemplate {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn filter_specs(&self) -> &[FilterSpec] {
        &self.filters
    }

    fn default_sort(&self) -> &[SortSpec] {
        &self.sort
    }
}

/// A saved data perimeter, assignable to users or teams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub filters: Vec<FilterSpec>,

    #[serde(default)]
    pub assigned_users: Vec<String>,

    #[serde(default)]
    pub assigned_teams: Vec<String>,
}

impl FilterSource for Scope {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn filter_specs(&self) -> &[FilterSpec] {
        &self.filters
    }
}

/// Validation findings for one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryIssues {
    /// "routine" or "scope".
    pub kind: &'static str,
    pub id: String,
    pub issues: Vec<SpecIssue>,
}

/// The routine library and the saved scopes.
///
/// # Example
///
/// ```
/// use routine_engine_rs::Catalog;
///
/// let catalog = Catalog::from_json_str(r#"{
///     "routines": [{
///         "id": "late-orders",
///         "name": "Late orders",
///         "filters": [{"columnId": "status", "values": ["late"]}]
///     }]
/// }"#).unwrap();
///
/// assert!(catalog.routine("late-orders").is_some());
/// assert_eq!(catalog.suggest("late-order"), Some("late-orders"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub routines: Vec<RoutineTemplate>,

    #[serde(default)]
    pub scopes: Vec<Scope>,
}

impl Catalog {
    /// Parses a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Json` on malformed input and
    /// `CatalogError::DuplicateId` if two routines or two scopes share an id.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(input)?;
        catalog.check_ids()?;
        Ok(catalog)
    }

    /// Parses a catalog from TOML (`[[routines]]` and `[[scopes]]` tables).
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Toml` on malformed input and
    /// `CatalogError::DuplicateId` if two routines or two scopes share an id.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let catalog: Catalog = toml::from_str(input)?;
        catalog.check_ids()?;
        Ok(catalog)
    }

    fn check_ids(&self) -> Result<()> {
        fn first_duplicate<'a>(ids: impl Iterator<Item = &'a str>) -> Option<&'a str> {
            let mut seen = std::collections::HashSet::new();
            ids.into_iter().find(|id| !seen.insert(*id))
        }

        if let Some(id) = first_duplicate(self.routines.iter().map(|r| r.id.as_str())) {
            return Err(CatalogError::DuplicateId {
                kind: "routine",
                id: id.to_string(),
            });
        }
        if let Some(id) = first_duplicate(self.scopes.iter().map(|s| s.id.as_str())) {
            return Err(CatalogError::DuplicateId {
                kind: "scope",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Finds a routine by id.
    pub fn routine(&self, id: &str) -> Option<&RoutineTemplate> {
        self.routines.iter().find(|r| r.id == id)
    }

    /// Finds a scope by id.
    pub fn scope(&self, id: &str) -> Option<&Scope> {
        self.scopes.iter().find(|s| s.id == id)
    }

    /// Finds a routine or, failing that, a scope by id.
    pub fn source(&self, id: &str) -> Option<&dyn FilterSource> {
        self.routine(id)
            .map(|r| r as &dyn FilterSource)
            .or_else(|| self.scope(id).map(|s| s as &dyn FilterSource))
    }

    /// Returns the known id closest to `id`, if any is similar enough.
    pub fn suggest(&self, id: &str) -> Option<&str> {
        self.routines
            .iter()
            .map(|r| r.id.as_str())
            .chain(self.scopes.iter().map(|s| s.id.as_str()))
            .map(|candidate| (candidate, strsim::jaro_winkler(id, candidate)))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(candidate, _)| candidate)
    }

    /// Runs authoring-time validation over every routine and scope.
    ///
    /// Only entries with at least one issue are returned.
    pub fn validate(&self) -> Vec<EntryIssues> {
        let routines = self
            .routines
            .iter()
            .map(|r| ("routine", r.id.as_str(), r.filters.as_slice()));
        let scopes = self
            .scopes
            .iter()
            .map(|s| ("scope", s.id.as_str(), s.filters.as_slice()));

        routines
            .chain(scopes)
            .filter_map(|(kind, id, specs)| {
                let issues = validate_specs(specs);
                (!issues.is_empty()).then(|| EntryIssues {
                    kind,
                    id: id.to_string(),
                    issues,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterError;
    use crate::model::{ConditionKind, Scalar};

    const CATALOG_JSON: &str = r#"{
        "routines": [
            {
                "id": "late-orders",
                "name": "Late orders",
                "category": "Purchasing",
                "filters": [
                    {"columnId": "status", "values": ["late"]},
                    {"columnId": "orderDate", "condition": "lessThan", "dateExpression": "1 month ago"}
                ],
                "sort": [{"columnId": "orderDate", "direction": "asc"}],
                "columns": ["orderId", "status", "orderDate"]
            },
            {
                "id": "big-orders",
                "name": "Big orders",
                "filters": [{"columnId": "qty", "condition": "greaterThan", "values": [100]}]
            }
        ],
        "scopes": [
            {
                "id": "plant-a",
                "name": "Plant A",
                "filters": [{"columnId": "plant", "values": ["A"]}],
                "assignedTeams": ["team-1"]
            }
        ]
    }"#;

    #[test]
    fn test_from_json_str() {
        let catalog = Catalog::from_json_str(CATALOG_JSON).unwrap();
        assert_eq!(catalog.routines.len(), 2);
        assert_eq!(catalog.scopes.len(), 1);

        let routine = catalog.routine("late-orders").unwrap();
        assert_eq!(routine.category.as_deref(), Some("Purchasing"));
        assert_eq!(routine.filters.len(), 2);
        assert_eq!(routine.sort, vec![SortSpec::asc("orderDate")]);
        assert_eq!(routine.columns.len(), 3);

        let scope = catalog.scope("plant-a").unwrap();
        assert_eq!(scope.assigned_teams, vec!["team-1"]);
        assert!(scope.assigned_users.is_empty());
    }

    #[test]
    fn test_from_toml_str() {
        let toml = r#"
            [[routines]]
            id = "big-orders"
            name = "Big orders"
            sort = [{ columnId = "qty", direction = "desc" }]

            [[routines.filters]]
            columnId = "qty"
            condition = "greaterThanOrEqual"
            values = [100]

            [[scopes]]
            id = "plant-b"
            name = "Plant B"
            filters = [{ columnId = "plant", values = ["B"] }]
        "#;
        let catalog = Catalog::from_toml_str(toml).unwrap();
        let routine = catalog.routine("big-orders").unwrap();
        assert_eq!(
            routine.filters,
            vec![FilterSpec::conditioned(
                "qty",
                ConditionKind::GreaterThanOrEqual,
                vec![Scalar::from(100i64)]
            )]
        );
        assert_eq!(routine.sort, vec![SortSpec::desc("qty")]);
        assert_eq!(catalog.scope("plant-b").unwrap().filters.len(), 1);
    }

    #[test]
    fn test_duplicate_routine_id() {
        let json = r#"{"routines": [
            {"id": "a", "name": "A"},
            {"id": "a", "name": "Again"}
        ]}"#;
        let err = Catalog::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::DuplicateId { kind: "routine", ref id } if id == "a"
        ));
    }

    #[test]
    fn test_same_id_across_kinds_is_allowed() {
        let json = r#"{
            "routines": [{"id": "a", "name": "A"}],
            "scopes": [{"id": "a", "name": "A"}]
        }"#;
        assert!(Catalog::from_json_str(json).is_ok());
    }

    #[test]
    fn test_invalid_json() {
        let err = Catalog::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
    }

    #[test]
    fn test_source_prefers_routine() {
        let catalog = Catalog::from_json_str(CATALOG_JSON).unwrap();
        assert_eq!(catalog.source("late-orders").unwrap().name(), "Late orders");
        assert_eq!(catalog.source("plant-a").unwrap().name(), "Plant A");
        assert!(catalog.source("missing").is_none());
    }

    #[test]
    fn test_scope_has_no_default_sort() {
        let catalog = Catalog::from_json_str(CATALOG_JSON).unwrap();
        assert!(catalog.scope("plant-a").unwrap().default_sort().is_empty());
    }

    #[test]
    fn test_suggest() {
        let catalog = Catalog::from_json_str(CATALOG_JSON).unwrap();
        assert_eq!(catalog.suggest("late-ordrs"), Some("late-orders"));
        assert_eq!(catalog.suggest("plant_a"), Some("plant-a"));
        assert_eq!(catalog.suggest("zzz"), None);
    }

    #[test]
    fn test_validate_reports_only_problem_entries() {
        let json = r#"{
            "routines": [
                {"id": "ok", "name": "Ok", "filters": [{"columnId": "plant", "values": ["A"]}]},
                {"id": "bad", "name": "Bad", "filters": [
                    {"columnId": "orderDate", "dateExpression": "last friday"}
                ]}
            ],
            "scopes": [
                {"id": "empty", "name": "Empty", "filters": [{"columnId": "plant", "values": []}]}
            ]
        }"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        let report = catalog.validate();

        assert_eq!(report.len(), 2);
        assert_eq!((report[0].kind, report[0].id.as_str()), ("routine", "bad"));
        assert!(matches!(
            report[0].issues[0].error,
            FilterError::InvalidDateExpression { .. }
        ));
        assert_eq!((report[1].kind, report[1].id.as_str()), ("scope", "empty"));
        assert_eq!(report[1].issues[0].error, FilterError::no_values("plant"));
    }
}
