//! Catalog output formatting (routines, scopes, validation reports).

use owo_colors::OwoColorize;
use routine_engine_rs::catalog::EntryIssues;
use routine_engine_rs::{RoutineTemplate, Scope};
use serde::Serialize;

use super::helpers::{format_header, format_title, plural, truncate_str};

/// JSON output structure for the list command.
#[derive(Serialize)]
pub struct CatalogListOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routines: Option<Vec<RoutineOutput<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<ScopeOutput<'a>>>,
}

/// JSON output structure for a single routine.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineOutput<'a> {
    pub id: &'a str,
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub filter_count: usize,
}

/// JSON output structure for a single scope.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeOutput<'a> {
    pub id: &'a str,
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub filter_count: usize,
    pub assigned_users: &'a [String],
    pub assigned_teams: &'a [String],
}

fn routine_output(routine: &RoutineTemplate) -> RoutineOutput<'_> {
    RoutineOutput {
        id: &routine.id,
        name: &routine.name,
        category: routine.category.as_deref(),
        description: routine.description.as_deref(),
        filter_count: routine.filters.len(),
    }
}

fn scope_output(scope: &Scope) -> ScopeOutput<'_> {
    ScopeOutput {
        id: &scope.id,
        name: &scope.name,
        description: scope.description.as_deref(),
        filter_count: scope.filters.len(),
        assigned_users: &scope.assigned_users,
        assigned_teams: &scope.assigned_teams,
    }
}

/// Formats routines and scopes as JSON. `None` leaves a section out.
pub fn format_catalog_json(
    routines: Option<&[RoutineTemplate]>,
    scopes: Option<&[Scope]>,
) -> Result<String, serde_json::Error> {
    let output = CatalogListOutput {
        routines: routines.map(|r| r.iter().map(routine_output).collect()),
        scopes: scopes.map(|s| s.iter().map(scope_output).collect()),
    };
    serde_json::to_string_pretty(&output)
}

/// Formats routines as a table.
pub fn format_routines_table(routines: &[RoutineTemplate], use_colors: bool) -> String {
    if routines.is_empty() {
        return "No routines found.\n".to_string();
    }

    let mut output = format_title("Routines", use_colors);
    output.push_str(&format_header(
        &format!("{:<20} {:<30} {:<15} {}", "ID", "Name", "Category", "Filters"),
        use_colors,
    ));

    for routine in routines {
        let id = format!("{:<20}", truncate_str(&routine.id, 20));
        let id = if use_colors {
            id.cyan().to_string()
        } else {
            id
        };
        output.push_str(&format!(
            "{} {:<30} {:<15} {}\n",
            id,
            truncate_str(&routine.name, 30),
            truncate_str(routine.category.as_deref().unwrap_or(""), 15),
            routine.filters.len()
        ));
    }

    output
}

/// Formats scopes as a table.
pub fn format_scopes_table(scopes: &[Scope], use_colors: bool) -> String {
    if scopes.is_empty() {
        return "No scopes found.\n".to_string();
    }

    let mut output = format_title("Scopes", use_colors);
    output.push_str(&format_header(
        &format!("{:<20} {:<30} {:<8} {}", "ID", "Name", "Filters", "Assigned"),
        use_colors,
    ));

    for scope in scopes {
        let id = format!("{:<20}", truncate_str(&scope.id, 20));
        let id = if use_colors {
            id.cyan().to_string()
        } else {
            id
        };
        let assigned = scope
            .assigned_users
            .iter()
            .map(|u| format!("@{u}"))
            .chain(scope.assigned_teams.iter().map(|t| format!("#{t}")))
            .collect::<Vec<_>>()
            .join(" ");
        output.push_str(&format!(
            "{} {:<30} {:<8} {}\n",
            id,
            truncate_str(&scope.name, 30),
            scope.filters.len(),
            truncate_str(&assigned, 40)
        ));
    }

    output
}

/// JSON output structure for one validation finding.
#[derive(Serialize)]
pub struct IssueOutput<'a> {
    pub kind: &'a str,
    pub id: &'a str,
    pub index: usize,
    pub message: String,
}

/// Formats a validation report as JSON.
pub fn format_validation_json(report: &[EntryIssues]) -> Result<String, serde_json::Error> {
    let issues: Vec<IssueOutput> = report
        .iter()
        .flat_map(|entry| {
            entry.issues.iter().map(move |issue| IssueOutput {
                kind: entry.kind,
                id: &entry.id,
                index: issue.index,
                message: issue.error.to_string(),
            })
        })
        .collect();

    serde_json::to_string_pretty(&serde_json::json!({
        "valid": issues.is_empty(),
        "issues": issues,
    }))
}

/// Formats a validation report as text.
pub fn format_validation_table(report: &[EntryIssues], use_colors: bool) -> String {
    if report.is_empty() {
        let ok = "Catalog OK: no filter problems found.";
        return if use_colors {
            format!("{}\n", ok.green())
        } else {
            format!("{ok}\n")
        };
    }

    let mut output = String::new();
    for entry in report {
        let title = format!("{} {}", entry.kind, entry.id);
        output.push_str(&format_title(&title, use_colors));
        for issue in &entry.issues {
            let marker = if use_colors {
                "error".red().to_string()
            } else {
                "error".to_string()
            };
            output.push_str(&format!(
                "  {marker}: filter #{}: {}\n",
                issue.index + 1,
                issue.error
            ));
        }
    }
    let count: usize = report.iter().map(|e| e.issues.len()).sum();
    output.push_str(&format!("\n{} found\n", plural(count, "problem")));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use routine_engine_rs::Catalog;

    fn catalog() -> Catalog {
        Catalog::from_json_str(
            r#"{
                "routines": [
                    {"id": "late", "name": "Late orders", "category": "Purchasing",
                     "filters": [{"columnId": "status", "values": ["late"]}]}
                ],
                "scopes": [
                    {"id": "north", "name": "North", "assignedUsers": ["ana"], "assignedTeams": ["ops"]}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_routines_table() {
        let catalog = catalog();
        let table = format_routines_table(&catalog.routines, false);
        assert!(table.starts_with("Routines\n"));
        assert!(table.contains("late"));
        assert!(table.contains("Purchasing"));
    }

    #[test]
    fn test_colored_ids_keep_columns_aligned() {
        let catalog = catalog();
        let plain = format_routines_table(&catalog.routines, false);
        let colored = format_routines_table(&catalog.routines, true);

        // Padding sits inside the color codes, so the visible width is unchanged.
        let padded_id = format!("{:<20}", "late").cyan().to_string();
        assert!(colored.contains(&format!("{padded_id} Late orders")));
        assert!(plain.contains(&format!("{:<20} Late orders", "late")));

        let scopes = format_scopes_table(&catalog.scopes, true);
        let padded_id = format!("{:<20}", "north").cyan().to_string();
        assert!(scopes.contains(&format!("{padded_id} North")));
    }

    #[test]
    fn test_scopes_table_shows_assignees() {
        let catalog = catalog();
        let table = format_scopes_table(&catalog.scopes, false);
        assert!(table.contains("@ana #ops"));
    }

    #[test]
    fn test_empty_tables() {
        assert_eq!(format_routines_table(&[], false), "No routines found.\n");
        assert_eq!(format_scopes_table(&[], false), "No scopes found.\n");
    }

    #[test]
    fn test_catalog_json_omits_unrequested_sections() {
        let catalog = catalog();
        let json = format_catalog_json(Some(&catalog.routines), None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["routines"][0]["filterCount"], 1);
        assert!(value.get("scopes").is_none());
    }

    #[test]
    fn test_validation_report() {
        let catalog = Catalog::from_json_str(
            r#"{"routines": [{"id": "bad", "name": "Bad",
                "filters": [{"columnId": "d", "dateExpression": "soon"}]}]}"#,
        )
        .unwrap();
        let report = catalog.validate();

        let text = format_validation_table(&report, false);
        assert!(text.contains("routine bad"));
        assert!(text.contains("filter #1"));
        assert!(text.contains("1 problem found"));

        let json: serde_json::Value =
            serde_json::from_str(&format_validation_json(&report).unwrap()).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["issues"][0]["id"], "bad");
    }

    #[test]
    fn test_validation_ok() {
        assert!(format_validation_table(&[], false).contains("no filter problems"));
    }
}
