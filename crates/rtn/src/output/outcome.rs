//! Customize output formatting.

use owo_colors::OwoColorize;
use routine_engine_rs::filter::{ColumnFilter, Predicate};
use routine_engine_rs::{Scalar, SortSpec};
use serde::Serialize;

use crate::commands::customize::{CustomRoutine, CustomizeResult};

use super::helpers::plural;

/// JSON output structure for the customize command.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomizeOutput<'a> {
    #[serde(flatten)]
    outcome: &'a routine_engine_rs::PreviewOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    routine: Option<&'a CustomRoutine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
}

/// Formats a customize result as JSON.
pub fn format_customize_json(result: &CustomizeResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&CustomizeOutput {
        outcome: &result.outcome,
        routine: result.custom.as_ref(),
        count: result.count,
    })
}

/// Formats a customize result as text.
pub fn format_customize_text(result: &CustomizeResult, use_colors: bool) -> String {
    let mut output = String::new();

    match &result.custom {
        None => {
            let line = format!(
                "No changes: applying template '{}' ({})",
                result.source_name, result.source_id
            );
            if use_colors {
                output.push_str(&format!("{}\n", line.green()));
            } else {
                output.push_str(&line);
                output.push('\n');
            }
        }
        Some(custom) => {
            let line = format!("Customized '{}': saving a new routine", result.source_name);
            if use_colors {
                output.push_str(&format!("{}\n", line.yellow()));
            } else {
                output.push_str(&line);
                output.push('\n');
            }
            output.push_str(&format!("  ID:       {}\n", custom.id));
            output.push_str(&format!("  Name:     {}\n", custom.name));
            output.push_str(&format!("  Based on: {}\n", custom.based_on));
            output.push_str(&format!("  Anchor:   {}\n", custom.anchor));
            output.push_str(&format!("\nFilters ({}):\n", custom.filters.len()));
            for filter in &custom.filters {
                output.push_str(&format!("  - {}\n", format_filter(filter)));
            }
            if !custom.sort.is_empty() {
                output.push_str(&format!("\nSort: {}\n", format_sort(&custom.sort)));
            }
        }
    }

    if let Some(count) = result.count {
        output.push_str(&format!("\n{} match\n", plural(count, "row")));
    }

    output
}

/// Renders one normalized filter as `column op value`.
pub fn format_filter(filter: &ColumnFilter) -> String {
    let column = &filter.column_id;
    match &filter.predicate {
        Predicate::ExactValue { value } => format!("{column} = {}", format_value(value)),
        Predicate::ValueSet { values } => format!("{column} in [{}]", format_values(values)),
        Predicate::Conditioned { condition, values } => {
            format!("{column} {condition} {}", format_values(values))
        }
        Predicate::DateCondition { condition, date } => format!("{column} {condition} {date}"),
    }
}

fn format_value(value: &Scalar) -> String {
    match value {
        Scalar::Text(s) => format!("\"{s}\""),
        other => other.to_string(),
    }
}

fn format_values(values: &[Scalar]) -> String {
    values.iter().map(format_value).collect::<Vec<_>>().join(", ")
}

fn format_sort(sort: &[SortSpec]) -> String {
    sort.iter()
        .map(|s| format!("{} {}", s.column_id, s.direction))
        .collect::<Vec<_>>()
        .join(", ")
}
