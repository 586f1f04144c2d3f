//! Output formatting utilities for the rtn CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules by what is being printed:
//!
//! - [`catalog`] - Routine and scope listings, validation reports
//! - [`rows`] - Preview counts and matched-row tables
//! - [`outcome`] - Customize results (apply template or save custom routine)
//! - [`helpers`] - Common formatting utilities (truncation, cells, headers)

mod catalog;
pub mod helpers;
mod outcome;
mod rows;

pub use catalog::{
    format_catalog_json, format_routines_table, format_scopes_table, format_validation_json,
    format_validation_table,
};
pub use outcome::{format_customize_json, format_customize_text};
pub use rows::{display_columns, format_count, format_rows_table, PreviewOutput};
