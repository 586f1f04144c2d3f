//! Filter and relative-date rule engine for routine and scope previews.
//!
//! Routine-library templates and saved scopes describe their data perimeter
//! with declarative [`FilterSpec`]s. This crate normalizes those specs into
//! evaluatable column filters, applies them to tabular rows, and detects when
//! a user has customized a preview away from its template.
//!
//! The engine is synchronous and pure: no I/O, no timers, no shared state.
//! Loading catalogs and datasets from disk is up to the caller.
//!
//! # Modules
//!
//! - [`filter`]: relative dates, normalization, evaluation, change detection
//! - [`catalog`]: routine templates and scopes, parsed from JSON or TOML
//! - [`preview`]: a preview session tying the pieces together

pub mod catalog;
pub mod filter;
mod model;
pub mod preview;

pub use catalog::{Catalog, CatalogError, FilterSource, RoutineTemplate, Scope};
pub use model::{ConditionKind, FilterSpec, Row, RowLookup, Scalar, SortDirection, SortSpec};
pub use preview::{PreviewOutcome, PreviewSession};
