//! Filter normalization, evaluation and change detection.
//!
//! Routine-library templates and saved scopes carry declarative
//! [`FilterSpec`](crate::FilterSpec)s. This module turns them into evaluatable
//! [`ColumnFilter`]s, applies those to rows, and tells whether a user has
//! edited a preview away from its template defaults.
//!
//! # Pipeline
//!
//! ```text
//! FilterSpec[] --FilterNormalizer--> ColumnFilter[] --FilterSetEvaluator--> matched rows
//!                     |
//!                 resolve() for relative dates ("today", "3 weeks ago")
//! ```
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use routine_engine_rs::filter::{FilterNormalizer, FilterSetEvaluator};
//! use routine_engine_rs::{ConditionKind, FilterSpec, Row, Scalar};
//!
//! let anchor = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
//! let specs = vec![FilterSpec::relative_date(
//!     "orderDate",
//!     Some(ConditionKind::LessThan),
//!     "1 month ago",
//! )];
//! let filters = FilterNormalizer::new(anchor).normalize(&specs);
//!
//! let rows: Vec<Row> = ["2024-05-01", "2024-06-01"]
//!     .iter()
//!     .map(|d| Row::from([("orderDate".to_string(), Scalar::from(*d))]))
//!     .collect();
//! let matched = FilterSetEvaluator::new(&filters).filtered_rows(&rows);
//! assert_eq!(matched.len(), 1);
//! ```

mod change;
mod date;
mod error;
mod evaluator;
mod normalizer;
mod predicate;
mod validate;

pub use change::{has_changed, Snapshot};
pub use date::{resolve, resolve_today, today, DateUnit, RelativeDate};
pub use error::{FilterError, FilterResult};
pub use evaluator::{filtered_rows, matches_all, parse_cell_date, FilterSetEvaluator};
pub use normalizer::{normalize, FilterNormalizer, DEFAULT_DATE_CONDITION};
pub use predicate::{ColumnFilter, Predicate};
pub use validate::{validate_spec, validate_specs, SpecIssue};
