//! Relative date expressions ("today", "3 weeks ago").
//!
//! This is the single resolver used everywhere a routine or scope filter with
//! a relative date is previewed.
//!
//! # Grammar
//!
//! ```text
//! expression ::= "today" | amount unit "s"? "ago"
//! amount     ::= digit+
//! unit       ::= "day" | "week" | "month" | "year"
//! ```
//!
//! Matching is case-insensitive, ignores surrounding whitespace and must cover
//! the whole input.

use std::sync::LazyLock;

use chrono::{Days, Local, Months, NaiveDate};
use regex::Regex;

use super::error::{FilterError, FilterResult};

static AGO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s*(day|week|month|year)s?\s*ago$").expect("static pattern is valid")
});

/// Calendar unit of a relative offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateUnit {
    Day,
    Week,
    Month,
    Year,
}

/// A parsed relative date expression, independent of any anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeDate {
    /// The anchor date itself.
    Today,
    /// `amount` units before the anchor.
    Ago {
        /// Number of units.
        amount: u32,
        /// Calendar unit.
        unit: DateUnit,
    },
}

impl RelativeDate {
    /// Parses a relative date expression.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::EmptyExpression` for blank input and
    /// `FilterError::InvalidDateExpression` when the grammar does not match.
    ///
    /// # Example
    ///
    /// ```
    /// use routine_engine_rs::filter::{DateUnit, RelativeDate};
    ///
    /// let parsed = RelativeDate::parse("  3 Weeks ago ").unwrap();
    /// assert_eq!(parsed, RelativeDate::Ago { amount: 3, unit: DateUnit::Week });
    /// ```
    pub fn parse(expression: &str) -> FilterResult<Self> {
        let normalized = expression.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(FilterError::EmptyExpression);
        }
        if normalized == "today" {
            return Ok(RelativeDate::Today);
        }

        let captures = AGO_PATTERN
            .captures(&normalized)
            .ok_or_else(|| FilterError::invalid_date_expression(expression))?;

        let amount = captures[1]
            .parse::<u32>()
            .map_err(|_| FilterError::date_out_of_range(expression))?;
        let unit = match &captures[2] {
            "day" => DateUnit::Day,
            "week" => DateUnit::Week,
            "month" => DateUnit::Month,
            "year" => DateUnit::Year,
            _ => return Err(FilterError::invalid_date_expression(expression)),
        };

        Ok(RelativeDate::Ago { amount, unit })
    }

    /// Applies the offset to `anchor`.
    ///
    /// Months and years roll back by calendar, clamping to the last valid day
    /// of the target month. Returns `None` if the result leaves chrono's range.
    pub fn apply(self, anchor: NaiveDate) -> Option<NaiveDate> {
        match self {
            RelativeDate::Today => Some(anchor),
            RelativeDate::Ago { amount, unit } => match unit {
                DateUnit::Day => anchor.checked_sub_days(Days::new(u64::from(amount))),
                DateUnit::Week => anchor.checked_sub_days(Days::new(u64::from(amount) * 7)),
                DateUnit::Month => anchor.checked_sub_months(Months::new(amount)),
                DateUnit::Year => anchor.checked_sub_months(Months::new(amount.checked_mul(12)?)),
            },
        }
    }
}

/// Resolves a relative date expression against `anchor`.
///
/// Returns `None` for anything that does not parse; never panics.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use routine_engine_rs::filter::resolve;
///
/// let anchor = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// assert_eq!(
///     resolve("2 months ago", anchor),
///     NaiveDate::from_ymd_opt(2023, 11, 15)
/// );
/// assert_eq!(resolve("gibberish", anchor), None);
/// ```
pub fn resolve(expression: &str, anchor: NaiveDate) -> Option<NaiveDate> {
    RelativeDate::parse(expression).ok()?.apply(anchor)
}

/// Resolves against the local calendar date.
pub fn resolve_today(expression: &str) -> Option<NaiveDate> {
    resolve(expression, today())
}

/// Returns the local calendar date used as the default anchor.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
