//! Salary extraction from free-form listing text.
//!
//! Listings describe pay in wildly different ways (`$25-30/hr`, `$80k - $100k`,
//! `USD 120,000 per year`, a lone `$95000` buried in a paragraph). A `USD`
//! prefix stands in for `$` everywhere, and each end of a range may carry its
//! own unit (`$25/hr - $30/hr`). The parser tries a fixed sequence of
//! patterns and returns the first hit:
//!
//! 1. Hourly range (`$25 - $30/hr`)
//! 2. Hourly single value (`$28 per hour`)
//! 3. Annual range, with K-suffix normalization (`$80-100K`, `$80K - 100`)
//! 4. Annual single value (`$95k`, `$120,000`)
//! 5. Generic dollar amount bucketed by magnitude, also `60000 USD`
//!
//! Order matters: an hourly range also contains an hourly single value, and
//! an annual range contains two annual single values.

use crate::models::{Salary, SalaryType};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// A dollar figure: `80`, `80.5`, `80,000` or `1,250,000.00`.
const NUM: &str = r"(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)";
/// Currency in front of a figure.
const CUR: &str = r"(?:\$|\busd)\s*";
/// Currency in front of the upper bound of a range, which may be left out.
const CUR_OPT: &str = r"(?:\$|usd)?\s*";
/// Separator between the two ends of a range.
const DASH: &str = r"\s*(?:-|–|—|to)\s*";
/// Markers that turn a figure into an hourly rate.
const PER_HOUR: &str = r"(?:usd\s*)?(?:/\s*h(?:ou)?r\b|per\s+hour\b|an\s+hour\b|hourly\b)";
/// Markers that turn a figure into a yearly salary.
const PER_YEAR: &str = r"(?:usd\s*)?(?:/\s*y(?:ea)?r\b|per\s+(?:year|annum)\b|a\s+year\b|annually\b|annual\b)";

/// Annual figures below this are not believable salaries.
const MIN_ANNUAL: f64 = 10_000.0;
/// Generic heuristic: anything at or above this is a yearly salary.
const GENERIC_ANNUAL_FLOOR: f64 = 20_000.0;
/// Generic heuristic: hourly rates fall in this band.
const GENERIC_HOURLY_BAND: std::ops::RangeInclusive<f64> = 15.0..=200.0;

static HOURLY_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i){CUR}{NUM}\s*(?:{PER_HOUR})?{DASH}{CUR_OPT}{NUM}\s*{PER_HOUR}"))
        .expect("hourly range regex")
});

static HOURLY_SINGLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i){CUR}{NUM}\s*{PER_HOUR}")).expect("hourly single regex")
});

static ANNUAL_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i){CUR}{NUM}\s*(k)?\s*(?:{PER_YEAR})?{DASH}{CUR_OPT}{NUM}\s*(k)?\b"))
        .expect("annual range regex")
});

static ANNUAL_SINGLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i){CUR}{NUM}\s*(k)?\b\s*({PER_YEAR})?"))
        .expect("annual single regex")
});

static DOLLAR_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\$|\busd)\s*(\d[\d,]*(?:\.\d+)?)|(\d[\d,]*(?:\.\d+)?)\s*usd\b")
        .expect("dollar amount regex")
});

/// Extract a structured salary from free-form text.
///
/// # Returns
///
/// `Some(Salary)` for the first pattern that matches, `None` when the text
/// carries no recognizable pay information.
///
/// # Examples
///
/// ```ignore
/// let s = parse_salary("Pay: $25 - $30/hr").unwrap();
/// assert_eq!((s.min, s.max, s.kind), (25.0, 30.0, SalaryType::Hourly));
///
/// let s = parse_salary("$80-100K DOE").unwrap();
/// assert_eq!((s.min, s.max), (80_000.0, 100_000.0));
///
/// assert!(parse_salary("Competitive pay").is_none());
/// ```
pub fn parse_salary(text: &str) -> Option<Salary> {
    hourly_range(text)
        .or_else(|| hourly_single(text))
        .or_else(|| annual_range(text))
        .or_else(|| annual_single(text))
        .or_else(|| generic_amount(text))
}

fn hourly_range(text: &str) -> Option<Salary> {
    let caps = HOURLY_RANGE.captures(text)?;
    let lo = number(&caps, 1)?;
    let hi = number(&caps, 2)?;
    Some(Salary::new(lo, hi, SalaryType::Hourly))
}

fn hourly_single(text: &str) -> Option<Salary> {
    let caps = HOURLY_SINGLE.captures(text)?;
    Some(Salary::single(number(&caps, 1)?, SalaryType::Hourly))
}

fn annual_range(text: &str) -> Option<Salary> {
    ANNUAL_RANGE.captures_iter(text).find_map(|caps| {
        let mut lo = number(&caps, 1)?;
        let mut hi = number(&caps, 3)?;
        let lo_k = caps.get(2).is_some();
        let hi_k = caps.get(4).is_some();

        if hi_k {
            hi *= 1000.0;
        } else if lo_k && hi < 1000.0 {
            // `$80K - 100`: the lower bound's suffix carries over.
            hi *= 1000.0;
        }
        // `$80-100K`: the suffix on the upper bound covers a bare lower bound.
        if lo_k || (hi_k && lo < 1000.0) {
            lo *= 1000.0;
        }

        if lo.max(hi) < MIN_ANNUAL || lo <= 0.0 {
            return None;
        }
        Some(Salary::new(lo, hi, SalaryType::Annual))
    })
}

fn annual_single(text: &str) -> Option<Salary> {
    ANNUAL_SINGLE.captures_iter(text).find_map(|caps| {
        let raw = caps.get(1)?.as_str();
        let has_k = caps.get(2).is_some();
        let has_marker = caps.get(3).is_some();
        if !(has_k || has_marker || raw.contains(',')) {
            return None;
        }

        let mut value = number(&caps, 1)?;
        if has_k {
            value *= 1000.0;
        }
        (value >= MIN_ANNUAL).then(|| Salary::single(value, SalaryType::Annual))
    })
}

fn generic_amount(text: &str) -> Option<Salary> {
    DOLLAR_AMOUNT.captures_iter(text).find_map(|caps| {
        let value = number(&caps, 1).or_else(|| number(&caps, 2))?;
        if value >= GENERIC_ANNUAL_FLOOR {
            Some(Salary::single(value, SalaryType::Annual))
        } else if GENERIC_HOURLY_BAND.contains(&value) {
            Some(Salary::single(value, SalaryType::Hourly))
        } else {
            None
        }
    })
}

/// Parse capture group `idx` as a number, ignoring thousands separators.
fn number(caps: &Captures<'_>, idx: usize) -> Option<f64> {
    caps.get(idx)?
        .as_str()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
