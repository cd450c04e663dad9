//! Employment-type detection from listing text.

use crate::models::EmploymentType;
use once_cell::sync::Lazy;
use regex::Regex;

/// Keyword patterns in precedence order.
///
/// Narrow arrangements are checked before full-time so that text such as
/// "full-time contract" or "part-time, permanent" resolves to the narrower type.
static PATTERNS: Lazy<Vec<(EmploymentType, Regex)>> = Lazy::new(|| {
    [
        (EmploymentType::Internship, r"(?i)\bintern(?:ship)?s?\b"),
        (EmploymentType::PartTime, r"(?i)\bpart[\s-]?time\b"),
        (EmploymentType::Contract, r"(?i)\b(?:contract(?:or)?|freelancer?)\b"),
        (EmploymentType::Temporary, r"(?i)\b(?:temporary|temp|seasonal)\b"),
        (EmploymentType::FullTime, r"(?i)\b(?:full[\s-]?time|permanent)\b"),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).expect("employment type regex")))
    .collect()
});

/// Detect the employment type advertised in `text`.
///
/// Returns `None` when no keyword is present.
pub fn parse_employment_type(text: &str) -> Option<EmploymentType> {
    PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(kind, _)| *kind)
}
