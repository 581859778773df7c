//! String kernels: legal on `String` columns.
//!
//! Lengths are measured in UTF-8 code points, not bytes. Character-class
//! predicates are Unicode-aware (`char::is_alphabetic` and friends already
//! are); an empty string fails all of them.

use hashbrown::HashSet;
use regex::Regex;

use super::{ColumnBuffer, Kernel};
use crate::buffer::RowMask;

fn mask_by<F: Fn(&str) -> bool>(buffer: &ColumnBuffer, pred: F) -> RowMask {
    let sb = buffer.as_string();
    let mut mask = RowMask::with_capacity(sb.len());
    for i in 0..sb.len() {
        if !sb.valid.get(i) {
            mask.push(false);
            continue;
        }
        mask.push(pred(sb.value(i)));
    }
    mask
}

macro_rules! simple_string_kernel {
    ($name:ident, $rule_name:literal, $pred:expr) => {
        #[derive(Debug, Default)]
        pub struct $name;

        impl Kernel for $name {
            fn rule_name(&self) -> &'static str {
                $rule_name
            }

            fn apply_batch(&mut self, buffer: &ColumnBuffer) -> RowMask {
                mask_by(buffer, $pred)
            }
        }
    };
}

simple_string_kernel!(IsNumeric, "is_numeric", |s: &str| !s.is_empty()
    && s.chars().all(|c| c.is_numeric()));
simple_string_kernel!(IsAlpha, "is_alpha", |s: &str| !s.is_empty()
    && s.chars().all(|c| c.is_alphabetic()));
simple_string_kernel!(IsAlphanumeric, "is_alphanumeric", |s: &str| !s.is_empty()
    && s.chars().all(|c| c.is_alphanumeric()));
simple_string_kernel!(IsLowercase, "is_lowercase", |s: &str| !s.is_empty()
    && !s.chars().any(|c| c.is_uppercase()));
simple_string_kernel!(IsUppercase, "is_uppercase", |s: &str| !s.is_empty()
    && !s.chars().any(|c| c.is_lowercase()));

#[derive(Debug)]
pub struct WithMinLength {
    pub n: usize,
}

impl Kernel for WithMinLength {
    fn rule_name(&self) -> &'static str {
        "with_min_length"
    }

    fn params_display(&self) -> String {
        format!("n={}", self.n)
    }

    fn apply_batch(&mut self, buffer: &ColumnBuffer) -> RowMask {
        mask_by(buffer, |s| s.chars().count() >= self.n)
    }
}

#[derive(Debug)]
pub struct WithMaxLength {
    pub n: usize,
}

impl Kernel for WithMaxLength {
    fn rule_name(&self) -> &'static str {
        "with_max_length"
    }

    fn params_display(&self) -> String {
        format!("n={}", self.n)
    }

    fn apply_batch(&mut self, buffer: &ColumnBuffer) -> RowMask {
        mask_by(buffer, |s| s.chars().count() <= self.n)
    }
}

#[derive(Debug)]
pub struct WithLengthBetween {
    pub lo: usize,
    pub hi: usize,
}

impl Kernel for WithLengthBetween {
    fn rule_name(&self) -> &'static str {
        "with_length_between"
    }

    fn params_display(&self) -> String {
        format!("lo={}, hi={}", self.lo, self.hi)
    }

    fn apply_batch(&mut self, buffer: &ColumnBuffer) -> RowMask {
        mask_by(buffer, |s| {
            let len = s.chars().count();
            len >= self.lo && len <= self.hi
        })
    }
}

#[derive(Debug)]
pub struct IsExactLength {
    pub n: usize,
}

impl Kernel for IsExactLength {
    fn rule_name(&self) -> &'static str {
        "is_exact_length"
    }

    fn params_display(&self) -> String {
        format!("n={}", self.n)
    }

    fn apply_batch(&mut self, buffer: &ColumnBuffer) -> RowMask {
        mask_by(buffer, |s| s.chars().count() == self.n)
    }
}

/// Full-match regex (`^…$` implicit). Compiled once at plan finalization.
#[derive(Debug)]
pub struct WithRegex {
    pattern: String,
    case_insensitive: bool,
    regex: Regex,
}

impl WithRegex {
    pub fn new(pattern: &str, case_insensitive: bool) -> Result<Self, regex::Error> {
        let anchored = format!("^(?:{pattern})$");
        let regex = regex::RegexBuilder::new(&anchored)
            .case_insensitive(case_insensitive)
            .build()?;
        Ok(Self {
            pattern: pattern.to_string(),
            case_insensitive,
            regex,
        })
    }
}

impl Kernel for WithRegex {
    fn rule_name(&self) -> &'static str {
        "with_regex"
    }

    fn params_display(&self) -> String {
        format!(
            "pattern={:?}, case_insensitive={}",
            self.pattern, self.case_insensitive
        )
    }

    fn apply_batch(&mut self, buffer: &ColumnBuffer) -> RowMask {
        mask_by(buffer, |s| self.regex.is_match(s))
    }
}

fn is_url(s: &str) -> bool {
    if s.chars().any(|c| c.is_whitespace()) {
        return false;
    }
    let Some(scheme_end) = s.find("://") else {
        return false;
    };
    let scheme = &s[..scheme_end];
    let mut chars = scheme.chars();
    let valid_scheme = matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '+' | '.' | '-'));
    if !valid_scheme {
        return false;
    }
    let authority = &s[scheme_end + 3..];
    let authority = authority.split(['/', '?', '#']).next().unwrap_or("");
    !authority.is_empty()
}
simple_string_kernel!(IsUrl, "is_url", is_url);

fn is_email(s: &str) -> bool {
    let mut parts = s.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || domain.contains("..") {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| l.chars().count() >= 2)
}
simple_string_kernel!(IsEmail, "is_email", is_email);

fn is_uuid(s: &str) -> bool {
    let groups: Vec<&str> = s.split('-').collect();
    let expected = [8, 4, 4, 4, 12];
    groups.len() == expected.len()
        && groups
            .iter()
            .zip(expected)
            .all(|(g, len)| g.len() == len && g.chars().all(|c| c.is_ascii_hexdigit()))
}
simple_string_kernel!(IsUuid, "is_uuid", is_uuid);

/// Byte-exact membership against a pre-hashed set.
#[derive(Debug)]
pub struct IsIn {
    values: HashSet<String>,
}

impl IsIn {
    pub fn new(values: Vec<String>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl Kernel for IsIn {
    fn rule_name(&self) -> &'static str {
        "is_in"
    }

    fn params_display(&self) -> String {
        format!("{} allowed values", self.values.len())
    }

    fn apply_batch(&mut self, buffer: &ColumnBuffer) -> RowMask {
        mask_by(buffer, |s| self.values.contains(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::StringBuffer;

    fn string_buffer(values: &[Option<&str>]) -> ColumnBuffer {
        let mut b = StringBuffer::default();
        b.clear();
        for v in values {
            match v {
                Some(s) => b.push(s, true),
                None => b.push("", false),
            }
        }
        ColumnBuffer::String(b)
    }

    #[test]
    fn regex_full_match_scenario() {
        let buf = string_buffer(&[
            Some("ABC-123"),
            Some("XYZ-456"),
            Some("abc-123"),
            Some("ABC-12"),
            Some("ABC-1234"),
            Some(""),
            None,
        ]);
        let mut kernel = WithRegex::new(r"[A-Z]{3}-\d{3}", false).unwrap();
        let mask = kernel.apply_batch(&buf);
        assert_eq!(mask.count_ones(), 2);
        assert!(mask.get(0) && mask.get(1));
    }

    #[test]
    fn is_in_scenario() {
        let buf = string_buffer(&[
            Some("apple"),
            Some("banana"),
            Some("orange"),
            Some("grape"),
            Some("Apple"),
            Some(""),
            None,
        ]);
        let mut kernel = IsIn::new(vec!["apple".into(), "banana".into(), "orange".into()]);
        let mask = kernel.apply_batch(&buf);
        assert_eq!(mask.count_ones(), 3);
    }

    #[test]
    fn email_rules() {
        assert!(is_email("ab@cd.co"));
        assert!(!is_email("a@b.co"));
        assert!(!is_email("a@b"));
        assert!(!is_email("a@b..co"));
        assert!(!is_email("@b.co"));
        assert!(!is_email("a@b.c"));
    }

    #[test]
    fn uuid_rules() {
        assert!(is_uuid("550e8400-e29b-41d4-a716-446655440000"));
        assert!(is_uuid("550E8400-E29B-41D4-A716-446655440000"));
        assert!(!is_uuid("550e8400-e29b-41d4-a716"));
    }

    #[test]
    fn url_rules() {
        assert!(is_url("https://example.com/a"));
        assert!(!is_url("htt ps://example.com"));
        assert!(!is_url("https://"));
        assert!(!is_url("notaurl"));
    }

    #[test]
    fn length_is_in_code_points_not_bytes() {
        let buf = string_buffer(&[Some("café")]);
        let mut kernel = IsExactLength { n: 4 };
        let mask = kernel.apply_batch(&buf);
        assert!(mask.get(0));
    }
}
