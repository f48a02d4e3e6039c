//! Field rules and sanitizers

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidateLength;

use super::FieldValue;

/// ISO 8601 calendar date with an optional time and offset
static ISO8601: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d{4})-(\d{2})-(\d{2})(?:[T ](\d{2}):(\d{2})(?::(\d{2})(?:[.,]\d+)?)?(?:Z|[+-]\d{2}(?::?\d{2})?)?)?$",
    )
    .expect("ISO 8601 pattern is valid")
});

/// Entities produced by [`escape`], kept as-is when seen again
const ENTITIES: [&str; 7] = ["&amp;", "&lt;", "&gt;", "&quot;", "&#x27;", "&#x2F;", "&#96;"];

/// A constraint on a single field value.
///
/// Rules look at the value with surrounding whitespace removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Non-empty
    Required,
    /// At most this many characters
    MaxLength(u64),
    /// ASCII letters and digits only; the empty string does not qualify
    Alphanumeric,
    /// ISO 8601 date or date-time
    IsoDate,
    /// Decimal integer, used for references to other records
    Integer,
}

impl Rule {
    pub fn accepts(&self, value: &str) -> bool {
        let value = value.trim();
        match self {
            Rule::Required => !value.is_empty(),
            Rule::MaxLength(max) => value.validate_length(None, Some(*max), None),
            Rule::Alphanumeric => {
                !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
            }
            Rule::IsoDate => parse_iso_date(value).is_some(),
            Rule::Integer => value.parse::<i32>().is_ok(),
        }
    }
}

/// A normalizing transform applied to a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sanitizer {
    /// Strip surrounding whitespace
    Trim,
    /// Replace markup-significant characters with HTML entities
    Escape,
    /// Parse into a date; unparseable or empty text becomes no date
    ToDate,
}

impl Sanitizer {
    pub fn apply(&self, value: FieldValue) -> FieldValue {
        match (self, value) {
            (Sanitizer::Trim, FieldValue::Text(s)) => FieldValue::Text(s.trim().to_string()),
            (Sanitizer::Trim, FieldValue::List(values)) => {
                FieldValue::List(values.iter().map(|s| s.trim().to_string()).collect())
            }
            (Sanitizer::Escape, FieldValue::Text(s)) => FieldValue::Text(escape(&s)),
            (Sanitizer::Escape, FieldValue::List(values)) => {
                FieldValue::List(values.iter().map(|s| escape(s)).collect())
            }
            (Sanitizer::ToDate, FieldValue::Text(s)) => FieldValue::Date(parse_iso_date(&s)),
            (Sanitizer::ToDate, FieldValue::List(values)) => {
                FieldValue::Date(values.first().and_then(|s| parse_iso_date(s)))
            }
            (_, date @ FieldValue::Date(_)) => date,
        }
    }
}

/// HTML-escape `& < > " ' / \``. Entities this function produces are left
/// untouched, so escaping twice gives the same result as escaping once.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        if c == '&' {
            if let Some(entity) = ENTITIES.iter().find(|e| rest.starts_with(**e)) {
                out.push_str(entity);
                rest = &rest[entity.len()..];
                continue;
            }
        }
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '`' => out.push_str("&#96;"),
            other => out.push(other),
        }
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// Date part of an ISO 8601 date or date-time, if well formed
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let caps = ISO8601.captures(value.trim())?;
    let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let date = NaiveDate::from_ymd_opt(num(1)? as i32, num(2)?, num(3)?)?;
    if let (Some(hour), Some(minute)) = (num(4), num(5)) {
        NaiveTime::from_hms_opt(hour, minute, num(6).unwrap_or(0))?;
    }
    Some(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims_first() {
        assert!(Rule::Required.accepts("x"));
        assert!(!Rule::Required.accepts(""));
        assert!(!Rule::Required.accepts("   \t"));
    }

    #[test]
    fn test_alphanumeric() {
        assert!(Rule::Alphanumeric.accepts("John123"));
        assert!(Rule::Alphanumeric.accepts("  Smith "));
        assert!(!Rule::Alphanumeric.accepts("Smith!!"));
        assert!(!Rule::Alphanumeric.accepts("Le Guin"));
        assert!(!Rule::Alphanumeric.accepts("Émile"));
        assert!(!Rule::Alphanumeric.accepts(""));
    }

    #[test]
    fn test_max_length_counts_characters() {
        assert!(Rule::MaxLength(5).accepts("Émile"));
        assert!(!Rule::MaxLength(4).accepts("Émile"));
        assert!(Rule::MaxLength(3).accepts("  abc  "));
    }

    #[test]
    fn test_integer() {
        assert!(Rule::Integer.accepts("42"));
        assert!(!Rule::Integer.accepts("4x2"));
        assert!(!Rule::Integer.accepts(""));
    }

    #[test]
    fn test_iso_dates() {
        assert_eq!(parse_iso_date("1980-01-01"), NaiveDate::from_ymd_opt(1980, 1, 1));
        assert_eq!(
            parse_iso_date("1980-01-01T10:30:00Z"),
            NaiveDate::from_ymd_opt(1980, 1, 1)
        );
        assert_eq!(
            parse_iso_date("2001-09-11 08:46+05:00"),
            NaiveDate::from_ymd_opt(2001, 9, 11)
        );
        assert!(parse_iso_date("1980-02-30").is_none());
        assert!(parse_iso_date("1980-01-01T25:00").is_none());
        assert!(parse_iso_date("01/01/1980").is_none());
        assert!(parse_iso_date("").is_none());
        assert!(!Rule::IsoDate.accepts("yesterday"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="/x">Tom & 'Jerry'</a>`"#),
            "&lt;a href=&quot;&#x2F;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;&#x2F;a&gt;&#96;"
        );
        assert_eq!(escape("Smith!!"), "Smith!!");
        assert_eq!(escape("Brontë"), "Brontë");
    }

    #[test]
    fn test_escape_is_idempotent() {
        for raw in [
            "plain",
            "Tom & Jerry",
            "&amp; already",
            "<script>alert('x')</script>",
            "a &lt; b && c",
            "&#x2F;&#96;&",
            "",
        ] {
            let once = escape(raw);
            assert_eq!(escape(&once), once, "escaping {:?} twice changed it", raw);
        }
    }

    #[test]
    fn test_sanitizers_are_idempotent() {
        let chain = [Sanitizer::Trim, Sanitizer::Escape];
        let run = |v: FieldValue| chain.iter().fold(v, |v, s| s.apply(v));

        let once = run(FieldValue::Text("  <b>Jane</b> & co ".into()));
        assert_eq!(once, FieldValue::Text("&lt;b&gt;Jane&lt;&#x2F;b&gt; &amp; co".into()));
        assert_eq!(run(once.clone()), once);

        let date = Sanitizer::ToDate.apply(FieldValue::Text("1980-01-01".into()));
        assert_eq!(date, FieldValue::Date(NaiveDate::from_ymd_opt(1980, 1, 1)));
        assert_eq!(Sanitizer::ToDate.apply(date.clone()), date);
    }

    #[test]
    fn test_to_date_of_empty_or_garbage_is_none() {
        assert_eq!(
            Sanitizer::ToDate.apply(FieldValue::Text(String::new())),
            FieldValue::Date(None)
        );
        assert_eq!(
            Sanitizer::ToDate.apply(FieldValue::Text("someday".into())),
            FieldValue::Date(None)
        );
    }

    #[test]
    fn test_list_values_are_sanitized_individually() {
        let out = Sanitizer::Escape.apply(FieldValue::List(vec!["1".into(), "<2>".into()]));
        assert_eq!(out, FieldValue::List(vec!["1".into(), "&lt;2&gt;".into()]));
    }
}
