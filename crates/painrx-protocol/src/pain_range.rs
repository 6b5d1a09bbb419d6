//! Pain-level ranges such as `"4-6"`, `"4 to 6"` or `"7"`.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::rule_text::sanitize;

/// Highest score on the pain scale.
pub const MAX_PAIN_SCORE: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PainRange {
    /// Inclusive bounds.
    Span { low: u8, high: u8 },
    /// Malformed range text; matches no score.
    Empty,
}

fn range_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(\d{1,2})\s*(?:-|to)\s*(\d{1,2})$").unwrap())
}

fn single_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2})$").unwrap())
}

impl PainRange {
    /// Parse range text. Anything unreadable becomes `Empty`.
    pub fn parse(raw: &str) -> Self {
        let text = sanitize(raw);

        let bounds = if let Some(caps) = range_regex().captures(&text) {
            let low = caps.get(1).and_then(|m| m.as_str().parse::<u8>().ok());
            let high = caps.get(2).and_then(|m| m.as_str().parse::<u8>().ok());
            low.zip(high)
        } else if let Some(caps) = single_regex().captures(&text) {
            caps.get(1)
                .and_then(|m| m.as_str().parse::<u8>().ok())
                .map(|v| (v, v))
        } else {
            None
        };

        match bounds {
            Some((low, high)) if low <= high && high <= MAX_PAIN_SCORE => Self::Span { low, high },
            _ => Self::Empty,
        }
    }

    pub fn contains(&self, score: u8) -> bool {
        match self {
            Self::Span { low, high } => (*low..=*high).contains(&score),
            Self::Empty => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for PainRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Span { low, high } if low == high => write!(f, "{low}"),
            Self::Span { low, high } => write!(f, "{low}-{high}"),
            Self::Empty => write!(f, "(empty)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(PainRange::parse("4-6"), PainRange::Span { low: 4, high: 6 });
        assert_eq!(PainRange::parse(" 4 \u{2013} 6 "), PainRange::Span { low: 4, high: 6 });
        assert_eq!(PainRange::parse("4 to 6"), PainRange::Span { low: 4, high: 6 });
        assert_eq!(PainRange::parse("7"), PainRange::Span { low: 7, high: 7 });
    }

    #[test]
    fn test_malformed_is_empty() {
        assert!(PainRange::parse("").is_empty());
        assert!(PainRange::parse("severe").is_empty());
        assert!(PainRange::parse("6-4").is_empty());
        assert!(PainRange::parse("8-12").is_empty());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = PainRange::parse("4-6");
        assert!(!range.contains(3));
        assert!(range.contains(4));
        assert!(range.contains(6));
        assert!(!range.contains(7));
        assert!(!PainRange::Empty.contains(0));
    }
}
