//! Directive micro-language.
//!
//! The right-hand side of every rule clause is one of a handful of
//! instructions. Every rule applier consumes the same typed `Directive`
//! instead of matching text itself.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::rule_text::{parse_decimal, sanitize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Directive {
    /// Do not give the drug.
    Avoid,
    /// Lower the current dose by a percentage (0–100).
    ReduceByPercent(f64),
    /// Absolute dose in mg.
    SetDose(f64),
    /// Absolute dosing interval in hours.
    SetInterval(f64),
    /// Nothing actionable in the clause.
    NoOp,
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Avoid => write!(f, "avoid"),
            Self::ReduceByPercent(p) => write!(f, "reduce dose by {p}%"),
            Self::SetDose(mg) => write!(f, "dose {mg} mg"),
            Self::SetInterval(h) => write!(f, "every {h} h"),
            Self::NoOp => write!(f, "no action"),
        }
    }
}

fn avoid_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:avoid|contra-?indicated|do not use|not recommended)\b").unwrap()
    })
}

fn reduce_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // "reduce by 50%", "reduce dose by 25 %", "50% reduction", "50% dose reduction"
        Regex::new(
            r"(?i)\breduce(?:\s+(?:the\s+)?dose)?\s+by\s+(\d+(?:[.,]\d+)?)\s*%|(\d+(?:[.,]\d+)?)\s*%\s*(?:dose\s+)?reduction",
        )
        .unwrap()
    })
}

fn dose_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*mg\b").unwrap())
}

fn interval_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // "12h", "q8h", "every 6 hours", "8 hrs"
        Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:h|hr|hrs|hours?)\b").unwrap()
    })
}

fn trailing_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+(?:[.,]\d+)?)\s*([A-Za-z\u{00B5}%/]*)\s*\.?$").unwrap())
}

/// Interpret the directive half of a clause.
///
/// Precedence when a clause mentions several things: avoid, then percent
/// reduction, then absolute dose, then interval.
pub fn parse_directive(raw: &str) -> Directive {
    let text = sanitize(raw);
    if text.is_empty() {
        return Directive::NoOp;
    }

    if avoid_regex().is_match(&text) {
        return Directive::Avoid;
    }

    if let Some(caps) = reduce_regex().captures(&text) {
        let pct = caps
            .get(1)
            .or_else(|| caps.get(2))
            .and_then(|m| parse_decimal(m.as_str()));
        if let Some(pct) = pct.filter(|p| *p > 0.0 && *p <= 100.0) {
            return Directive::ReduceByPercent(pct);
        }
    }

    if let Some(mg) = dose_regex()
        .captures(&text)
        .and_then(|c| c.get(1))
        .and_then(|m| parse_decimal(m.as_str()))
    {
        return Directive::SetDose(mg);
    }

    if let Some(hours) = interval_regex()
        .captures(&text)
        .and_then(|c| c.get(1))
        .and_then(|m| parse_decimal(m.as_str()))
    {
        return Directive::SetInterval(hours);
    }

    tracing::debug!("No directive recognised in '{}'", text);
    Directive::NoOp
}

// ── Trailing quantities ──────────────────────────────────────────────────────

/// Units the trailing-quantity form knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUnit {
    Milligrams,
    Hours,
}

/// A number at the very end of a cell together with whatever unit follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub value: f64,
    /// Unit token as written (may be empty).
    pub unit: String,
}

impl Quantity {
    pub fn unit_kind(&self) -> Option<QuantityUnit> {
        match self.unit.to_ascii_lowercase().as_str() {
            "mg" => Some(QuantityUnit::Milligrams),
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(QuantityUnit::Hours),
            _ => None,
        }
    }
}

/// Trailing number and unit, e.g. `500 mg` in `"<50 kg - 500 mg"`.
pub fn trailing_quantity(raw: &str) -> Option<Quantity> {
    let text = sanitize(raw);
    let caps = trailing_regex().captures(&text)?;
    let value = parse_decimal(caps.get(1)?.as_str())?;
    let unit = caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default();
    Some(Quantity { value, unit })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avoid_vocabulary() {
        assert_eq!(parse_directive("avoid"), Directive::Avoid);
        assert_eq!(parse_directive("AVOID!"), Directive::Avoid);
        assert_eq!(parse_directive("contraindicated"), Directive::Avoid);
        assert_eq!(parse_directive("do not use"), Directive::Avoid);
    }

    #[test]
    fn test_reduce_by_percent() {
        assert_eq!(parse_directive("reduce by 50%"), Directive::ReduceByPercent(50.0));
        assert_eq!(parse_directive("Reduce dose by 25 %"), Directive::ReduceByPercent(25.0));
        assert_eq!(parse_directive("50% reduction"), Directive::ReduceByPercent(50.0));
    }

    #[test]
    fn test_absolute_dose_and_interval() {
        assert_eq!(parse_directive("500 mg"), Directive::SetDose(500.0));
        assert_eq!(parse_directive("12h"), Directive::SetInterval(12.0));
        assert_eq!(parse_directive("q8h"), Directive::SetInterval(8.0));
        assert_eq!(parse_directive("every 6 hours"), Directive::SetInterval(6.0));
    }

    #[test]
    fn test_avoid_wins_over_numbers() {
        assert_eq!(parse_directive("avoid, or 250 mg q12h if no alternative"), Directive::Avoid);
    }

    #[test]
    fn test_unrecognised_is_noop() {
        assert_eq!(parse_directive("monitor closely"), Directive::NoOp);
        assert_eq!(parse_directive(""), Directive::NoOp);
        assert_eq!(parse_directive("reduce by 150%"), Directive::NoOp);
    }

    #[test]
    fn test_trailing_quantity() {
        let q = trailing_quantity("<50 kg - 500 mg").unwrap();
        assert_eq!(q.value, 500.0);
        assert_eq!(q.unit_kind(), Some(QuantityUnit::Milligrams));

        let q = trailing_quantity("<50kg - 8h").unwrap();
        assert_eq!(q.value, 8.0);
        assert_eq!(q.unit_kind(), Some(QuantityUnit::Hours));

        let q = trailing_quantity("<50 kg - 2 tablets").unwrap();
        assert_eq!(q.unit, "tablets");
        assert_eq!(q.unit_kind(), None);

        assert!(trailing_quantity("<50 kg - avoid").is_none());
    }
}
