//! Free-text rule cell parsing.
//!
//! Protocol cells are written by clinicians, not machines, e.g.
//! `"Class B - 12h  Class C - avoid"`, `"<30 mL/min - reduce by 50%"` or
//! `">75 years - avoid"`. This module sanitises such a cell and splits it
//! into `(MatchKey, directive text)` clauses in text order.
//!
//! # Example
//! ```
//! use painrx_protocol::rule_text::{parse_clauses, MatchKey, Comparison};
//! let clauses = parse_clauses("<30 mL/min - reduce by 50%");
//! assert_eq!(clauses.len(), 1);
//! assert_eq!(clauses[0].key, MatchKey::Compare { op: Comparison::Lt, threshold: 30.0 });
//! assert_eq!(clauses[0].directive, "reduce by 50%");
//! ```

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Normalise the typographic noise found in spreadsheet exports:
/// exotic spaces, dash variants, `≤`/`≥`, and runs of whitespace.
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\u{00A0}' | '\u{2007}' | '\u{2009}' | '\u{202F}' | '\u{3000}' => out.push(' '),
            '\u{2010}'..='\u{2015}' | '\u{2212}' | '\u{FE63}' | '\u{FF0D}' => out.push('-'),
            '\u{2264}' => out.push_str("<="),
            '\u{2265}' => out.push_str(">="),
            '\u{03BC}' => out.push('\u{00B5}'),
            '\u{200B}' | '\u{FEFF}' => {}
            _ => out.push(c),
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// An empty cell or the `NA` token means the rule does not apply.
pub fn is_not_applicable(raw: &str) -> bool {
    let clean = sanitize(raw);
    clean.is_empty() || clean.eq_ignore_ascii_case("na") || clean.eq_ignore_ascii_case("n/a")
}

// ── Match keys ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    /// Whether `value <op> threshold` holds.
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Lt => value < threshold,
            Self::Le => value <= threshold,
            Self::Gt => value > threshold,
            Self::Ge => value >= threshold,
        }
    }
}

/// The condition half of a clause.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchKey {
    /// Category letter, upper-case (`A`–`F` renal, `A`–`C` hepatic).
    Class(char),
    /// Numeric comparison such as `<30`.
    Compare { op: Comparison, threshold: f64 },
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(letter) => write!(f, "class {letter}"),
            Self::Compare { op, threshold } => write!(f, "{}{}", op.symbol(), threshold),
        }
    }
}

/// One `(condition, directive)` pair from a rule cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleClause {
    pub key: MatchKey,
    /// Remaining clause text, e.g. "reduce by 50%".
    pub directive: String,
}

// ── Parsing ───────────────────────────────────────────────────────────────────

fn class_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Class B, class c, Child-Pugh C, ChildPugh A
        Regex::new(r"(?i)\b(?:class|child\s*-?\s*pugh)\s*([A-F])\b").unwrap()
    })
}

fn compare_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // <30, >= 75, <100, <1,5
        Regex::new(r"([<>]=?)\s*(\d+(?:[.,]\d+)?)").unwrap()
    })
}

fn integer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").unwrap())
}

/// Parse a decimal that may use a comma separator.
pub(crate) fn parse_decimal(text: &str) -> Option<f64> {
    text.replace(',', ".").parse::<f64>().ok()
}

/// Split a rule cell into clauses, in the order they appear.
///
/// Returns an empty vector when nothing recognisable is found; callers
/// treat that as "no directive matched this patient".
pub fn parse_clauses(raw: &str) -> Vec<RuleClause> {
    let text = sanitize(raw);

    // (start, end, key) for every condition marker in the cell
    let mut markers: Vec<(usize, usize, MatchKey)> = Vec::new();

    for caps in class_regex().captures_iter(&text) {
        if let (Some(whole), Some(letter)) = (caps.get(0), caps.get(1)) {
            if let Some(c) = letter.as_str().chars().next() {
                markers.push((whole.start(), whole.end(), MatchKey::Class(c.to_ascii_uppercase())));
            }
        }
    }

    for caps in compare_regex().captures_iter(&text) {
        let (Some(whole), Some(op), Some(num)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let (Some(op), Some(threshold)) = (Comparison::from_symbol(op.as_str()), parse_decimal(num.as_str())) else {
            continue;
        };
        markers.push((whole.start(), whole.end(), MatchKey::Compare { op, threshold }));
    }

    markers.sort_by_key(|(start, _, _)| *start);

    // Drop markers that start inside the previous one
    let mut kept: Vec<(usize, usize, MatchKey)> = Vec::with_capacity(markers.len());
    for marker in markers {
        if kept.last().map_or(true, |(_, end, _)| marker.0 >= *end) {
            kept.push(marker);
        }
    }

    let mut clauses = Vec::with_capacity(kept.len());
    for (i, (_, end, key)) in kept.iter().enumerate() {
        let body_end = kept.get(i + 1).map_or(text.len(), |(next_start, _, _)| *next_start);
        let body = &text[*end..body_end];
        clauses.push(RuleClause {
            key: *key,
            directive: clause_directive(body, key),
        });
    }
    clauses
}

/// Strip the unit part ("mL/min", "years", "K/µL") and separators from a clause body.
fn clause_directive(body: &str, key: &MatchKey) -> String {
    let body = match key {
        MatchKey::Compare { .. } => match body.find(|c: char| c == '-' || c == ':') {
            Some(idx) => &body[idx + 1..],
            None => body,
        },
        MatchKey::Class(_) => body,
    };
    body.trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | ':' | ',' | ';' | '.'))
        .to_string()
}

/// First integer in the cell, e.g. `75` for `">75 years - avoid"`.
pub fn first_integer(raw: &str) -> Option<u32> {
    let text = sanitize(raw);
    integer_regex()
        .find(&text)
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

/// Threshold of a single-bound cell: the integer after the first comparator,
/// so `"SpO2 <92% - avoid"` gives `92`. Falls back to [`first_integer`] when
/// the cell has no comparator.
pub fn threshold_integer(raw: &str) -> Option<u32> {
    let text = sanitize(raw);
    let after_comparator = compare_regex()
        .captures(&text)
        .and_then(|c| c.get(2))
        .and_then(|m| integer_regex().find(m.as_str()))
        .and_then(|m| m.as_str().parse::<u32>().ok());
    after_comparator.or_else(|| first_integer(raw))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
