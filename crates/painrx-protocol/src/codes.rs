//! Diagnosis codes and allergy substances in protocol text.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::rule_text::sanitize;

fn icd_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // K25, K25.1, N18.30
        Regex::new(r"(?i)\b([A-Z]\d{2}(?:\.\d{1,4})?)\b").unwrap()
    })
}

fn substance_split_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+OR\s+|[,;]").unwrap())
}

/// Every ICD-10 style code in the text, upper-cased, deduplicated, in order.
pub fn extract_icd_codes(raw: &str) -> Vec<String> {
    let text = sanitize(raw);
    let mut seen = BTreeSet::new();
    icd_regex()
        .captures_iter(&text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_uppercase())
        .filter(|code| seen.insert(code.clone()))
        .collect()
}

/// Truncate a code to at most one digit after the decimal point.
pub fn base_code(code: &str) -> String {
    let code = code.trim().to_ascii_uppercase();
    match code.split_once('.') {
        Some((category, sub)) => match sub.chars().next() {
            Some(first) => format!("{category}.{first}"),
            None => category.to_string(),
        },
        None => code,
    }
}

/// Whether a patient diagnosis is covered by a protocol code.
///
/// Base codes must be equal, with one widening: a category code (`K25`)
/// in the protocol covers every subcode in that category (`K25.4`).
pub fn code_matches(protocol_code: &str, patient_code: &str) -> bool {
    let protocol = base_code(protocol_code);
    let patient = base_code(patient_code);
    if protocol == patient {
        return true;
    }
    if !protocol.contains('.') {
        let category = patient.split('.').next().unwrap_or_default();
        return category == protocol;
    }
    false
}

/// Split an allergy-avoidance cell into lower-cased substances.
pub fn split_substances(raw: &str) -> Vec<String> {
    let text = sanitize(raw);
    substance_split_regex()
        .split(&text)
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
