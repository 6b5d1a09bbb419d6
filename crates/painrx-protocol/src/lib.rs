//! painrx-protocol — Reading the protocol table.
//!
//! Turns the free-text cells of a protocol row into typed clauses and
//! directives, normalises patient lab values to the form a clause expects,
//! and loads protocol rows from their store.

pub mod rule_text;
pub mod directive;
pub mod normalise;
pub mod pain_range;
pub mod codes;
pub mod source;
pub mod quality;

pub use codes::{base_code, code_matches, extract_icd_codes, split_substances};
pub use directive::{parse_directive, trailing_quantity, Directive, Quantity, QuantityUnit};
pub use pain_range::{PainRange, MAX_PAIN_SCORE};
pub use quality::{check_rows, QualityIssue};
pub use rule_text::{
    first_integer, is_not_applicable, parse_clauses, sanitize, threshold_integer, Comparison, MatchKey,
    RuleClause,
};
pub use source::{FileProtocolSource, InMemoryProtocolSource, ProtocolSource};
