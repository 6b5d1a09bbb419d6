//! Data-quality checks over a protocol table.
//!
//! The engine tolerates bad cells (it logs them and moves on); this module
//! lists them up front so that a table can be fixed before it is used.

use painrx_common::ProtocolRow;
use serde::Serialize;
use std::fmt;

use crate::directive::trailing_quantity;
use crate::pain_range::PainRange;
use crate::rule_text::{is_not_applicable, parse_clauses, threshold_integer};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityIssue {
    /// Zero-based row index in the table.
    pub row: usize,
    pub column: &'static str,
    pub message: String,
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {} [{}]: {}", self.row + 1, self.column, self.message)
    }
}

/// Inspect every row and return the problems found, in row order.
pub fn check_rows(rows: &[ProtocolRow]) -> Vec<QualityIssue> {
    let mut issues = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        check_row(idx, row, &mut issues);
    }
    issues
}

fn check_row(row_idx: usize, row: &ProtocolRow, issues: &mut Vec<QualityIssue>) {
    let mut push = |column: &'static str, message: String| {
        issues.push(QualityIssue { row: row_idx, column, message });
    };

    if PainRange::parse(&row.pain_range).is_empty() {
        push("pain_range", format!("malformed pain range '{}'", row.pain_range));
    }

    if row.primary().is_empty() {
        push("primary_ingredient", "primary drug has no active ingredient".to_string());
    }

    for (column, cell) in [
        ("age_rule", &row.age_rule),
        ("sodium_rule", &row.sodium_rule),
        ("saturation_rule", &row.saturation_rule),
    ] {
        if !is_not_applicable(cell) && threshold_integer(cell).is_none() {
            push(column, format!("no numeric threshold in '{cell}'"));
        }
    }

    for (column, cell) in [
        ("renal_rule", &row.renal_rule),
        ("hepatic_rule", &row.hepatic_rule),
        ("platelet_rule", &row.platelet_rule),
        ("white_cell_rule", &row.white_cell_rule),
    ] {
        if !is_not_applicable(cell) && parse_clauses(cell).is_empty() {
            push(column, format!("no recognisable clause in '{cell}'"));
        }
    }

    if !is_not_applicable(&row.weight_rule) {
        match trailing_quantity(&row.weight_rule) {
            None => push("weight_rule", format!("no trailing quantity in '{}'", row.weight_rule)),
            Some(q) if q.unit_kind().is_none() => push(
                "weight_rule",
                format!("unknown unit '{}' in '{}'", q.unit, row.weight_rule),
            ),
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn clean_row() -> ProtocolRow {
        ProtocolRow {
            pain_range: "4-6".to_string(),
            primary_drug: "Nurofen".to_string(),
            primary_ingredient: "ibuprofen".to_string(),
            age_rule: ">75 - avoid".to_string(),
            renal_rule: "Class C - 12h".to_string(),
            weight_rule: "<50 kg - 200 mg".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_row_has_no_issues() {
        assert!(check_rows(&[clean_row()]).is_empty());
    }

    #[test]
    fn test_reports_each_problem() {
        let bad = ProtocolRow {
            pain_range: "severe".to_string(),
            primary_ingredient: String::new(),
            weight_rule: "<50 kg - 2 tablets".to_string(),
            sodium_rule: "low - avoid".to_string(),
            renal_rule: "use with caution".to_string(),
            ..clean_row()
        };
        let issues = check_rows(&[clean_row(), bad]);
        let columns: Vec<_> = issues.iter().map(|i| i.column).collect();
        assert_eq!(
            columns,
            vec!["pain_range", "primary_ingredient", "sodium_rule", "renal_rule", "weight_rule"]
        );
        assert!(issues.iter().all(|i| i.row == 1));
        assert!(issues[4].to_string().starts_with("row 2 [weight_rule]"));
    }
}
