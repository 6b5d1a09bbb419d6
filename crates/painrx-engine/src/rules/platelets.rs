use painrx_common::Result;
use painrx_protocol::is_not_applicable;

use super::lab_threshold::apply_comparison_clauses;
use super::{require, RuleApplier, RuleContext, RuleOutcome};
use crate::slot::SlotRole;

/// Platelet count limits. Patient values are in ×10³/µL, the same scale as
/// the `K/µL` thresholds in protocol cells.
pub struct PlateletRule;

impl RuleApplier for PlateletRule {
    fn name(&self) -> &'static str {
        "platelets"
    }

    fn apply(&self, role: SlotRole, ctx: &mut RuleContext<'_>) -> Result<RuleOutcome> {
        let row = ctx.row;
        if is_not_applicable(&row.platelet_rule) || !ctx.is_active(role) {
            return Ok(RuleOutcome::NoOp);
        }
        let count = require(ctx.patient.labs.platelets, self.name(), "platelets")?;
        Ok(apply_comparison_clauses(ctx, role, self.name(), &row.platelet_rule, count, "platelets"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{row, Harness};
    use painrx_common::PainRxError;

    fn harness(cell: &str, platelets: Option<f64>) -> Harness {
        let mut r = row();
        r.platelet_rule = cell.to_string();
        let mut h = Harness::with_row(r);
        h.patient.labs.platelets = platelets;
        h
    }

    #[test]
    fn test_low_platelets_clear_both_slots() {
        let mut h = harness("<100K/\u{00B5}L - avoid", Some(45.0));
        let out = h.run(&PlateletRule, SlotRole::Primary).unwrap();
        let RuleOutcome::Avoid(reason) = out else {
            panic!("expected avoid, got {out:?}");
        };
        assert!(reason.contains("Nurofen"));
        assert!(reason.contains("Panadol"));
        assert!(reason.contains("<100"));
        assert!(h.slot(SlotRole::Primary).is_cleared());
        assert!(h.slot(SlotRole::Alternative).is_cleared());
    }

    #[test]
    fn test_normal_platelets() {
        let mut h = harness("<100K/\u{00B5}L - avoid", Some(250.0));
        assert_eq!(h.run(&PlateletRule, SlotRole::Primary).unwrap(), RuleOutcome::NoOp);
        assert!(h.rec.is_slot_active(SlotRole::Primary));
    }

    #[test]
    fn test_non_avoid_directive_adjusts_slot() {
        let mut h = harness("<150K/\u{00B5}L - reduce by 50%", Some(120.0));
        let out = h.run(&PlateletRule, SlotRole::Primary).unwrap();
        assert_eq!(out, RuleOutcome::AdjustDose(200.0));
        assert_eq!(h.slot(SlotRole::Primary).dose_mg, Some(200.0));
        assert_eq!(h.corrections.resolved_dose("ibuprofen"), Some(200.0));
    }

    #[test]
    fn test_missing_count_is_fatal() {
        let mut h = harness("<100K/\u{00B5}L - avoid", None);
        let err = h.run(&PlateletRule, SlotRole::Primary).unwrap_err();
        assert!(matches!(err, PainRxError::MissingClinicalValue { value: "platelets", .. }));
    }

    #[test]
    fn test_na_cell_needs_no_value() {
        let mut h = harness("NA", None);
        assert_eq!(h.run(&PlateletRule, SlotRole::Primary).unwrap(), RuleOutcome::NoOp);
    }
}
