use painrx_common::Result;
use painrx_protocol::{is_not_applicable, split_substances};

use super::{avoid_all, RuleApplier, RuleContext, RuleOutcome};
use crate::slot::SlotRole;

/// Allergy and sensitivity check. Substances in the protocol cell are
/// compared with the patient's allergy list by exact, case-insensitive token.
pub struct SensitivityRule;

impl RuleApplier for SensitivityRule {
    fn name(&self) -> &'static str {
        "sensitivity"
    }

    fn apply(&self, role: SlotRole, ctx: &mut RuleContext<'_>) -> Result<RuleOutcome> {
        let row = ctx.row;
        if is_not_applicable(&row.allergy_avoidance) || !ctx.is_active(role) {
            return Ok(RuleOutcome::NoOp);
        }

        let substances = split_substances(&row.allergy_avoidance);
        let allergies: Vec<String> = ctx
            .patient
            .allergies
            .iter()
            .map(|a| a.trim().to_lowercase())
            .collect();

        let Some(substance) = substances.iter().find(|s| allergies.contains(s)) else {
            return Ok(RuleOutcome::NoOp);
        };

        let reason = format!("patient is allergic to {substance}; {} avoided", ctx.both_drug_names());
        Ok(avoid_all(ctx, self.name(), reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{row, Harness};

    fn harness(cell: &str, allergies: &[&str]) -> Harness {
        let mut r = row();
        r.allergy_avoidance = cell.to_string();
        let mut h = Harness::with_row(r);
        h.patient.allergies = allergies.iter().map(|a| a.to_string()).collect();
        h
    }

    #[test]
    fn test_allergy_match_clears_everything() {
        let mut h = harness("Ibuprofen OR NSAID", &["nsaid"]);
        let out = h.run(&SensitivityRule, SlotRole::Primary).unwrap();
        assert!(matches!(out, RuleOutcome::Avoid(ref r) if r.contains("nsaid")));
        assert!(!h.rec.is_viable());
    }

    #[test]
    fn test_partial_token_does_not_match() {
        let mut h = harness("NSAID", &["nsaids in general"]);
        assert_eq!(h.run(&SensitivityRule, SlotRole::Primary).unwrap(), RuleOutcome::NoOp);
    }

    #[test]
    fn test_no_allergies() {
        let mut h = harness("Ibuprofen", &[]);
        assert_eq!(h.run(&SensitivityRule, SlotRole::Primary).unwrap(), RuleOutcome::NoOp);
        let mut h = harness("NA", &["ibuprofen"]);
        assert_eq!(h.run(&SensitivityRule, SlotRole::Primary).unwrap(), RuleOutcome::NoOp);
    }
}
