//! Low body weight rule.
//!
//! Applies only below the configured weight threshold. The cell ends in the
//! quantity to use, e.g. `"<50 kg - 500 mg"` or `"<50 kg - 8h"`.

use painrx_common::{PainRxError, Result};
use painrx_protocol::{is_not_applicable, trailing_quantity, Directive, QuantityUnit};
use tracing::warn;

use super::{apply_directive, require, AdjustMode, RuleApplier, RuleContext, RuleOutcome};
use crate::slot::SlotRole;

pub struct WeightRule;

impl RuleApplier for WeightRule {
    fn name(&self) -> &'static str {
        "weight"
    }

    fn apply(&self, role: SlotRole, ctx: &mut RuleContext<'_>) -> Result<RuleOutcome> {
        let row = ctx.row;
        if is_not_applicable(&row.weight_rule) || !ctx.is_active(role) {
            return Ok(RuleOutcome::NoOp);
        }
        let weight = require(ctx.patient.weight_kg, self.name(), "weight_kg")?;
        if weight >= ctx.config.weight.low_weight_threshold_kg {
            return Ok(RuleOutcome::NoOp);
        }

        let Some(quantity) = trailing_quantity(&row.weight_rule) else {
            warn!("Weight rule '{}' has no trailing quantity", row.weight_rule);
            return Ok(RuleOutcome::NoOp);
        };

        let directive = match quantity.unit_kind() {
            Some(QuantityUnit::Milligrams) => Directive::SetDose(quantity.value),
            Some(QuantityUnit::Hours) => Directive::SetInterval(quantity.value),
            None => {
                return Err(PainRxError::Config(format!(
                    "weight rule '{}' uses unknown unit '{}'",
                    row.weight_rule, quantity.unit
                )))
            }
        };
        Ok(apply_directive(ctx, role, self.name(), directive, AdjustMode::ApplyAndRegister))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{row, Harness};

    fn harness(cell: &str, weight: Option<f64>) -> Harness {
        let mut r = row();
        r.weight_rule = cell.to_string();
        let mut h = Harness::with_row(r);
        h.patient.weight_kg = weight;
        h
    }

    #[test]
    fn test_light_patient_gets_dose() {
        let mut h = harness("<50 kg - 200 mg", Some(42.0));
        assert_eq!(h.run(&WeightRule, SlotRole::Primary).unwrap(), RuleOutcome::AdjustDose(200.0));
        assert_eq!(h.slot(SlotRole::Primary).dose_mg, Some(200.0));
        assert_eq!(h.corrections.resolved_dose("ibuprofen"), Some(200.0));
    }

    #[test]
    fn test_light_patient_gets_interval() {
        let mut h = harness("<50kg - 8h", Some(42.0));
        assert_eq!(h.run(&WeightRule, SlotRole::Alternative).unwrap(), RuleOutcome::AdjustInterval(8.0));
    }

    #[test]
    fn test_threshold_weight_is_untouched() {
        let mut h = harness("<50 kg - 200 mg", Some(50.0));
        assert_eq!(h.run(&WeightRule, SlotRole::Primary).unwrap(), RuleOutcome::NoOp);
    }

    #[test]
    fn test_unknown_unit_is_config_error() {
        let mut h = harness("<50 kg - 2 tablets", Some(42.0));
        assert!(matches!(h.run(&WeightRule, SlotRole::Primary), Err(PainRxError::Config(_))));
    }

    #[test]
    fn test_configured_threshold() {
        let mut h = harness("<60 kg - 200 mg", Some(55.0));
        assert_eq!(h.run(&WeightRule, SlotRole::Primary).unwrap(), RuleOutcome::NoOp);
        h.config.weight.low_weight_threshold_kg = 60.0;
        assert_eq!(h.run(&WeightRule, SlotRole::Primary).unwrap(), RuleOutcome::AdjustDose(200.0));
    }

    #[test]
    fn test_missing_weight() {
        let mut h = harness("<50 kg - 200 mg", None);
        assert!(matches!(
            h.run(&WeightRule, SlotRole::Primary),
            Err(PainRxError::MissingClinicalValue { value: "weight_kg", .. })
        ));
    }
}
