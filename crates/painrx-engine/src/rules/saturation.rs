use painrx_common::Result;
use painrx_protocol::is_not_applicable;

use super::lab_threshold::apply_lower_bound;
use super::{require, RuleApplier, RuleContext, RuleOutcome};
use crate::slot::SlotRole;

/// Oxygen saturation floor, e.g. `"<92% - avoid"`.
pub struct SaturationRule;

impl RuleApplier for SaturationRule {
    fn name(&self) -> &'static str {
        "oxygen saturation"
    }

    fn apply(&self, role: SlotRole, ctx: &mut RuleContext<'_>) -> Result<RuleOutcome> {
        let row = ctx.row;
        if is_not_applicable(&row.saturation_rule) || !ctx.is_active(role) {
            return Ok(RuleOutcome::NoOp);
        }
        let spo2 = require(ctx.patient.labs.oxygen_saturation, self.name(), "oxygen_saturation")?;
        Ok(apply_lower_bound(ctx, self.name(), &row.saturation_rule, spo2, "SpO2"))
    }
}
