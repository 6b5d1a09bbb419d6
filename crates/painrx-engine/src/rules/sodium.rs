use painrx_common::Result;
use painrx_protocol::is_not_applicable;

use super::lab_threshold::apply_lower_bound;
use super::{require, RuleApplier, RuleContext, RuleOutcome};
use crate::slot::SlotRole;

/// Serum sodium floor in mmol/L, e.g. `"<130 mmol/L - avoid"`.
pub struct SodiumRule;

impl RuleApplier for SodiumRule {
    fn name(&self) -> &'static str {
        "sodium"
    }

    fn apply(&self, role: SlotRole, ctx: &mut RuleContext<'_>) -> Result<RuleOutcome> {
        let row = ctx.row;
        if is_not_applicable(&row.sodium_rule) || !ctx.is_active(role) {
            return Ok(RuleOutcome::NoOp);
        }
        let sodium = require(ctx.patient.labs.sodium, self.name(), "sodium")?;
        Ok(apply_lower_bound(ctx, self.name(), &row.sodium_rule, sodium, "sodium"))
    }
}
