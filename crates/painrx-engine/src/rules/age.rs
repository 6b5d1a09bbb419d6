//! Age limits.
//!
//! The cell carries a single threshold in years. The primary drug is meant
//! for patients up to that age and the alternative for patients from it
//! onwards, so each slot is checked against its own side of the threshold.

use painrx_common::Result;
use painrx_protocol::{first_integer, is_not_applicable};
use tracing::warn;

use super::{avoid_slot, RuleApplier, RuleContext, RuleOutcome};
use crate::slot::SlotRole;

pub struct AgeRule;

impl RuleApplier for AgeRule {
    fn name(&self) -> &'static str {
        "age"
    }

    fn apply(&self, role: SlotRole, ctx: &mut RuleContext<'_>) -> Result<RuleOutcome> {
        let cell = &ctx.row.age_rule;
        if is_not_applicable(cell) || !ctx.is_active(role) {
            return Ok(RuleOutcome::NoOp);
        }
        let Some(threshold) = first_integer(cell) else {
            warn!("Age rule '{}' has no threshold, ignoring", cell);
            return Ok(RuleOutcome::NoOp);
        };

        let age = ctx.age;
        let out_of_range = match role {
            SlotRole::Primary => age > threshold,
            SlotRole::Alternative => age < threshold,
        };
        if !out_of_range {
            return Ok(RuleOutcome::NoOp);
        }

        let drug = ctx.drug_name(role);
        let reason = match role {
            SlotRole::Primary => format!("{drug} avoided, age {age} above {threshold}"),
            SlotRole::Alternative => format!("{drug} avoided, age {age} below {threshold}"),
        };
        Ok(avoid_slot(ctx, role, self.name(), reason))
    }
}
