//! Hepatic (Child-Pugh) rule.
//!
//! The patient's class picks the clause, e.g. `"Class B - 12h Class C - avoid"`.
//! An avoid here only removes the slot being evaluated; dose and interval
//! changes are written straight to the slot and also handed to the
//! aggregator.

use painrx_common::Result;
use painrx_protocol::normalise::{class_for_child_pugh_points, hepatic_matches};
use painrx_protocol::{is_not_applicable, parse_clauses, parse_directive, Directive};
use tracing::warn;

use super::{apply_directive, avoid_slot, require, AdjustMode, RuleApplier, RuleContext, RuleOutcome};
use crate::slot::SlotRole;

pub struct HepaticRule;

impl RuleApplier for HepaticRule {
    fn name(&self) -> &'static str {
        "hepatic"
    }

    fn apply(&self, role: SlotRole, ctx: &mut RuleContext<'_>) -> Result<RuleOutcome> {
        let row = ctx.row;
        if is_not_applicable(&row.hepatic_rule) || !ctx.is_active(role) {
            return Ok(RuleOutcome::NoOp);
        }
        let labs = &ctx.patient.labs;
        let class = labs
            .hepatic
            .or_else(|| labs.hepatic_points.and_then(class_for_child_pugh_points));
        let class = require(class, self.name(), "hepatic")?;

        let clauses = parse_clauses(&row.hepatic_rule);
        if clauses.is_empty() {
            warn!("Hepatic rule '{}' has no class clauses", row.hepatic_rule);
            return Ok(RuleOutcome::NoOp);
        }

        let Some(clause) = clauses.into_iter().find(|c| hepatic_matches(class, &c.key)) else {
            return Ok(RuleOutcome::NoOp);
        };

        let outcome = match parse_directive(&clause.directive) {
            Directive::Avoid => {
                let drug = ctx.drug_name(role);
                avoid_slot(ctx, role, self.name(), format!("{drug} avoided in Child-Pugh class {class}"))
            }
            directive => apply_directive(ctx, role, self.name(), directive, AdjustMode::ApplyAndRegister),
        };
        Ok(outcome)
    }
}
