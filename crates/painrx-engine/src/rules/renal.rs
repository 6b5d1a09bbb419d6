//! Renal (GFR) rule.
//!
//! A single cell may mix class and numeric clauses:
//! `"Class D - 12h; <15 mL/min - avoid"`. Lab results may likewise be a GFR
//! or a class letter; the normaliser converts whichever side is needed.
//! An avoid in any matching clause clears every slot before anything else
//! applies; otherwise every matching clause applies in text order. Dose and interval changes
//! are only registered with the aggregator; the slot is updated when the
//! aggregator finalises.

use painrx_common::Result;
use painrx_protocol::normalise::renal_matches;
use painrx_protocol::{is_not_applicable, parse_clauses, parse_directive, Directive};
use tracing::{debug, warn};

use super::{apply_directive, avoid_all, require, AdjustMode, RuleApplier, RuleContext, RuleOutcome};
use crate::slot::SlotRole;

pub struct RenalRule;

impl RuleApplier for RenalRule {
    fn name(&self) -> &'static str {
        "renal"
    }

    fn apply(&self, role: SlotRole, ctx: &mut RuleContext<'_>) -> Result<RuleOutcome> {
        let row = ctx.row;
        if is_not_applicable(&row.renal_rule) || !ctx.is_active(role) {
            return Ok(RuleOutcome::NoOp);
        }
        let renal = require(ctx.patient.labs.renal, self.name(), "renal")?;

        let clauses = parse_clauses(&row.renal_rule);
        if clauses.is_empty() {
            warn!("Renal rule '{}' has no clauses", row.renal_rule);
            return Ok(RuleOutcome::NoOp);
        }

        let matched: Vec<_> = clauses
            .iter()
            .filter(|c| renal_matches(renal, &c.key))
            .map(|c| (c, parse_directive(&c.directive)))
            .collect();

        // An avoid anywhere in the cell wins over the adjustments around it
        if let Some((clause, _)) = matched.iter().find(|(_, d)| *d == Directive::Avoid) {
            let reason = format!(
                "{} avoided, renal function {renal} matches {}",
                ctx.both_drug_names(),
                clause.key
            );
            return Ok(avoid_all(ctx, self.name(), reason));
        }

        let mut outcome = RuleOutcome::NoOp;
        for (clause, directive) in matched {
            debug!("Renal clause '{}' matches {}", clause.key, renal);
            if directive != Directive::NoOp {
                outcome = apply_directive(ctx, role, self.name(), directive, AdjustMode::RegisterOnly);
            }
        }
        Ok(outcome)
    }
}
