//! Pain-trend check.
//!
//! Looks at the newest scores in the pain history. A sharp worsening, or a
//! sharp swing up and back down (or down and back up), means the patient
//! should be reassessed instead of receiving another regimen.

use painrx_common::Result;
use tracing::{info, warn};

use super::{RuleApplier, RuleContext, RuleOutcome, RuleScope};
use crate::slot::SlotRole;

pub struct PainTrendRule;

/// Size of the swing when the middle of three scores is a strict peak or
/// trough: the smaller of its two differences. `None` for a monotone run.
pub fn inversion_amplitude(a: u8, b: u8, c: u8) -> Option<u8> {
    let peak = b > a && b > c;
    let trough = b < a && b < c;
    if !(peak || trough) {
        return None;
    }
    Some(b.abs_diff(a).min(b.abs_diff(c)))
}

impl RuleApplier for PainTrendRule {
    fn name(&self) -> &'static str {
        "pain trend"
    }

    fn scope(&self) -> RuleScope {
        RuleScope::PerRecommendation
    }

    fn apply(&self, _role: SlotRole, ctx: &mut RuleContext<'_>) -> Result<RuleOutcome> {
        let cfg = &ctx.config.pain_trend;
        let recent = ctx.history.latest(3);
        if recent.len() < 2 {
            return Ok(RuleOutcome::NoOp);
        }

        let prev = recent[recent.len() - 2];
        let cur = recent[recent.len() - 1];
        let worsening = cur.saturating_sub(prev);

        if worsening >= cfg.abort_delta {
            let reason = format!("pain worsened from {prev} to {cur}; reassess before prescribing");
            info!("Stopping generation: {}", reason);
            ctx.recommendation.comment(format!("{}: {reason}", self.name()));
            return Ok(RuleOutcome::StopGeneration(reason));
        }

        let amplitude = match recent {
            [a, b, c] => inversion_amplitude(*a, *b, *c),
            _ => None,
        };

        if let Some(amp) = amplitude {
            if amp >= cfg.abort_delta {
                let reason = format!(
                    "pain fluctuated {} -> {} -> {}; reassess before prescribing",
                    recent[0], recent[1], recent[2]
                );
                info!("Stopping generation: {}", reason);
                ctx.recommendation.comment(format!("{}: {reason}", self.name()));
                return Ok(RuleOutcome::StopGeneration(reason));
            }
        }

        if worsening >= cfg.advisory_delta {
            warn!("Pain worsened slightly ({} -> {})", prev, cur);
            ctx.recommendation
                .comment(format!("{}: pain worsened from {prev} to {cur}, monitor", self.name()));
        } else if amplitude.is_some_and(|amp| amp >= cfg.advisory_delta) {
            ctx.recommendation.comment(format!(
                "{}: pain fluctuating ({} -> {} -> {}), monitor",
                self.name(),
                recent[0],
                recent[1],
                recent[2]
            ));
        }

        Ok(RuleOutcome::NoOp)
    }
}
