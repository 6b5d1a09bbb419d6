//! Rule pipeline.
//!
//! Runs every applier, in order, over one candidate recommendation.
//! Per-slot appliers see the primary slot first and then the alternative;
//! slots cleared by an earlier step are skipped.

use painrx_common::Result;
use tracing::debug;

use crate::rules::{default_appliers, RuleApplier, RuleContext, RuleOutcome, RuleScope};
use crate::slot::SlotRole;

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Continue,
    /// Generation must stop for every candidate, not just this one.
    Abort(String),
}

pub struct RulePipeline {
    appliers: Vec<Box<dyn RuleApplier>>,
}

impl Default for RulePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl RulePipeline {
    pub fn new() -> Self {
        Self { appliers: default_appliers() }
    }

    /// A pipeline with a custom applier list, run in the given order.
    pub fn with_appliers(appliers: Vec<Box<dyn RuleApplier>>) -> Self {
        Self { appliers }
    }

    pub fn applier_names(&self) -> Vec<&'static str> {
        self.appliers.iter().map(|a| a.name()).collect()
    }

    pub fn run(&self, ctx: &mut RuleContext<'_>) -> Result<PipelineOutcome> {
        for applier in &self.appliers {
            let roles: &[SlotRole] = match applier.scope() {
                RuleScope::PerRecommendation => &[SlotRole::Primary],
                RuleScope::PerSlot => &SlotRole::ALL,
            };

            for &role in roles {
                if applier.scope() == RuleScope::PerSlot && !ctx.is_active(role) {
                    continue;
                }
                let outcome = applier.apply(role, ctx)?;
                if outcome != RuleOutcome::NoOp {
                    debug!("{} [{}]: {:?}", applier.name(), role, outcome);
                }
                if let RuleOutcome::StopGeneration(reason) = outcome {
                    return Ok(PipelineOutcome::Abort(reason));
                }
            }

            if !ctx.recommendation.is_viable() {
                debug!("No active slots left after {}", applier.name());
                break;
            }
        }
        Ok(PipelineOutcome::Continue)
    }
}
