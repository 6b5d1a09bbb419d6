//! painrx-engine — Treatment protocol rule engine.
//!
//! Given a pain score, a patient snapshot and the protocol table, produces
//! one vetted analgesic recommendation or a failure record explaining why
//! none could be made.

pub mod assembler;
pub mod corrections;
pub mod pipeline;
pub mod recommendation;
pub mod rules;
pub mod selector;
pub mod slot;

pub use assembler::{Assessment, CandidateState, RecommendationAssembler};
pub use corrections::CorrectionAggregator;
pub use pipeline::{PipelineOutcome, RulePipeline};
pub use recommendation::{FailureKind, Recommendation, RecommendationStatus};
pub use rules::{RuleApplier, RuleContext, RuleOutcome, RuleScope};
pub use selector::select_rows;
pub use slot::{DrugSlot, SlotRole};
