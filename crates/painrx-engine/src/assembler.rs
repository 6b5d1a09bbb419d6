//! Recommendation assembly.
//!
//! Pain score → selected protocol rows → one candidate per row, each run
//! through the rule pipeline with its own correction aggregator → the first
//! viable candidate in table order. When no candidate survives, a failure
//! record carries every rejection reason that was gathered.

use chrono::NaiveDate;
use painrx_common::{EngineConfig, PainHistory, PainRxError, PatientSnapshot, ProtocolRow, Result};
use painrx_protocol::{ProtocolSource, MAX_PAIN_SCORE};
use std::fmt;
use tracing::{debug, info, warn};

use crate::corrections::CorrectionAggregator;
use crate::pipeline::{PipelineOutcome, RulePipeline};
use crate::recommendation::{FailureKind, Recommendation};
use crate::rules::RuleContext;
use crate::selector::select_rows;
use crate::slot::SlotRole;

/// Lifecycle of one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateState {
    Building,
    Evaluating,
    Viable,
    Rejected,
}

impl fmt::Display for CandidateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Building => "building",
            Self::Evaluating => "evaluating",
            Self::Viable => "viable",
            Self::Rejected => "rejected",
        };
        write!(f, "{s}")
    }
}

/// One pain report to produce a recommendation for.
#[derive(Debug, Clone, Copy)]
pub struct Assessment<'a> {
    pub patient: &'a PatientSnapshot,
    /// Prior scores, with the current report as the newest entry.
    pub history: &'a PainHistory,
    pub pain_score: i32,
    /// Date the patient's age is computed against.
    pub assessed_on: NaiveDate,
}

pub struct RecommendationAssembler {
    config: EngineConfig,
    pipeline: RulePipeline,
}

enum CandidateResult {
    Viable(Recommendation),
    Rejected(Recommendation),
    Aborted(Recommendation, String),
}

impl RecommendationAssembler {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            pipeline: RulePipeline::new(),
        }
    }

    pub fn with_pipeline(config: EngineConfig, pipeline: RulePipeline) -> Self {
        Self { config, pipeline }
    }

    /// Load the rows from `source` and assemble.
    pub fn assemble_from(&self, source: &dyn ProtocolSource, assessment: &Assessment<'_>) -> Result<Recommendation> {
        let rows = source.rows()?;
        self.assemble(&rows, assessment)
    }

    pub fn assemble(&self, rows: &[ProtocolRow], assessment: &Assessment<'_>) -> Result<Recommendation> {
        let score = u8::try_from(assessment.pain_score)
            .ok()
            .filter(|s| *s <= MAX_PAIN_SCORE)
            .ok_or(PainRxError::InvalidPainScore(assessment.pain_score))?;
        let patient = assessment.patient;

        let selected = select_rows(rows, score);
        info!(
            "Patient {}: pain {} selects {} of {} protocol rows",
            patient.patient_id,
            score,
            selected.len(),
            rows.len()
        );
        if selected.is_empty() {
            return Ok(Recommendation::failed(
                &patient.patient_id,
                score,
                FailureKind::NoProtocolForScore,
                vec![format!("no protocol row covers pain score {score}")],
            ));
        }

        let age = patient.age_on(assessment.assessed_on);
        let mut pooled_reasons = Vec::new();

        for row in selected {
            match self.evaluate(row, assessment, score, age)? {
                CandidateResult::Viable(rec) => {
                    info!("Accepted {} for patient {}", row.label(), patient.patient_id);
                    return Ok(rec);
                }
                CandidateResult::Rejected(rec) => {
                    let label = row.label();
                    if rec.rejection_reasons.is_empty() {
                        pooled_reasons.push(format!("{label} no drug with an active ingredient"));
                    }
                    pooled_reasons.extend(rec.rejection_reasons.into_iter().map(|r| format!("{label} {r}")));
                }
                CandidateResult::Aborted(candidate, reason) => {
                    warn!("Generation aborted for patient {}: {}", patient.patient_id, reason);
                    let mut failed = Recommendation::failed(
                        &patient.patient_id,
                        score,
                        FailureKind::PainTrendAborted,
                        vec![reason],
                    );
                    failed.comments.extend(candidate.comments);
                    return Ok(failed);
                }
            }
        }

        warn!(
            "No viable recommendation for patient {} ({} reasons)",
            patient.patient_id,
            pooled_reasons.len()
        );
        Ok(Recommendation::failed(
            &patient.patient_id,
            score,
            FailureKind::NoViableCandidate,
            pooled_reasons,
        ))
    }

    fn evaluate(&self, row: &ProtocolRow, assessment: &Assessment<'_>, score: u8, age: u32) -> Result<CandidateResult> {
        let mut state = CandidateState::Building;
        let mut rec = Recommendation::candidate(&assessment.patient.patient_id, score, row);
        let mut corrections = CorrectionAggregator::new();
        debug!("{}: {}", row.label(), state);

        state = CandidateState::Evaluating;
        debug!("{}: {}", row.label(), state);
        let outcome = {
            let mut ctx = RuleContext {
                recommendation: &mut rec,
                row,
                patient: assessment.patient,
                history: assessment.history,
                age,
                corrections: &mut corrections,
                config: &self.config,
            };
            self.pipeline.run(&mut ctx)?
        };

        if let PipelineOutcome::Abort(reason) = outcome {
            return Ok(CandidateResult::Aborted(rec, reason));
        }

        for role in SlotRole::ALL {
            if let Some(slot) = rec.slot_mut(role) {
                corrections.finalize(slot);
            }
        }

        state = if rec.is_viable() {
            CandidateState::Viable
        } else {
            CandidateState::Rejected
        };
        debug!("{}: {}", row.label(), state);

        Ok(match state {
            CandidateState::Viable => CandidateResult::Viable(rec),
            _ => CandidateResult::Rejected(rec),
        })
    }
}
