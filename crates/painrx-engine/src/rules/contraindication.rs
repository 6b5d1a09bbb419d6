use painrx_common::Result;
use painrx_protocol::{code_matches, extract_icd_codes, is_not_applicable};
use tracing::warn;

use super::{avoid_all, RuleApplier, RuleContext, RuleOutcome};
use crate::slot::SlotRole;

/// Clears every slot when the patient has a diagnosis the protocol lists.
pub struct ContraindicationRule;

impl RuleApplier for ContraindicationRule {
    fn name(&self) -> &'static str {
        "contraindication"
    }

    fn apply(&self, role: SlotRole, ctx: &mut RuleContext<'_>) -> Result<RuleOutcome> {
        let row = ctx.row;
        if is_not_applicable(&row.contraindications) || !ctx.is_active(role) {
            return Ok(RuleOutcome::NoOp);
        }

        let codes = extract_icd_codes(&row.contraindications);
        if codes.is_empty() {
            warn!("No diagnosis codes in contraindication text '{}'", row.contraindications);
            return Ok(RuleOutcome::NoOp);
        }

        let patient = ctx.patient;
        let hit = patient.diagnoses.iter().find_map(|diagnosis| {
            codes
                .iter()
                .find(|code| code_matches(code, diagnosis))
                .map(|code| (diagnosis.clone(), code.clone()))
        });

        match hit {
            Some((diagnosis, code)) => {
                let reason = format!(
                    "{} contraindicated by diagnosis {diagnosis} (protocol code {code})",
                    ctx.both_drug_names()
                );
                Ok(avoid_all(ctx, self.name(), reason))
            }
            None => Ok(RuleOutcome::NoOp),
        }
    }
}
