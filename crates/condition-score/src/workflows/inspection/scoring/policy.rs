use super::config::ScoringPolicy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Independent trigger that fails an inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FailureReason {
    ScoreBelowMinimum { score: Decimal, minimum: Decimal },
    InteriorDeductionLimit { deduction: Decimal, limit: Decimal },
    CommonDeductionLimit { deduction: Decimal, limit: Decimal },
    LifeThreateningDefects { findings: usize },
}

impl FailureReason {
    pub fn summary(&self) -> String {
        match self {
            FailureReason::ScoreBelowMinimum { score, minimum } => format!(
                "score {:.2} is below the passing minimum {:.2}",
                score, minimum
            ),
            FailureReason::InteriorDeductionLimit { deduction, limit } => format!(
                "extrapolated unit deductions {:.2} reach the limit {:.2}",
                deduction, limit
            ),
            FailureReason::CommonDeductionLimit { deduction, limit } => format!(
                "common area deductions {:.2} reach the limit {:.2}",
                deduction, limit
            ),
            FailureReason::LifeThreateningDefects { findings } => {
                format!("{findings} life-threatening defect(s) recorded")
            }
        }
    }
}

pub(crate) struct ScoreSignals {
    pub final_score: Decimal,
    pub common: Decimal,
    pub interior: Decimal,
    pub critical_findings: usize,
}

/// Evaluate every trigger; an empty result means the inspection passes.
pub(crate) fn failure_reasons(policy: &ScoringPolicy, signals: &ScoreSignals) -> Vec<FailureReason> {
    let mut reasons = Vec::new();

    if signals.final_score < policy.minimum_passing_score {
        reasons.push(FailureReason::ScoreBelowMinimum {
            score: signals.final_score,
            minimum: policy.minimum_passing_score,
        });
    }

    if let Some(limit) = policy.interior_deduction_limit {
        if signals.interior >= limit {
            reasons.push(FailureReason::InteriorDeductionLimit {
                deduction: signals.interior,
                limit,
            });
        }
    }

    if let Some(limit) = policy.common_deduction_limit {
        if signals.common >= limit {
            reasons.push(FailureReason::CommonDeductionLimit {
                deduction: signals.common,
                limit,
            });
        }
    }

    if signals.critical_findings > 0 {
        reasons.push(FailureReason::LifeThreateningDefects {
            findings: signals.critical_findings,
        });
    }

    reasons
}
