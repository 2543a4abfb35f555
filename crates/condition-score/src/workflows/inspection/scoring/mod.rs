mod config;
mod deductions;
mod policy;

pub use config::ScoringPolicy;
pub use policy::FailureReason;

use super::catalog::DefectCatalog;
use super::domain::{ObservationKey, ScoringError};
use super::instance::Inspection;
use super::ledger::ObservationLedger;
use policy::{failure_reasons, ScoreSignals};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const BASELINE: Decimal = Decimal::ONE_HUNDRED;

/// Stateless scorer applying a catalog's weights and a pass/fail policy to a ledger.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    catalog: Arc<DefectCatalog>,
    policy: ScoringPolicy,
}

impl ScoringEngine {
    pub fn new(catalog: Arc<DefectCatalog>, policy: ScoringPolicy) -> Self {
        Self { catalog, policy }
    }

    pub fn catalog(&self) -> &DefectCatalog {
        &self.catalog
    }

    pub fn score(&self, inspection: &Inspection) -> Result<ScoreReport, ScoringError> {
        self.score_ledger(
            inspection.ledger(),
            inspection.total_units(),
            inspection.sample_size(),
        )
    }

    /// Recompute the full report from the current ledger contents.
    pub fn score_ledger(
        &self,
        ledger: &ObservationLedger,
        total_units: u32,
        sample_size: u32,
    ) -> Result<ScoreReport, ScoringError> {
        let totals = deductions::tally(ledger, &self.catalog)?;
        let interior_score = deductions::extrapolate(totals.total_unit, sample_size, total_units)?;

        let final_score = BASELINE
            .saturating_sub(totals.common)
            .saturating_sub(interior_score)
            .max(Decimal::ZERO);
        let mut display_score = final_score.round_dp(self.policy.display_decimals);
        display_score.rescale(self.policy.display_decimals);

        let failures = failure_reasons(
            &self.policy,
            &ScoreSignals {
                final_score,
                common: totals.common,
                interior: interior_score,
                critical_findings: totals.critical_findings.len(),
            },
        );

        Ok(ScoreReport {
            total_units,
            sample_size,
            common_score: totals.common,
            unit_deductions: totals.units,
            total_unit_deduction: totals.total_unit,
            interior_score,
            final_score,
            display_score,
            pass: failures.is_empty(),
            failures,
            critical_findings: totals.critical_findings,
        })
    }
}

/// Deduction points charged against one sampled unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDeduction {
    pub unit: u32,
    pub points: Decimal,
}

/// Life-threatening defect present in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalFinding {
    pub key: ObservationKey,
    pub category_name: String,
    pub item_name: String,
    pub description: String,
    pub count: u32,
}

/// Derived score for an inspection. Never stored; recompute from the ledger.
///
/// `common_score` and `interior_score` are deduction points: common-area points
/// as recorded, unit points after extrapolation to the full population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub total_units: u32,
    pub sample_size: u32,
    pub common_score: Decimal,
    pub unit_deductions: Vec<UnitDeduction>,
    pub total_unit_deduction: Decimal,
    pub interior_score: Decimal,
    pub final_score: Decimal,
    pub display_score: Decimal,
    pub pass: bool,
    pub failures: Vec<FailureReason>,
    pub critical_findings: Vec<CriticalFinding>,
}

impl ScoreReport {
    pub fn verdict_label(&self) -> &'static str {
        if self.pass {
            "PASS"
        } else {
            "FAIL"
        }
    }

    pub fn summary(&self) -> String {
        if self.pass {
            format!("passed with a score of {}", self.display_score)
        } else {
            let reasons: Vec<String> = self.failures.iter().map(FailureReason::summary).collect();
            format!(
                "failed with a score of {}: {}",
                self.display_score,
                reasons.join("; ")
            )
        }
    }
}
