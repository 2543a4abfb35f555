use super::super::domain::{ScoringError, Scope};
use super::super::instance::Inspection;
use super::super::scoring::{ScoreReport, ScoringEngine};
use super::views::{CategoryDeduction, FindingLine, InspectionView};
use rust_decimal::Decimal;
use serde::Serialize;

/// Everything the report/export layer needs for one inspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectionReport {
    pub inspection: InspectionView,
    pub score: ScoreReport,
    pub findings: Vec<FindingLine>,
    pub category_deductions: Vec<CategoryDeduction>,
}

impl InspectionReport {
    pub fn build(inspection: &Inspection, engine: &ScoringEngine) -> Result<Self, ScoringError> {
        let score = engine.score(inspection)?;
        let findings = finding_lines(inspection, engine)?;
        let category_deductions = category_deductions(&findings, engine);

        Ok(Self {
            inspection: InspectionView::from(inspection),
            score,
            findings,
            category_deductions,
        })
    }

    pub fn findings_for(&self, scope: Scope) -> impl Iterator<Item = &FindingLine> + '_ {
        self.findings.iter().filter(move |line| line.key.scope == scope)
    }
}

/// Ledger occurrences joined with catalog text, in (scope, category, item) order.
fn finding_lines(
    inspection: &Inspection,
    engine: &ScoringEngine,
) -> Result<Vec<FindingLine>, ScoringError> {
    let ledger = inspection.ledger();
    let mut lines = Vec::new();

    for occurrence in ledger.occurrences() {
        let resolved = engine.catalog().resolve(&occurrence.key)?;
        let media = ledger
            .get(&occurrence.key)
            .map(|entry| entry.media.clone())
            .unwrap_or_default();

        lines.push(FindingLine {
            key: occurrence.key,
            scope_label: occurrence.key.scope.label(),
            category_name: resolved.category.name.clone(),
            item_name: resolved.item.name.clone(),
            severity: occurrence.key.severity,
            severity_label: occurrence.key.severity.label(),
            description: resolved.definition.description.clone(),
            weight: resolved.definition.weight,
            count: occurrence.count,
            points: resolved
                .definition
                .weight
                .saturating_mul(Decimal::from(occurrence.count)),
            life_threatening: resolved.definition.life_threatening,
            note: occurrence.note.map(str::to_string),
            media,
        });
    }

    lines.sort_by_key(|line| line.key);
    Ok(lines)
}

fn category_deductions(findings: &[FindingLine], engine: &ScoringEngine) -> Vec<CategoryDeduction> {
    let mut rollup: Vec<CategoryDeduction> = engine
        .catalog()
        .categories
        .iter()
        .map(|category| CategoryDeduction {
            category_name: category.name.clone(),
            common_points: Decimal::ZERO,
            unit_points: Decimal::ZERO,
            findings: 0,
        })
        .collect();

    for line in findings {
        if let Some(entry) = rollup.get_mut(line.key.category) {
            if line.key.scope.is_common() {
                entry.common_points = entry.common_points.saturating_add(line.points);
            } else {
                entry.unit_points = entry.unit_points.saturating_add(line.points);
            }
            entry.findings += 1;
        }
    }

    rollup.retain(|entry| entry.findings > 0);
    rollup
}
