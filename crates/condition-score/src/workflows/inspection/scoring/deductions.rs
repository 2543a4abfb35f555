use super::super::catalog::DefectCatalog;
use super::super::domain::{Scope, ScoringError};
use super::super::ledger::ObservationLedger;
use super::{CriticalFinding, UnitDeduction};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub(crate) struct DeductionTotals {
    pub common: Decimal,
    pub units: Vec<UnitDeduction>,
    pub total_unit: Decimal,
    pub critical_findings: Vec<CriticalFinding>,
}

/// Sum `count * weight` per scope and collect life-threatening findings.
///
/// Sums saturate at `Decimal::MAX`; the final score is clamped at zero long
/// before that bound matters. Every key is resolved before anything is returned, so a single dangling
/// reference fails the whole computation.
pub(crate) fn tally(
    ledger: &ObservationLedger,
    catalog: &DefectCatalog,
) -> Result<DeductionTotals, ScoringError> {
    let mut common = Decimal::ZERO;
    let mut per_unit: BTreeMap<u32, Decimal> = BTreeMap::new();
    let mut critical_findings = Vec::new();

    for occurrence in ledger.occurrences() {
        let resolved = catalog.resolve(&occurrence.key)?;
        let points = resolved
            .definition
            .weight
            .saturating_mul(Decimal::from(occurrence.count));

        match occurrence.key.scope {
            Scope::Common => common = common.saturating_add(points),
            Scope::Unit(unit) => {
                let total = per_unit.entry(unit).or_default();
                *total = total.saturating_add(points);
            }
        }

        if resolved.definition.life_threatening {
            critical_findings.push(CriticalFinding {
                key: occurrence.key,
                category_name: resolved.category.name.clone(),
                item_name: resolved.item.name.clone(),
                description: resolved.definition.description.clone(),
                count: occurrence.count,
            });
        }
    }

    critical_findings.sort_by_key(|finding| finding.key);

    let total_unit = per_unit
        .values()
        .fold(Decimal::ZERO, |sum, points| sum.saturating_add(*points));
    let units = per_unit
        .into_iter()
        .map(|(unit, points)| UnitDeduction { unit, points })
        .collect();

    Ok(DeductionTotals {
        common,
        units,
        total_unit,
        critical_findings,
    })
}

/// Scale the per-sampled-unit average deduction up to the whole population.
pub(crate) fn extrapolate(
    total_unit: Decimal,
    sample_size: u32,
    total_units: u32,
) -> Result<Decimal, ScoringError> {
    if sample_size == 0 || total_units == 0 {
        return Err(ScoringError::InvalidPopulationSize {
            total_units,
            sample_size,
        });
    }

    // Dividing by a non-zero count never grows the magnitude.
    let average = total_unit / Decimal::from(sample_size);
    Ok(average.saturating_mul(Decimal::from(total_units)))
}
