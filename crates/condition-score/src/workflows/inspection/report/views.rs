use super::super::domain::{MediaHandle, ObservationKey, Severity};
use super::super::instance::{Inspection, InspectionId, InspectionStatus};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Recorded defect joined with its catalog text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FindingLine {
    pub key: ObservationKey,
    pub scope_label: String,
    pub category_name: String,
    pub item_name: String,
    pub severity: Severity,
    pub severity_label: &'static str,
    pub description: String,
    pub weight: Decimal,
    pub count: u32,
    pub points: Decimal,
    pub life_threatening: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<MediaHandle>,
}

/// Raw (unextrapolated) points per catalog category and scope kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDeduction {
    pub category_name: String,
    pub common_points: Decimal,
    pub unit_points: Decimal,
    pub findings: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectionView {
    pub id: InspectionId,
    pub property_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspector: Option<String>,
    pub inspection_date: NaiveDate,
    pub total_units: u32,
    pub sample_size: u32,
    pub status: InspectionStatus,
    pub status_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_on: Option<NaiveDate>,
    pub recorded_defects: usize,
}

impl From<&Inspection> for InspectionView {
    fn from(inspection: &Inspection) -> Self {
        let header = inspection.header();
        Self {
            id: header.id.clone(),
            property_name: header.property_name.clone(),
            inspector: header.inspector.clone(),
            inspection_date: header.inspection_date,
            total_units: inspection.total_units(),
            sample_size: inspection.sample_size(),
            status: inspection.status(),
            status_label: inspection.status().label(),
            completed_on: inspection.completed_on(),
            recorded_defects: inspection.ledger().occurrences().count(),
        }
    }
}

/// Flat row shape for CSV export.
#[derive(Debug, Serialize)]
pub(crate) struct FindingRow<'a> {
    pub scope: &'a str,
    pub category: &'a str,
    pub item: &'a str,
    pub severity: &'static str,
    pub description: &'a str,
    pub weight: Decimal,
    pub count: u32,
    pub points: Decimal,
    pub life_threatening: bool,
    pub note: &'a str,
}

impl<'a> From<&'a FindingLine> for FindingRow<'a> {
    fn from(line: &'a FindingLine) -> Self {
        Self {
            scope: &line.scope_label,
            category: &line.category_name,
            item: &line.item_name,
            severity: line.severity_label,
            description: &line.description,
            weight: line.weight,
            count: line.count,
            points: line.points,
            life_threatening: line.life_threatening,
            note: line.note.as_deref().unwrap_or_default(),
        }
    }
}
