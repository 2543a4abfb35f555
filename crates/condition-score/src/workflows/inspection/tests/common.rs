use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::workflows::inspection::catalog::{
    CatalogCategory, CatalogItem, DefectCatalog, DefectDefinition,
};
use crate::workflows::inspection::domain::{ObservationKey, Severity};
use crate::workflows::inspection::instance::{Inspection, InspectionHeader, InspectionId};
use crate::workflows::inspection::repository::{InspectionRepository, RepositoryError};
use crate::workflows::inspection::sampling::SampleSizeTable;
use crate::workflows::inspection::scoring::{ScoringEngine, ScoringPolicy};
use crate::workflows::inspection::service::{InspectionRequest, InspectionService};
use crate::workflows::inspection::inspection_router;

pub(super) const SITE: usize = 0;
pub(super) const UNITS: usize = 1;

fn defect(description: &str, weight: Decimal, life_threatening: bool) -> DefectDefinition {
    DefectDefinition {
        description: description.to_string(),
        weight,
        life_threatening,
    }
}

/// Two categories: site (common) items and dwelling (unit) items.
///
/// - site/0 "Fencing": low[0] 0.55
/// - site/1 "Electrical": severe[0] 5.00 life-threatening
/// - units/0 "Bathroom": moderate[0] 2.50, moderate[1] 1.30
/// - units/1 "Smoke Detectors": severe[0] 2.50 life-threatening
pub(super) fn catalog() -> DefectCatalog {
    let fencing = CatalogItem {
        name: "Fencing".to_string(),
        requirement: "Fences are intact.".to_string(),
        education: String::new(),
        defects: BTreeMap::from([(
            Severity::Low,
            vec![defect("Holes or missing sections", Decimal::new(55, 2), false)],
        )]),
    };
    let electrical = CatalogItem {
        name: "Electrical".to_string(),
        requirement: "No exposed conductors.".to_string(),
        education: String::new(),
        defects: BTreeMap::from([(
            Severity::Severe,
            vec![defect("Exposed wires", Decimal::new(500, 2), true)],
        )]),
    };
    let bathroom = CatalogItem {
        name: "Bathroom".to_string(),
        requirement: "Fixtures operate.".to_string(),
        education: String::new(),
        defects: BTreeMap::from([(
            Severity::Moderate,
            vec![
                defect("Plumbing leak", Decimal::new(250, 2), false),
                defect("Inoperable exhaust fan", Decimal::new(130, 2), false),
            ],
        )]),
    };
    let smoke = CatalogItem {
        name: "Smoke Detectors".to_string(),
        requirement: "Detectors sound.".to_string(),
        education: String::new(),
        defects: BTreeMap::from([(
            Severity::Severe,
            vec![defect("Missing smoke detector", Decimal::new(250, 2), true)],
        )]),
    };

    DefectCatalog::new(vec![
        CatalogCategory {
            name: "Site".to_string(),
            items: vec![fencing, electrical],
        },
        CatalogCategory {
            name: "Units".to_string(),
            items: vec![bathroom, smoke],
        },
    ])
}

pub(super) fn fence_holes() -> ObservationKey {
    ObservationKey::common(SITE, 0, Severity::Low, 0)
}

pub(super) fn exposed_wires() -> ObservationKey {
    ObservationKey::common(SITE, 1, Severity::Severe, 0)
}

pub(super) fn plumbing_leak(unit: u32) -> ObservationKey {
    ObservationKey::unit(unit, UNITS, 0, Severity::Moderate, 0)
}

pub(super) fn exhaust_fan(unit: u32) -> ObservationKey {
    ObservationKey::unit(unit, UNITS, 0, Severity::Moderate, 1)
}

pub(super) fn missing_detector(unit: u32) -> ObservationKey {
    ObservationKey::unit(unit, UNITS, 1, Severity::Severe, 0)
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(Arc::new(catalog()), ScoringPolicy::default())
}

pub(super) fn inspection_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 2).expect("valid date")
}

pub(super) fn inspection(total_units: u32, sample_size: u32) -> Inspection {
    let header = InspectionHeader {
        id: InspectionId("insp-fixture".to_string()),
        property_name: "Maple Court".to_string(),
        inspector: Some("R. Alvarez".to_string()),
        inspection_date: inspection_date(),
    };
    Inspection::with_sample_size(header, total_units, sample_size).expect("fixture inspection")
}

pub(super) fn request(total_units: u32) -> InspectionRequest {
    InspectionRequest {
        property_name: "Maple Court".to_string(),
        total_units,
        inspector: Some("R. Alvarez".to_string()),
        inspection_date: inspection_date(),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<InspectionId, Inspection>>>,
}

impl InspectionRepository for MemoryRepository {
    fn insert(&self, inspection: Inspection) -> Result<Inspection, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(inspection.id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(inspection.id().clone(), inspection.clone());
        Ok(inspection)
    }

    fn update(&self, inspection: Inspection) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(inspection.id()) {
            guard.insert(inspection.id().clone(), inspection);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &InspectionId) -> Result<Option<Inspection>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self, limit: usize) -> Result<Vec<Inspection>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut inspections: Vec<Inspection> = guard.values().cloned().collect();
        inspections.sort_by(|a, b| a.id().cmp(b.id()));
        inspections.truncate(limit);
        Ok(inspections)
    }
}

pub(super) struct UnavailableRepository;

impl InspectionRepository for UnavailableRepository {
    fn insert(&self, _inspection: Inspection) -> Result<Inspection, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _inspection: Inspection) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &InspectionId) -> Result<Option<Inspection>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _limit: usize) -> Result<Vec<Inspection>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Sample table that inspects ten units for any property of ten or more.
pub(super) fn ten_unit_table() -> SampleSizeTable {
    "9:9,1000:10".parse().expect("table parses")
}

pub(super) fn build_service() -> (InspectionService<MemoryRepository>, MemoryRepository) {
    let repository = MemoryRepository::default();
    let service = InspectionService::new(
        Arc::new(repository.clone()),
        Arc::new(catalog()),
        ScoringPolicy::default(),
        ten_unit_table(),
    );
    (service, repository)
}

pub(super) fn router_with_service(service: InspectionService<MemoryRepository>) -> axum::Router {
    inspection_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
