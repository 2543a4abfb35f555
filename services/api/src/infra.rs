use chrono::NaiveDate;
use condition_score::workflows::inspection::{
    Inspection, InspectionId, InspectionRepository, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local inspection store; last write wins per `update`.
#[derive(Default, Clone)]
pub(crate) struct InMemoryInspectionRepository {
    records: Arc<Mutex<HashMap<InspectionId, Inspection>>>,
}

impl InspectionRepository for InMemoryInspectionRepository {
    fn insert(&self, inspection: Inspection) -> Result<Inspection, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        if guard.contains_key(inspection.id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(inspection.id().clone(), inspection.clone());
        Ok(inspection)
    }

    fn update(&self, inspection: Inspection) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        match guard.get_mut(inspection.id()) {
            Some(existing) => {
                *existing = inspection;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &InspectionId) -> Result<Option<Inspection>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self, limit: usize) -> Result<Vec<Inspection>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        let mut inspections: Vec<Inspection> = guard.values().cloned().collect();
        inspections.sort_by(|a, b| a.id().cmp(b.id()));
        inspections.truncate(limit);
        Ok(inspections)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
