use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::catalog::DefectCatalog;
use super::domain::{MediaHandle, ObservationKey, ScoringError};
use super::instance::{Inspection, InspectionError, InspectionHeader, InspectionId};
use super::report::InspectionReport;
use super::repository::{InspectionRepository, RepositoryError};
use super::sampling::SampleSizeTable;
use super::scoring::{ScoreReport, ScoringEngine, ScoringPolicy};

/// Parameters for starting a new inspection.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InspectionRequest {
    pub property_name: String,
    pub total_units: u32,
    #[serde(default)]
    pub inspector: Option<String>,
    pub inspection_date: NaiveDate,
}

/// Service composing the repository, sample table, and scoring engine.
///
/// Edits load, change and store the whole inspection. They are serialized so two
/// concurrent edits on different keys of the same inspection both land; the last
/// write only wins for the same key.
pub struct InspectionService<R> {
    repository: Arc<R>,
    engine: Arc<ScoringEngine>,
    sample_table: SampleSizeTable,
    edits: Mutex<()>,
}

static INSPECTION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_inspection_id() -> InspectionId {
    let id = INSPECTION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    InspectionId(format!("insp-{id:06}"))
}

impl<R> InspectionService<R>
where
    R: InspectionRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        catalog: Arc<DefectCatalog>,
        policy: ScoringPolicy,
        sample_table: SampleSizeTable,
    ) -> Self {
        Self {
            repository,
            engine: Arc::new(ScoringEngine::new(catalog, policy)),
            sample_table,
            edits: Mutex::new(()),
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn resolve_sample_size(&self, total_units: u32) -> Result<u32, InspectionServiceError> {
        Ok(self.sample_table.resolve(total_units)?)
    }

    /// Start a new inspection and persist it.
    pub fn start(&self, request: InspectionRequest) -> Result<Inspection, InspectionServiceError> {
        let header = InspectionHeader {
            id: next_inspection_id(),
            property_name: request.property_name,
            inspector: request.inspector,
            inspection_date: request.inspection_date,
        };
        let inspection = Inspection::start(header, request.total_units, &self.sample_table)?;

        let stored = self.repository.insert(inspection)?;
        info!(
            inspection = %stored.id(),
            total_units = stored.total_units(),
            sample_size = stored.sample_size(),
            "inspection started"
        );
        Ok(stored)
    }

    pub fn get(&self, id: &InspectionId) -> Result<Inspection, InspectionServiceError> {
        let inspection = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(inspection)
    }

    pub fn list(&self, limit: usize) -> Result<Vec<Inspection>, InspectionServiceError> {
        Ok(self.repository.list(limit)?)
    }

    /// Adjust the count for `key`.
    ///
    /// Increments must resolve in the catalog. Decrements skip that check so an
    /// entry left dangling by a catalog change can still be counted down and removed.
    pub fn record_occurrence(
        &self,
        id: &InspectionId,
        key: ObservationKey,
        delta: i64,
    ) -> Result<u32, InspectionServiceError> {
        if delta > 0 {
            self.engine.catalog().resolve(&key)?;
        }
        let _edit = self.begin_edit();
        let mut inspection = self.get(id)?;
        let count = inspection.record_occurrence(key, delta)?;
        self.repository.update(inspection)?;

        debug!(inspection = %id, %key, delta, count, "occurrence recorded");
        Ok(count)
    }

    pub fn set_note(
        &self,
        id: &InspectionId,
        key: ObservationKey,
        note: String,
    ) -> Result<(), InspectionServiceError> {
        // Clearing a note is always allowed.
        if !note.trim().is_empty() {
            self.engine.catalog().resolve(&key)?;
        }
        let _edit = self.begin_edit();
        let mut inspection = self.get(id)?;
        inspection.set_note(key, note)?;
        self.repository.update(inspection)?;

        debug!(inspection = %id, %key, "note updated");
        Ok(())
    }

    pub fn attach_media(
        &self,
        id: &InspectionId,
        key: ObservationKey,
        handle: MediaHandle,
    ) -> Result<(), InspectionServiceError> {
        self.engine.catalog().resolve(&key)?;
        let _edit = self.begin_edit();
        let mut inspection = self.get(id)?;
        inspection.attach_media(key, handle)?;
        self.repository.update(inspection)?;
        Ok(())
    }

    /// Recompute the score from the stored ledger.
    pub fn score(&self, id: &InspectionId) -> Result<ScoreReport, InspectionServiceError> {
        let inspection = self.get(id)?;
        Ok(self.engine.score(&inspection)?)
    }

    /// Freeze the inspection and return its final score.
    ///
    /// The score is computed before the status changes, so an inspection whose
    /// ledger no longer resolves stays editable.
    pub fn complete(
        &self,
        id: &InspectionId,
        completed_on: NaiveDate,
    ) -> Result<ScoreReport, InspectionServiceError> {
        let _edit = self.begin_edit();
        let mut inspection = self.get(id)?;
        let report = self.engine.score(&inspection)?;
        inspection.complete(completed_on)?;
        self.repository.update(inspection)?;

        if report.pass {
            info!(inspection = %id, score = %report.display_score, "inspection completed");
        } else {
            warn!(
                inspection = %id,
                score = %report.display_score,
                critical = report.critical_findings.len(),
                "inspection completed with failing result"
            );
        }
        Ok(report)
    }

    fn begin_edit(&self) -> MutexGuard<'_, ()> {
        // The guard protects no data, so a poisoned lock is still usable.
        self.edits.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn report(&self, id: &InspectionId) -> Result<InspectionReport, InspectionServiceError> {
        let inspection = self.get(id)?;
        Ok(InspectionReport::build(&inspection, &self.engine)?)
    }
}

/// Error raised by the inspection service.
#[derive(Debug, thiserror::Error)]
pub enum InspectionServiceError {
    #[error(transparent)]
    Inspection(#[from] InspectionError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
