//! Physical-condition inspection capture, sampling, and point-deduction scoring.

pub mod catalog;
pub mod domain;
mod instance;
pub mod ledger;
pub mod report;
pub mod repository;
pub mod router;
pub mod sampling;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogCategory, CatalogError, CatalogItem, DefectCatalog, DefectDefinition};
pub use domain::{MediaHandle, ObservationKey, Scope, ScoringError, Severity};
pub use instance::{
    Inspection, InspectionError, InspectionHeader, InspectionId, InspectionRecord,
    InspectionStatus,
};
pub use ledger::{Observation, ObservationLedger, Occurrence};
pub use report::InspectionReport;
pub use repository::{InspectionRepository, RepositoryError};
pub use router::inspection_router;
pub use sampling::{SampleBucket, SampleSizeTable, SampleTableError};
pub use scoring::{
    CriticalFinding, FailureReason, ScoreReport, ScoringEngine, ScoringPolicy, UnitDeduction,
};
pub use service::{InspectionRequest, InspectionService, InspectionServiceError};
