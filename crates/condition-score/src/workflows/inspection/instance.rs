use super::domain::{MediaHandle, ObservationKey, Scope, ScoringError};
use super::ledger::ObservationLedger;
use super::sampling::SampleSizeTable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for inspections.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InspectionId(pub String);

impl std::fmt::Display for InspectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    InProgress,
    Completed,
}

impl InspectionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

/// Descriptive fields captured when an inspection starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionHeader {
    pub id: InspectionId,
    pub property_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspector: Option<String>,
    pub inspection_date: NaiveDate,
}

/// Aggregate root for a single property inspection.
///
/// The sample size is fixed when the inspection starts. Once completed the
/// inspection rejects further edits but can still be scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "InspectionRecord", into = "InspectionRecord")]
pub struct Inspection {
    header: InspectionHeader,
    total_units: u32,
    sample_size: u32,
    ledger: ObservationLedger,
    status: InspectionStatus,
    completed_on: Option<NaiveDate>,
}

impl Inspection {
    /// Start an inspection, resolving the sample size from `table`.
    pub fn start(
        header: InspectionHeader,
        total_units: u32,
        table: &SampleSizeTable,
    ) -> Result<Self, InspectionError> {
        let sample_size = table.resolve(total_units)?;
        Self::with_sample_size(header, total_units, sample_size)
    }

    /// Start an inspection with an already-determined sample size.
    pub fn with_sample_size(
        header: InspectionHeader,
        total_units: u32,
        sample_size: u32,
    ) -> Result<Self, InspectionError> {
        if total_units == 0 || sample_size == 0 || sample_size > total_units {
            return Err(ScoringError::InvalidPopulationSize {
                total_units,
                sample_size,
            }
            .into());
        }

        Ok(Self {
            header,
            total_units,
            sample_size,
            ledger: ObservationLedger::new(),
            status: InspectionStatus::InProgress,
            completed_on: None,
        })
    }

    pub fn id(&self) -> &InspectionId {
        &self.header.id
    }

    pub fn header(&self) -> &InspectionHeader {
        &self.header
    }

    pub fn total_units(&self) -> u32 {
        self.total_units
    }

    pub fn sample_size(&self) -> u32 {
        self.sample_size
    }

    pub fn ledger(&self) -> &ObservationLedger {
        &self.ledger
    }

    pub fn status(&self) -> InspectionStatus {
        self.status
    }

    pub fn completed_on(&self) -> Option<NaiveDate> {
        self.completed_on
    }

    pub fn is_completed(&self) -> bool {
        self.status == InspectionStatus::Completed
    }

    pub fn record_occurrence(
        &mut self,
        key: ObservationKey,
        delta: i64,
    ) -> Result<u32, InspectionError> {
        self.ensure_editable(&key)?;
        Ok(self.ledger.record_occurrence(key, delta))
    }

    pub fn set_note(
        &mut self,
        key: ObservationKey,
        text: impl Into<String>,
    ) -> Result<(), InspectionError> {
        self.ensure_editable(&key)?;
        self.ledger.set_note(key, text);
        Ok(())
    }

    pub fn attach_media(
        &mut self,
        key: ObservationKey,
        handle: MediaHandle,
    ) -> Result<(), InspectionError> {
        self.ensure_editable(&key)?;
        self.ledger.attach_media(key, handle);
        Ok(())
    }

    /// Freeze the inspection. Completing twice is rejected.
    pub fn complete(&mut self, completed_on: NaiveDate) -> Result<(), InspectionError> {
        if self.is_completed() {
            return Err(InspectionError::Completed(self.header.id.clone()));
        }
        self.status = InspectionStatus::Completed;
        self.completed_on = Some(completed_on);
        Ok(())
    }

    fn ensure_editable(&self, key: &ObservationKey) -> Result<(), InspectionError> {
        if self.is_completed() {
            return Err(InspectionError::Completed(self.header.id.clone()));
        }
        check_scope(key.scope, self.sample_size)
    }
}

fn check_scope(scope: Scope, sample_size: u32) -> Result<(), InspectionError> {
    match scope {
        Scope::Unit(unit) if unit == 0 || unit > sample_size => {
            Err(InspectionError::UnitOutsideSample { unit, sample_size })
        }
        _ => Ok(()),
    }
}

/// Plain persisted form of an [`Inspection`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionRecord {
    #[serde(flatten)]
    pub header: InspectionHeader,
    pub total_units: u32,
    pub sample_size: u32,
    #[serde(default)]
    pub observations: ObservationLedger,
    pub status: InspectionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_on: Option<NaiveDate>,
}

impl TryFrom<InspectionRecord> for Inspection {
    type Error = InspectionError;

    fn try_from(record: InspectionRecord) -> Result<Self, Self::Error> {
        let mut inspection =
            Self::with_sample_size(record.header, record.total_units, record.sample_size)?;

        for observation in record.observations.entries() {
            check_scope(observation.key.scope, inspection.sample_size)?;
        }

        inspection.ledger = record.observations;
        inspection.status = record.status;
        inspection.completed_on = match record.status {
            InspectionStatus::Completed => record.completed_on,
            InspectionStatus::InProgress => None,
        };
        Ok(inspection)
    }
}

impl From<Inspection> for InspectionRecord {
    fn from(value: Inspection) -> Self {
        Self {
            header: value.header,
            total_units: value.total_units,
            sample_size: value.sample_size,
            observations: value.ledger,
            status: value.status,
            completed_on: value.completed_on,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InspectionError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error("unit {unit} is outside the sampled units 1..={sample_size}")]
    UnitOutsideSample { unit: u32, sample_size: u32 },
    #[error("inspection {0} is completed and can no longer be edited")]
    Completed(InspectionId),
}
