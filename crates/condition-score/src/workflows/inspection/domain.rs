use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity tier grouping the defects of a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Moderate,
    Severe,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
        }
    }
}

/// Where an observation was made.
///
/// Unit numbers are 1-based positions within the sampled units, not the
/// property's own unit numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Common,
    Unit(u32),
}

impl Scope {
    pub const fn is_common(self) -> bool {
        matches!(self, Self::Common)
    }

    pub fn label(self) -> String {
        match self {
            Self::Common => "Common Areas".to_string(),
            Self::Unit(n) => format!("Unit {n}"),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Common => write!(f, "common"),
            Self::Unit(n) => write!(f, "unit {n}"),
        }
    }
}

/// Positional address of one defect at one scope.
///
/// Field order matters: the derived ordering sorts by scope, then category,
/// item, severity and defect, which is the report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObservationKey {
    pub scope: Scope,
    pub category: usize,
    pub item: usize,
    pub severity: Severity,
    pub defect: usize,
}

impl ObservationKey {
    pub const fn new(
        scope: Scope,
        category: usize,
        item: usize,
        severity: Severity,
        defect: usize,
    ) -> Self {
        Self {
            scope,
            category,
            item,
            severity,
            defect,
        }
    }

    pub const fn common(category: usize, item: usize, severity: Severity, defect: usize) -> Self {
        Self::new(Scope::Common, category, item, severity, defect)
    }

    pub const fn unit(
        unit: u32,
        category: usize,
        item: usize,
        severity: Severity,
        defect: usize,
    ) -> Self {
        Self::new(Scope::Unit(unit), category, item, severity, defect)
    }
}

impl fmt::Display for ObservationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}",
            self.scope,
            self.category,
            self.item,
            self.severity.label().to_ascii_lowercase(),
            self.defect
        )
    }
}

/// Opaque reference to a photo or audio clip owned by the capture layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaHandle(pub String);

/// Faults that make a score impossible to compute.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("invalid population size: {total_units} total units with sample size {sample_size}")]
    InvalidPopulationSize { total_units: u32, sample_size: u32 },
    #[error("observation {key} does not resolve to a defect in the current catalog")]
    DanglingDefectReference { key: ObservationKey },
}
