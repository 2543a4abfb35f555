mod standard;

use super::domain::{ObservationKey, ScoringError, Severity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// One possible deficiency of a catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectDefinition {
    pub description: String,
    pub weight: Decimal,
    #[serde(default)]
    pub life_threatening: bool,
}

/// Inspectable item with its requirement text and defects grouped by tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    #[serde(default)]
    pub requirement: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub defects: BTreeMap<Severity, Vec<DefectDefinition>>,
}

impl CatalogItem {
    pub fn defects_for(&self, severity: Severity) -> &[DefectDefinition] {
        self.defects
            .get(&severity)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogCategory {
    pub name: String,
    pub items: Vec<CatalogItem>,
}

/// Read-only defect reference supplied to the engine at construction time.
///
/// Observations address defects by position, so reordering a catalog
/// invalidates previously recorded inspections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectCatalog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub categories: Vec<CatalogCategory>,
}

/// Catalog text joined to a resolved observation key.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedDefect<'a> {
    pub category: &'a CatalogCategory,
    pub item: &'a CatalogItem,
    pub definition: &'a DefectDefinition,
}

impl DefectCatalog {
    pub fn new(categories: Vec<CatalogCategory>) -> Self {
        Self {
            version: None,
            categories,
        }
    }

    /// Built-in catalog used by the demo and as the service default.
    pub fn standard() -> Self {
        Self {
            version: Some(standard::VERSION.to_string()),
            categories: standard::categories(),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse a JSON catalog and validate it before handing it out.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_reader(reader)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Walk category, item, tier and defect index; any miss is a dangling reference.
    pub fn resolve(&self, key: &ObservationKey) -> Result<ResolvedDefect<'_>, ScoringError> {
        let dangling = || ScoringError::DanglingDefectReference { key: *key };

        let category = self.categories.get(key.category).ok_or_else(dangling)?;
        let item = category.items.get(key.item).ok_or_else(dangling)?;
        let definition = item
            .defects_for(key.severity)
            .get(key.defect)
            .ok_or_else(dangling)?;

        Ok(ResolvedDefect {
            category,
            item,
            definition,
        })
    }

    pub fn defect_count(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|category| &category.items)
            .flat_map(|item| item.defects.values())
            .map(Vec::len)
            .sum()
    }

    /// Reject catalogs the engine cannot score against safely.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.categories.is_empty() {
            return Err(CatalogError::Empty);
        }

        for (category_index, category) in self.categories.iter().enumerate() {
            if category.name.trim().is_empty() {
                return Err(CatalogError::Invalid {
                    location: format!("category {category_index}"),
                    reason: "name is blank".to_string(),
                });
            }

            for (item_index, item) in category.items.iter().enumerate() {
                let location = format!("{} / item {item_index}", category.name);
                if item.name.trim().is_empty() {
                    return Err(CatalogError::Invalid {
                        location,
                        reason: "name is blank".to_string(),
                    });
                }

                for (severity, defects) in &item.defects {
                    for (defect_index, defect) in defects.iter().enumerate() {
                        let location = format!(
                            "{} / {} / {} defect {defect_index}",
                            category.name,
                            item.name,
                            severity.label()
                        );
                        if defect.description.trim().is_empty() {
                            return Err(CatalogError::Invalid {
                                location,
                                reason: "description is blank".to_string(),
                            });
                        }
                        if defect.weight < Decimal::ZERO {
                            return Err(CatalogError::Invalid {
                                location,
                                reason: format!("weight {} is negative", defect.weight),
                            });
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read defect catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid defect catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("defect catalog has no categories")]
    Empty,
    #[error("invalid catalog entry at {location}: {reason}")]
    Invalid { location: String, reason: String },
}
