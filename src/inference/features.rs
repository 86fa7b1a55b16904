//! Feature classification and predictor inputs

use crate::dataset::columns;
use crate::error::{CostError, Result};
use crate::export::ModelArtifact;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fields the user sets directly. They bypass the economic multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManualField {
    ProjectLocality,
    TotalFloorArea,
    LotArea,
    Duration,
    PrelimEstUnitCost,
    UnitPriceStart,
}

impl ManualField {
    pub const ALL: [ManualField; 6] = [
        ManualField::TotalFloorArea,
        ManualField::LotArea,
        ManualField::PrelimEstUnitCost,
        ManualField::UnitPriceStart,
        ManualField::Duration,
        ManualField::ProjectLocality,
    ];

    /// Dataset column the field writes to
    pub fn column(self) -> &'static str {
        match self {
            ManualField::ProjectLocality => columns::PROJECT_LOCALITY,
            ManualField::TotalFloorArea => columns::TOTAL_FLOOR_AREA,
            ManualField::LotArea => columns::LOT_AREA,
            ManualField::Duration => columns::DURATION,
            ManualField::PrelimEstUnitCost => columns::PRELIM_EST_UNIT_COST,
            ManualField::UnitPriceStart => columns::UNIT_PRICE_START,
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        match name {
            columns::PROJECT_LOCALITY => Some(ManualField::ProjectLocality),
            columns::TOTAL_FLOOR_AREA => Some(ManualField::TotalFloorArea),
            columns::LOT_AREA => Some(ManualField::LotArea),
            columns::DURATION => Some(ManualField::Duration),
            columns::PRELIM_EST_UNIT_COST => Some(ManualField::PrelimEstUnitCost),
            columns::UNIT_PRICE_START => Some(ManualField::UnitPriceStart),
            _ => None,
        }
    }

    /// Human-readable form label
    pub fn label(self) -> &'static str {
        match self {
            ManualField::ProjectLocality => "Project locality",
            ManualField::TotalFloorArea => "Total floor area",
            ManualField::LotArea => "Lot area",
            ManualField::Duration => "Duration (months)",
            ManualField::PrelimEstUnitCost => "Preliminary unit cost",
            ManualField::UnitPriceStart => "Unit price at start",
        }
    }
}

/// How the predictor fills a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "field", rename_all = "snake_case")]
pub enum FeatureRole {
    /// Taken from user input as-is
    Manual(ManualField),
    /// Stored mean scaled by the economic multiplier
    Adjusted,
}

impl FeatureRole {
    pub fn classify(name: &str) -> Self {
        match ManualField::from_column(name) {
            Some(field) => FeatureRole::Manual(field),
            None => FeatureRole::Adjusted,
        }
    }

    pub fn is_manual(self) -> bool {
        matches!(self, FeatureRole::Manual(_))
    }
}

/// Classify every feature name, preserving order
pub fn classify_features(names: &[String]) -> Vec<FeatureRole> {
    names.iter().map(|name| FeatureRole::classify(name)).collect()
}

/// Qualitative market outlook applied to every adjusted feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EconomicCondition {
    Recession,
    #[default]
    Stable,
    Inflationary,
}

impl EconomicCondition {
    pub const ALL: [EconomicCondition; 3] = [
        EconomicCondition::Recession,
        EconomicCondition::Stable,
        EconomicCondition::Inflationary,
    ];

    pub fn multiplier(self) -> f64 {
        match self {
            EconomicCondition::Recession => 0.9,
            EconomicCondition::Stable => 1.0,
            EconomicCondition::Inflationary => 1.1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EconomicCondition::Recession => "Recession",
            EconomicCondition::Stable => "Stable",
            EconomicCondition::Inflationary => "Inflationary",
        }
    }
}

impl fmt::Display for EconomicCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EconomicCondition {
    type Err = CostError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recession" => Ok(EconomicCondition::Recession),
            "stable" | "normal" => Ok(EconomicCondition::Stable),
            "inflationary" | "inflation" => Ok(EconomicCondition::Inflationary),
            other => Err(CostError::InvalidParameter {
                name: "economic condition".to_string(),
                value: other.to_string(),
                reason: "expected recession, stable or inflationary".to_string(),
            }),
        }
    }
}

/// User-supplied values for the manual fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInput {
    pub project_locality: f64,
    pub total_floor_area: f64,
    pub lot_area: f64,
    pub duration: f64,
    pub prelim_est_unit_cost: f64,
    pub unit_price_start: f64,
}

impl ProjectInput {
    pub fn get(&self, field: ManualField) -> f64 {
        match field {
            ManualField::ProjectLocality => self.project_locality,
            ManualField::TotalFloorArea => self.total_floor_area,
            ManualField::LotArea => self.lot_area,
            ManualField::Duration => self.duration,
            ManualField::PrelimEstUnitCost => self.prelim_est_unit_cost,
            ManualField::UnitPriceStart => self.unit_price_start,
        }
    }

    pub fn set(&mut self, field: ManualField, value: f64) {
        let slot = match field {
            ManualField::ProjectLocality => &mut self.project_locality,
            ManualField::TotalFloorArea => &mut self.total_floor_area,
            ManualField::LotArea => &mut self.lot_area,
            ManualField::Duration => &mut self.duration,
            ManualField::PrelimEstUnitCost => &mut self.prelim_est_unit_cost,
            ManualField::UnitPriceStart => &mut self.unit_price_start,
        };
        *slot = value;
    }

    /// Form pre-fill: the stored training mean of every manual field
    pub fn defaults(artifact: &ModelArtifact) -> Result<Self> {
        for field in ManualField::ALL {
            if artifact.feature_index(field.column()).is_none() {
                return Err(CostError::FeatureNotFound(field.column().to_string()));
            }
        }
        Ok(Self::from_fn(|field| {
            artifact.default_for(field.column()).unwrap_or_default()
        }))
    }

    /// Build an input from a lookup of per-field values
    pub fn from_fn(mut value: impl FnMut(ManualField) -> f64) -> Self {
        Self {
            project_locality: value(ManualField::ProjectLocality),
            total_floor_area: value(ManualField::TotalFloorArea),
            lot_area: value(ManualField::LotArea),
            duration: value(ManualField::Duration),
            prelim_est_unit_cost: value(ManualField::PrelimEstUnitCost),
            unit_price_start: value(ManualField::UnitPriceStart),
        }
    }
}
