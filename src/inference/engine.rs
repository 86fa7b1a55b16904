//! Cost predictor
//!
//! Assembles a feature row from the stored training means and the user's
//! manual fields, applies the economic multiplier to every adjusted feature,
//! and explains the resulting linear prediction feature by feature.

use crate::error::{CostError, Result};
use crate::explainability::{explain_linear, FeatureContribution, LocalExplanation};
use crate::export::ModelArtifact;
use super::config::format_currency;
use super::features::{EconomicCondition, FeatureRole, ProjectInput};
use super::PredictorConfig;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// One prediction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(flatten)]
    pub input: ProjectInput,
    #[serde(default)]
    pub economy: EconomicCondition,
    /// Overrides the configured rate when set
    #[serde(default)]
    pub currency_rate: Option<f64>,
}

impl PredictionRequest {
    pub fn new(input: ProjectInput) -> Self {
        Self {
            input,
            economy: EconomicCondition::default(),
            currency_rate: None,
        }
    }

    pub fn with_economy(mut self, economy: EconomicCondition) -> Self {
        self.economy = economy;
        self
    }

    pub fn with_currency_rate(mut self, rate: f64) -> Self {
        self.currency_rate = Some(rate);
        self
    }
}

/// Predicted cost with its per-feature breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Model output in training units
    pub raw_prediction: f64,
    pub currency_rate: f64,
    /// `raw_prediction * currency_rate`
    pub predicted_cost: f64,
    pub formatted_cost: String,
    pub economy: EconomicCondition,
    pub multiplier: f64,
    pub explanation: LocalExplanation,
    /// Chart size
    pub top_k: usize,
}

impl Prediction {
    /// Largest contributions by magnitude, at most `top_k`
    pub fn top_contributions(&self) -> Vec<&FeatureContribution> {
        self.explanation.top_k_contributors(self.top_k)
    }
}

/// Read-only predictor over a shared artifact
#[derive(Debug, Clone)]
pub struct Predictor {
    artifact: Arc<ModelArtifact>,
    config: PredictorConfig,
}

impl Predictor {
    pub fn new(artifact: ModelArtifact) -> Self {
        Self::from_arc(Arc::new(artifact))
    }

    pub fn from_arc(artifact: Arc<ModelArtifact>) -> Self {
        Self {
            artifact,
            config: PredictorConfig::default(),
        }
    }

    /// Load the artifact at `path`
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(ModelArtifact::load(path)?))
    }

    pub fn with_config(mut self, config: PredictorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Manual fields pre-filled with the training means
    pub fn default_input(&self) -> Result<ProjectInput> {
        ProjectInput::defaults(&self.artifact)
    }

    /// Raw feature row in artifact order
    pub fn assemble_features(&self, input: &ProjectInput, economy: EconomicCondition) -> Array1<f64> {
        let multiplier = economy.multiplier();
        self.artifact
            .feature_roles
            .iter()
            .zip(&self.artifact.default_values)
            .map(|(role, &default)| match role {
                FeatureRole::Manual(field) => input.get(*field),
                FeatureRole::Adjusted => default * multiplier,
            })
            .collect()
    }

    /// Model output for an unscaled feature row
    pub fn predict_raw(&self, row: ArrayView1<f64>) -> Result<f64> {
        let scaled = self.artifact.scaler.transform_row(row)?;
        self.artifact.model.predict_row(scaled.view())
    }

    pub fn predict(&self, request: &PredictionRequest) -> Result<Prediction> {
        let currency_rate = request.currency_rate.unwrap_or(self.config.currency_rate);
        if !currency_rate.is_finite() || currency_rate <= 0.0 {
            return Err(CostError::InvalidParameter {
                name: "currency_rate".to_string(),
                value: currency_rate.to_string(),
                reason: "must be a positive number".to_string(),
            });
        }

        let features = self.assemble_features(&request.input, request.economy);
        let scaled = self.artifact.scaler.transform_row(features.view())?;
        let (coefficients, intercept) = self.artifact.model.parameters()?;
        let explanation = explain_linear(
            features.view(),
            scaled.view(),
            coefficients.view(),
            intercept,
            &self.artifact.feature_names,
        )?;

        let raw_prediction = explanation.prediction;
        if !raw_prediction.is_finite() {
            return Err(CostError::InferenceError(format!(
                "non-finite prediction {}",
                raw_prediction
            )));
        }
        let predicted_cost = raw_prediction * currency_rate;
        debug!(
            raw_prediction,
            currency_rate,
            economy = %request.economy,
            "Computed prediction"
        );

        Ok(Prediction {
            raw_prediction,
            currency_rate,
            predicted_cost,
            formatted_cost: format_currency(predicted_cost, &self.config.currency_symbol),
            economy: request.economy,
            multiplier: request.economy.multiplier(),
            explanation,
            top_k: self.config.top_k,
        })
    }
}
