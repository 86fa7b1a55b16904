//! Local explanations for linear models

use crate::error::{CostError, Result};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Feature contribution to a prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    /// Feature index
    pub feature_index: usize,
    /// Feature name
    pub feature_name: String,
    /// Feature value in original units
    pub feature_value: f64,
    /// Feature value after scaling
    pub scaled_value: f64,
    /// Model coefficient for the feature
    pub coefficient: f64,
    /// `scaled_value * coefficient`
    pub contribution: f64,
}

/// Local explanation for a single prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalExplanation {
    /// Base value (model intercept)
    pub base_value: f64,
    /// Actual prediction
    pub prediction: f64,
    /// Feature contributions, in feature order
    pub contributions: Vec<FeatureContribution>,
}

impl LocalExplanation {
    /// Get sum of contributions
    pub fn sum_contributions(&self) -> f64 {
        self.contributions.iter().map(|c| c.contribution).sum()
    }

    /// Get sorted contributions (by absolute value, descending)
    pub fn sorted_contributions(&self) -> Vec<&FeatureContribution> {
        let mut sorted: Vec<&FeatureContribution> = self.contributions.iter().collect();
        sorted.sort_by(|a, b| {
            b.contribution
                .abs()
                .partial_cmp(&a.contribution.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted
    }

    /// Get top k contributors
    pub fn top_k_contributors(&self, k: usize) -> Vec<&FeatureContribution> {
        self.sorted_contributions().into_iter().take(k).collect()
    }

    /// Get positive contributors
    pub fn positive_contributors(&self) -> Vec<&FeatureContribution> {
        self.contributions
            .iter()
            .filter(|c| c.contribution > 0.0)
            .collect()
    }

    /// Get negative contributors
    pub fn negative_contributors(&self) -> Vec<&FeatureContribution> {
        self.contributions
            .iter()
            .filter(|c| c.contribution < 0.0)
            .collect()
    }
}

/// Explain a linear prediction exactly: each feature contributes
/// `scaled_i * coef_i` and the contributions plus the intercept sum to the
/// prediction.
pub fn explain_linear(
    raw: ArrayView1<f64>,
    scaled: ArrayView1<f64>,
    coefficients: ArrayView1<f64>,
    intercept: f64,
    feature_names: &[String],
) -> Result<LocalExplanation> {
    let n = coefficients.len();
    if raw.len() != n || scaled.len() != n || feature_names.len() != n {
        return Err(CostError::ShapeError {
            expected: format!("{} features", n),
            actual: format!(
                "raw {}, scaled {}, names {}",
                raw.len(),
                scaled.len(),
                feature_names.len()
            ),
        });
    }

    let contributions: Vec<FeatureContribution> = (0..n)
        .map(|i| FeatureContribution {
            feature_index: i,
            feature_name: feature_names[i].clone(),
            feature_value: raw[i],
            scaled_value: scaled[i],
            coefficient: coefficients[i],
            contribution: scaled[i] * coefficients[i],
        })
        .collect();

    let prediction = intercept + contributions.iter().map(|c| c.contribution).sum::<f64>();

    Ok(LocalExplanation {
        base_value: intercept,
        prediction,
        contributions,
    })
}
