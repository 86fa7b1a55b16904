//! Trained model artifact

use crate::error::{CostError, Result};
use crate::inference::{classify_features, FeatureRole};
use crate::preprocessing::StandardScaler;
use crate::training::RidgeRegression;
use chrono::{DateTime, Utc};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Current artifact layout version
pub const FORMAT_VERSION: u32 = 1;

/// Training provenance stored next to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub format_version: u32,
    pub crate_version: String,
    pub trained_at: DateTime<Utc>,
    /// R² on the held-out test rows
    pub test_r2: f64,
    /// Ridge alpha picked by cross-validation
    pub alpha: f64,
    /// Mean CV R² of the chosen alpha
    pub cv_r2: f64,
    pub n_train: usize,
    pub n_synthetic: usize,
    pub n_test: usize,
    pub random_seed: u64,
}

impl ArtifactMetadata {
    pub fn new(test_r2: f64, alpha: f64, cv_r2: f64) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            trained_at: Utc::now(),
            test_r2,
            alpha,
            cv_r2,
            n_train: 0,
            n_synthetic: 0,
            n_test: 0,
            random_seed: 0,
        }
    }

    pub fn with_counts(mut self, n_train: usize, n_synthetic: usize, n_test: usize) -> Self {
        self.n_train = n_train;
        self.n_synthetic = n_synthetic;
        self.n_test = n_test;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }
}

/// Everything the predictor needs: model, scaler, per-feature defaults and the
/// feature order they all share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub metadata: ArtifactMetadata,
    pub model: RidgeRegression,
    pub scaler: StandardScaler,
    /// Mean of each feature over the (non-synthetic) training rows
    pub default_values: Vec<f64>,
    pub feature_names: Vec<String>,
    pub feature_roles: Vec<FeatureRole>,
}

impl ModelArtifact {
    /// Assemble an artifact; feature roles are derived from the names.
    pub fn new(
        metadata: ArtifactMetadata,
        model: RidgeRegression,
        scaler: StandardScaler,
        default_values: Vec<f64>,
        feature_names: Vec<String>,
    ) -> Result<Self> {
        let feature_roles = classify_features(&feature_names);
        let artifact = Self {
            metadata,
            model,
            scaler,
            default_values,
            feature_names,
            feature_roles,
        };
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn coefficients(&self) -> Result<&Array1<f64>> {
        Ok(self.model.parameters()?.0)
    }

    pub fn intercept(&self) -> Result<f64> {
        Ok(self.model.parameters()?.1)
    }

    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.feature_names.iter().position(|n| n == name)
    }

    /// Stored training mean for a feature
    pub fn default_for(&self, name: &str) -> Option<f64> {
        self.feature_index(name).map(|idx| self.default_values[idx])
    }

    /// Check that every per-feature vector agrees with the feature list and
    /// that the stored roles match the classification of the names.
    pub fn validate(&self) -> Result<()> {
        let n = self.feature_names.len();
        let coefficients = self.coefficients()?.len();
        let lengths = [
            ("coefficients", coefficients),
            ("scaler", self.scaler.n_features()),
            ("default_values", self.default_values.len()),
            ("feature_roles", self.feature_roles.len()),
        ];
        for (what, len) in lengths {
            if len != n {
                return Err(CostError::ShapeError {
                    expected: format!("{} entries in {}", n, what),
                    actual: format!("{} entries", len),
                });
            }
        }

        if self.feature_roles != classify_features(&self.feature_names) {
            return Err(CostError::SerializationError(
                "feature roles disagree with feature names".to_string(),
            ));
        }
        Ok(())
    }

    /// Write the artifact as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;

        info!(
            path = %path.display(),
            features = self.n_features(),
            test_r2 = self.metadata.test_r2,
            "Saved model artifact"
        );
        Ok(())
    }

    /// Read and validate an artifact
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(CostError::ArtifactNotFound(path.to_path_buf()));
        }
        let reader = BufReader::new(File::open(path)?);
        let artifact: Self = serde_json::from_reader(reader)?;
        artifact.validate()?;

        info!(
            path = %path.display(),
            features = artifact.n_features(),
            trained_at = %artifact.metadata.trained_at.to_rfc3339(),
            "Loaded model artifact"
        );
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn tiny_artifact() -> ModelArtifact {
        let x = array![[100.0, 1.0], [200.0, 2.0], [300.0, 4.0]];
        let y = array![10.0, 20.0, 35.0];
        let mut scaler = StandardScaler::new();
        let xs = scaler.fit_transform(&x).unwrap();
        let mut model = RidgeRegression::new(1.0);
        model.fit(&xs, &y).unwrap();

        ModelArtifact::new(
            ArtifactMetadata::new(0.9, 1.0, 0.8).with_counts(3, 0, 1),
            model,
            scaler,
            vec![200.0, 7.0 / 3.0],
            vec!["Total_Floor_Area".to_string(), "Inflation_Index".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn test_roles_derived_from_names() {
        let artifact = tiny_artifact();
        assert!(artifact.feature_roles[0].is_manual());
        assert!(!artifact.feature_roles[1].is_manual());
        assert_eq!(artifact.default_for("Total_Floor_Area"), Some(200.0));
        assert_eq!(artifact.default_for("missing"), None);
    }

    #[test]
    fn test_save_and_load() {
        let artifact = tiny_artifact();
        let path = std::env::temp_dir()
            .join("construction-cost-artifact-tests")
            .join("model.json");
        artifact.save(&path).unwrap();

        let loaded = ModelArtifact::load(&path).unwrap();
        assert_eq!(loaded.feature_names, artifact.feature_names);
        assert_eq!(loaded.default_values, artifact.default_values);
        assert_eq!(loaded.metadata.trained_at, artifact.metadata.trained_at);
    }

    #[test]
    fn test_load_missing() {
        let path = std::env::temp_dir().join("construction-cost-no-such-model.json");
        assert!(matches!(
            ModelArtifact::load(&path),
            Err(CostError::ArtifactNotFound(_))
        ));
    }

    #[test]
    fn test_validate_rejects_length_mismatch() {
        let mut artifact = tiny_artifact();
        artifact.default_values.pop();
        assert!(matches!(artifact.validate(), Err(CostError::ShapeError { .. })));
    }

    #[test]
    fn test_validate_rejects_tampered_roles() {
        let mut artifact = tiny_artifact();
        artifact.feature_roles[1] = artifact.feature_roles[0];
        assert!(artifact.validate().is_err());
    }
}
