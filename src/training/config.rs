//! Training configuration

use crate::dataset::DEFAULT_DATASET_PATH;
use crate::export::DEFAULT_ARTIFACT_PATH;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the training pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Source CSV
    pub data_path: PathBuf,

    /// Where the artifact is written
    pub artifact_path: PathBuf,

    /// Lines preceding the header line in the CSV
    pub header_offset: usize,

    /// Fraction of rows held out for the test score
    pub test_size: f64,

    /// Seed for the hold-out split and the synthetic draws
    pub random_seed: u64,

    /// Number of synthetic rows appended to the training set
    pub n_synthetic: usize,

    /// Gaussian KDE bandwidth, in standardized units
    pub kde_bandwidth: f64,

    /// Folds used to choose the ridge alpha
    pub cv_folds: usize,

    /// Candidate ridge alphas
    pub alphas: Vec<f64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATASET_PATH),
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            header_offset: 1,
            test_size: 0.2,
            random_seed: 42,
            n_synthetic: 300,
            kde_bandwidth: 0.5,
            cv_folds: 5,
            alphas: vec![0.1, 1.0, 10.0],
        }
    }
}

impl TrainingConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    pub fn with_artifact_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact_path = path.into();
        self
    }

    pub fn with_header_offset(mut self, offset: usize) -> Self {
        self.header_offset = offset;
        self
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn with_n_synthetic(mut self, n: usize) -> Self {
        self.n_synthetic = n;
        self
    }

    pub fn with_kde_bandwidth(mut self, bandwidth: f64) -> Self {
        self.kde_bandwidth = bandwidth;
        self
    }

    pub fn with_cv_folds(mut self, folds: usize) -> Self {
        self.cv_folds = folds;
        self
    }

    pub fn with_alphas(mut self, alphas: Vec<f64>) -> Self {
        self.alphas = alphas;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrainingConfig::default();
        assert_eq!(config.data_path, PathBuf::from("Residential-Building-Data-Set.csv"));
        assert_eq!(config.artifact_path, PathBuf::from("construction_model.json"));
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.random_seed, 42);
        assert_eq!(config.n_synthetic, 300);
        assert_eq!(config.kde_bandwidth, 0.5);
        assert_eq!(config.cv_folds, 5);
    }

    #[test]
    fn test_builder() {
        let config = TrainingConfig::new()
            .with_data_path("data.csv")
            .with_n_synthetic(10)
            .with_random_seed(7);
        assert_eq!(config.data_path, PathBuf::from("data.csv"));
        assert_eq!(config.n_synthetic, 10);
        assert_eq!(config.random_seed, 7);
    }
}
