//! Training engine implementation

use crate::dataset::{rename_columns, split_features_target, CostDataset, DatasetLoader};
use crate::error::{CostError, Result};
use crate::export::{ArtifactMetadata, ModelArtifact};
use crate::preprocessing::StandardScaler;
use crate::synthetic::augment;
use super::cross_validation::{take_elements, take_rows, train_test_split};
use super::linear_models::RidgeCV;
use super::TrainingConfig;
use ndarray::{concatenate, Axis};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Pipeline stages, reported to progress observers in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingStage {
    Loading,
    Splitting,
    Augmenting,
    Fitting,
    Scoring,
}

impl TrainingStage {
    pub fn description(self) -> &'static str {
        match self {
            TrainingStage::Loading => "Loading data",
            TrainingStage::Splitting => "Splitting train/test",
            TrainingStage::Augmenting => "Augmenting with synthetic samples",
            TrainingStage::Fitting => "Training ridge regression",
            TrainingStage::Scoring => "Scoring on held-out rows",
        }
    }
}

/// Summary of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub test_r2: f64,
    pub alpha: f64,
    pub cv_r2: f64,
    pub n_train: usize,
    pub n_synthetic: usize,
    pub n_test: usize,
    pub n_features: usize,
    pub training_time_secs: f64,
}

/// Main training engine
pub struct TrainEngine {
    config: TrainingConfig,
    artifact: Option<ModelArtifact>,
    report: Option<TrainingReport>,
}

impl TrainEngine {
    /// Create a new training engine
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            artifact: None,
            report: None,
        }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Load the configured CSV and fit
    pub fn fit(&mut self) -> Result<&ModelArtifact> {
        self.fit_with_progress(|_| {})
    }

    /// Like [`fit`](Self::fit), calling `on_stage` as each stage begins
    pub fn fit_with_progress(&mut self, mut on_stage: impl FnMut(TrainingStage)) -> Result<&ModelArtifact> {
        on_stage(TrainingStage::Loading);
        let mut df = DatasetLoader::new()
            .with_header_offset(self.config.header_offset)
            .load(&self.config.data_path)?;
        rename_columns(&mut df)?;
        let data = split_features_target(&df)?;

        self.fit_dataset_inner(&data, &mut on_stage)
    }

    /// Fit on an already extracted dataset
    pub fn fit_dataset(&mut self, data: &CostDataset) -> Result<&ModelArtifact> {
        self.fit_dataset_inner(data, &mut |_| {})
    }

    fn fit_dataset_inner(
        &mut self,
        data: &CostDataset,
        on_stage: &mut dyn FnMut(TrainingStage),
    ) -> Result<&ModelArtifact> {
        let start = Instant::now();
        let config = &self.config;

        on_stage(TrainingStage::Splitting);
        let split = train_test_split(data.n_samples(), config.test_size, config.random_seed)?;
        let x_train = take_rows(&data.x, &split.train_indices);
        let y_train = take_elements(&data.y, &split.train_indices);
        let x_test = take_rows(&data.x, &split.test_indices);
        let y_test = take_elements(&data.y, &split.test_indices);
        info!(
            train_rows = x_train.nrows(),
            test_rows = x_test.nrows(),
            features = data.n_features(),
            seed = config.random_seed,
            "Split dataset"
        );

        on_stage(TrainingStage::Augmenting);
        let synthetic = augment(
            &x_train,
            &y_train,
            config.n_synthetic,
            config.kde_bandwidth,
            config.random_seed,
        )?;
        let x_final = concatenate(Axis(0), &[x_train.view(), synthetic.x.view()])?;
        let y_final = concatenate(Axis(0), &[y_train.view(), synthetic.y.view()])?;

        on_stage(TrainingStage::Fitting);
        let mut scaler = StandardScaler::new();
        let x_final_scaled = scaler.fit_transform(&x_final)?;
        let mut ridge = RidgeCV::new(config.alphas.clone(), config.cv_folds);
        ridge.fit(&x_final_scaled, &y_final)?;
        let alpha = ridge.alpha.ok_or(CostError::ModelNotFitted)?;
        let cv_r2 = ridge.best_score.ok_or(CostError::ModelNotFitted)?;
        info!(alpha, cv_r2, rows = x_final.nrows(), "Fitted ridge regression");

        on_stage(TrainingStage::Scoring);
        let test_r2 = ridge.score(&scaler.transform(&x_test)?, &y_test)?;
        info!(test_r2, "Scored held-out rows");

        let default_values = x_train
            .mean_axis(Axis(0))
            .ok_or_else(|| CostError::TrainingError("empty training split".to_string()))?
            .to_vec();

        let metadata = ArtifactMetadata::new(test_r2, alpha, cv_r2)
            .with_counts(x_train.nrows(), synthetic.len(), x_test.nrows())
            .with_random_seed(config.random_seed);

        let artifact = ModelArtifact::new(
            metadata,
            ridge.into_model()?,
            scaler,
            default_values,
            data.feature_names.clone(),
        )?;

        self.report = Some(TrainingReport {
            test_r2,
            alpha,
            cv_r2,
            n_train: x_train.nrows(),
            n_synthetic: synthetic.len(),
            n_test: x_test.nrows(),
            n_features: data.n_features(),
            training_time_secs: start.elapsed().as_secs_f64(),
        });
        Ok(self.artifact.insert(artifact))
    }

    /// Fitted artifact, if any
    pub fn artifact(&self) -> Option<&ModelArtifact> {
        self.artifact.as_ref()
    }

    /// Summary of the last fit, if any
    pub fn report(&self) -> Option<&TrainingReport> {
        self.report.as_ref()
    }

    /// Write the fitted artifact to the configured path
    pub fn save(&self) -> Result<&Path> {
        let artifact = self.artifact.as_ref().ok_or(CostError::ModelNotFitted)?;
        artifact.save(&self.config.artifact_path)?;
        Ok(self.config.artifact_path.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    fn dataset() -> CostDataset {
        let x = Array2::from_shape_fn((40, 3), |(i, j)| {
            let i = i as f64;
            match j {
                0 => 100.0 + i * 5.0,
                1 => (i * 1.3).cos() * 10.0,
                _ => (i * 0.37).sin() + 2.0,
            }
        });
        let y: Array1<f64> = x
            .rows()
            .into_iter()
            .map(|r| 3.0 * r[0] - 2.0 * r[1] + 40.0 * r[2])
            .collect();
        CostDataset {
            x,
            y,
            feature_names: vec!["Total_Floor_Area".into(), "Inflation_Index".into(), "V-11".into()],
        }
    }

    #[test]
    fn test_fit_dataset_report() {
        let mut engine = TrainEngine::new(TrainingConfig::new());
        engine.fit_dataset(&dataset()).unwrap();

        let report = engine.report().unwrap();
        assert_eq!(report.n_test, 8);
        assert_eq!(report.n_train, 32);
        assert_eq!(report.n_synthetic, 300);
        assert_eq!(report.n_features, 3);
        assert!(report.test_r2.is_finite() && report.test_r2 <= 1.0);
        assert!([0.1, 1.0, 10.0].contains(&report.alpha));
    }

    #[test]
    fn test_defaults_are_training_means() {
        let data = dataset();
        let mut engine = TrainEngine::new(TrainingConfig::new());
        let artifact = engine.fit_dataset(&data).unwrap().clone();

        let split = train_test_split(data.n_samples(), 0.2, 42).unwrap();
        let x_train = take_rows(&data.x, &split.train_indices);
        let expected = x_train.mean_axis(Axis(0)).unwrap().to_vec();
        assert_eq!(artifact.default_values, expected);
        assert_eq!(artifact.feature_names, data.feature_names);
    }

    #[test]
    fn test_progress_stages_in_order() {
        let mut engine = TrainEngine::new(TrainingConfig::new().with_n_synthetic(20));
        let mut stages = Vec::new();
        engine
            .fit_dataset_inner(&dataset(), &mut |stage| stages.push(stage))
            .unwrap();
        assert_eq!(
            stages,
            vec![
                TrainingStage::Splitting,
                TrainingStage::Augmenting,
                TrainingStage::Fitting,
                TrainingStage::Scoring,
            ]
        );
    }

    #[test]
    fn test_save_before_fit() {
        let engine = TrainEngine::new(TrainingConfig::new());
        assert!(matches!(engine.save(), Err(CostError::ModelNotFitted)));
    }

    #[test]
    fn test_missing_csv_aborts_before_writing() {
        let dir = std::env::temp_dir().join("construction-cost-engine-missing");
        let artifact_path = dir.join("model.json");
        let _ = std::fs::remove_file(&artifact_path);

        let config = TrainingConfig::new()
            .with_data_path(dir.join("absent.csv"))
            .with_artifact_path(&artifact_path);
        let mut engine = TrainEngine::new(config);

        assert!(matches!(engine.fit(), Err(CostError::DatasetNotFound(_))));
        assert!(engine.artifact().is_none());
        assert!(!artifact_path.exists());
    }
}
