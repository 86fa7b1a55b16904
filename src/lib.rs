//! Construction cost - residential building cost estimation
//!
//! This crate trains a ridge regression model on the residential building
//! dataset and serves cost estimates from it:
//! - CSV loading with the dataset's banner row and duplicated column codes
//! - Seeded train/test split and KDE-based synthetic augmentation
//! - Standard scaling and cross-validated ridge regression
//! - A single JSON artifact holding model, scaler and per-feature defaults
//! - Predictions with an economic multiplier, currency conversion and exact
//!   per-feature contributions
//!
//! # Modules
//!
//! ## Training
//! - [`dataset`] - CSV loading, column renaming, feature/target split
//! - [`preprocessing`] - Standard scaling
//! - [`synthetic`] - Kernel density estimation and augmentation
//! - [`training`] - Split, cross-validation, ridge regression, pipeline
//! - [`export`] - Model artifact persistence
//!
//! ## Prediction
//! - [`inference`] - Feature assembly and cost prediction
//! - [`explainability`] - Linear contributions
//!
//! ## Services
//! - [`server`] - HTTP server with the estimate form and JSON API
//! - [`cli`] - Command-line interface

pub mod error;

pub mod dataset;
pub mod preprocessing;
pub mod synthetic;
pub mod training;
pub mod export;

pub mod inference;
pub mod explainability;

pub mod server;
pub mod cli;

pub use error::{CostError, Result};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{CostError, Result};
    pub use crate::dataset::{CostDataset, DatasetLoader};
    pub use crate::preprocessing::StandardScaler;
    pub use crate::training::{RidgeCV, RidgeRegression, TrainEngine, TrainingConfig, TrainingReport};
    pub use crate::export::ModelArtifact;
    pub use crate::inference::{
        EconomicCondition, Prediction, PredictionRequest, Predictor, PredictorConfig, ProjectInput,
    };
    pub use crate::explainability::{FeatureContribution, LocalExplanation};
}
