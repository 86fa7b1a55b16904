//! Model training module
//!
//! The offline half of the estimator:
//! - Seeded hold-out split and K-fold cross-validation
//! - Ridge regression with a cross-validated alpha
//! - The end-to-end pipeline that produces a [`ModelArtifact`](crate::export::ModelArtifact)

mod config;
mod engine;
pub mod cross_validation;
pub mod linear_models;

pub use config::TrainingConfig;
pub use engine::{TrainEngine, TrainingReport, TrainingStage};
pub use cross_validation::{train_test_split, CrossValidator, CVStrategy, CVSplit, CVResults};
pub use linear_models::{r2_score, RidgeCV, RidgeRegression};
