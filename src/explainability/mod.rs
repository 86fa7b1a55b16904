//! Model explainability module
//!
//! Per-feature contributions of a linear model to a single prediction.

mod contributions;

pub use contributions::{explain_linear, FeatureContribution, LocalExplanation};
