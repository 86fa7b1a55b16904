//! Inference module
//!
//! Turns a few manual project fields plus an economic outlook into a cost
//! estimate, using the training means for every feature the user does not set.

mod config;
mod engine;
mod features;

pub use config::{format_currency, PredictorConfig};
pub use engine::{Prediction, PredictionRequest, Predictor};
pub use features::{classify_features, EconomicCondition, FeatureRole, ManualField, ProjectInput};
