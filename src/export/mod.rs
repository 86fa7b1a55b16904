//! Model export module
//!
//! The trained model, its scaler and the predictor defaults are persisted
//! together as a single JSON artifact.

mod artifact;

pub use artifact::{ArtifactMetadata, ModelArtifact, FORMAT_VERSION};

/// Default artifact location (relative to the working directory)
///
/// The artifact is serde JSON, not a joblib pickle, hence the `.json` name
/// in place of `construction_model.joblib`. Joblib files are not read; train
/// again to produce a JSON artifact.
pub const DEFAULT_ARTIFACT_PATH: &str = "construction_model.json";

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_default_artifact_is_json() {
        let path = Path::new(DEFAULT_ARTIFACT_PATH);
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
        assert_eq!(path.file_stem().and_then(|s| s.to_str()), Some("construction_model"));
    }
}
