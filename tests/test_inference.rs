//! Integration test: prediction against a freshly trained artifact

mod common;

use common::{scratch_dir, write_fixture_csv};
use construction_cost::export::ModelArtifact;
use construction_cost::inference::{
    EconomicCondition, FeatureRole, ManualField, PredictionRequest, Predictor, PredictorConfig,
};
use construction_cost::training::{TrainEngine, TrainingConfig};
use construction_cost::CostError;

fn trained_predictor(name: &str) -> Predictor {
    let dir = scratch_dir(name);
    let config = TrainingConfig::new()
        .with_data_path(write_fixture_csv(&dir, 50))
        .with_artifact_path(dir.join("construction_model.json"));
    let mut engine = TrainEngine::new(config);
    engine.fit().unwrap();
    let path = engine.save().unwrap().to_path_buf();
    Predictor::load(&path).unwrap()
}

#[test]
fn test_default_input_matches_direct_prediction() {
    let predictor = trained_predictor("default-parity");
    let input = predictor.default_input().unwrap();
    let prediction = predictor.predict(&PredictionRequest::new(input)).unwrap();

    let artifact = predictor.artifact();
    let default_row = ndarray::Array1::from_vec(artifact.default_values.clone());
    let scaled = artifact.scaler.transform_row(default_row.view()).unwrap();
    let direct = artifact.model.predict_row(scaled.view()).unwrap();

    let tolerance = 1e-9 * direct.abs().max(1.0);
    assert!((prediction.raw_prediction - direct).abs() < tolerance);
    assert_eq!(prediction.multiplier, 1.0);
}

#[test]
fn test_contributions_recompose_displayed_cost() {
    let predictor = trained_predictor("recompose")
        .with_config(PredictorConfig::new().with_currency_rate(0.85).with_currency_symbol("€"));
    let mut input = predictor.default_input().unwrap();
    input.set(ManualField::TotalFloorArea, 2500.0);
    input.set(ManualField::Duration, 18.0);

    for economy in EconomicCondition::ALL {
        let request = PredictionRequest::new(input.clone()).with_economy(economy);
        let prediction = predictor.predict(&request).unwrap();

        let explanation = &prediction.explanation;
        let recomposed = (explanation.sum_contributions() + explanation.base_value) * prediction.currency_rate;
        let tolerance = 1e-9 * prediction.predicted_cost.abs().max(1.0);
        assert!((recomposed - prediction.predicted_cost).abs() < tolerance);
        assert!(prediction.formatted_cost.contains('€'));
        assert_eq!(prediction.top_contributions().len(), 8);
    }
}

#[test]
fn test_adjusted_contributions_scale_with_multiplier() {
    let predictor = trained_predictor("monotone");
    let input = predictor.default_input().unwrap();
    let artifact = predictor.artifact();

    let predictions: Vec<_> = EconomicCondition::ALL
        .iter()
        .map(|&economy| {
            predictor
                .predict(&PredictionRequest::new(input.clone()).with_economy(economy))
                .unwrap()
        })
        .collect();

    for (idx, role) in artifact.feature_roles.iter().enumerate() {
        let values: Vec<f64> = predictions
            .iter()
            .map(|p| p.explanation.contributions[idx].contribution)
            .collect();
        match role {
            FeatureRole::Manual(_) => {
                assert_eq!(values[0], values[1]);
                assert_eq!(values[1], values[2]);
            }
            FeatureRole::Adjusted => {
                let coef = artifact.coefficients().unwrap()[idx];
                let increasing = coef * artifact.default_values[idx] >= 0.0;
                if increasing {
                    assert!(values[0] <= values[1] && values[1] <= values[2]);
                } else {
                    assert!(values[0] >= values[1] && values[1] >= values[2]);
                }
            }
        }
    }
}

#[test]
fn test_recession_then_inflation_does_not_restore_row() {
    let predictor = trained_predictor("no-inverse");
    let input = predictor.default_input().unwrap();
    let stable = predictor.assemble_features(&input, EconomicCondition::Stable);
    let recession = predictor.assemble_features(&input, EconomicCondition::Recession);
    let idx = predictor.artifact().feature_index("Inflation_Index").unwrap();

    let round_trip = recession[idx] * EconomicCondition::Inflationary.multiplier();
    assert!((round_trip - stable[idx]).abs() > 1e-6);
}

#[test]
fn test_missing_artifact_aborts_cleanly() {
    let dir = scratch_dir("missing-artifact");
    let err = Predictor::load(&dir.join("construction_model.json")).unwrap_err();
    assert!(matches!(err, CostError::ArtifactNotFound(_)));
    assert!(err.is_missing_input());
    assert!(ModelArtifact::load(&dir.join("nothing.json")).is_err());
}
