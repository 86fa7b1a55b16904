use criterion::{black_box, criterion_group, criterion_main, Criterion};
use construction_cost::export::{ArtifactMetadata, ModelArtifact};
use construction_cost::inference::{EconomicCondition, PredictionRequest, Predictor};
use construction_cost::preprocessing::StandardScaler;
use construction_cost::training::RidgeRegression;
use ndarray::{Array1, Array2, Axis};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

const FEATURES: [&str; 12] = [
    "START YEAR",
    "START QUARTER",
    "Project_Locality",
    "Total_Floor_Area",
    "Lot_Area",
    "Total_Prelim_Est",
    "Prelim_Est_Unit_Cost",
    "Inflation_Index",
    "Duration",
    "Unit_Price_Start",
    "V-11",
    "V-11.1",
];

fn create_predictor(n_rows: usize) -> Predictor {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let x = Array2::from_shape_fn((n_rows, FEATURES.len()), |_| rng.gen::<f64>() * 100.0);
    let y: Array1<f64> = x.rows().into_iter().map(|r| r.sum() + rng.gen::<f64>()).collect();

    let mut scaler = StandardScaler::new();
    let xs = scaler.fit_transform(&x).unwrap();
    let mut model = RidgeRegression::new(1.0);
    model.fit(&xs, &y).unwrap();
    let defaults = x.mean_axis(Axis(0)).unwrap().to_vec();

    let artifact = ModelArtifact::new(
        ArtifactMetadata::new(0.0, 1.0, 0.0),
        model,
        scaler,
        defaults,
        FEATURES.iter().map(|s| s.to_string()).collect(),
    )
    .unwrap();
    Predictor::new(artifact)
}

fn bench_prediction(c: &mut Criterion) {
    let predictor = create_predictor(400);
    let input = predictor.default_input().unwrap();
    let request = PredictionRequest::new(input.clone()).with_economy(EconomicCondition::Inflationary);

    let mut group = c.benchmark_group("prediction");
    group.bench_function("predict_single", |b| {
        b.iter(|| predictor.predict(black_box(&request)).unwrap())
    });
    group.bench_function("assemble_features", |b| {
        b.iter(|| predictor.assemble_features(black_box(&input), EconomicCondition::Recession))
    });
    group.finish();
}

criterion_group!(benches, bench_prediction);
criterion_main!(benches);
