//! Synthetic data generation module
//!
//! Enlarges a regression training set with rows drawn from a kernel density
//! estimate of the joint (features, target) distribution.

mod kde;

pub use kde::{Kernel, KernelDensity};

use crate::error::Result;
use crate::preprocessing::{hstack_target, split_target, StandardScaler};
use ndarray::{Array1, Array2};
use tracing::info;

/// Rows generated by [`augment`], in original units
#[derive(Debug, Clone)]
pub struct SyntheticSamples {
    pub x: Array2<f64>,
    pub y: Array1<f64>,
}

impl SyntheticSamples {
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

/// Draw `n_samples` synthetic rows.
///
/// `[x | y]` is standardized with a scaler private to this call, a Gaussian KDE
/// is fitted in the standardized space, and the draws are mapped back to the
/// original units before being split into features and target again.
pub fn augment(
    x: &Array2<f64>,
    y: &Array1<f64>,
    n_samples: usize,
    bandwidth: f64,
    seed: u64,
) -> Result<SyntheticSamples> {
    let combined = hstack_target(x, y)?;

    let mut scaler = StandardScaler::new();
    let standardized = scaler.fit_transform(&combined)?;

    let mut kde = KernelDensity::gaussian(bandwidth)?;
    kde.fit(&standardized)?;

    let drawn = kde.sample(n_samples, seed)?;
    let restored = scaler.inverse_transform(&drawn)?;
    let (x_syn, y_syn) = split_target(&restored);

    info!(
        n_samples,
        bandwidth = kde.bandwidth(),
        source_rows = x.nrows(),
        "Generated synthetic samples"
    );

    Ok(SyntheticSamples { x: x_syn, y: y_syn })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Axis;

    #[test]
    fn test_augment_shapes() {
        let x = Array2::from_shape_fn((20, 3), |(i, j)| (i * (j + 1)) as f64);
        let y: Array1<f64> = (0..20).map(|i| i as f64 * 2.0).collect();

        let samples = augment(&x, &y, 300, 0.5, 42).unwrap();
        assert_eq!(samples.x.dim(), (300, 3));
        assert_eq!(samples.len(), 300);
    }

    #[test]
    fn test_augment_stays_in_original_units() {
        // Large offsets: samples must come back near the data, not near zero
        let x = Array2::from_shape_fn((50, 1), |(i, _)| 1_000.0 + i as f64);
        let y: Array1<f64> = (0..50).map(|i| 50_000.0 + 10.0 * i as f64).collect();

        let samples = augment(&x, &y, 2000, 0.5, 7).unwrap();
        let x_mean = samples.x.mean_axis(Axis(0)).unwrap()[0];
        let y_mean = samples.y.mean().unwrap();
        assert!((x_mean - 1_024.5).abs() < 2.0, "x mean = {}", x_mean);
        assert!((y_mean - 50_245.0).abs() < 20.0, "y mean = {}", y_mean);
    }

    #[test]
    fn test_augment_is_deterministic() {
        let x = Array2::from_shape_fn((10, 2), |(i, j)| (i + j) as f64);
        let y: Array1<f64> = (0..10).map(|i| i as f64).collect();
        let a = augment(&x, &y, 50, 0.5, 42).unwrap();
        let b = augment(&x, &y, 50, 0.5, 42).unwrap();
        assert_eq!(a.x, b.x);
        assert_eq!(a.y, b.y);
    }
}
