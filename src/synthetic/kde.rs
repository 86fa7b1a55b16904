//! Kernel density estimation

use crate::error::{CostError, Result};
use ndarray::Array2;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

/// Kernel shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kernel {
    Gaussian,
}

/// Kernel density estimate over the rows of a matrix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelDensity {
    kernel: Kernel,
    bandwidth: f64,
    data: Option<Array2<f64>>,
}

impl KernelDensity {
    /// Create a new estimator. The bandwidth must be positive.
    pub fn new(kernel: Kernel, bandwidth: f64) -> Result<Self> {
        if !(bandwidth > 0.0) || !bandwidth.is_finite() {
            return Err(CostError::InvalidParameter {
                name: "bandwidth".to_string(),
                value: bandwidth.to_string(),
                reason: "must be a positive finite number".to_string(),
            });
        }
        Ok(Self {
            kernel,
            bandwidth,
            data: None,
        })
    }

    pub fn gaussian(bandwidth: f64) -> Result<Self> {
        Self::new(Kernel::Gaussian, bandwidth)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Store the rows the density is centred on
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        if x.nrows() == 0 {
            return Err(CostError::DataError("cannot fit density on zero rows".to_string()));
        }
        self.data = Some(x.to_owned());
        Ok(self)
    }

    /// Draw `n_samples` rows. Each draw picks a fitted row uniformly and adds
    /// independent N(0, bandwidth²) noise to every dimension.
    pub fn sample(&self, n_samples: usize, seed: u64) -> Result<Array2<f64>> {
        let data = self.data.as_ref().ok_or(CostError::ModelNotFitted)?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let centres: Vec<usize> = (0..n_samples)
            .map(|_| rng.gen_range(0..data.nrows()))
            .collect();

        match self.kernel {
            Kernel::Gaussian => {
                let noise = Normal::new(0.0, self.bandwidth)
                    .map_err(|e| CostError::ComputationError(e.to_string()))?;
                let mut samples = Array2::zeros((n_samples, data.ncols()));
                for (mut row, &centre) in samples.rows_mut().into_iter().zip(centres.iter()) {
                    for (value, &mu) in row.iter_mut().zip(data.row(centre).iter()) {
                        *value = mu + noise.sample(&mut rng);
                    }
                }
                Ok(samples)
            }
        }
    }
}
