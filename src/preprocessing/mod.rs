//! Data preprocessing module
//!
//! Feature scaling shared by the trainer (augmentation and model input) and
//! the predictor (single-row scaling with the stored parameters).

mod scaler;

pub use scaler::StandardScaler;

use ndarray::{concatenate, Array1, Array2, Axis};

use crate::error::Result;

/// Append the target as a trailing column: `[X | y]`
pub fn hstack_target(x: &Array2<f64>, y: &Array1<f64>) -> Result<Array2<f64>> {
    let y_col = y.view().insert_axis(Axis(1));
    Ok(concatenate(Axis(1), &[x.view(), y_col])?)
}

/// Inverse of [`hstack_target`]: split off the trailing column
pub fn split_target(xy: &Array2<f64>) -> (Array2<f64>, Array1<f64>) {
    let n_features = xy.ncols().saturating_sub(1);
    let x = xy.slice(ndarray::s![.., ..n_features]).to_owned();
    let y = xy.column(n_features).to_owned();
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_hstack_and_split_target() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let y = array![10.0, 20.0];
        let xy = hstack_target(&x, &y).unwrap();
        assert_eq!(xy, array![[1.0, 2.0, 10.0], [3.0, 4.0, 20.0]]);

        let (x2, y2) = split_target(&xy);
        assert_eq!(x2, x);
        assert_eq!(y2, y);
    }
}
