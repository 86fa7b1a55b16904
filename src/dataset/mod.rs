//! Residential building dataset
//!
//! Schema knowledge for the raw project CSV:
//! - Raw column codes and their semantic names
//! - Leakage columns excluded from the feature frame
//! - Conversion of the loaded frame into feature/target arrays

mod loader;

pub use loader::DatasetLoader;

use crate::error::{CostError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;

/// Default location of the training CSV (relative to the working directory)
pub const DEFAULT_DATASET_PATH: &str = "Residential-Building-Data-Set.csv";

/// Semantic column names used by the rest of the crate
pub mod columns {
    pub const PROJECT_LOCALITY: &str = "Project_Locality";
    pub const TOTAL_FLOOR_AREA: &str = "Total_Floor_Area";
    pub const LOT_AREA: &str = "Lot_Area";
    pub const TOTAL_PRELIM_EST: &str = "Total_Prelim_Est";
    pub const PRELIM_EST_UNIT_COST: &str = "Prelim_Est_Unit_Cost";
    pub const INFLATION_INDEX: &str = "Inflation_Index";
    pub const DURATION: &str = "Duration";
    pub const UNIT_PRICE_START: &str = "Unit_Price_Start";
    pub const ACTUAL_COST: &str = "Actual_Cost";
}

/// Raw column code → semantic name
pub const COLUMN_RENAMES: [(&str, &str); 9] = [
    ("V-1", columns::PROJECT_LOCALITY),
    ("V-2", columns::TOTAL_FLOOR_AREA),
    ("V-3", columns::LOT_AREA),
    ("V-4", columns::TOTAL_PRELIM_EST),
    ("V-5", columns::PRELIM_EST_UNIT_COST),
    ("V-6", columns::INFLATION_INDEX),
    ("V-7", columns::DURATION),
    ("V-8", columns::UNIT_PRICE_START),
    ("V-10", columns::ACTUAL_COST),
];

/// Prediction target
pub const TARGET_COLUMN: &str = columns::ACTUAL_COST;

/// Actual sales price; known only after completion.
pub const LEAKAGE_COLUMN: &str = "V-9";

/// Rename raw column codes to semantic names. Codes absent from the frame are skipped.
pub fn rename_columns(df: &mut DataFrame) -> Result<()> {
    for (code, name) in COLUMN_RENAMES {
        if df.get_column_index(code).is_some() {
            df.rename(code, name.into())?;
        }
    }
    Ok(())
}

/// Features and target extracted from a renamed frame
#[derive(Debug, Clone)]
pub struct CostDataset {
    /// Feature matrix, one row per project
    pub x: Array2<f64>,
    /// Actual final cost per project
    pub y: Array1<f64>,
    /// Feature names in column order of `x`
    pub feature_names: Vec<String>,
}

impl CostDataset {
    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }
}

/// Split a renamed frame into X (everything except the leakage column and the
/// target, in file order) and y.
pub fn split_features_target(df: &DataFrame) -> Result<CostDataset> {
    if df.get_column_index(TARGET_COLUMN).is_none() {
        return Err(CostError::FeatureNotFound(TARGET_COLUMN.to_string()));
    }

    let feature_names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .filter(|name| name != LEAKAGE_COLUMN && name != TARGET_COLUMN)
        .collect();

    let y = Array1::from_vec(column_values(df, TARGET_COLUMN)?);
    let x = columns_to_array2(df, &feature_names)?;

    Ok(CostDataset { x, y, feature_names })
}

fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| CostError::FeatureNotFound(name.to_string()))?;
    let series = column.as_materialized_series().cast(&DataType::Float64)?;
    series
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| {
                CostError::DataError(format!("missing value in column '{}' at row {}", name, row))
            })
        })
        .collect()
}

/// Extract named columns into a row-major array.
fn columns_to_array2(df: &DataFrame, col_names: &[String]) -> Result<Array2<f64>> {
    let col_data: Vec<Vec<f64>> = col_names
        .iter()
        .map(|name| column_values(df, name))
        .collect::<Result<_>>()?;

    Ok(Array2::from_shape_fn((df.height(), col_names.len()), |(r, c)| {
        col_data[c][r]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_frame() -> DataFrame {
        df!(
            "V-1" => &[1.0, 2.0, 3.0],
            "V-2" => &[100.0, 200.0, 300.0],
            "V-4" => &[10.0, 20.0, 30.0],
            "V-9" => &[5.0, 6.0, 7.0],
            "V-11" => &[0.5, 0.6, 0.7],
            "V-10" => &[50.0, 60.0, 70.0]
        )
        .unwrap()
    }

    #[test]
    fn test_rename_columns() {
        let mut df = raw_frame();
        rename_columns(&mut df).unwrap();
        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(
            names,
            vec!["Project_Locality", "Total_Floor_Area", "Total_Prelim_Est", "V-9", "V-11", "Actual_Cost"]
        );
    }

    #[test]
    fn test_split_drops_leakage_and_target() {
        let mut df = raw_frame();
        rename_columns(&mut df).unwrap();
        let data = split_features_target(&df).unwrap();

        assert_eq!(
            data.feature_names,
            vec!["Project_Locality", "Total_Floor_Area", "Total_Prelim_Est", "V-11"]
        );
        assert_eq!(data.n_samples(), 3);
        assert_eq!(data.n_features(), 4);
        assert_eq!(data.x[[1, 1]], 200.0);
        assert_eq!(data.y.to_vec(), vec![50.0, 60.0, 70.0]);
    }

    #[test]
    fn test_split_requires_target() {
        let df = raw_frame();
        let err = split_features_target(&df).unwrap_err();
        assert!(matches!(err, CostError::FeatureNotFound(name) if name == "Actual_Cost"));
    }
}
