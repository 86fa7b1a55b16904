//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::PathBuf;

/// Column codes on the header line, including a duplicated lag code
pub const HEADER_CODES: [&str; 14] = [
    "START YEAR", "START QUARTER", "V-1", "V-2", "V-3", "V-4", "V-5", "V-6", "V-7", "V-8", "V-11",
    "V-11", "V-9", "V-10",
];

/// Feature order expected after renaming and dropping V-9 / Actual_Cost
pub const FEATURE_ORDER: [&str; 12] = [
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

/// Fresh scratch directory under the system temp dir
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("construction-cost-it-{}", name));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write a dataset shaped like the real file: banner line, code line, rows
pub fn write_fixture_csv(dir: &std::path::Path, n_rows: usize) -> PathBuf {
    let mut csv = String::new();
    csv.push_str("PROJECT DATES,,PHYSICAL AND FINANCIAL VARIABLES,,,,,,,,ECONOMIC VARIABLES,,OUTPUTS,\n");
    csv.push_str(&HEADER_CODES.join(","));
    csv.push('\n');

    for i in 0..n_rows {
        let t = i as f64;
        let year = 85.0 + (i % 6) as f64;
        let quarter = 1.0 + (i % 4) as f64;
        let locality = 1.0 + (i % 20) as f64;
        let floor_area = 900.0 + 37.0 * t + 25.0 * (t * 0.9).sin();
        let lot_area = 300.0 + 11.0 * ((i * 7) % 13) as f64;
        let unit_cost = 150.0 + 4.0 * (t * 0.5).cos() + (i % 5) as f64;
        let prelim_est = floor_area * unit_cost / 10.0;
        let inflation = 120.0 + 1.5 * t;
        let duration = 4.0 + (i % 12) as f64;
        let unit_price = 1000.0 + 12.0 * t + 30.0 * (t * 1.7).sin();
        let lag_a = 500.0 + 3.0 * t + 8.0 * (t * 0.3).cos();
        let lag_b = 480.0 + 2.5 * t;
        let cost = 0.08 * prelim_est + 0.15 * floor_area + 0.4 * unit_price - 2.0 * locality
            + 1.2 * inflation
            + 3.0 * (t * 2.3).sin();
        let sale = cost * 1.35;

        let values = [
            year, quarter, locality, floor_area, lot_area, prelim_est, unit_cost, inflation,
            duration, unit_price, lag_a, lag_b, sale, cost,
        ];
        let line: Vec<String> = values.iter().map(|v| format!("{}", v)).collect();
        writeln!(csv, "{}", line.join(",")).unwrap();
    }

    let path = dir.join("Residential-Building-Data-Set.csv");
    std::fs::write(&path, csv).unwrap();
    path
}
