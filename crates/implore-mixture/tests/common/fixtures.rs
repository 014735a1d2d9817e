//! Test fixture loading and synthetic model builders

#![allow(dead_code)]

use std::path::PathBuf;

use implore_io::DataTable;
use implore_mixture::{ModelResult, PlotConfig};

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a model from `<dir>/observed.csv` and `<dir>/posterior.csv`
pub fn load_model_fixture(dir: &str) -> ModelResult {
    let observed = implore_io::read_table(fixture_path(&format!("{}/observed.csv", dir)))
        .unwrap_or_else(|e| panic!("Failed to load observed fixture {}: {}", dir, e));
    let posterior = implore_io::read_table(fixture_path(&format!("{}/posterior.csv", dir)))
        .unwrap_or_else(|e| panic!("Failed to load posterior fixture {}: {}", dir, e));
    ModelResult::new(dir, observed, posterior).unwrap()
}

/// Build a table from named float columns
pub fn table(columns: Vec<(&str, Vec<f64>)>) -> DataTable {
    DataTable::from_columns(columns).unwrap()
}

/// Build a model from named observed and posterior columns
pub fn model(
    name: &str,
    observed: Vec<(&str, Vec<f64>)>,
    posterior: Vec<(&str, Vec<f64>)>,
) -> ModelResult {
    ModelResult::new(name, table(observed), table(posterior)).unwrap()
}

/// A model with one observed variable per name and two classes
pub fn model_with_variables(name: &str, variables: &[&str]) -> ModelResult {
    let observed = variables
        .iter()
        .enumerate()
        .map(|(i, v)| (*v, vec![1.0 + i as f64, 2.5, 4.0, 3.0]))
        .collect();
    model(
        name,
        observed,
        vec![
            ("A", vec![0.9, 0.6, 0.2, 0.5]),
            ("B", vec![0.1, 0.4, 0.8, 0.5]),
        ],
    )
}

/// Two well-separated classes over `n` cases with known probabilities.
///
/// Case `i` sits at `x = i / 5` and belongs to class A with probability
/// falling linearly from 0.95 to 0.05.
pub fn two_class_model(n: usize) -> ModelResult {
    let x: Vec<f64> = (0..n).map(|i| i as f64 / 5.0).collect();
    let a: Vec<f64> = (0..n)
        .map(|i| 0.95 - 0.9 * i as f64 / (n - 1) as f64)
        .collect();
    let b: Vec<f64> = a.iter().map(|p| 1.0 - p).collect();
    model("two_class", vec![("x", x)], vec![("A", a), ("B", b)])
}

/// The three-case scenario: cases 1 and 3 in A, case 2 in B
pub fn three_case_model() -> ModelResult {
    model(
        "three_case",
        vec![("x", vec![1.0, 2.0, 3.0])],
        vec![("A", vec![1.0, 0.0, 1.0]), ("B", vec![0.0, 1.0, 0.0])],
    )
}

/// Default configuration without the display side effect
pub fn quiet_config() -> PlotConfig {
    PlotConfig::new().without_display()
}
