//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const DISTRICTS: [&str; 3] = ["east", "north", "south"];

/// Housing rows as CSV text: bedrooms, bathrooms, sqft_living, district, price.
///
/// Price is linear in the features plus a small deterministic wobble.
pub fn housing_csv(n: usize) -> String {
    let mut csv = String::from("bedrooms,bathrooms,sqft_living,district,price\n");
    for i in 0..n {
        let bedrooms = 1 + i % 5;
        let bathrooms = 1.0 + (i % 4) as f64 * 0.5;
        let sqft = 600 + 23 * i + ((i * 7) % 13) * 10;
        let district = DISTRICTS[i % 3];
        let bump = match district {
            "east" => 0.0,
            "north" => 25_000.0,
            _ => 40_000.0,
        };
        let noise = ((i * 37) % 17) as f64 * 1_000.0 - 8_000.0;
        let price = 50_000.0
            + 150.0 * sqft as f64
            + 10_000.0 * bedrooms as f64
            + 8_000.0 * bathrooms
            + bump
            + noise;
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            bedrooms, bathrooms, sqft, district, price
        ));
    }
    csv
}

pub fn write_housing_csv(dir: &Path, n: usize) -> PathBuf {
    let path = dir.join("houses.csv");
    std::fs::write(&path, housing_csv(n)).unwrap();
    path
}
