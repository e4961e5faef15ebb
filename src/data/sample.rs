//! Synthetic museum-object sample generation.
//!
//! Produces a CSV in the same shape as the real export so the whole pipeline
//! can be exercised without the dataset. The generator is deterministic for a
//! given seed.
//!
//! Model:
//! - each department has a baseline log-odds of an acquisition being a gift
//! - gift log-odds drift upwards by `GIFT_TREND_PER_DECADE` per decade
//! - each (department, decade) cell gets a Normal shock so the ratios vary
//! - non-gifts are purchases with probability `PURCHASE_SHARE`, else "Other"
//! - a small share of rows carry missing, malformed or pre-1900 years

use std::fs::File;
use std::path::Path;

use chrono::Datelike;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{AcquisitionType, ColumnNames, RawRecord};
use crate::error::AppError;
use crate::transform::decade_of;

/// `(department, baseline gift log-odds)`.
const DEPARTMENTS: &[(&str, f64)] = &[
    ("American Decorative Arts", 0.9),
    ("Arms and Armor", -0.4),
    ("Asian Art", 0.2),
    ("Drawings and Prints", 1.2),
    ("Egyptian Art", -1.0),
    ("European Paintings", 0.5),
    ("Modern and Contemporary Art", 0.7),
    ("Photographs", -0.2),
];

const GIFT_TREND_PER_DECADE: f64 = 0.08;
const CELL_SHOCK_SD: f64 = 0.35;
const PURCHASE_SHARE: f64 = 0.7;

const MISSING_YEAR_RATE: f64 = 0.04;
const MALFORMED_YEAR_RATE: f64 = 0.01;
const EARLY_YEAR_RATE: f64 = 0.03;

const DONORS: &[&str] = &[
    "Jane Doe",
    "John Roe",
    "the Estate of Mary Smith",
    "Mr. and Mrs. Charles Wright",
    "the Hartley Foundation",
    "Anonymous",
];

const FUNDS: &[&str] = &["Rogers Fund", "Fletcher Fund", "Harris Brisbane Dick Fund", "Dodge Fund"];

/// Options for `generate_sample`.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub count: usize,
    pub seed: u64,
    pub first_year: i32,
    /// Last accession year; defaults to the current calendar year.
    pub last_year: Option<i32>,
}

/// Generate `count` raw records.
pub fn generate_sample(config: &SampleConfig) -> Result<Vec<RawRecord>, AppError> {
    if config.count == 0 {
        return Err(AppError::new(2, "Sample count must be > 0."));
    }
    let last_year = config
        .last_year
        .unwrap_or_else(|| chrono::Local::now().year());
    if last_year < config.first_year {
        return Err(AppError::new(2, "Invalid year range for sample generation."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let shock = shock_distribution(CELL_SHOCK_SD)?;

    // Draw every cell shock up front so the table does not depend on the
    // order in which records happen to visit cells.
    let first_decade = decade_of(config.first_year);
    let n_decades = ((decade_of(last_year) - first_decade) / 10 + 1) as usize;
    let shocks: Vec<Vec<f64>> = DEPARTMENTS
        .iter()
        .map(|_| (0..n_decades).map(|_| shock.sample(&mut rng)).collect())
        .collect();

    let mut out = Vec::with_capacity(config.count);
    for i in 0..config.count {
        let dept_idx = rng.gen_range(0..DEPARTMENTS.len());
        let (department, base) = DEPARTMENTS[dept_idx];
        let year = rng.gen_range(config.first_year..=last_year);
        let decade_idx = ((decade_of(year) - first_decade) / 10) as usize;

        let logit = base
            + GIFT_TREND_PER_DECADE * decade_idx as f64
            + shocks[dept_idx][decade_idx];
        let p_gift = 1.0 / (1.0 + (-logit).exp());

        let label = if rng.gen_bool(p_gift) {
            AcquisitionType::Philanthropy
        } else if rng.gen_bool(PURCHASE_SHARE) {
            AcquisitionType::Purchase
        } else {
            AcquisitionType::Other
        };

        out.push(RawRecord {
            object_id: (100_000 + i).to_string(),
            department: department.to_string(),
            credit_line: credit_line(&mut rng, label, year),
            accession_year: year_cell(&mut rng, year),
        });
    }

    Ok(out)
}

fn shock_distribution(sd: f64) -> Result<Normal<f64>, AppError> {
    Normal::new(0.0, sd).map_err(|e| AppError::new(2, format!("Invalid sample noise setting: {e}")))
}

fn credit_line(rng: &mut StdRng, label: AcquisitionType, year: i32) -> Option<String> {
    let donor = DONORS[rng.gen_range(0..DONORS.len())];
    let fund = FUNDS[rng.gen_range(0..FUNDS.len())];
    let text = match (label, rng.gen_range(0..3)) {
        (AcquisitionType::Philanthropy, 0) => format!("Gift of {donor}, {year}"),
        (AcquisitionType::Philanthropy, 1) => format!("Bequest of {donor}, {year}"),
        (AcquisitionType::Philanthropy, _) => format!("Purchase, Gift of {donor}, {year}"),
        (AcquisitionType::Purchase, 0) => format!("Purchase, {fund}, {year}"),
        (AcquisitionType::Purchase, _) => format!("{fund}, purchased {year}"),
        (AcquisitionType::Other, 0) => return None,
        (AcquisitionType::Other, _) => format!("{fund}, {year}"),
    };
    Some(text)
}

fn year_cell(rng: &mut StdRng, year: i32) -> Option<String> {
    let roll = rng.gen_range(0.0..1.0);
    if roll < MISSING_YEAR_RATE {
        None
    } else if roll < MISSING_YEAR_RATE + MALFORMED_YEAR_RATE {
        Some(format!("ca. {year}"))
    } else if roll < MISSING_YEAR_RATE + MALFORMED_YEAR_RATE + EARLY_YEAR_RATE {
        Some(rng.gen_range(1850..1900).to_string())
    } else {
        Some(year.to_string())
    }
}

/// Write records as a CSV using the given column names.
pub fn write_sample_csv(path: &Path, records: &[RawRecord], columns: &ColumnNames) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create sample CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    let write_err = |e: csv::Error| AppError::new(2, format!("Failed to write sample CSV: {e}"));

    writer
        .write_record([
            columns.object_id.as_str(),
            columns.department.as_str(),
            columns.credit_line.as_str(),
            columns.accession_year.as_str(),
        ])
        .map_err(write_err)?;

    for r in records {
        writer
            .write_record([
                r.object_id.as_str(),
                r.department.as_str(),
                r.credit_line.as_deref().unwrap_or(""),
                r.accession_year.as_deref().unwrap_or(""),
            ])
            .map_err(write_err)?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush sample CSV: {e}")))?;
    Ok(())
}
