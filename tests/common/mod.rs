//! Shared test fixtures for the price tracker integration tests.
//!
//! `setup_sample_pricer()` builds an in-memory database with three cards and
//! five days of prices:
//!
//! | card      | 01-01 | 01-02 | 01-03 | 01-04 | 01-05 |
//! |-----------|-------|-------|-------|-------|-------|
//! | Pikachu   | 10    | 11    | 12    | 13    | 14    |
//! | Charizard | 200   | 190   | 180   | 170   | 160   |
//! | Blastoise | 50    | 50    | 50    | 50    | 60    |

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use poke_pricer::analytics::PriceRecord;
use poke_pricer::ingest::{ingest_rows, PriceRow};
use poke_pricer::Pricer;

pub const SAMPLE_SOURCE: &str = "tcg";

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn empty_pricer() -> Pricer {
    Pricer::builder().in_memory().build().unwrap()
}

pub fn price_row(name: &str, set_code: &str, number: &str, date: &str, price: f64) -> PriceRow {
    PriceRow {
        name: name.to_string(),
        set_code: set_code.to_string(),
        number: number.to_string(),
        date: d(date),
        price,
        source: SAMPLE_SOURCE.to_string(),
        rarity: None,
    }
}

pub fn sample_rows() -> Vec<PriceRow> {
    let series: [(&str, &str, [f64; 5]); 3] = [
        ("Pikachu", "58/102", [10.0, 11.0, 12.0, 13.0, 14.0]),
        ("Charizard", "4/102", [200.0, 190.0, 180.0, 170.0, 160.0]),
        ("Blastoise", "2/102", [50.0, 50.0, 50.0, 50.0, 60.0]),
    ];
    let mut rows = Vec::new();
    for (name, number, prices) in series {
        for (i, price) in prices.iter().enumerate() {
            let date = format!("2025-01-0{}", i + 1);
            rows.push(price_row(name, "BASE", number, &date, *price));
        }
    }
    rows
}

pub fn setup_sample_pricer() -> Pricer {
    let pricer = empty_pricer();
    ingest_rows(&pricer, sample_rows()).unwrap();
    pricer
}

/// A joined price row for building tables without a database.
pub fn record(card_id: i64, name: &str, date: &str, price: f64) -> PriceRecord {
    PriceRecord {
        card_id,
        name: name.to_string(),
        set_code: "TST".to_string(),
        number: card_id.to_string(),
        date: d(date),
        source: SAMPLE_SOURCE.to_string(),
        price,
    }
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Lines of a CSV file, split on commas (test data never quotes).
pub fn read_csv(path: &Path) -> Vec<Vec<String>> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| l.split(',').map(str::to_string).collect())
        .collect()
}
