//! Deterministic demo dataset.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::error::Result;
use crate::ingest::{ingest_rows, PriceRow};
use crate::Pricer;

pub const DEFAULT_SEED: u64 = 42;
pub const DEMO_DAYS: i64 = 30;
pub const DEMO_SOURCE: &str = "demo";

const DEMO_CARDS: [(&str, &str, &str, &str); 3] = [
    ("Pikachu", "BASE", "58/102", "Common"),
    ("Charizard", "BASE", "4/102", "Holo Rare"),
    ("Blastoise", "BASE", "2/102", "Holo Rare"),
];

/// Seed three demo cards with daily prices for the 30 days ending `today`.
///
/// A store that already holds cards is left alone. Returns the resulting
/// `(cards, prices)` counts.
pub fn seed_demo(pricer: &Pricer, seed: u64, today: NaiveDate) -> Result<(i64, i64)> {
    let store = pricer.store();
    if store.count_cards()? > 0 {
        return Ok((store.count_cards()?, store.count_prices()?));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let start = today - Duration::days(DEMO_DAYS - 1);
    let mut rows = Vec::with_capacity(DEMO_CARDS.len() * DEMO_DAYS as usize);

    for (name, set_code, number, rarity) in DEMO_CARDS {
        let base: f64 = rng.gen_range(20.0..300.0);
        for i in 0..DEMO_DAYS {
            let factor = 0.95 + 0.1 * rng.gen::<f64>();
            rows.push(PriceRow {
                name: name.to_string(),
                set_code: set_code.to_string(),
                number: number.to_string(),
                date: start + Duration::days(i),
                price: (base * factor * 100.0).round() / 100.0,
                source: DEMO_SOURCE.to_string(),
                rarity: Some(rarity.to_string()),
            });
        }
    }

    let summary = ingest_rows(pricer, rows)?;
    summary.log_summary("demo seed");
    info!(seed, %today, "demo data seeded");

    Ok((store.count_cards()?, store.count_prices()?))
}
