//! Price store integration tests: card identity, idempotent price inserts.

mod common;

use common::d;

#[test]
fn init_is_idempotent() {
    let pricer = common::setup_sample_pricer();
    pricer.init().unwrap();
    pricer.init().unwrap();
    assert_eq!(pricer.store().count_prices().unwrap(), 15);
}

#[test]
fn upsert_card_returns_existing_card_for_same_set_and_number() {
    let pricer = common::empty_pricer();
    let store = pricer.store();

    let first = store.upsert_card("Eevee", "SVI", "81/198", None).unwrap();
    let again = store.upsert_card("Eevee (alt name)", "SVI", "81/198", None).unwrap();

    assert_eq!(first.id, again.id);
    assert_eq!(again.name, "Eevee");
    assert_eq!(store.count_cards().unwrap(), 1);
}

#[test]
fn find_or_create_reports_creation_once() {
    let pricer = common::empty_pricer();
    let store = pricer.store();

    let (_, created) = store.find_or_create_card("Eevee", "SVI", "81/198", None).unwrap();
    assert!(created);
    let (_, created) = store.find_or_create_card("Eevee", "SVI", "81/198", None).unwrap();
    assert!(!created);

    // Same number in another set is another card
    let (other, created) = store.find_or_create_card("Eevee", "PAF", "81/198", None).unwrap();
    assert!(created);
    assert_eq!(other.set_code, "PAF");
    assert_eq!(store.count_cards().unwrap(), 2);
}

#[test]
fn rarity_is_backfilled_but_never_overwritten() {
    let pricer = common::empty_pricer();
    let store = pricer.store();

    let card = store.upsert_card("Eevee", "SVI", "81/198", None).unwrap();
    assert_eq!(card.rarity, None);

    let card = store.upsert_card("Eevee", "SVI", "81/198", Some("Common")).unwrap();
    assert_eq!(card.rarity.as_deref(), Some("Common"));

    let card = store.upsert_card("Eevee", "SVI", "81/198", Some("Rare")).unwrap();
    assert_eq!(card.rarity.as_deref(), Some("Common"));

    let stored = store.card_by_id(card.id).unwrap().unwrap();
    assert_eq!(stored.rarity.as_deref(), Some("Common"));
}

#[test]
fn insert_price_if_absent_skips_duplicates() {
    let pricer = common::empty_pricer();
    let store = pricer.store();
    let card = store.upsert_card("Eevee", "SVI", "81/198", None).unwrap();

    assert!(store.insert_price_if_absent(card.id, d("2025-01-01"), "csv", 10.0).unwrap());
    assert!(!store.insert_price_if_absent(card.id, d("2025-01-01"), "csv", 11.0).unwrap());
    // another source on the same day is a separate observation
    assert!(store.insert_price_if_absent(card.id, d("2025-01-01"), "ebay", 11.0).unwrap());

    assert_eq!(store.count_prices().unwrap(), 2);
    let history = pricer.prices().for_card(card.id, None).unwrap();
    let csv_price = history.iter().find(|p| p.source == "csv").unwrap();
    assert_eq!(csv_price.price, 10.0);
}

#[test]
fn card_lookups_return_none_when_absent() {
    let pricer = common::setup_sample_pricer();
    let store = pricer.store();

    assert!(store.card_by_id(999_999).unwrap().is_none());
    assert!(store.find_card("BASE", "999/102").unwrap().is_none());
    assert_eq!(store.find_card("BASE", "4/102").unwrap().unwrap().name, "Charizard");
}

#[test]
fn no_card_has_duplicate_date_and_source() {
    let pricer = common::setup_sample_pricer();
    // re-ingesting the same observations must not duplicate them
    poke_pricer::ingest::ingest_rows(&pricer, common::sample_rows()).unwrap();

    let dups = pricer
        .connection()
        .execute_scalar(
            "SELECT COUNT(*) FROM (SELECT card_id, date, source FROM price_point \
             GROUP BY card_id, date, source HAVING COUNT(*) > 1)",
            &[],
        )
        .unwrap();
    assert_eq!(dups.and_then(|v| v.as_i64()), Some(0));
}

#[test]
fn file_backed_store_persists_between_opens() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("data").join("poke_pricer.duckdb");

    {
        let pricer = poke_pricer::Pricer::builder().db_path(&path).build().unwrap();
        poke_pricer::ingest::ingest_rows(&pricer, common::sample_rows()).unwrap();
    }

    let pricer = poke_pricer::Pricer::builder().db_path(&path).build().unwrap();
    assert_eq!(pricer.store().count_cards().unwrap(), 3);
    assert_eq!(pricer.store().count_prices().unwrap(), 15);
    assert!(pricer.to_string().contains("poke_pricer.duckdb"));
}
