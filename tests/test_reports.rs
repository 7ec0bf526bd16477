mod common;

use poke_pricer::analytics::{MoverRow, PriceTable};
use poke_pricer::export::CsvRow;
use poke_pricer::reports::{
    find_duplicates, find_stale_cards, latest_snapshot, write_daily_reports, write_qa_bundle,
    DuplicateRow, SnapshotRow, StaleCardRow, DEFAULT_STALE_DAYS,
};

#[test]
fn daily_reports_write_three_files() {
    let tmp = tempfile::tempdir().unwrap();
    let out_dir = tmp.path().join("reports");
    let pricer = common::setup_sample_pricer();

    let paths = write_daily_reports(&pricer, &out_dir, 5, None).unwrap();
    let names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["catalog_summary.csv", "top_movers.csv", "latest_prices.csv"]);

    let summary = common::read_csv(&paths[0]);
    assert_eq!(
        summary,
        vec![
            vec!["total_cards", "total_prices", "min_date", "max_date", "sources"],
            vec!["3", "15", "2025-01-01", "2025-01-05", "tcg"],
        ]
    );

    let movers = common::read_csv(&paths[1]);
    assert_eq!(movers[0], MoverRow::COLUMNS);
    assert_eq!(movers.len(), 1 + 6);

    let latest = common::read_csv(&paths[2]);
    assert_eq!(latest[0], SnapshotRow::COLUMNS);
    assert_eq!(latest.len(), 1 + 3);
    assert!(latest[1..].iter().all(|row| row[6] == "2025-01-05"));
}

#[test]
fn daily_reports_on_empty_store_are_header_only() {
    let tmp = tempfile::tempdir().unwrap();
    let pricer = common::empty_pricer();

    let paths = write_daily_reports(&pricer, tmp.path(), 5, None).unwrap();
    assert_eq!(common::read_csv(&paths[0])[1], vec!["0", "0", "", "", ""]);
    assert_eq!(common::read_csv(&paths[1]).len(), 1);
    assert_eq!(common::read_csv(&paths[2]).len(), 1);
}

#[test]
fn latest_snapshot_keeps_only_the_max_date() {
    let table = PriceTable::new(vec![
        common::record(1, "Mew", "2025-01-01", 10.0),
        common::record(1, "Mew", "2025-01-03", 12.0),
        common::record(2, "Eevee", "2025-01-02", 4.0),
    ]);
    let snapshot = latest_snapshot(&table);
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].name, "Mew");
    assert_eq!(snapshot[0].price, 12.0);

    assert!(latest_snapshot(&PriceTable::default()).is_empty());
}

#[test]
fn duplicates_are_grouped_by_card_date_and_source() {
    let table = PriceTable::new(vec![
        common::record(1, "Mew", "2025-01-01", 10.0),
        common::record(1, "Mew", "2025-01-01", 11.0),
        common::record(1, "Mew", "2025-01-02", 12.0),
        common::record(2, "Eevee", "2025-01-01", 4.0),
    ]);
    let dups = find_duplicates(&table);
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].card_id, 1);
    assert_eq!(dups[0].date, common::d("2025-01-01"));
    assert_eq!(dups[0].count, 2);

    // the store itself never holds duplicates
    let stored = common::setup_sample_pricer().load_price_table().unwrap();
    assert!(find_duplicates(&stored).is_empty());
}

#[test]
fn stale_cards_are_measured_against_the_dataset_max_date() {
    let table = PriceTable::new(vec![
        common::record(1, "Mew", "2025-01-01", 10.0),
        common::record(2, "Eevee", "2025-01-20", 4.0),
        common::record(3, "Snorlax", "2025-02-15", 8.0),
    ]);

    let stale = find_stale_cards(&table, DEFAULT_STALE_DAYS);
    assert_eq!(stale.len(), 1);
    assert_eq!(stale[0].name, "Mew");
    assert_eq!(stale[0].age_days, 45);

    let stale = find_stale_cards(&table, 10);
    let names: Vec<&str> = stale.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Mew", "Eevee"]);
    assert_eq!(stale[1].age_days, 26);

    // exactly `days` old is not stale
    assert!(find_stale_cards(&table, 45).is_empty());
}

#[test]
fn qa_bundle_writes_summary_duplicates_and_stale_files() {
    let tmp = tempfile::tempdir().unwrap();
    let pricer = common::setup_sample_pricer();

    let paths = write_qa_bundle(&pricer, tmp.path(), DEFAULT_STALE_DAYS).unwrap();
    assert_eq!(paths.len(), 3);
    assert!(paths[0].ends_with("qa_summary.csv"));

    assert_eq!(common::read_csv(&paths[0]).len(), 2);
    assert_eq!(common::read_csv(&paths[1]), vec![DuplicateRow::COLUMNS.to_vec()]);
    assert_eq!(common::read_csv(&paths[2]), vec![StaleCardRow::COLUMNS.to_vec()]);
}
