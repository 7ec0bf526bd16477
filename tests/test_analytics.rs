mod common;

use poke_pricer::analytics::{
    backtest_momentum_topk, compute_signals, compute_top_movers, compute_window_movers,
    scan_anomalies, AnomalyFlag, AnomalyRow, BacktestRow, Bucket, MoverRow, PriceTable,
    WindowMoverRow,
};
use poke_pricer::export::{write_records, write_rows, CsvRow};
use poke_pricer::ingest::ingest_rows;
use poke_pricer::PricerError;

fn sample_table() -> PriceTable {
    common::setup_sample_pricer().load_price_table().unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ---------------------------------------------------------------------------
// Price table
// ---------------------------------------------------------------------------

#[test]
fn price_table_is_grouped_by_card_in_date_order() {
    let table = sample_table();
    assert_eq!(table.len(), 15);
    assert_eq!(table.max_date(), Some(common::d("2025-01-05")));

    let groups: Vec<_> = table.by_card().collect();
    assert_eq!(groups.len(), 3);
    for rows in groups {
        assert_eq!(rows.len(), 5);
        assert!(rows.windows(2).all(|w| w[0].date < w[1].date));
    }
}

#[test]
fn price_table_new_sorts_unordered_records() {
    let table = PriceTable::new(vec![
        common::record(2, "B", "2025-01-02", 2.0),
        common::record(1, "A", "2025-01-03", 3.0),
        common::record(1, "A", "2025-01-01", 1.0),
    ]);
    let order: Vec<(i64, f64)> = table.records().iter().map(|r| (r.card_id, r.price)).collect();
    assert_eq!(order, vec![(1, 1.0), (1, 3.0), (2, 2.0)]);
}

// ---------------------------------------------------------------------------
// Signals
// ---------------------------------------------------------------------------

#[test]
fn signals_compute_returns_sma_and_momentum_per_card() {
    let signals = compute_signals(&sample_table(), &[2]).unwrap();
    assert_eq!(
        signals.columns(),
        vec![
            "card_id", "name", "set_code", "number", "date", "source", "price", "ret", "sma_2",
            "mom_2"
        ]
    );
    assert_eq!(signals.rows.len(), 15);

    let pikachu: Vec<_> = signals
        .rows
        .iter()
        .filter(|r| r.record.name == "Pikachu")
        .collect();
    assert_eq!(pikachu[0].ret, None);
    assert_eq!(pikachu[0].sma[0], None);
    assert!(approx(pikachu[1].ret.unwrap(), 0.1));
    assert!(approx(pikachu[1].sma[0].unwrap(), 10.5));
    assert_eq!(pikachu[1].mom[0], None);
    assert!(approx(pikachu[2].sma[0].unwrap(), 11.5));
    assert!(approx(pikachu[2].mom[0].unwrap(), 0.2));

    // history never leaks across cards
    let charizard_first = signals
        .rows
        .iter()
        .find(|r| r.record.name == "Charizard")
        .unwrap();
    assert_eq!(charizard_first.ret, None);
}

#[test]
fn signals_render_undefined_values_as_blank_cells() {
    let signals = compute_signals(&sample_table(), &[2]).unwrap();
    let first = signals.records().next().unwrap();
    assert_eq!(first.len(), signals.columns().len());
    assert_eq!(&first[7..], &["", "", ""]);
}

#[test]
fn signals_reject_zero_window() {
    assert!(matches!(
        compute_signals(&sample_table(), &[0]),
        Err(PricerError::InvalidArgument(_))
    ));
}

#[test]
fn signals_on_empty_table_still_write_a_header() {
    let tmp = tempfile::tempdir().unwrap();
    let signals = compute_signals(&PriceTable::default(), &[7, 14]).unwrap();
    let out = tmp.path().join("signals.csv");
    let n = write_records(&out, &signals.columns(), signals.records()).unwrap();
    assert_eq!(n, 0);

    let rows = common::read_csv(&out);
    assert_eq!(rows.len(), 1);
    assert!(rows[0].contains(&"mom_14".to_string()));
}

// ---------------------------------------------------------------------------
// Movers
// ---------------------------------------------------------------------------

#[test]
fn top_movers_split_winners_and_losers() {
    let movers = compute_top_movers(&sample_table(), 1, None);
    assert_eq!(movers.len(), 2);

    assert_eq!(movers[0].bucket, Bucket::Winner);
    assert_eq!(movers[0].name, "Blastoise");
    assert!(approx(movers[0].return_1d, 0.2));

    assert_eq!(movers[1].bucket, Bucket::Loser);
    assert_eq!(movers[1].name, "Charizard");
    assert!(approx(movers[1].return_1d, 160.0 / 170.0 - 1.0));
}

#[test]
fn top_movers_with_large_k_repeat_cards_across_buckets() {
    let movers = compute_top_movers(&sample_table(), 5, None);
    assert_eq!(movers.len(), 6);

    let winners: Vec<&str> = movers
        .iter()
        .filter(|m| m.bucket == Bucket::Winner)
        .map(|m| m.name.as_str())
        .collect();
    let losers: Vec<&str> = movers
        .iter()
        .filter(|m| m.bucket == Bucket::Loser)
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(winners, vec!["Blastoise", "Pikachu", "Charizard"]);
    assert_eq!(losers, vec!["Charizard", "Pikachu", "Blastoise"]);
}

#[test]
fn top_movers_for_a_past_date() {
    let movers = compute_top_movers(&sample_table(), 1, Some(common::d("2025-01-02")));
    assert_eq!(movers[0].name, "Pikachu");
    assert_eq!(movers[1].name, "Charizard");
    assert!(movers.iter().all(|m| m.date == common::d("2025-01-02")));

    // first day has no previous observation
    assert!(compute_top_movers(&sample_table(), 3, Some(common::d("2025-01-01"))).is_empty());
}

#[test]
fn top_movers_on_empty_table_write_header_only() {
    let tmp = tempfile::tempdir().unwrap();
    let movers = compute_top_movers(&PriceTable::default(), 5, None);
    assert!(movers.is_empty());

    let out = tmp.path().join("movers.csv");
    write_rows(&out, &movers).unwrap();
    let rows = common::read_csv(&out);
    assert_eq!(rows, vec![MoverRow::COLUMNS.iter().map(|c| c.to_string()).collect::<Vec<_>>()]);
}

#[test]
fn window_movers_rank_by_window_return() {
    let table = sample_table();
    let ranked = compute_window_movers(&table, 2, 0);
    let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Blastoise", "Pikachu", "Charizard"]);
    assert_eq!(ranked.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert!(approx(ranked[1].ret_window, 14.0 / 12.0 - 1.0));
    assert_eq!(ranked[0].last_date, common::d("2025-01-05"));
    assert_eq!(ranked[0].last_price, 60.0);

    let top = compute_window_movers(&table, 4, 1);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].name, "Pikachu");
    assert!(approx(top[0].ret_window, 0.4));
}

#[test]
fn window_movers_need_enough_history() {
    let tmp = tempfile::tempdir().unwrap();
    let ranked = compute_window_movers(&sample_table(), 10, 5);
    assert!(ranked.is_empty());

    let out = tmp.path().join("top_movers.csv");
    write_rows(&out, &ranked).unwrap();
    assert_eq!(common::read_csv(&out)[0], WindowMoverRow::COLUMNS);
}

// ---------------------------------------------------------------------------
// Anomalies
// ---------------------------------------------------------------------------

#[test]
fn anomalies_flag_spikes_and_range_breaks() {
    let rows = scan_anomalies(&sample_table(), 0.10, 3, None).unwrap();
    assert_eq!(rows.len(), 3);

    let by_name = |name: &str| rows.iter().find(|r| r.name == name).unwrap();
    assert_eq!(by_name("Pikachu").flags(), vec!["new_high"]);
    assert_eq!(by_name("Charizard").flags(), vec!["new_low"]);
    assert_eq!(by_name("Blastoise").flag, "spike,new_high");
    assert!(by_name("Blastoise").has_flag(AnomalyFlag::Spike));
    assert!(!by_name("Pikachu").has_flag(AnomalyFlag::Spike));
}

#[test]
fn anomalies_skip_moves_inside_the_trailing_range() {
    let table = PriceTable::new(vec![
        common::record(1, "Mew", "2025-01-01", 10.0),
        common::record(1, "Mew", "2025-01-02", 12.0),
        common::record(1, "Mew", "2025-01-03", 11.0),
    ]);
    assert!(scan_anomalies(&table, 0.10, 5, None).unwrap().is_empty());

    // a tighter threshold catches the -8.3% move
    let rows = scan_anomalies(&table, 0.05, 5, None).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].flag, "spike");
}

#[test]
fn anomalies_flag_moves_exactly_at_the_threshold() {
    // +25% and -25% days that stay inside the trailing range
    let table = PriceTable::new(vec![
        common::record(1, "Mew", "2025-01-01", 12.0),
        common::record(1, "Mew", "2025-01-02", 8.0),
        common::record(1, "Mew", "2025-01-03", 10.0),
        common::record(2, "Eevee", "2025-01-01", 10.0),
        common::record(2, "Eevee", "2025-01-02", 16.0),
        common::record(2, "Eevee", "2025-01-03", 12.0),
    ]);

    let rows = scan_anomalies(&table, 0.25, 5, None).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "Mew");
    assert_eq!(rows[0].return_1d, 0.25);
    assert_eq!(rows[1].return_1d, -0.25);
    assert!(rows.iter().all(|r| r.flag == "spike"));

    assert!(scan_anomalies(&table, 0.26, 5, None).unwrap().is_empty());
}

#[test]
fn returns_run_across_sources_on_the_same_date() {
    let pricer = common::empty_pricer();
    let mut rows = vec![
        common::price_row("Pikachu", "BASE", "58/102", "2025-01-01", 10.0),
        common::price_row("Pikachu", "BASE", "58/102", "2025-01-01", 12.0),
        common::price_row("Pikachu", "BASE", "58/102", "2025-01-02", 15.0),
    ];
    rows[0].source = "ebay".to_string();
    ingest_rows(&pricer, rows).unwrap();
    let table = pricer.load_price_table().unwrap();

    // ebay sorts before tcg, so the tcg row's previous observation is ebay's
    let day_one = scan_anomalies(&table, 0.10, 5, Some(common::d("2025-01-01"))).unwrap();
    assert_eq!(day_one.len(), 1);
    assert_eq!(day_one[0].source, common::SAMPLE_SOURCE);
    assert!(approx(day_one[0].return_1d, 0.2));
    assert_eq!(day_one[0].flag, "spike,new_high");

    let day_two = scan_anomalies(&table, 0.10, 5, None).unwrap();
    assert_eq!(day_two.len(), 1);
    assert!(approx(day_two[0].return_1d, 0.25));

    let movers = compute_top_movers(&table, 1, Some(common::d("2025-01-01")));
    assert_eq!(movers.len(), 2);
    assert!(movers.iter().all(|m| m.source == common::SAMPLE_SOURCE));
}

#[test]
fn anomalies_ignore_first_observations_and_reject_zero_lookback() {
    let table = sample_table();
    assert!(scan_anomalies(&table, 0.0, 3, Some(common::d("2025-01-01")))
        .unwrap()
        .is_empty());
    assert!(matches!(
        scan_anomalies(&table, 0.1, 0, None),
        Err(PricerError::InvalidArgument(_))
    ));
}

#[test]
fn anomalies_on_empty_table_write_header_only() {
    let tmp = tempfile::tempdir().unwrap();
    let rows = scan_anomalies(&PriceTable::default(), 0.1, 30, None).unwrap();
    let out = tmp.path().join("alerts.csv");
    write_rows(&out, &rows).unwrap();
    assert_eq!(common::read_csv(&out)[0], AnomalyRow::COLUMNS);
}

// ---------------------------------------------------------------------------
// Backtest
// ---------------------------------------------------------------------------

#[test]
fn backtest_picks_strongest_momentum_each_day() {
    let rows = backtest_momentum_topk(&sample_table(), 1, 1).unwrap();
    let dates: Vec<_> = rows.iter().map(|r| r.date).collect();
    assert_eq!(
        dates,
        vec![
            common::d("2025-01-02"),
            common::d("2025-01-03"),
            common::d("2025-01-04")
        ]
    );

    // Pikachu leads every day
    let expected = [1.0 / 11.0, 1.0 / 12.0, 1.0 / 13.0];
    for (row, want) in rows.iter().zip(expected) {
        assert!(approx(row.portfolio_return, want));
    }
    assert!(approx(rows[2].equity, 14.0 / 11.0));
}

#[test]
fn backtest_averages_the_top_k_picks() {
    let rows = backtest_momentum_topk(&sample_table(), 1, 2).unwrap();
    // 2025-01-02: Pikachu (+1/11) and Blastoise (flat)
    assert!(approx(rows[0].portfolio_return, 1.0 / 22.0));
    assert!(approx(rows[0].equity, 1.0 + 1.0 / 22.0));
}

#[test]
fn backtest_without_enough_history_is_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let rows = backtest_momentum_topk(&sample_table(), 10, 1).unwrap();
    assert!(rows.is_empty());

    let out = tmp.path().join("backtest.csv");
    write_rows(&out, &rows).unwrap();
    assert_eq!(common::read_csv(&out)[0], BacktestRow::COLUMNS);
}

#[test]
fn backtest_rejects_zero_top_k() {
    assert!(matches!(
        backtest_momentum_topk(&sample_table(), 1, 0),
        Err(PricerError::InvalidArgument(_))
    ));
}
