mod common;

use std::time::Duration;

use mockito::Matcher;
use poke_pricer::analytics::scan_anomalies;
use poke_pricer::export::write_rows;
use poke_pricer::notify::{build_alerts_text, post_text, read_alerts};

#[test]
fn alerts_file_round_trips_through_read_alerts() {
    let tmp = tempfile::tempdir().unwrap();
    let table = common::setup_sample_pricer().load_price_table().unwrap();
    let rows = scan_anomalies(&table, 0.10, 3, None).unwrap();
    let path = tmp.path().join("alerts.csv");
    write_rows(&path, &rows).unwrap();

    let loaded = read_alerts(&path).unwrap();
    assert_eq!(loaded, rows);
    assert_eq!(loaded.iter().filter(|r| r.flag == "spike,new_high").count(), 1);

    let text = build_alerts_text(&loaded, 10);
    assert!(text.starts_with("*Top alerts* (showing up to 3):"));
    let blastoise = "*Blastoise* [BASE #2/102] tcg $60.00 Δ1d=20.00% (spike,new_high) 2025-01-05";
    assert!(text.contains(blastoise));
}

#[test]
fn header_only_alerts_file_reads_as_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("alerts.csv");
    write_rows(&path, &scan_anomalies(&Default::default(), 0.1, 30, None).unwrap()).unwrap();

    let loaded = read_alerts(&path).unwrap();
    assert!(loaded.is_empty());
    assert!(build_alerts_text(&loaded, 10).contains("No alerts"));
}

#[test]
fn post_text_sends_json_payload() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/hook")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(serde_json::json!({ "text": "hello" })))
        .with_status(200)
        .with_body("ok")
        .create();

    let url = format!("{}/hook", server.url());
    let result = post_text(&url, "hello", Duration::from_secs(5)).unwrap();

    mock.assert();
    assert!(result.ok);
    assert_eq!(result.status, 200);
    assert_eq!(result.body, "ok");
}

#[test]
fn post_text_reports_rejections_without_failing() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/hook")
        .with_status(500)
        .with_body("invalid_payload")
        .create();

    let url = format!("{}/hook", server.url());
    let result = post_text(&url, "hello", Duration::from_secs(5)).unwrap();

    mock.assert();
    assert!(!result.ok);
    assert_eq!(result.status, 500);
    assert_eq!(result.body, "invalid_payload");
}
