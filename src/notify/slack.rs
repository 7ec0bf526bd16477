//! Slack incoming-webhook messages.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analytics::AnomalyRow;
use crate::error::Result;

pub const DEFAULT_MAX_ROWS: usize = 10;

/// Outcome of a webhook post. Non-2xx responses are reported, not raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackResult {
    pub ok: bool,
    pub status: u16,
    pub body: String,
}

/// Load an alerts CSV as written by `alerts scan`.
pub fn read_alerts(path: &Path) -> Result<Vec<AnomalyRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Render up to `max_rows` alerts as a plain-text Slack message.
pub fn build_alerts_text(rows: &[AnomalyRow], max_rows: usize) -> String {
    if rows.is_empty() {
        return ":white_check_mark: No alerts for the selected day.".to_string();
    }

    let shown = &rows[..rows.len().min(max_rows)];
    let mut lines = Vec::with_capacity(shown.len() + 2);
    lines.push(format!("*Top alerts* (showing up to {}):", shown.len()));
    for r in shown {
        lines.push(format!(
            "• *{}* [{} #{}] {} ${:.2} Δ1d={:.2}% ({}) {}",
            r.name,
            r.set_code,
            r.number,
            r.source,
            r.price,
            r.return_1d * 100.0,
            r.flag,
            r.date.format("%Y-%m-%d"),
        ));
    }
    if rows.len() > max_rows {
        lines.push(format!("…and {} more.", rows.len() - max_rows));
    }
    lines.join("\n")
}

/// Post `{"text": text}` to an incoming webhook.
pub fn post_text(webhook_url: &str, text: &str, timeout: Duration) -> Result<SlackResult> {
    let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
    let resp = client
        .post(webhook_url)
        .json(&serde_json::json!({ "text": text }))
        .send()?;

    let status = resp.status();
    let body = resp.text().unwrap_or_default();
    let result = SlackResult {
        ok: status.is_success(),
        status: status.as_u16(),
        body,
    };

    if result.ok {
        info!(status = result.status, "slack message posted");
    } else {
        warn!(status = result.status, body = %result.body, "slack webhook rejected message");
    }
    Ok(result)
}
