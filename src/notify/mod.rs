//! Outbound notifications for anomaly alerts.

pub mod slack;

pub use slack::{build_alerts_text, post_text, read_alerts, SlackResult};
