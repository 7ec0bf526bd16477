//! Report bundles: fixed sets of CSV files composed from the analytics.

pub mod daily;
pub mod qa;

pub use daily::{latest_snapshot, write_daily_reports, SnapshotRow};
pub use qa::{
    find_duplicates, find_stale_cards, write_qa_bundle, DuplicateRow, StaleCardRow,
    DEFAULT_STALE_DAYS,
};
