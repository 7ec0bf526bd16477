//! Pure transforms over the denormalized price table.
//!
//! Every function takes a [`PriceTable`] snapshot and returns a typed row
//! collection. Empty input, or input where nothing qualifies, yields an empty
//! collection whose CSV rendering still carries the full header.

pub mod anomalies;
pub mod backtest;
pub mod movers;
pub mod signals;
pub mod table;
pub mod top_movers;

pub use anomalies::{scan_anomalies, AnomalyFlag, AnomalyRow};
pub use backtest::{backtest_momentum_topk, BacktestRow};
pub use movers::{compute_top_movers, Bucket, MoverRow};
pub use signals::{compute_signals, SignalRow, Signals};
pub use table::{PriceRecord, PriceTable};
pub use top_movers::{compute_window_movers, WindowMoverRow};
