//! Per-card return, moving-average and momentum signals.

use crate::analytics::table::{pct_change, prices, rolling_mean, PriceRecord, PriceTable};
use crate::error::{PricerError, Result};
use crate::export::opt_cell;

/// Windows used when the caller does not choose any.
pub const DEFAULT_WINDOWS: [usize; 3] = [7, 14, 30];

const BASE_COLUMNS: [&str; 7] = [
    "card_id", "name", "set_code", "number", "date", "source", "price",
];

/// One input row extended with its signals.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRow {
    pub record: PriceRecord,
    /// 1-period percent change.
    pub ret: Option<f64>,
    /// SMA per window, aligned with [`Signals::windows`].
    pub sma: Vec<Option<f64>>,
    /// Momentum per window, aligned with [`Signals::windows`].
    pub mom: Vec<Option<f64>>,
}

/// Signal table; its columns depend on the requested windows.
#[derive(Debug, Clone, PartialEq)]
pub struct Signals {
    pub windows: Vec<usize>,
    pub rows: Vec<SignalRow>,
}

impl Signals {
    pub fn columns(&self) -> Vec<String> {
        let mut cols: Vec<String> = BASE_COLUMNS.iter().map(|c| c.to_string()).collect();
        cols.push("ret".to_string());
        for w in &self.windows {
            cols.push(format!("sma_{w}"));
            cols.push(format!("mom_{w}"));
        }
        cols
    }

    /// Rows rendered as CSV cells, in [`columns`](Self::columns) order.
    pub fn records(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.rows.iter().map(|row| {
            let r = &row.record;
            let mut cells = vec![
                r.card_id.to_string(),
                r.name.clone(),
                r.set_code.clone(),
                r.number.clone(),
                r.date.format("%Y-%m-%d").to_string(),
                r.source.clone(),
                r.price.to_string(),
                opt_cell(row.ret),
            ];
            for (sma, mom) in row.sma.iter().zip(&row.mom) {
                cells.push(opt_cell(*sma));
                cells.push(opt_cell(*mom));
            }
            cells
        })
    }
}

/// Compute `ret`, `sma_{w}` and `mom_{w}` for every row.
///
/// `mom_{w}` is `price / price[w rows earlier] - 1`; `sma_{w}` needs `w`
/// observations. Both are computed within each card's own history.
pub fn compute_signals(table: &PriceTable, windows: &[usize]) -> Result<Signals> {
    if windows.contains(&0) {
        return Err(PricerError::InvalidArgument(
            "signal windows must be positive".to_string(),
        ));
    }

    let mut rows = Vec::with_capacity(table.len());
    for card_rows in table.by_card() {
        let px = prices(card_rows);
        let ret = pct_change(&px, 1);
        let smas: Vec<Vec<Option<f64>>> = windows.iter().map(|w| rolling_mean(&px, *w)).collect();
        let moms: Vec<Vec<Option<f64>>> = windows.iter().map(|w| pct_change(&px, *w)).collect();

        for (i, record) in card_rows.iter().enumerate() {
            rows.push(SignalRow {
                record: record.clone(),
                ret: ret[i],
                sma: smas.iter().map(|s| s[i]).collect(),
                mom: moms.iter().map(|m| m[i]).collect(),
            });
        }
    }

    Ok(Signals {
        windows: windows.to_vec(),
        rows,
    })
}
