//! Bar — one period's OHLCV price record.

use serde::{Deserialize, Serialize};

/// OHLCV bar for a single calendar date.
///
/// Every field is independently optional: a column absent in the source data
/// is `None`, never zero. Bars are immutable once inserted into a price
/// history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bar {
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

impl Bar {
    /// Bar carrying only a closing price. The valuation engine never reads
    /// the other fields, so fixtures and synthetic data use this constructor.
    pub fn closing(close: f64) -> Self {
        Self {
            close: Some(close),
            ..Self::default()
        }
    }
}
