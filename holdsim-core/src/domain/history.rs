//! PriceHistory — sparse series of OHLCV bars plus the instrument's
//! dividend stream.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::bar::Bar;
use crate::domain::ledger::DividendLedger;
use crate::engine::ValuationError;
use crate::series::SparseSeries;

/// Price history for one instrument: at most one [`Bar`] per date.
///
/// A history owns the dividend stream for the same instrument; the ledger is
/// attached once after construction and read by the engine when the
/// reinvestment flag is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    bars: SparseSeries<Bar>,
    dividends: Option<DividendLedger>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the bar at `date`.
    pub fn insert(&mut self, date: NaiveDate, bar: Bar) {
        self.bars.set(date, bar);
    }

    pub fn bars(&self) -> &SparseSeries<Bar> {
        &self.bars
    }

    pub fn attach_dividends(&mut self, dividends: DividendLedger) {
        self.dividends = Some(dividends);
    }

    pub fn dividends(&self) -> Option<&DividendLedger> {
        self.dividends.as_ref()
    }

    /// Closing price of the latest bar at or before `date`.
    ///
    /// Fails with [`ValuationError::NoPriceData`] when the history has no bar
    /// at or before `date`, or the located bar carries no close. A bar that
    /// parsed without a close is a data-integrity problem, not a gap to skip
    /// over.
    pub fn closing_price_at_or_before(&self, date: NaiveDate) -> Result<f64, ValuationError> {
        self.bars
            .latest_at_or_before(date)
            .and_then(|bar| bar.close)
            .ok_or(ValuationError::NoPriceData { date })
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first_date()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last_date()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::DividendUnit;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn history() -> PriceHistory {
        let mut h = PriceHistory::new();
        h.insert(d(2020, 1, 2), Bar::closing(100.0));
        h.insert(d(2020, 1, 6), Bar::closing(110.0));
        h
    }

    #[test]
    fn closing_price_forward_fills_over_gaps() {
        let h = history();
        assert_eq!(h.closing_price_at_or_before(d(2020, 1, 2)).unwrap(), 100.0);
        assert_eq!(h.closing_price_at_or_before(d(2020, 1, 4)).unwrap(), 100.0);
        assert_eq!(h.closing_price_at_or_before(d(2020, 2, 1)).unwrap(), 110.0);
    }

    #[test]
    fn closing_price_before_first_bar_is_an_error() {
        let err = history()
            .closing_price_at_or_before(d(2020, 1, 1))
            .unwrap_err();
        assert!(matches!(
            err,
            ValuationError::NoPriceData { date } if date == d(2020, 1, 1)
        ));
    }

    #[test]
    fn bar_without_close_is_no_price_data() {
        let mut h = PriceHistory::new();
        h.insert(
            d(2020, 1, 2),
            Bar {
                open: Some(99.0),
                ..Bar::default()
            },
        );
        assert!(h.closing_price_at_or_before(d(2020, 1, 2)).is_err());
    }

    #[test]
    fn dividend_ledger_attaches_once() {
        let mut h = history();
        assert!(h.dividends().is_none());
        h.attach_dividends(DividendLedger::new(DividendUnit::ShareRatio));
        assert!(h.dividends().is_some());
    }
}
