//! Instrument — aggregate owning the ledgers and their derived series.

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::{self, DataFormat, LoadError};
use crate::domain::history::PriceHistory;
use crate::domain::ledger::{DividendUnit, TransactionLedger, TransactionUnit};
use crate::engine::{self, DerivedSeries, ValuationError};
use crate::series::SparseSeries;

/// Validity of the derived series with respect to the current ledgers.
///
/// `recompute` is the only `Stale → Computed` transition; any ledger
/// mutation (or flipping the reinvest flag) is the only `Computed → Stale`
/// transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeState {
    Stale,
    Computed,
}

/// Point-in-time view of the five derived series, each independently
/// resolved by forward-fill. A component absent at or before the query date
/// is `None` for that component only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Snapshot {
    pub shares: Option<f64>,
    pub value: Option<f64>,
    pub cost: Option<f64>,
    pub gain: Option<f64>,
    pub gainp: Option<f64>,
}

/// One tradable instrument: a price history (with its dividend stream), a
/// transaction ledger, a reinvestment flag, and the five derived series.
///
/// Derived series are invalidated whenever a ledger is mutated and are not
/// guaranteed correct until [`recompute`](Self::recompute) runs again. There
/// is no incremental update. Reads in `Stale` state fail with
/// [`ValuationError::Stale`]; they never recompute implicitly.
#[derive(Debug, Clone)]
pub struct Instrument {
    history: PriceHistory,
    transactions: TransactionLedger,
    reinvest: bool,
    derived: DerivedSeries,
    state: ComputeState,
}

impl Instrument {
    pub fn new(history: PriceHistory, transactions: TransactionLedger) -> Self {
        Self {
            history,
            transactions,
            reinvest: false,
            derived: DerivedSeries::default(),
            state: ComputeState::Stale,
        }
    }

    /// Populate an instrument from raw source text.
    ///
    /// Transactions load as Cash amounts and dividends as CashPerShare
    /// payouts (the delimited/structured sources carry no unit column);
    /// callers with share-denominated data build the ledgers directly and
    /// use [`new`](Self::new).
    pub fn load(
        history_text: &str,
        transactions_text: &str,
        dividends_text: Option<&str>,
        format: DataFormat,
    ) -> Result<Self, LoadError> {
        let mut history = data::load_history(history_text, format)?;
        let transactions =
            data::load_transactions(transactions_text, TransactionUnit::Cash, format)?;
        if let Some(text) = dividends_text {
            let dividends = data::load_dividends(text, DividendUnit::CashPerShare, format)?;
            history.attach_dividends(dividends);
        }
        Ok(Self::new(history, transactions))
    }

    pub fn state(&self) -> ComputeState {
        self.state
    }

    pub fn reinvest(&self) -> bool {
        self.reinvest
    }

    pub fn set_reinvest(&mut self, reinvest: bool) {
        if self.reinvest != reinvest {
            self.reinvest = reinvest;
            self.invalidate();
        }
    }

    pub fn history(&self) -> &PriceHistory {
        &self.history
    }

    /// Mutable access to the price history. Invalidates the derived series.
    pub fn history_mut(&mut self) -> &mut PriceHistory {
        self.invalidate();
        &mut self.history
    }

    pub fn transactions(&self) -> &TransactionLedger {
        &self.transactions
    }

    /// Mutable access to the transaction ledger. Invalidates the derived
    /// series.
    pub fn transactions_mut(&mut self) -> &mut TransactionLedger {
        self.invalidate();
        &mut self.transactions
    }

    fn invalidate(&mut self) {
        self.state = ComputeState::Stale;
        self.derived = DerivedSeries::default();
    }

    /// Recompute all five derived series from the current ledgers.
    ///
    /// On error the instrument stays `Stale` with empty derived series — a
    /// failed recompute never publishes partial results.
    pub fn recompute(&mut self) -> Result<(), ValuationError> {
        self.derived = engine::recompute(&self.transactions, &self.history, self.reinvest)?;
        self.state = ComputeState::Computed;
        Ok(())
    }

    /// The five derived series. Fails while stale.
    pub fn derived(&self) -> Result<&DerivedSeries, ValuationError> {
        match self.state {
            ComputeState::Computed => Ok(&self.derived),
            ComputeState::Stale => Err(ValuationError::Stale),
        }
    }

    /// Forward-filled point-in-time view at `date`. Fails while stale.
    pub fn snapshot(&self, date: NaiveDate) -> Result<Snapshot, ValuationError> {
        let derived = self.derived()?;
        let resolve = |series: &SparseSeries<f64>| series.latest_at_or_before(date).copied();
        Ok(Snapshot {
            shares: resolve(&derived.shares),
            value: resolve(&derived.value),
            cost: resolve(&derived.cost),
            gain: resolve(&derived.gain),
            gainp: resolve(&derived.gainp),
        })
    }
}
