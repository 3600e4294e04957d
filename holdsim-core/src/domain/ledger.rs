//! Transaction and dividend ledgers — sparse amount series with a unit tag.
//!
//! The unit is a ledger-level property, not per-record: every amount in a
//! ledger is interpreted under the same unit, resolved once by exhaustive
//! match inside the engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::series::SparseSeries;

/// How transaction amounts are denominated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionUnit {
    /// Signed cash amount; converted to shares at the closing price.
    Cash,
    /// Signed share count transferred directly.
    Shares,
}

/// How dividend amounts are denominated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DividendUnit {
    /// Cash paid per held share on the ex-dividend date.
    CashPerShare,
    /// Fractional ratio of the held share count (0.05 = 5%).
    ShareRatio,
}

/// Sparse series of signed external deposits/withdrawals or share transfers.
///
/// Stores only non-zero amounts; a zero row in the source data is dropped at
/// insertion time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionLedger {
    series: SparseSeries<f64>,
    unit: TransactionUnit,
}

impl TransactionLedger {
    pub fn new(unit: TransactionUnit) -> Self {
        Self {
            series: SparseSeries::new(),
            unit,
        }
    }

    pub fn unit(&self) -> TransactionUnit {
        self.unit
    }

    /// Record a transaction. Zero amounts are rejected; returns whether the
    /// entry was stored. A second record on the same date overwrites.
    pub fn record(&mut self, date: NaiveDate, amount: f64) -> bool {
        if amount == 0.0 {
            return false;
        }
        self.series.set(date, amount);
        true
    }

    pub fn series(&self) -> &SparseSeries<f64> {
        &self.series
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.series.first_date()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Sparse series of ex-dividend payouts eligible for reinvestment.
///
/// Stores only strictly-positive amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendLedger {
    series: SparseSeries<f64>,
    unit: DividendUnit,
}

impl DividendLedger {
    pub fn new(unit: DividendUnit) -> Self {
        Self {
            series: SparseSeries::new(),
            unit,
        }
    }

    pub fn unit(&self) -> DividendUnit {
        self.unit
    }

    /// Record a payout. Non-positive amounts are rejected; returns whether
    /// the entry was stored.
    pub fn record(&mut self, date: NaiveDate, amount: f64) -> bool {
        if amount <= 0.0 {
            return false;
        }
        self.series.set(date, amount);
        true
    }

    pub fn series(&self) -> &SparseSeries<f64> {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
