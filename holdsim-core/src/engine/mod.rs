//! Valuation engine — five ordered computations over sparse ledgers.
//!
//! The engine converts three independently-dated sparse inputs (transaction
//! ledger, price history, optional dividend ledger) into five dense,
//! mutually-dependent output series. The computations must run in a fixed
//! topological order, enforced by [`recompute`]:
//!
//! ```text
//! shares → cost → value → gain → gain%
//! ```
//!
//! Each `compute_*` function is pure: fixed inputs always produce identical
//! output. Any error aborts the whole recompute; no partial series is ever
//! published.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DividendUnit, PriceHistory, TransactionLedger, TransactionUnit};
use crate::series::SparseSeries;

/// Errors from the valuation engine. These are data-integrity errors, not
/// transient faults: there is no retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValuationError {
    /// A computation required a closing price at or before `date` and the
    /// price history begins after it (or the located bar has no close).
    #[error("no price data at or before {date}")]
    NoPriceData { date: NaiveDate },

    /// The computation requires at least one transaction.
    #[error("transaction ledger is empty")]
    EmptyLedger,

    /// Derived series were requested before a successful recompute, or after
    /// a ledger mutation invalidated them.
    #[error("derived series are stale; call recompute() first")]
    Stale,
}

/// The five output series. Produced only by [`recompute`]; never edited
/// directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedSeries {
    pub shares: SparseSeries<f64>,
    pub cost: SparseSeries<f64>,
    pub value: SparseSeries<f64>,
    pub gain: SparseSeries<f64>,
    pub gainp: SparseSeries<f64>,
}

/// Run the five computations in dependency order.
///
/// `reinvest` activates the dividend merge walk in [`compute_shares`] when
/// the history has an attached dividend ledger.
pub fn recompute(
    transactions: &TransactionLedger,
    history: &PriceHistory,
    reinvest: bool,
) -> Result<DerivedSeries, ValuationError> {
    let shares = compute_shares(transactions, history, reinvest)?;
    let cost = compute_cost(transactions, history)?;
    let value = compute_value(&shares, history, None)?;
    let gain = compute_gain(&value, &cost);
    let gainp = compute_gainp(&gain, &cost);
    Ok(DerivedSeries {
        shares,
        cost,
        value,
        gain,
        gainp,
    })
}

/// Outstanding share count per event date.
///
/// The series carries a zero baseline one day before the first transaction,
/// then one entry per event (transaction or reinvested dividend) — it is not
/// one-entry-per-calendar-day.
///
/// Reinvestment is an ascending merge walk over dividend and transaction
/// dates. Dividend dates strictly before the first transaction are skipped
/// (no shares exist yet to compound). A dividend on the same date as a
/// transaction applies before the transaction.
pub fn compute_shares(
    transactions: &TransactionLedger,
    history: &PriceHistory,
    reinvest: bool,
) -> Result<SparseSeries<f64>, ValuationError> {
    let first = transactions.first_date().ok_or(ValuationError::EmptyLedger)?;

    let mut shares = SparseSeries::new();
    shares.set(first - Duration::days(1), 0.0);

    // Dividend events participate only when reinvesting and a ledger is
    // attached to the history. The unit is resolved once, per event.
    let dividend_events: Vec<(NaiveDate, f64, DividendUnit)> = history
        .dividends()
        .filter(|_| reinvest)
        .map(|ledger| {
            ledger
                .series()
                .iter()
                .map(|(date, amount)| (date, *amount, ledger.unit()))
                .collect()
        })
        .unwrap_or_default();

    let mut pending = dividend_events
        .into_iter()
        .skip_while(|(date, _, _)| *date < first)
        .peekable();

    let mut s = 0.0;
    for (date, amount) in transactions.series().iter() {
        // Drain every dividend at or before this transaction date first.
        while let Some(&(div_date, div_amount, div_unit)) = pending.peek() {
            if div_date > date {
                break;
            }
            s = apply_dividend(s, div_date, div_amount, div_unit, history)?;
            shares.set(div_date, s);
            pending.next();
        }

        s += match transactions.unit() {
            TransactionUnit::Shares => *amount,
            TransactionUnit::Cash => *amount / history.closing_price_at_or_before(date)?,
        };
        shares.set(date, s);
    }

    // Dividends dated after the last transaction still compound.
    for (div_date, div_amount, div_unit) in pending {
        s = apply_dividend(s, div_date, div_amount, div_unit, history)?;
        shares.set(div_date, s);
    }

    Ok(shares)
}

fn apply_dividend(
    s: f64,
    date: NaiveDate,
    amount: f64,
    unit: DividendUnit,
    history: &PriceHistory,
) -> Result<f64, ValuationError> {
    Ok(match unit {
        DividendUnit::ShareRatio => s + s * amount,
        DividendUnit::CashPerShare => {
            s + s * amount / history.closing_price_at_or_before(date)?
        }
    })
}

/// Cumulative cost basis per transaction date, with the same zero baseline
/// as [`compute_shares`]. Dividends never affect cost basis.
///
/// A Shares transaction still has a cash-equivalent cost: its amount times
/// the closing price at or before the transaction date.
pub fn compute_cost(
    transactions: &TransactionLedger,
    history: &PriceHistory,
) -> Result<SparseSeries<f64>, ValuationError> {
    let first = transactions.first_date().ok_or(ValuationError::EmptyLedger)?;

    let mut cost = SparseSeries::new();
    cost.set(first - Duration::days(1), 0.0);

    let mut c = 0.0;
    for (date, amount) in transactions.series().iter() {
        c += match transactions.unit() {
            TransactionUnit::Cash => *amount,
            TransactionUnit::Shares => *amount * history.closing_price_at_or_before(date)?,
        };
        cost.set(date, c);
    }
    Ok(cost)
}

/// Market value per calendar day from the first shares entry through
/// `until` (default: the last date in the price history).
///
/// While the held share count is zero, every calendar day records `0.0` (no
/// price is needed for an empty position). Once shares are held, a day
/// records `held * closing_price_at_or_before(day)` only when the history
/// has a bar on that exact day — the series stays sparse over non-trading
/// days. Shares change-point days are always recorded, using the nearest
/// available price.
pub fn compute_value(
    shares: &SparseSeries<f64>,
    history: &PriceHistory,
    until: Option<NaiveDate>,
) -> Result<SparseSeries<f64>, ValuationError> {
    let mut value = SparseSeries::new();
    let Some(start) = shares.first_date() else {
        return Ok(value);
    };
    let last_change = shares.last_date().unwrap_or(start);
    let end = until.or_else(|| history.last_date()).unwrap_or(last_change);

    let mut points = shares.iter().peekable();
    let mut held = 0.0;
    let mut day = start;
    while day <= end {
        let at_change_point = matches!(points.peek(), Some((point, _)) if *point == day);
        if at_change_point {
            if let Some((_, level)) = points.next() {
                held = *level;
            }
            if held == 0.0 {
                value.set(day, 0.0);
            } else {
                value.set(day, held * history.closing_price_at_or_before(day)?);
            }
        } else if held == 0.0 {
            value.set(day, 0.0);
        } else if history.bars().get(day).is_some() {
            value.set(day, held * history.closing_price_at_or_before(day)?);
        }
        day += Duration::days(1);
    }
    Ok(value)
}

/// Absolute gain for every date present in `value` from
/// `max(min value date, min cost date)` onward: value minus forward-filled
/// cost.
pub fn compute_gain(value: &SparseSeries<f64>, cost: &SparseSeries<f64>) -> SparseSeries<f64> {
    let mut gain = SparseSeries::new();
    let (Some(value_start), Some(cost_start)) = (value.first_date(), cost.first_date()) else {
        return gain;
    };
    let start = value_start.max(cost_start);
    for (date, v) in value.iter() {
        if date < start {
            continue;
        }
        let c = cost.latest_at_or_before(date).copied().unwrap_or(0.0);
        gain.set(date, v - c);
    }
    gain
}

/// Gain as a fraction of forward-filled cost basis, over the dates of
/// `gain`. Dates where cost is exactly zero are omitted — division by zero
/// is a defined skip, not an error.
pub fn compute_gainp(gain: &SparseSeries<f64>, cost: &SparseSeries<f64>) -> SparseSeries<f64> {
    let mut gainp = SparseSeries::new();
    for (date, g) in gain.iter() {
        let c = cost.latest_at_or_before(date).copied().unwrap_or(0.0);
        if c != 0.0 {
            gainp.set(date, g / c);
        }
    }
    gainp
}
