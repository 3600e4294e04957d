//! Delimited-text parsing: header row, one row per date.
//!
//! Headers are matched case-insensitively. The date is taken from the first
//! column; OHLCV columns are located by name and an empty cell becomes an
//! absent field, never zero.

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::data::{parse_date, LoadError};
use crate::domain::{
    Bar, DividendLedger, DividendUnit, PriceHistory, TransactionLedger, TransactionUnit,
};

pub(crate) fn parse_history(text: &str) -> Result<PriceHistory, LoadError> {
    let mut reader = reader(text);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_ascii_lowercase())
        .collect();
    let col = |name: &str| headers.iter().position(|h| h == name);
    let (open, high, low, close, volume) = (
        col("open"),
        col("high"),
        col("low"),
        col("close"),
        col("volume"),
    );

    let mut history = PriceHistory::new();
    for record in reader.records() {
        let record = record?;
        let date = parse_date(record.get(0).unwrap_or_default())?;
        let bar = Bar {
            open: opt_f64(&record, open)?,
            high: opt_f64(&record, high)?,
            low: opt_f64(&record, low)?,
            close: opt_f64(&record, close)?,
            volume: opt_u64(&record, volume)?,
        };
        history.insert(date, bar);
    }
    Ok(history)
}

pub(crate) fn parse_transactions(
    text: &str,
    unit: TransactionUnit,
) -> Result<TransactionLedger, LoadError> {
    let mut ledger = TransactionLedger::new(unit);
    for (date, amount) in parse_amount_rows(text)? {
        ledger.record(date, amount);
    }
    Ok(ledger)
}

pub(crate) fn parse_dividends(
    text: &str,
    unit: DividendUnit,
) -> Result<DividendLedger, LoadError> {
    let mut ledger = DividendLedger::new(unit);
    for (date, amount) in parse_amount_rows(text)? {
        ledger.record(date, amount);
    }
    Ok(ledger)
}

/// Shared row shape for transactions and dividends: date in the first
/// column, amount in the `amount` column (or the second column).
fn parse_amount_rows(text: &str) -> Result<Vec<(chrono::NaiveDate, f64)>, LoadError> {
    let mut reader = reader(text);
    let amount_col = reader
        .headers()?
        .iter()
        .position(|h| h.eq_ignore_ascii_case("amount"))
        .unwrap_or(1);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let date = parse_date(record.get(0).unwrap_or_default())?;
        let cell = record.get(amount_col).unwrap_or_default();
        let amount = cell.parse::<f64>().map_err(|_| LoadError::Amount {
            text: cell.to_string(),
        })?;
        rows.push((date, amount));
    }
    Ok(rows)
}

fn reader(text: &str) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(text.as_bytes())
}

fn opt_f64(record: &StringRecord, col: Option<usize>) -> Result<Option<f64>, LoadError> {
    let cell = col.and_then(|i| record.get(i)).unwrap_or_default();
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<f64>().map(Some).map_err(|_| LoadError::Amount {
        text: cell.to_string(),
    })
}

fn opt_u64(record: &StringRecord, col: Option<usize>) -> Result<Option<u64>, LoadError> {
    let cell = col.and_then(|i| record.get(i)).unwrap_or_default();
    if cell.is_empty() {
        return Ok(None);
    }
    // Some vendors export volume as a float ("1000.0").
    cell.parse::<u64>()
        .or_else(|_| cell.parse::<f64>().map(|v| v as u64))
        .map(Some)
        .map_err(|_| LoadError::Amount {
            text: cell.to_string(),
        })
}
