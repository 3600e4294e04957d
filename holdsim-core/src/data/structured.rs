//! Structured (JSON) parsing: vendor-style nested documents.
//!
//! Bars arrive under `chart.quotes`, ledger rows under `ledger.rows`. Dates
//! are `YYYY-MM-DD` strings, the same as the delimited format; absent OHLCV
//! keys become absent fields.

use serde::Deserialize;

use crate::data::{parse_date, LoadError};
use crate::domain::{
    Bar, DividendLedger, DividendUnit, PriceHistory, TransactionLedger, TransactionUnit,
};

#[derive(Deserialize)]
struct ChartDoc {
    chart: Chart,
}

#[derive(Deserialize)]
struct Chart {
    quotes: Vec<Quote>,
}

#[derive(Deserialize)]
struct Quote {
    date: String,
    #[serde(default)]
    open: Option<f64>,
    #[serde(default)]
    high: Option<f64>,
    #[serde(default)]
    low: Option<f64>,
    #[serde(default)]
    close: Option<f64>,
    #[serde(default)]
    volume: Option<u64>,
}

#[derive(Deserialize)]
struct LedgerDoc {
    ledger: LedgerRows,
}

#[derive(Deserialize)]
struct LedgerRows {
    rows: Vec<Row>,
}

#[derive(Deserialize)]
struct Row {
    date: String,
    amount: f64,
}

pub(crate) fn parse_history(text: &str) -> Result<PriceHistory, LoadError> {
    let doc: ChartDoc = serde_json::from_str(text)?;
    let mut history = PriceHistory::new();
    for quote in doc.chart.quotes {
        let date = parse_date(&quote.date)?;
        history.insert(
            date,
            Bar {
                open: quote.open,
                high: quote.high,
                low: quote.low,
                close: quote.close,
                volume: quote.volume,
            },
        );
    }
    Ok(history)
}

pub(crate) fn parse_transactions(
    text: &str,
    unit: TransactionUnit,
) -> Result<TransactionLedger, LoadError> {
    let doc: LedgerDoc = serde_json::from_str(text)?;
    let mut ledger = TransactionLedger::new(unit);
    for row in doc.ledger.rows {
        ledger.record(parse_date(&row.date)?, row.amount);
    }
    Ok(ledger)
}

pub(crate) fn parse_dividends(
    text: &str,
    unit: DividendUnit,
) -> Result<DividendLedger, LoadError> {
    let doc: LedgerDoc = serde_json::from_str(text)?;
    let mut ledger = DividendLedger::new(unit);
    for row in doc.ledger.rows {
        ledger.record(parse_date(&row.date)?, row.amount);
    }
    Ok(ledger)
}
