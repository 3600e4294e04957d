//! Loaders — parse raw source text into bars, transactions, and dividends.
//!
//! Two input formats are supported:
//! - delimited text ([`delimited`]): a header row, one row per date
//! - structured JSON ([`structured`]): a vendor-style nested document
//!
//! Dates arrive as `YYYY-MM-DD` strings in both formats. The insertion
//! filters live in the ledgers themselves (zero transactions and
//! non-positive dividends are dropped, not errors).

pub mod delimited;
pub mod structured;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{DividendLedger, DividendUnit, PriceHistory, TransactionLedger, TransactionUnit};

/// Input format selector. Delimited text is the default; the structured
/// format is opted into with a CLI flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Json,
}

/// Errors from the loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Malformed date text; every source date must be `YYYY-MM-DD`.
    #[error("malformed date '{text}' (expected YYYY-MM-DD)")]
    DateParse { text: String },

    /// A cell that should hold a number does not parse as one.
    #[error("malformed amount '{text}'")]
    Amount { text: String },

    #[error("delimited parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("structured parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a `YYYY-MM-DD` date string.
pub(crate) fn parse_date(text: &str) -> Result<NaiveDate, LoadError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| LoadError::DateParse {
        text: text.to_string(),
    })
}

/// Load a price history from source text.
pub fn load_history(text: &str, format: DataFormat) -> Result<PriceHistory, LoadError> {
    match format {
        DataFormat::Csv => delimited::parse_history(text),
        DataFormat::Json => structured::parse_history(text),
    }
}

/// Load a transaction ledger from source text. `unit` is a ledger-level
/// property; the sources carry no unit column.
pub fn load_transactions(
    text: &str,
    unit: TransactionUnit,
    format: DataFormat,
) -> Result<TransactionLedger, LoadError> {
    match format {
        DataFormat::Csv => delimited::parse_transactions(text, unit),
        DataFormat::Json => structured::parse_transactions(text, unit),
    }
}

/// Load a dividend ledger from source text.
pub fn load_dividends(
    text: &str,
    unit: DividendUnit,
    format: DataFormat,
) -> Result<DividendLedger, LoadError> {
    match format {
        DataFormat::Csv => delimited::parse_dividends(text, unit),
        DataFormat::Json => structured::parse_dividends(text, unit),
    }
}
