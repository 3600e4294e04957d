//! HoldSim core — reconstructs dense holding series from sparse records.
//!
//! Given three independently-dated sparse inputs — a price history (OHLCV
//! bars), a transaction ledger (cash or share deltas), and an optional
//! dividend ledger — the valuation engine derives five mutually-dependent
//! output series: shares held, cost basis, market value, gain, and gain
//! percentage.
//!
//! Layout:
//! - [`series`] — the ordered date→value container with forward/backward-fill
//!   lookups that everything else is built on
//! - [`domain`] — bars, price history, ledgers, instrument, portfolio
//! - [`engine`] — the five derived-series computations and `recompute`
//! - [`data`] — delimited-text and structured (JSON) loaders
//! - [`report`] — the tabular `Date,<Series>` report

pub mod data;
pub mod domain;
pub mod engine;
pub mod report;
pub mod series;
