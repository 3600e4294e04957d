//! Domain types for HoldSim.

pub mod bar;
pub mod history;
pub mod instrument;
pub mod ledger;
pub mod portfolio;

pub use bar::Bar;
pub use history::PriceHistory;
pub use instrument::{ComputeState, Instrument, Snapshot};
pub use ledger::{DividendLedger, DividendUnit, TransactionLedger, TransactionUnit};
pub use portfolio::Portfolio;
