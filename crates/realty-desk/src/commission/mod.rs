//! Agent commission rules and the desk that serves them.
//!
//! [`compute_commission`] is a pure function over a [`TierTable`]; everything stateful
//! (history, logging, HTTP) sits in [`CommissionDesk`] and [`commission_router`].

pub mod domain;
pub mod engine;
pub mod history;
pub mod import;
pub mod report;
pub mod router;
pub mod service;
pub mod tiers;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    AgentLevel, CommissionInput, CommissionResult, DealType, InputAdvisory, ParseLabelError,
    TierMatch,
};
pub use engine::compute_commission;
pub use history::{CalculationHistory, HistoryEntry, DEFAULT_HISTORY_CAPACITY};
pub use import::{parse_decimal, parse_rate, BatchDeal, CommissionImportError, CommissionImporter};
pub use report::{CommissionBatchReport, CommissionBatchSummary, CommissionTotals};
pub use router::commission_router;
pub use service::CommissionDesk;
pub use tiers::{AgentTier, TierProgress, TierTable, TierTableError};
pub use views::{format_brl, format_rate, CommissionView, TierProgressView, TierView};
