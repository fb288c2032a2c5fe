use std::io::Read;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{AgentLevel, CommissionInput};
use super::engine::compute_commission;
use super::history::CalculationHistory;
use super::import::{CommissionImportError, CommissionImporter};
use super::report::CommissionBatchReport;
use super::tiers::{TierProgress, TierTable};
use super::views::{CommissionView, HistoryEntryView};

/// Owns the loaded tier table and this session's calculation history.
///
/// The engine stays stateless; the desk is the caller that keeps results around.
pub struct CommissionDesk {
    tiers: Arc<TierTable>,
    history: Mutex<CalculationHistory>,
}

impl CommissionDesk {
    pub fn new(tiers: Arc<TierTable>, history_capacity: usize) -> Self {
        Self {
            tiers,
            history: Mutex::new(CalculationHistory::with_capacity(history_capacity)),
        }
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    pub fn calculate(&self, input: CommissionInput) -> CommissionView {
        let result = compute_commission(&input, &self.tiers);
        let advisories = input.advisories_for(&result);

        if !advisories.is_empty() {
            warn!(
                agent_level = result.agent_level.key(),
                ?advisories,
                "commission computed from out-of-domain input"
            );
        }
        info!(
            agent_level = result.agent_level.key(),
            applied_tier = result.applied_tier.key(),
            deal_type = result.deal_type.key(),
            final_commission = %result.final_commission,
            "commission calculated"
        );

        self.lock_history().record(result.clone(), Utc::now());
        CommissionView::new(result, advisories)
    }

    pub fn history(&self) -> Vec<HistoryEntryView> {
        self.lock_history()
            .entries()
            .map(HistoryEntryView::from)
            .collect()
    }

    pub fn clear_history(&self) {
        self.lock_history().clear();
    }

    pub fn progress(&self, level: AgentLevel, closed_deals: u32) -> TierProgress {
        self.tiers.progress(level, closed_deals)
    }

    /// Imports a deal CSV and reports on it. Batch results are not recorded in history.
    pub fn batch<R: Read>(&self, reader: R) -> Result<CommissionBatchReport, CommissionImportError> {
        let deals = CommissionImporter::from_reader(reader)?;
        let report = CommissionBatchReport::build(deals, &self.tiers);
        info!(
            deals = report.totals.deals,
            fallback_matches = report.fallback_matches,
            final_commission = %report.totals.final_commission,
            "commission batch processed"
        );
        Ok(report)
    }

    fn lock_history(&self) -> MutexGuard<'_, CalculationHistory> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CommissionDesk {
    fn default() -> Self {
        Self::new(
            Arc::new(TierTable::standard()),
            super::history::DEFAULT_HISTORY_CAPACITY,
        )
    }
}
