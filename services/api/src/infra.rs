use metrics_exporter_prometheus::PrometheusHandle;
use realty_desk::commission::{self, AgentLevel, DealType, TierTable};
use realty_desk::config::AppConfig;
use realty_desk::error::AppError;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_amount(raw: &str) -> Result<Decimal, String> {
    commission::parse_decimal(raw)
        .map_err(|err| format!("failed to parse '{raw}' as an amount ({err})"))
}

/// Accepts fractions (`0.05`) or percentages (`5%`), the same spellings as the CSV import.
pub(crate) fn parse_rate(raw: &str) -> Result<Decimal, String> {
    commission::parse_rate(raw).map_err(|err| format!("failed to parse '{raw}' as a rate ({err})"))
}

pub(crate) fn parse_level(raw: &str) -> Result<AgentLevel, String> {
    raw.parse::<AgentLevel>().map_err(|err| err.to_string())
}

pub(crate) fn parse_deal_type(raw: &str) -> Result<DealType, String> {
    raw.parse::<DealType>().map_err(|err| err.to_string())
}

/// Tier table for CLI commands: an explicit path wins over `APP_TIER_TABLE`.
pub(crate) fn load_tiers(explicit: Option<PathBuf>) -> Result<TierTable, AppError> {
    match explicit {
        Some(path) => Ok(TierTable::from_path(path)?),
        None => {
            let config = AppConfig::load()?;
            Ok(config.commission.load_tiers()?)
        }
    }
}
