use super::domain::{AgentLevel, CommissionResult, DealType, InputAdvisory, TierMatch};
use super::history::HistoryEntry;
use super::tiers::{AgentTier, TierProgress, TierTable};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Renders an amount as Brazilian reais, e.g. `R$ 12.500,00`.
pub fn format_brl(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}R$ {grouped},{cents}")
}

/// Renders a fraction as a percentage, e.g. `0.025` as `2.5%`.
///
/// A rate too large to scale is shown as the bare fraction.
pub fn format_rate(rate: Decimal) -> String {
    match rate.checked_mul(Decimal::ONE_HUNDRED) {
        Some(percent) => format!("{}%", percent.normalize()),
        None => rate.normalize().to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommissionView {
    #[serde(flatten)]
    pub result: CommissionResult,
    pub deal_type_label: &'static str,
    pub agent_level_label: &'static str,
    pub applied_tier_label: &'static str,
    pub effective_rate_display: String,
    pub base_commission_display: String,
    pub final_commission_display: String,
    pub advisories: Vec<InputAdvisory>,
}

impl CommissionView {
    pub fn new(result: CommissionResult, advisories: Vec<InputAdvisory>) -> Self {
        Self {
            deal_type_label: result.deal_type.label(),
            agent_level_label: result.agent_level.label(),
            applied_tier_label: result.applied_tier.label(),
            effective_rate_display: format_rate(result.effective_rate),
            base_commission_display: format_brl(result.base_commission),
            final_commission_display: format_brl(result.final_commission),
            advisories,
            result,
        }
    }

    pub fn used_fallback(&self) -> bool {
        self.result.tier_match == TierMatch::Fallback
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntryView {
    pub recorded_at: DateTime<Utc>,
    pub property_value: Decimal,
    pub deal_type: DealType,
    pub agent_level: AgentLevel,
    pub effective_rate: Decimal,
    pub final_commission: Decimal,
    pub final_commission_display: String,
}

impl From<&HistoryEntry> for HistoryEntryView {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            recorded_at: entry.recorded_at,
            property_value: entry.result.property_value,
            deal_type: entry.result.deal_type,
            agent_level: entry.result.agent_level,
            effective_rate: entry.result.effective_rate,
            final_commission: entry.result.final_commission,
            final_commission_display: format_brl(entry.result.final_commission),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TierView {
    pub level: AgentLevel,
    pub level_label: &'static str,
    pub min_deals: u32,
    pub base_rate: Decimal,
    pub base_rate_display: String,
    pub bonus_multiplier: Decimal,
    pub next_level: Option<AgentLevel>,
}

impl TierView {
    pub fn all(table: &TierTable) -> Vec<Self> {
        table
            .tiers()
            .iter()
            .map(|tier| Self {
                level: tier.level,
                level_label: tier.level.label(),
                min_deals: tier.min_deals,
                base_rate: tier.base_rate,
                base_rate_display: format_rate(tier.base_rate),
                bonus_multiplier: tier.bonus_multiplier(),
                next_level: table.next_tier(tier.level).map(|next| next.level),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TierProgressView {
    pub current: AgentTier,
    pub current_label: &'static str,
    pub next: Option<AgentTier>,
    pub next_label: Option<&'static str>,
    pub closed_deals: u32,
    pub deals_remaining: u32,
    pub percent_complete: u8,
}

impl From<TierProgress> for TierProgressView {
    fn from(progress: TierProgress) -> Self {
        Self {
            current_label: progress.current.level.label(),
            next_label: progress.next.as_ref().map(|tier| tier.level.label()),
            current: progress.current,
            next: progress.next,
            closed_deals: progress.closed_deals,
            deals_remaining: progress.deals_remaining,
            percent_complete: progress.percent_complete,
        }
    }
}
