use super::domain::{AgentLevel, CommissionResult, DealType, InputAdvisory, TierMatch};
use super::engine::compute_commission;
use super::import::BatchDeal;
use super::tiers::TierTable;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CommissionTotals {
    pub deals: usize,
    pub property_value: Decimal,
    pub base_commission: Decimal,
    pub final_commission: Decimal,
}

impl CommissionTotals {
    fn add(&mut self, result: &CommissionResult) {
        self.deals += 1;
        self.property_value = self.property_value.saturating_add(result.property_value);
        self.base_commission = self.base_commission.saturating_add(result.base_commission);
        self.final_commission = self.final_commission.saturating_add(result.final_commission);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntry {
    pub deal_id: String,
    pub result: CommissionResult,
    pub advisories: Vec<InputAdvisory>,
}

#[derive(Debug, Default)]
pub struct CommissionBatchReport {
    pub entries: Vec<BatchEntry>,
    pub by_level: HashMap<AgentLevel, CommissionTotals>,
    pub by_deal_type: HashMap<DealType, CommissionTotals>,
    pub totals: CommissionTotals,
    pub fallback_matches: usize,
}

impl CommissionBatchReport {
    pub fn build(deals: Vec<BatchDeal>, tiers: &TierTable) -> Self {
        let mut report = Self::default();

        for deal in deals {
            let result = compute_commission(&deal.input, tiers);

            report.by_level.entry(result.agent_level).or_default().add(&result);
            report
                .by_deal_type
                .entry(result.deal_type)
                .or_default()
                .add(&result);
            report.totals.add(&result);
            if result.tier_match == TierMatch::Fallback {
                report.fallback_matches += 1;
            }

            report.entries.push(BatchEntry {
                deal_id: deal.deal_id,
                advisories: deal.input.advisories_for(&result),
                result,
            });
        }

        report
    }

    pub fn flagged_deals(&self) -> impl Iterator<Item = &BatchEntry> {
        self.entries
            .iter()
            .filter(|entry| !entry.advisories.is_empty())
    }

    pub fn summary(&self) -> CommissionBatchSummary {
        let by_level = AgentLevel::ordered()
            .into_iter()
            .filter_map(|level| {
                self.by_level.get(&level).map(|totals| LevelTotalsEntry {
                    level,
                    level_label: level.label().to_string(),
                    totals: totals.clone(),
                })
            })
            .collect();

        let by_deal_type = DealType::ordered()
            .into_iter()
            .filter_map(|deal_type| {
                self.by_deal_type
                    .get(&deal_type)
                    .map(|totals| DealTypeTotalsEntry {
                        deal_type,
                        deal_type_label: deal_type.label().to_string(),
                        totals: totals.clone(),
                    })
            })
            .collect();

        let flagged_deals = self
            .flagged_deals()
            .map(|entry| FlaggedDealView {
                deal_id: entry.deal_id.clone(),
                advisories: entry
                    .advisories
                    .iter()
                    .map(|advisory| advisory.label().to_string())
                    .collect(),
            })
            .collect();

        CommissionBatchSummary {
            by_level,
            by_deal_type,
            totals: self.totals.clone(),
            fallback_matches: self.fallback_matches,
            flagged_deals,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LevelTotalsEntry {
    pub level: AgentLevel,
    pub level_label: String,
    #[serde(flatten)]
    pub totals: CommissionTotals,
}

#[derive(Debug, Clone, Serialize)]
pub struct DealTypeTotalsEntry {
    pub deal_type: DealType,
    pub deal_type_label: String,
    #[serde(flatten)]
    pub totals: CommissionTotals,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlaggedDealView {
    pub deal_id: String,
    pub advisories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommissionBatchSummary {
    pub by_level: Vec<LevelTotalsEntry>,
    pub by_deal_type: Vec<DealTypeTotalsEntry>,
    pub totals: CommissionTotals,
    pub fallback_matches: usize,
    pub flagged_deals: Vec<FlaggedDealView>,
}
