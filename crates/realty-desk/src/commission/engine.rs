use super::domain::{CommissionInput, CommissionResult, TierMatch};
use super::tiers::TierTable;
use rust_decimal::Decimal;

/// Computes the commission breakdown for one deal.
///
/// The tier is looked up by level; a level absent from the table falls back to the lowest
/// tier and the result is tagged [`TierMatch::Fallback`]. An override rate replaces the
/// tier's base rate but never its bonus. Inputs are not clamped; a product beyond the
/// `Decimal` range is capped at the limit and the result is marked `saturated`.
pub fn compute_commission(input: &CommissionInput, tiers: &TierTable) -> CommissionResult {
    let (tier, tier_match) = match tiers.get(input.agent_level) {
        Some(tier) => (tier, TierMatch::Exact),
        None => (tiers.lowest(), TierMatch::Fallback),
    };

    let effective_rate = input.override_rate.unwrap_or(tier.base_rate);
    let (base_commission, base_capped) = capped_product(input.property_value, effective_rate);
    let bonus_multiplier = tier.bonus_multiplier();
    let (final_commission, final_capped) = capped_product(base_commission, bonus_multiplier);

    CommissionResult {
        property_value: input.property_value,
        deal_type: input.deal_type,
        agent_level: input.agent_level,
        applied_tier: tier.level,
        tier_match,
        effective_rate,
        rate_overridden: input.override_rate.is_some(),
        base_commission,
        bonus_multiplier,
        final_commission,
        saturated: base_capped || final_capped,
    }
}

fn capped_product(lhs: Decimal, rhs: Decimal) -> (Decimal, bool) {
    match lhs.checked_mul(rhs) {
        Some(product) => (product, false),
        None => (lhs.saturating_mul(rhs), true),
    }
}
