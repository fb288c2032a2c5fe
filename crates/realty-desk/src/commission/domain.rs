use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Commission bracket an agent belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentLevel {
    Junior,
    Senior,
    Expert,
    Master,
}

impl AgentLevel {
    pub const fn ordered() -> [Self; 4] {
        [Self::Junior, Self::Senior, Self::Expert, Self::Master]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Junior => "Junior",
            Self::Senior => "Senior",
            Self::Expert => "Expert",
            Self::Master => "Master",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Junior => "junior",
            Self::Senior => "senior",
            Self::Expert => "expert",
            Self::Master => "master",
        }
    }
}

impl fmt::Display for AgentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AgentLevel {
    type Err = ParseLabelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|level| level.key() == normalized)
            .ok_or_else(|| ParseLabelError {
                kind: "agent level",
                value: value.trim().to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealType {
    Sale,
    Rent,
}

impl DealType {
    pub const fn ordered() -> [Self; 2] {
        [Self::Sale, Self::Rent]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Sale => "Sale",
            Self::Rent => "Rent",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Rent => "rent",
        }
    }
}

impl fmt::Display for DealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DealType {
    type Err = ParseLabelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|deal_type| deal_type.key() == normalized)
            .ok_or_else(|| ParseLabelError {
                kind: "deal type",
                value: value.trim().to_string(),
            })
    }
}

/// Raised when free text does not name a known enum variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub value: String,
}

/// Values supplied by the caller for a single calculation.
///
/// Numbers are taken as given: negative prices or rates outside `[0, 1]` flow through the
/// arithmetic unchanged. Use [`CommissionInput::advisories`] to surface them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionInput {
    pub property_value: Decimal,
    #[serde(default = "default_deal_type")]
    pub deal_type: DealType,
    pub agent_level: AgentLevel,
    #[serde(default)]
    pub override_rate: Option<Decimal>,
}

fn default_deal_type() -> DealType {
    DealType::Sale
}

impl CommissionInput {
    pub fn new(property_value: Decimal, deal_type: DealType, agent_level: AgentLevel) -> Self {
        Self {
            property_value,
            deal_type,
            agent_level,
            override_rate: None,
        }
    }

    pub fn with_override_rate(mut self, rate: Decimal) -> Self {
        self.override_rate = Some(rate);
        self
    }

    pub fn advisories(&self) -> Vec<InputAdvisory> {
        let mut advisories = Vec::new();

        if self.property_value.is_sign_negative() && !self.property_value.is_zero() {
            advisories.push(InputAdvisory::NegativePropertyValue);
        }

        if let Some(rate) = self.override_rate {
            if rate.is_sign_negative() && !rate.is_zero() {
                advisories.push(InputAdvisory::NegativeOverrideRate);
            } else if rate > Decimal::ONE {
                advisories.push(InputAdvisory::OverrideRateAboveOne);
            }
        }

        advisories
    }

    /// Input advisories plus those raised by the computed result.
    pub fn advisories_for(&self, result: &CommissionResult) -> Vec<InputAdvisory> {
        let mut advisories = self.advisories();
        if result.saturated {
            advisories.push(InputAdvisory::CommissionSaturated);
        }
        advisories
    }
}

/// Out-of-domain input that was computed anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputAdvisory {
    NegativePropertyValue,
    NegativeOverrideRate,
    OverrideRateAboveOne,
    /// An intermediate product left the `Decimal` range and was capped at its limit.
    CommissionSaturated,
}

impl InputAdvisory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NegativePropertyValue => "property value is negative",
            Self::NegativeOverrideRate => "override rate is negative",
            Self::OverrideRateAboveOne => "override rate exceeds 100%",
            Self::CommissionSaturated => "commission exceeds the representable range and was capped",
        }
    }
}

/// How the tier used for a calculation was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierMatch {
    Exact,
    /// The requested level is absent from the table; the lowest tier was used.
    Fallback,
}

/// Breakdown returned by the engine. Values keep full precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionResult {
    pub property_value: Decimal,
    pub deal_type: DealType,
    pub agent_level: AgentLevel,
    pub applied_tier: AgentLevel,
    pub tier_match: TierMatch,
    pub effective_rate: Decimal,
    /// True when the caller's override replaced the tier's base rate.
    pub rate_overridden: bool,
    pub base_commission: Decimal,
    pub bonus_multiplier: Decimal,
    pub final_commission: Decimal,
    /// True when an amount was capped at the `Decimal` limit instead of overflowing.
    pub saturated: bool,
}

impl CommissionResult {
    pub fn bonus_amount(&self) -> Decimal {
        self.final_commission.saturating_sub(self.base_commission)
    }
}
