use super::domain::AgentLevel;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// A named commission bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentTier {
    pub level: AgentLevel,
    /// Qualification threshold. Informational: the engine never promotes on deal count.
    pub min_deals: u32,
    pub base_rate: Decimal,
    pub bonus_fraction: Decimal,
}

impl AgentTier {
    pub fn bonus_multiplier(&self) -> Decimal {
        Decimal::ONE.saturating_add(self.bonus_fraction)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TierTableError {
    #[error("tier table must contain at least one tier")]
    Empty,
    #[error("tier {0} appears more than once")]
    DuplicateLevel(AgentLevel),
    #[error("tier {level} must require more deals than the tier before it")]
    ThresholdNotAscending { level: AgentLevel },
    #[error("tier {level} must pay a higher base rate than the tier before it")]
    RateNotAscending { level: AgentLevel },
    #[error("tier {level} base rate {rate} is outside [0, 1]")]
    RateOutOfRange { level: AgentLevel, rate: Decimal },
    #[error("tier {level} bonus fraction {bonus} is negative")]
    NegativeBonus { level: AgentLevel, bonus: Decimal },
    #[error("failed to read tier table: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tier table JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ordered, validated, read-only list of tiers.
///
/// Construction guarantees at least one entry, so the lowest tier always exists for the
/// engine's fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TierTable {
    tiers: Vec<AgentTier>,
}

impl TierTable {
    pub fn new(tiers: Vec<AgentTier>) -> Result<Self, TierTableError> {
        validate(&tiers)?;
        Ok(Self { tiers })
    }

    /// Reference table: 2%, 2.5% +10%, 3% +20%, 3.5% +30%.
    pub fn standard() -> Self {
        Self {
            tiers: vec![
                AgentTier {
                    level: AgentLevel::Junior,
                    min_deals: 0,
                    base_rate: Decimal::new(20, 3),
                    bonus_fraction: Decimal::ZERO,
                },
                AgentTier {
                    level: AgentLevel::Senior,
                    min_deals: 10,
                    base_rate: Decimal::new(25, 3),
                    bonus_fraction: Decimal::new(10, 2),
                },
                AgentTier {
                    level: AgentLevel::Expert,
                    min_deals: 25,
                    base_rate: Decimal::new(30, 3),
                    bonus_fraction: Decimal::new(20, 2),
                },
                AgentTier {
                    level: AgentLevel::Master,
                    min_deals: 50,
                    base_rate: Decimal::new(35, 3),
                    bonus_fraction: Decimal::new(30, 2),
                },
            ],
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TierTableError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TierTableError> {
        let tiers: Vec<AgentTier> = serde_json::from_reader(reader)?;
        Self::new(tiers)
    }

    pub fn tiers(&self) -> &[AgentTier] {
        &self.tiers
    }

    pub fn lowest(&self) -> &AgentTier {
        &self.tiers[0]
    }

    pub fn get(&self, level: AgentLevel) -> Option<&AgentTier> {
        self.tiers.iter().find(|tier| tier.level == level)
    }

    fn position(&self, level: AgentLevel) -> Option<usize> {
        self.tiers.iter().position(|tier| tier.level == level)
    }

    /// Tier following `current` in table order. A level missing from the table is treated
    /// as the lowest tier, matching the engine's fallback.
    pub fn next_tier(&self, current: AgentLevel) -> Option<&AgentTier> {
        let index = self.position(current).unwrap_or(0);
        self.tiers.get(index + 1)
    }

    /// Highest tier whose threshold the deal count reaches.
    pub fn qualifying_level(&self, closed_deals: u32) -> AgentLevel {
        self.tiers
            .iter()
            .rev()
            .find(|tier| tier.min_deals <= closed_deals)
            .unwrap_or_else(|| self.lowest())
            .level
    }

    pub fn progress(&self, level: AgentLevel, closed_deals: u32) -> TierProgress {
        let current = self.get(level).unwrap_or_else(|| self.lowest());
        let next = self.next_tier(level);

        let (deals_remaining, percent_complete) = match next {
            Some(next) => {
                let remaining = next.min_deals.saturating_sub(closed_deals);
                let span = next.min_deals.saturating_sub(current.min_deals);
                let done = closed_deals.saturating_sub(current.min_deals).min(span);
                let percent = if span == 0 {
                    100
                } else {
                    (u64::from(done) * 100 / u64::from(span)) as u8
                };
                (remaining, percent)
            }
            None => (0, 100),
        };

        TierProgress {
            current: current.clone(),
            next: next.cloned(),
            closed_deals,
            deals_remaining,
            percent_complete,
        }
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Display-only distance from the current tier to the next threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierProgress {
    pub current: AgentTier,
    pub next: Option<AgentTier>,
    pub closed_deals: u32,
    pub deals_remaining: u32,
    pub percent_complete: u8,
}

fn validate(tiers: &[AgentTier]) -> Result<(), TierTableError> {
    if tiers.is_empty() {
        return Err(TierTableError::Empty);
    }

    let mut seen = HashSet::new();
    for tier in tiers {
        if !seen.insert(tier.level) {
            return Err(TierTableError::DuplicateLevel(tier.level));
        }
        if (tier.base_rate.is_sign_negative() && !tier.base_rate.is_zero())
            || tier.base_rate > Decimal::ONE
        {
            return Err(TierTableError::RateOutOfRange {
                level: tier.level,
                rate: tier.base_rate,
            });
        }
        if tier.bonus_fraction.is_sign_negative() && !tier.bonus_fraction.is_zero() {
            return Err(TierTableError::NegativeBonus {
                level: tier.level,
                bonus: tier.bonus_fraction,
            });
        }
    }

    for pair in tiers.windows(2) {
        let (previous, tier) = (&pair[0], &pair[1]);
        if tier.min_deals <= previous.min_deals {
            return Err(TierTableError::ThresholdNotAscending { level: tier.level });
        }
        if tier.base_rate <= previous.base_rate {
            return Err(TierTableError::RateNotAscending { level: tier.level });
        }
    }

    Ok(())
}
