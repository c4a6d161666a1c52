use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subscription tier of an account.
///
/// Ordered from least to most capable, although individual limits do not
/// all grow in lockstep (page caps and seat counts scale independently).
#[derive(
    sqlx::Type, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[sqlx(rename_all = "lowercase", type_name = "varchar")]
#[serde(rename_all = "lowercase")]
pub enum PricingTier {
    Free,
    Starter,
    Pro,
    Team,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown pricing tier: {0}")]
pub struct UnknownTier(pub String);

impl PricingTier {
    pub const ALL: [PricingTier; 4] = [
        PricingTier::Free,
        PricingTier::Starter,
        PricingTier::Pro,
        PricingTier::Team,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PricingTier::Free => "free",
            PricingTier::Starter => "starter",
            PricingTier::Pro => "pro",
            PricingTier::Team => "team",
        }
    }

    pub fn is_paid(&self) -> bool {
        !matches!(self, PricingTier::Free)
    }
}

impl Default for PricingTier {
    fn default() -> Self {
        PricingTier::Free
    }
}

impl fmt::Display for PricingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricingTier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(PricingTier::Free),
            "starter" => Ok(PricingTier::Starter),
            "pro" => Ok(PricingTier::Pro),
            "team" => Ok(PricingTier::Team),
            other => Err(UnknownTier(other.to_string())),
        }
    }
}
