use std::fmt;

use serde::{Deserialize, Serialize};

/// The six ordinal grade tiers of the Taiwan junior-high exam rubric.
///
/// Serialized as the Chinese tier labels the completion endpoint emits and
/// the persisted history stores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum GradeTier {
    #[serde(rename = "一級分")]
    Tier1,
    #[serde(rename = "二級分")]
    Tier2,
    #[serde(rename = "三級分")]
    Tier3,
    #[serde(rename = "四級分")]
    Tier4,
    #[serde(rename = "五級分")]
    Tier5,
    #[serde(rename = "六級分")]
    Tier6,
}

impl GradeTier {
    /// Map a 0–100 score onto its tier.
    ///
    /// Bands are closed-open except the top band, which is 90–100 inclusive.
    /// Every score display and export goes through this one mapping.
    pub fn from_score(score: u8) -> Self {
        if score >= 90 {
            Self::Tier6
        } else if score >= 80 {
            Self::Tier5
        } else if score >= 70 {
            Self::Tier4
        } else if score >= 60 {
            Self::Tier3
        } else if score >= 50 {
            Self::Tier2
        } else {
            Self::Tier1
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Tier1 => "一級分",
            Self::Tier2 => "二級分",
            Self::Tier3 => "三級分",
            Self::Tier4 => "四級分",
            Self::Tier5 => "五級分",
            Self::Tier6 => "六級分",
        }
    }
}

impl fmt::Display for GradeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
