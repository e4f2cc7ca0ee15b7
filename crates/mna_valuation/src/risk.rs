//! Qualitative risk levels.

use serde::Serialize;
use std::fmt;

/// Four-step risk scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Score 1
    Low,
    /// Score 2
    Moderate,
    /// Score 3
    High,
    /// Score 4
    VeryHigh,
}

impl RiskLevel {
    /// Numeric score, 1 (low) to 4 (very high).
    pub fn score(&self) -> u8 {
        match self {
            RiskLevel::Low => 1,
            RiskLevel::Moderate => 2,
            RiskLevel::High => 3,
            RiskLevel::VeryHigh => 4,
        }
    }

    /// Level for a score; values above 4 saturate.
    pub fn from_score(score: u8) -> Self {
        match score {
            0 | 1 => RiskLevel::Low,
            2 => RiskLevel::Moderate,
            3 => RiskLevel::High,
            _ => RiskLevel::VeryHigh,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Moderate => write!(f, "Moderate"),
            RiskLevel::High => write!(f, "High"),
            RiskLevel::VeryHigh => write!(f, "Very High"),
        }
    }
}
