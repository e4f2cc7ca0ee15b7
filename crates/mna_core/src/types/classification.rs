//! Company classification tags.
//!
//! The engine does not classify companies itself. An external classifier
//! (rule-based or model-assisted) supplies a [`Classification`], and the
//! valuation tables are keyed on it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Growth stage of a company.
///
/// Drives default assumptions, beta multipliers, terminal-value tables,
/// control premiums, financing mixes and multiple premiums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthStage {
    /// Revenue growth well above 30% a year
    HyperGrowth,
    /// Revenue growth of roughly 15-30% a year
    HighGrowth,
    /// Revenue growth of roughly 5-15% a year
    ModerateGrowth,
    /// Low single-digit growth, stable margins
    Mature,
    /// Shrinking revenue
    Declining,
}

impl GrowthStage {
    /// All stages, fastest growing first.
    pub fn all() -> [Self; 5] {
        [
            Self::HyperGrowth,
            Self::HighGrowth,
            Self::ModerateGrowth,
            Self::Mature,
            Self::Declining,
        ]
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::HyperGrowth => "Hyper Growth",
            Self::HighGrowth => "High Growth",
            Self::ModerateGrowth => "Moderate Growth",
            Self::Mature => "Mature",
            Self::Declining => "Declining",
        }
    }
}

impl fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for GrowthStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "hyper_growth" | "hyper" => Ok(Self::HyperGrowth),
            "high_growth" | "high" => Ok(Self::HighGrowth),
            "moderate_growth" | "moderate" | "growth" => Ok(Self::ModerateGrowth),
            "mature" => Ok(Self::Mature),
            "declining" | "decline" => Ok(Self::Declining),
            _ => Err(format!("Unknown growth stage: {}", s)),
        }
    }
}

/// Industry sector of a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    /// Software, internet, semiconductors
    Technology,
    /// Pharma, biotech, providers, devices
    Healthcare,
    /// Banks, insurers, asset managers
    FinancialServices,
    /// Consumer staples and discretionary
    Consumer,
    /// Manufacturing, transport, aerospace
    Industrials,
    /// Oil, gas, renewables
    Energy,
    /// Regulated utilities
    Utilities,
    /// Real estate owners and operators
    RealEstate,
    /// Carriers and media networks
    Telecommunications,
    /// Anything the classifier could not place
    Other,
}

impl Industry {
    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Technology => "Technology",
            Self::Healthcare => "Healthcare",
            Self::FinancialServices => "Financial Services",
            Self::Consumer => "Consumer",
            Self::Industrials => "Industrials",
            Self::Energy => "Energy",
            Self::Utilities => "Utilities",
            Self::RealEstate => "Real Estate",
            Self::Telecommunications => "Telecommunications",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Industry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "technology" | "tech" => Ok(Self::Technology),
            "healthcare" | "health_care" => Ok(Self::Healthcare),
            "financial_services" | "financials" | "finance" => Ok(Self::FinancialServices),
            "consumer" => Ok(Self::Consumer),
            "industrials" | "industrial" => Ok(Self::Industrials),
            "energy" => Ok(Self::Energy),
            "utilities" | "utility" => Ok(Self::Utilities),
            "real_estate" => Ok(Self::RealEstate),
            "telecommunications" | "telecom" => Ok(Self::Telecommunications),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown industry: {}", s)),
        }
    }
}

/// Classifier output consumed by the valuation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Growth stage tag
    pub growth_stage: GrowthStage,
    /// Industry tag
    pub industry: Industry,
}

impl Classification {
    /// Create a classification.
    pub fn new(growth_stage: GrowthStage, industry: Industry) -> Self {
        Self {
            growth_stage,
            industry,
        }
    }
}
