//! Risk tier vocabulary.
//!
//! The four ordinal tiers follow the WHO guidance on total cardiovascular
//! risk. Classification from a percentage lives in `ihd-core`; this module
//! only defines the tiers and their labels.

use serde::{Deserialize, Serialize};

/// One of four ordinal severity tiers. Ordering follows severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskTier {
    /// All tiers, least to most severe.
    pub const ALL: [RiskTier; 4] = [Self::Low, Self::Moderate, Self::High, Self::VeryHigh];

    /// Short label stored on records as `risk_result`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }

    /// Label used in charts and by the prediction service as `risk_level`.
    pub fn display_label(&self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Moderate => "Moderate Risk",
            Self::High => "High Risk",
            Self::VeryHigh => "Very High Risk",
        }
    }

    /// Inclusive lower bound of the tier, in percent.
    pub fn lower_bound(&self) -> f64 {
        match self {
            Self::Low => 0.0,
            Self::Moderate => 10.0,
            Self::High => 20.0,
            Self::VeryHigh => 30.0,
        }
    }

    /// Human-readable percentage band for reference tables.
    pub fn range_label(&self) -> &'static str {
        match self {
            Self::Low => "Less than 10%",
            Self::Moderate => "10% to less than 20%",
            Self::High => "20% to less than 30%",
            Self::VeryHigh => "30% or more",
        }
    }

    /// Management guidance for the tier.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => {
                "Low risk does not mean no risk. Conservative management focusing on lifestyle interventions is suggested."
            }
            Self::Moderate => {
                "Moderate risk of fatal or non-fatal vascular events. Monitor risk profile every 6-12 months."
            }
            Self::High => {
                "High risk of fatal or non-fatal vascular events. Monitor risk profile every 3-6 months."
            }
            Self::VeryHigh => {
                "Very high risk of fatal or non-fatal vascular events. Monitor risk profile every 3-6 months."
            }
        }
    }

    /// Exact match on the short label only. Used when tallying stored records.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }

    /// Match either the short or the display label.
    pub fn parse_any(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.label() == label || t.display_label() == label)
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
