//! Risk Classification
//!
//! Maps a flood probability to one of three risk bands. The bands are
//! half-open: [0, 0.3) Low, [0.3, 0.7) Medium, [0.7, 1] High.

use serde::{Deserialize, Serialize};

/// Lowest probability classified as Medium
pub const LOW_RISK_UPPER: f64 = 0.3;

/// Lowest probability classified as High
pub const HIGH_RISK_LOWER: f64 = 0.7;

/// Cut-off used for the binary classification report
pub const DECISION_THRESHOLD: f64 = 0.5;

// ============================================================================
// RISK LEVEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "High Risk")]
    High,
}

impl RiskLevel {
    /// Classify an unrounded probability
    pub fn from_probability(probability: f64) -> Self {
        if probability < LOW_RISK_UPPER {
            RiskLevel::Low
        } else if probability < HIGH_RISK_LOWER {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    /// Label returned to API clients
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }

    pub fn severity_level(&self) -> u8 {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Medium => 1,
            RiskLevel::High => 2,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Binary prediction at [`DECISION_THRESHOLD`]
pub fn predicted_label(probability: f64) -> u8 {
    u8::from(probability >= DECISION_THRESHOLD)
}
