//! Risk Categorizer Component
//!
//! Maps a phishing probability onto five ordered risk bands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered risk bands, ascending by probability threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    VerySafe,
    LowRisk,
    Suspicious,
    HighRisk,
    Critical,
}

impl RiskCategory {
    /// Lower bound of each band, in ascending order
    pub const THRESHOLDS: [(f64, RiskCategory); 5] = [
        (0.0, RiskCategory::VerySafe),
        (0.15, RiskCategory::LowRisk),
        (0.35, RiskCategory::Suspicious),
        (0.60, RiskCategory::HighRisk),
        (0.85, RiskCategory::Critical),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::VerySafe => "Very Safe",
            RiskCategory::LowRisk => "Low Risk",
            RiskCategory::Suspicious => "Suspicious",
            RiskCategory::HighRisk => "High Risk",
            RiskCategory::Critical => "Critical (Likely Phishing)",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Step function over half-open bands `[lower, next_lower)`; the last band
/// is closed at 1.0. Values under 0 fall in the first band, values over 1
/// and NaN in the last.
pub fn categorize(probability: f64) -> RiskCategory {
    if probability < 0.15 {
        RiskCategory::VerySafe
    } else if probability < 0.35 {
        RiskCategory::LowRisk
    } else if probability < 0.60 {
        RiskCategory::Suspicious
    } else if probability < 0.85 {
        RiskCategory::HighRisk
    } else {
        RiskCategory::Critical
    }
}
