//! Risk scoring result and category thresholds

use crate::error::RiskcastError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity category derived from a risk probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskCategory::Low => "low",
            RiskCategory::Medium => "medium",
            RiskCategory::High => "high",
            RiskCategory::Critical => "critical",
        };
        write!(f, "{label}")
    }
}

/// Category cut points. Tunable policy data, not hardwired logic;
/// must be strictly increasing and lie within (0, 1).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Probabilities below this are Low
    #[serde(default = "default_medium")]
    pub medium: f64,
    /// Probabilities below this (and >= medium) are Medium
    #[serde(default = "default_high")]
    pub high: f64,
    /// Probabilities below this (and >= high) are High; above, Critical
    #[serde(default = "default_critical")]
    pub critical: f64,
}

fn default_medium() -> f64 {
    0.3
}

fn default_high() -> f64 {
    0.6
}

fn default_critical() -> f64 {
    0.85
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            medium: default_medium(),
            high: default_high(),
            critical: default_critical(),
        }
    }
}

impl RiskThresholds {
    /// Validate that cut points are strictly increasing within (0, 1)
    pub fn validate(&self) -> Result<(), RiskcastError> {
        let ordered = 0.0 < self.medium
            && self.medium < self.high
            && self.high < self.critical
            && self.critical < 1.0;
        if !ordered {
            return Err(RiskcastError::config(format!(
                "Risk thresholds must be strictly increasing within (0, 1), got: {:.2} / {:.2} / {:.2}",
                self.medium, self.high, self.critical
            )));
        }
        Ok(())
    }

    /// Map a probability to its category. Non-decreasing step function.
    #[must_use]
    pub fn categorize(&self, probability: f64) -> RiskCategory {
        if probability < self.medium {
            RiskCategory::Low
        } else if probability < self.high {
            RiskCategory::Medium
        } else if probability < self.critical {
            RiskCategory::High
        } else {
            RiskCategory::Critical
        }
    }
}

/// Outcome of a risk prediction. Derived per request, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    /// Emergency probability in [0, 1]
    pub probability: f64,
    /// Category under the active thresholds
    pub category: RiskCategory,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, RiskCategory::Low)]
    #[case(0.29, RiskCategory::Low)]
    #[case(0.3, RiskCategory::Medium)]
    #[case(0.59, RiskCategory::Medium)]
    #[case(0.6, RiskCategory::High)]
    #[case(0.84, RiskCategory::High)]
    #[case(0.85, RiskCategory::Critical)]
    #[case(1.0, RiskCategory::Critical)]
    fn test_default_categorization(#[case] probability: f64, #[case] expected: RiskCategory) {
        let thresholds = RiskThresholds::default();
        assert_eq!(thresholds.categorize(probability), expected);
    }

    #[test]
    fn test_category_is_monotonic() {
        let thresholds = RiskThresholds::default();
        let mut previous = RiskCategory::Low;
        for step in 0..=100 {
            let p = f64::from(step) / 100.0;
            let category = thresholds.categorize(p);
            assert!(category >= previous, "category decreased at p={p}");
            previous = category;
        }
        assert_eq!(thresholds.categorize(0.0), RiskCategory::Low);
        assert_eq!(thresholds.categorize(1.0), RiskCategory::Critical);
    }

    #[test]
    fn test_threshold_validation() {
        assert!(RiskThresholds::default().validate().is_ok());

        let inverted = RiskThresholds {
            medium: 0.6,
            high: 0.3,
            critical: 0.85,
        };
        assert!(inverted.validate().is_err());

        let out_of_range = RiskThresholds {
            medium: 0.3,
            high: 0.6,
            critical: 1.0,
        };
        assert!(out_of_range.validate().is_err());
    }
}
