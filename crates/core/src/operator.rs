//! Operator classification: experience ladder and decision strategy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How much an operator has worked with the assistant, and how closely
/// their decisions track the recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Novice,
    Beginner,
    Practitioner,
    Experienced,
    Expert,
}

impl ExperienceLevel {
    /// Ladder by decision count; Expert additionally requires staying
    /// within 15% of the recommendation on average.
    pub fn from_stats(total_decisions: u32, mean_abs_deviation: f64) -> ExperienceLevel {
        if total_decisions < 5 {
            ExperienceLevel::Novice
        } else if total_decisions < 15 {
            ExperienceLevel::Beginner
        } else if total_decisions < 30 {
            ExperienceLevel::Practitioner
        } else if total_decisions < 50 {
            ExperienceLevel::Experienced
        } else if mean_abs_deviation < 0.15 {
            ExperienceLevel::Expert
        } else {
            ExperienceLevel::Experienced
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Novice => "novice",
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Practitioner => "practitioner",
            ExperienceLevel::Experienced => "experienced",
            ExperienceLevel::Expert => "expert",
        }
    }
}

impl Default for ExperienceLevel {
    fn default() -> Self {
        ExperienceLevel::Novice
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Characterization of an operator's deviation pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Follows recommendations closely.
    Precise,
    /// Consistently runs hotter than recommended.
    Aggressive,
    /// Consistently runs cooler than recommended.
    Conservative,
    /// No stable pattern.
    Adaptive,
}

impl Strategy {
    /// Classify a single relative deviation.
    pub fn from_deviation(deviation: f64) -> Strategy {
        if deviation.abs() < 0.1 {
            Strategy::Precise
        } else if deviation > 0.3 {
            Strategy::Aggressive
        } else if deviation < -0.3 {
            Strategy::Conservative
        } else {
            Strategy::Adaptive
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Precise => "precise",
            Strategy::Aggressive => "aggressive",
            Strategy::Conservative => "conservative",
            Strategy::Adaptive => "adaptive",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_thresholds() {
        assert_eq!(ExperienceLevel::from_stats(0, 0.0), ExperienceLevel::Novice);
        assert_eq!(ExperienceLevel::from_stats(5, 0.0), ExperienceLevel::Beginner);
        assert_eq!(ExperienceLevel::from_stats(15, 0.0), ExperienceLevel::Practitioner);
        assert_eq!(ExperienceLevel::from_stats(30, 0.0), ExperienceLevel::Experienced);
        assert_eq!(ExperienceLevel::from_stats(60, 0.1), ExperienceLevel::Expert);
        // High deviation keeps a prolific operator at Experienced.
        assert_eq!(ExperienceLevel::from_stats(60, 0.4), ExperienceLevel::Experienced);
    }

    #[test]
    fn strategy_bands() {
        assert_eq!(Strategy::from_deviation(0.05), Strategy::Precise);
        assert_eq!(Strategy::from_deviation(0.5), Strategy::Aggressive);
        assert_eq!(Strategy::from_deviation(-0.5), Strategy::Conservative);
        assert_eq!(Strategy::from_deviation(0.2), Strategy::Adaptive);
    }
}
