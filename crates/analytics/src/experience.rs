//! Deviation and consistency scoring.

use serde::{Deserialize, Serialize};

use cnc_core::{MachineClass, Material, Operation, Strategy};

/// Relative deviation of the operator's rpm from the recommended one.
///
/// Clamped to [-1, +1] and rounded to 3 decimals; 0 when the
/// recommendation itself is 0 (nothing to deviate from).
pub fn deviation_score(user_rpm: f64, recommended_rpm: f64) -> f64 {
    if recommended_rpm == 0.0 {
        return 0.0;
    }
    let deviation = (user_rpm - recommended_rpm) / recommended_rpm;
    (deviation.clamp(-1.0, 1.0) * 1000.0).round() / 1000.0
}

/// A deviation weighted by how hard the job was, plus what it says about
/// the operator and their machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextScore {
    pub base_deviation: f64,
    /// Deviation divided by the complexity factor; straying on titanium
    /// counts for less than straying on aluminum.
    pub weighted_deviation: f64,
    pub complexity: f64,
    pub strategy: Strategy,
    pub inferred_machine: Option<MachineClass>,
}

fn operation_complexity(operation: Operation) -> f64 {
    match operation {
        Operation::Turning => 1.0,
        Operation::Milling => 1.2,
        Operation::Drilling => 0.8,
        Operation::Boring => 1.3,
    }
}

pub fn context_weighted_score(
    user_rpm: f64,
    recommended_rpm: f64,
    material: Material,
    operation: Operation,
) -> ContextScore {
    let base = deviation_score(user_rpm, recommended_rpm);
    let complexity = material.machinability() * operation_complexity(operation);
    let weighted = if complexity > 0.0 { base / complexity } else { base };

    let strategy = Strategy::from_deviation(base);
    let inferred_machine = match strategy {
        Strategy::Aggressive if user_rpm > 3000.0 => Some(MachineClass::HighSpeedCnc),
        Strategy::Conservative if user_rpm < 1000.0 => Some(MachineClass::Universal),
        Strategy::Precise => Some(MachineClass::CncLathe),
        _ => None,
    };

    ContextScore {
        base_deviation: base,
        weighted_deviation: weighted,
        complexity,
        strategy,
        inferred_machine,
    }
}

/// Consistency of an operator's |deviation| samples: 1/(1+5σ).
///
/// None under 3 samples - two data points say nothing about habit.
pub fn consistency_score(abs_deviations: &[f64]) -> Option<f64> {
    if abs_deviations.len() < 3 {
        return None;
    }
    let n = abs_deviations.len() as f64;
    let mean = abs_deviations.iter().sum::<f64>() / n;
    let variance = abs_deviations
        .iter()
        .map(|d| (d - mean).powi(2))
        .sum::<f64>()
        / n;
    let std_dev = variance.sqrt();
    Some(((1.0 / (1.0 + std_dev * 5.0)) * 1000.0).round() / 1000.0)
}
