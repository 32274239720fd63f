//! Cutting parameters, pass plans and the recommendation bundle.

use serde::{Deserialize, Serialize};

use crate::operation::{CutMode, Operation};
use crate::material::Material;

/// The numbers an operator dials into the machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CuttingParameters {
    /// Cutting speed, m/min.
    pub vc_m_min: f64,
    /// Spindle speed, rpm.
    pub rpm: f64,
    /// Feed, mm/rev (or mm/tooth for milling).
    pub feed_mm: f64,
    /// Depth of cut per pass, mm.
    pub ap_mm: f64,
    /// Estimated cutting power, kW.
    pub power_kw: f64,
}

/// One pass of a multi-pass removal strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pass {
    pub number: u32,
    pub ap_mm: f64,
    pub mode: CutMode,
}

/// Stock split into passes at a target depth of cut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassPlan {
    pub passes: Vec<Pass>,
    pub total_stock_mm: f64,
    pub target_ap_mm: f64,
}

impl PassPlan {
    pub fn total_passes(&self) -> usize {
        self.passes.len()
    }
}

/// What the job was, echoed back alongside the numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub material: Material,
    pub operation: Operation,
    pub diameter_mm: f64,
    pub stock_per_side_mm: Option<f64>,
    pub tool_insert: String,
}

/// A complete recommendation: parameters, pass breakdown, warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub mode: CutMode,
    pub params: CuttingParameters,
    /// Present when the job has a start/target goal.
    pub plan: Option<PassPlan>,
    pub warnings: Vec<String>,
    pub job: JobSummary,
}

impl Recommendation {
    /// A recommendation with no warnings is within every physical limit.
    pub fn physically_possible(&self) -> bool {
        self.warnings.is_empty()
    }
}
