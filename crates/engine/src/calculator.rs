//! Limits-aware physics.
//!
//! Every number the assistant emits passes through here: spindle speed
//! from the cutting-speed formula, cutting power from the specific
//! cutting force, and depth of cut bounded by machine power, insert
//! geometry and tool rigidity.

use cnc_core::{MachineSpecs, Material, Operation, Tool};

/// Spindle drive efficiency used in the power formula.
pub const SPINDLE_EFFICIENCY: f64 = 0.8;

/// Safe depth-of-cut band for single-point turning, mm.
pub const SAFE_AP_RANGE_MM: (f64, f64) = (0.5, 6.0);

/// Depth of cut a rigid setup supports at zero overhang penalty, mm.
const RIGIDITY_BASE_AP_MM: f64 = 4.0;

/// Physics with machine and tool limits baked in.
#[derive(Debug, Clone)]
pub struct Calculator {
    machine: MachineSpecs,
    tool: Tool,
    /// Specific cutting force kc1 of the workpiece material, N/mm².
    kc1_n_mm2: f64,
}

impl Calculator {
    pub fn new(machine: MachineSpecs, tool: Tool, material: Material) -> Calculator {
        Calculator {
            machine,
            tool,
            kc1_n_mm2: material.properties().kc1_n_mm2,
        }
    }

    /// Spindle speed for a cutting speed and diameter.
    ///
    /// n = 1000·vc / (π·D), clamped to the machine maximum and the
    /// operation's safe band.
    pub fn rpm(&self, vc_m_min: f64, diameter_mm: f64, operation: Operation) -> f64 {
        let (band_min, band_max) = operation.safe_rpm_band();
        if diameter_mm <= 0.0 {
            return band_min;
        }
        let rpm = (1000.0 * vc_m_min) / (std::f64::consts::PI * diameter_mm);
        let rpm = rpm.min(self.machine.max_rpm).clamp(band_min, band_max);
        // Never recommend above what the machine can spin, even when the
        // operation band starts higher.
        let rpm = rpm.min(self.machine.max_rpm);
        round1(rpm)
    }

    /// Cutting power, kW: P = kc·ap·f·vc / (60000·η).
    pub fn cutting_power_kw(&self, ap_mm: f64, feed_mm: f64, vc_m_min: f64) -> f64 {
        if ap_mm <= 0.0 || feed_mm <= 0.0 || vc_m_min <= 0.0 {
            return 0.0;
        }
        let power = (self.kc1_n_mm2 * ap_mm * feed_mm * vc_m_min)
            / (60_000.0 * SPINDLE_EFFICIENCY);
        round2(power)
    }

    /// Deepest cut the spindle power allows at the given vc and feed.
    pub fn max_ap_by_power(&self, vc_m_min: f64, feed_mm: f64) -> f64 {
        if vc_m_min <= 0.0 || feed_mm <= 0.0 {
            return SAFE_AP_RANGE_MM.0;
        }
        let ap = (self.machine.power_kw * 60_000.0 * SPINDLE_EFFICIENCY)
            / (self.kc1_n_mm2 * feed_mm * vc_m_min);
        ap.min(SAFE_AP_RANGE_MM.1)
    }

    /// Deepest cut the insert geometry allows: about 2/3 of the nose radius.
    pub fn max_ap_by_tool(&self) -> f64 {
        (self.tool.insert_radius_mm * 0.67).min(SAFE_AP_RANGE_MM.1)
    }

    /// Deepest cut the setup rigidity allows; degrades linearly with
    /// overhang up to a 50% penalty at the machine's maximum.
    pub fn max_ap_by_rigidity(&self) -> f64 {
        let overhang_ratio = (self.tool.overhang_mm / self.machine.max_overhang_mm).min(1.0);
        RIGIDITY_BASE_AP_MM * (1.0 - overhang_ratio * 0.5)
    }

    /// The binding depth-of-cut limit, floored at the safe minimum.
    pub fn safe_ap(&self, vc_m_min: f64, feed_mm: f64) -> f64 {
        let ap = self
            .max_ap_by_power(vc_m_min, feed_mm)
            .min(self.max_ap_by_tool())
            .min(self.max_ap_by_rigidity());
        ap.max(SAFE_AP_RANGE_MM.0)
    }
}

pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub(crate) fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}
