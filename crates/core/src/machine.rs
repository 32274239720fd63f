//! Machine capabilities and inferred machine class.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hard limits of the machine the operator runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachineSpecs {
    /// Spindle motor power, kW.
    pub power_kw: f64,
    /// Maximum spindle speed, rpm.
    pub max_rpm: f64,
    /// Maximum usable tool overhang, mm.
    pub max_overhang_mm: f64,
}

impl Default for MachineSpecs {
    fn default() -> Self {
        MachineSpecs {
            power_kw: 15.0,
            max_rpm: 3000.0,
            max_overhang_mm: 50.0,
        }
    }
}

/// Machine class inferred from the spindle speeds an operator actually uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineClass {
    OldUniversal,
    Universal,
    CncLathe,
    HighSpeedCnc,
}

impl MachineClass {
    /// Classify by average rpm across an operator's logged decisions.
    pub fn from_avg_rpm(avg_rpm: f64) -> MachineClass {
        if avg_rpm > 4000.0 {
            MachineClass::HighSpeedCnc
        } else if avg_rpm > 2000.0 {
            MachineClass::CncLathe
        } else if avg_rpm > 500.0 {
            MachineClass::Universal
        } else {
            MachineClass::OldUniversal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MachineClass::OldUniversal => "old universal",
            MachineClass::Universal => "universal",
            MachineClass::CncLathe => "CNC lathe",
            MachineClass::HighSpeedCnc => "high-speed CNC",
        }
    }
}

impl fmt::Display for MachineClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
