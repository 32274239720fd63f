//! Cutting tool description.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Insert (cutting edge) material.
///
/// The speed coefficient scales the base cutting speed relative to a
/// standard carbide insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertMaterial {
    Carbide,
    Hss,
    Ceramic,
    Cbn,
    Diamond,
}

impl InsertMaterial {
    pub const ALL: [InsertMaterial; 5] = [
        InsertMaterial::Carbide,
        InsertMaterial::Hss,
        InsertMaterial::Ceramic,
        InsertMaterial::Cbn,
        InsertMaterial::Diamond,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InsertMaterial::Carbide => "carbide",
            InsertMaterial::Hss => "hss",
            InsertMaterial::Ceramic => "ceramic",
            InsertMaterial::Cbn => "cbn",
            InsertMaterial::Diamond => "diamond",
        }
    }

    /// Cutting-speed coefficient relative to carbide.
    pub fn speed_coefficient(&self) -> f64 {
        match self {
            InsertMaterial::Carbide => 1.0,
            InsertMaterial::Hss => 0.5,
            InsertMaterial::Ceramic => 1.5,
            InsertMaterial::Cbn => 2.0,
            InsertMaterial::Diamond => 3.0,
        }
    }
}

impl fmt::Display for InsertMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InsertMaterial {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        InsertMaterial::ALL
            .iter()
            .copied()
            .find(|m| m.name() == normalized)
            .ok_or_else(|| CoreError::UnknownMaterial(s.to_string()))
    }
}

/// The tool mounted in the machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub insert: InsertMaterial,
    /// Nose radius of the insert, mm.
    pub insert_radius_mm: f64,
    /// Overhang from the holder, mm.
    pub overhang_mm: f64,
    pub coolant: bool,
}

impl Tool {
    /// Maximum feed the tool tolerates, mm/rev.
    pub const MAX_FEED_MM_REV: f64 = 0.4;

    /// A standard carbide insert with 0.8 mm nose radius at 30 mm overhang.
    pub fn standard_carbide() -> Tool {
        Tool {
            insert: InsertMaterial::Carbide,
            insert_radius_mm: 0.8,
            overhang_mm: 30.0,
            coolant: true,
        }
    }
}

impl Default for Tool {
    fn default() -> Self {
        Tool::standard_carbide()
    }
}
