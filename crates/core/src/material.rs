//! Workpiece materials and their machining properties.
//!
//! The property table is the merged reference data used across the
//! assistant: hardness, specific cutting force, a machinability factor
//! (0.5 easy .. 2.0 hard) and the handbook cutting-speed range.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Workpiece material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Steel,
    Aluminum,
    StainlessSteel,
    Titanium,
    CastIron,
    Brass,
    Copper,
}

/// Static machining properties of a material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Brinell hardness of the typical grade.
    pub hardness_hb: f64,
    /// Specific cutting force kc1, N/mm².
    pub kc1_n_mm2: f64,
    /// Relative machining difficulty; 1.0 is plain carbon steel.
    pub machinability: f64,
    /// Handbook cutting-speed range, m/min.
    pub vc_range_m_min: (f64, f64),
}

impl Material {
    pub const ALL: [Material; 7] = [
        Material::Steel,
        Material::Aluminum,
        Material::StainlessSteel,
        Material::Titanium,
        Material::CastIron,
        Material::Brass,
        Material::Copper,
    ];

    /// Canonical lowercase name, matching the serde representation.
    pub fn name(&self) -> &'static str {
        match self {
            Material::Steel => "steel",
            Material::Aluminum => "aluminum",
            Material::StainlessSteel => "stainless_steel",
            Material::Titanium => "titanium",
            Material::CastIron => "cast_iron",
            Material::Brass => "brass",
            Material::Copper => "copper",
        }
    }

    pub fn properties(&self) -> MaterialProperties {
        match self {
            Material::Steel => MaterialProperties {
                hardness_hb: 200.0,
                kc1_n_mm2: 1800.0,
                machinability: 1.0,
                vc_range_m_min: (80.0, 150.0),
            },
            Material::Aluminum => MaterialProperties {
                hardness_hb: 60.0,
                kc1_n_mm2: 700.0,
                machinability: 0.5,
                vc_range_m_min: (200.0, 400.0),
            },
            Material::StainlessSteel => MaterialProperties {
                hardness_hb: 250.0,
                kc1_n_mm2: 2200.0,
                machinability: 1.5,
                vc_range_m_min: (60.0, 100.0),
            },
            Material::Titanium => MaterialProperties {
                hardness_hb: 350.0,
                kc1_n_mm2: 2400.0,
                machinability: 1.8,
                vc_range_m_min: (40.0, 80.0),
            },
            Material::CastIron => MaterialProperties {
                hardness_hb: 220.0,
                kc1_n_mm2: 1500.0,
                machinability: 1.2,
                vc_range_m_min: (70.0, 120.0),
            },
            Material::Brass => MaterialProperties {
                hardness_hb: 100.0,
                kc1_n_mm2: 780.0,
                machinability: 0.6,
                vc_range_m_min: (150.0, 300.0),
            },
            Material::Copper => MaterialProperties {
                hardness_hb: 80.0,
                kc1_n_mm2: 900.0,
                machinability: 0.7,
                vc_range_m_min: (120.0, 250.0),
            },
        }
    }

    /// Relative machining difficulty (shortcut for `properties().machinability`).
    pub fn machinability(&self) -> f64 {
        self.properties().machinability
    }

    /// Operator-facing shop names (titanium needs coolant etc. are rendered
    /// by the dialog layer; this is only the label).
    pub fn label(&self) -> &'static str {
        match self {
            Material::Steel => "steel",
            Material::Aluminum => "aluminum",
            Material::StainlessSteel => "stainless steel",
            Material::Titanium => "titanium",
            Material::CastIron => "cast iron",
            Material::Brass => "brass",
            Material::Copper => "copper",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Material {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        Material::ALL
            .iter()
            .copied()
            .find(|m| m.name() == normalized)
            .ok_or_else(|| CoreError::UnknownMaterial(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_round_trip() {
        for m in Material::ALL {
            assert_eq!(m.name().parse::<Material>().unwrap(), m);
        }
    }

    #[test]
    fn from_str_accepts_spaces_and_case() {
        assert_eq!(
            "Stainless Steel".parse::<Material>().unwrap(),
            Material::StainlessSteel
        );
        assert_eq!("CAST-IRON".parse::<Material>().unwrap(), Material::CastIron);
    }

    #[test]
    fn unknown_material_is_an_error() {
        assert!("wood".parse::<Material>().is_err());
    }

    #[test]
    fn machinability_ordering_matches_shop_experience() {
        // Aluminum is the easiest, titanium the hardest.
        assert!(Material::Aluminum.machinability() < Material::Steel.machinability());
        assert!(Material::Titanium.machinability() > Material::StainlessSteel.machinability());
    }

    #[test]
    fn vc_ranges_are_ordered() {
        for m in Material::ALL {
            let (lo, hi) = m.properties().vc_range_m_min;
            assert!(lo > 0.0 && lo < hi, "{m}: bad vc range");
        }
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Material::StainlessSteel).unwrap();
        assert_eq!(json, "\"stainless_steel\"");
    }
}
