//! The cutting-modes rules table.
//!
//! Per-material speed/feed/depth ranges plus the fixed mode and operation
//! coefficient tables. The material ranges can be overridden from a
//! `cutting_modes.toml` file; the compiled-in table is used when no file
//! is given. A file that is present but malformed is an error, not a
//! silent fallback.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use cnc_core::{CutMode, Material, Operation, Tool};

use crate::error::{EngineError, Result};

/// Inclusive min-max band for a cutting parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Range {
        Range { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    fn validate(&self, what: &str) -> Result<()> {
        if !(self.min > 0.0 && self.min < self.max) {
            return Err(EngineError::InvalidRuleRange {
                what: what.to_string(),
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Handbook ranges for one material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialRules {
    /// Cutting speed, m/min.
    pub vc: Range,
    /// Feed, mm/rev.
    pub feed: Range,
    /// Depth of cut, mm.
    pub ap: Range,
}

/// Mode coefficient triple applied to the rule midpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeCoefficients {
    pub speed: f64,
    pub feed: f64,
    pub depth: f64,
}

/// Per-operation multipliers relative to turning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperationFactors {
    pub speed: f64,
    pub feed: f64,
}

/// Base parameters before physical limits are applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseParameters {
    pub vc_m_min: f64,
    pub feed_mm: f64,
    pub ap_mm: f64,
}

/// Shape of `cutting_modes.toml`: a `[materials.<name>]` table per
/// material the file wants to override.
#[derive(Debug, Deserialize)]
struct RulesFile {
    #[serde(default)]
    materials: BTreeMap<String, MaterialRules>,
}

static BUILTIN: Lazy<HashMap<Material, MaterialRules>> = Lazy::new(|| {
    let mut table = HashMap::new();
    let mut insert = |m: Material, vc: (f64, f64), feed: (f64, f64), ap: (f64, f64)| {
        table.insert(
            m,
            MaterialRules {
                vc: Range::new(vc.0, vc.1),
                feed: Range::new(feed.0, feed.1),
                ap: Range::new(ap.0, ap.1),
            },
        );
    };
    insert(Material::Steel, (80.0, 150.0), (0.1, 0.3), (1.0, 3.0));
    insert(Material::Aluminum, (200.0, 400.0), (0.2, 0.4), (1.5, 4.0));
    insert(Material::Titanium, (40.0, 80.0), (0.08, 0.15), (0.5, 1.5));
    insert(Material::StainlessSteel, (60.0, 100.0), (0.08, 0.2), (0.8, 2.0));
    insert(Material::Brass, (150.0, 300.0), (0.15, 0.3), (1.0, 3.0));
    insert(Material::Copper, (120.0, 250.0), (0.12, 0.25), (1.0, 2.5));
    insert(Material::CastIron, (70.0, 120.0), (0.15, 0.25), (1.0, 3.0));
    table
});

/// The loaded rules table.
#[derive(Debug, Clone)]
pub struct RuleSet {
    materials: HashMap<Material, MaterialRules>,
}

impl RuleSet {
    /// The compiled-in handbook table.
    pub fn builtin() -> RuleSet {
        RuleSet {
            materials: BUILTIN.clone(),
        }
    }

    /// Load overrides from a TOML file on top of the builtin table.
    ///
    /// Material keys use the canonical snake_case names (`steel`,
    /// `stainless_steel`, ...). Unknown keys and inverted ranges are
    /// errors.
    pub fn load(path: &Path) -> Result<RuleSet> {
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::RulesIo {
            path: path.to_path_buf(),
            source,
        })?;
        let file: RulesFile = toml::from_str(&text).map_err(|source| EngineError::RulesParse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut rules = RuleSet::builtin();
        for (name, material_rules) in file.materials {
            let material = Material::from_str(&name)?;
            material_rules.vc.validate(&format!("{name}.vc"))?;
            material_rules.feed.validate(&format!("{name}.feed"))?;
            material_rules.ap.validate(&format!("{name}.ap"))?;
            rules.materials.insert(material, material_rules);
        }
        tracing::debug!(target: "cnc::engine", path = %path.display(), "loaded rules overrides");
        Ok(rules)
    }

    pub fn material(&self, material: Material) -> &MaterialRules {
        // Builtin covers every Material variant and overrides only replace.
        &self.materials[&material]
    }

    /// Coefficients applied on top of the material midpoints per cut mode.
    pub fn mode_coefficients(mode: CutMode) -> ModeCoefficients {
        match mode {
            CutMode::Roughing => ModeCoefficients {
                speed: 0.9,
                feed: 1.0,
                depth: 1.0,
            },
            CutMode::SemiFinishing => ModeCoefficients {
                speed: 1.0,
                feed: 0.7,
                depth: 0.5,
            },
            CutMode::Finishing => ModeCoefficients {
                speed: 1.2,
                feed: 0.5,
                depth: 0.3,
            },
        }
    }

    /// Multipliers relative to turning.
    pub fn operation_factors(operation: Operation) -> OperationFactors {
        match operation {
            Operation::Turning => OperationFactors { speed: 1.0, feed: 1.0 },
            Operation::Milling => OperationFactors { speed: 0.8, feed: 0.7 },
            Operation::Boring => OperationFactors { speed: 0.7, feed: 0.6 },
            Operation::Drilling => OperationFactors { speed: 0.5, feed: 0.3 },
        }
    }

    /// Ra band (µm) a mode is expected to deliver.
    pub fn ra_band(mode: CutMode) -> Range {
        match mode {
            CutMode::Roughing => Range::new(6.3, 12.5),
            CutMode::SemiFinishing => Range::new(0.8, 3.2),
            CutMode::Finishing => Range::new(0.1, 0.8),
        }
    }

    /// Base vc/feed/ap for a job before the calculator applies limits.
    ///
    /// Speed: rule midpoint × mode × operation × insert coefficient,
    /// divided by the material's machinability factor (harder materials
    /// cut slower). Feed: midpoint × mode × operation, scaled by nose
    /// radius relative to the standard 0.8 mm and clamped to what the
    /// tool tolerates. Depth: midpoint × mode.
    pub fn base_parameters(
        &self,
        material: Material,
        operation: Operation,
        mode: CutMode,
        tool: &Tool,
    ) -> BaseParameters {
        let rules = self.material(material);
        let mode_coeffs = Self::mode_coefficients(mode);
        let op = Self::operation_factors(operation);

        let vc = rules.vc.midpoint() * mode_coeffs.speed * op.speed
            * tool.insert.speed_coefficient()
            / material.machinability();

        let radius_factor = tool.insert_radius_mm / 0.8;
        let feed = (rules.feed.midpoint() * mode_coeffs.feed * op.feed * radius_factor)
            .clamp(0.05, Tool::MAX_FEED_MM_REV);

        let ap = rules.ap.midpoint() * mode_coeffs.depth;

        BaseParameters {
            vc_m_min: vc,
            feed_mm: feed,
            ap_mm: ap,
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::builtin()
    }
}
