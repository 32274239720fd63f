//! Operations and cut modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Machining operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Turning,
    Milling,
    Drilling,
    Boring,
}

/// Unit the feed value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedUnit {
    /// mm per spindle revolution (turning, boring, drilling).
    PerRev,
    /// mm per cutter tooth (milling).
    PerTooth,
}

impl fmt::Display for FeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedUnit::PerRev => f.write_str("mm/rev"),
            FeedUnit::PerTooth => f.write_str("mm/tooth"),
        }
    }
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Turning,
        Operation::Milling,
        Operation::Drilling,
        Operation::Boring,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Turning => "turning",
            Operation::Milling => "milling",
            Operation::Drilling => "drilling",
            Operation::Boring => "boring",
        }
    }

    pub fn feed_unit(&self) -> FeedUnit {
        match self {
            Operation::Milling => FeedUnit::PerTooth,
            _ => FeedUnit::PerRev,
        }
    }

    /// Default tool for the operation, used when the operator named none.
    pub fn default_tool(&self) -> &'static str {
        match self {
            Operation::Turning => "turning insert holder",
            Operation::Milling => "end mill",
            Operation::Drilling => "twist drill",
            Operation::Boring => "boring bar",
        }
    }

    /// Spindle band considered safe for the operation, rpm.
    ///
    /// Values outside the band get clamped by the calculator rather than
    /// recommended.
    pub fn safe_rpm_band(&self) -> (f64, f64) {
        match self {
            Operation::Turning | Operation::Boring => (200.0, 3000.0),
            Operation::Milling => (1000.0, 10_000.0),
            Operation::Drilling => (200.0, 3000.0),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Operation::ALL
            .iter()
            .copied()
            .find(|o| o.name() == normalized)
            .ok_or_else(|| CoreError::UnknownOperation(s.to_string()))
    }
}

/// How aggressively material is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutMode {
    Roughing,
    SemiFinishing,
    Finishing,
}

impl CutMode {
    pub const ALL: [CutMode; 3] = [CutMode::Roughing, CutMode::SemiFinishing, CutMode::Finishing];

    pub fn name(&self) -> &'static str {
        match self {
            CutMode::Roughing => "roughing",
            CutMode::SemiFinishing => "semi_finishing",
            CutMode::Finishing => "finishing",
        }
    }

    /// Derive the mode from a required surface roughness Ra (µm).
    ///
    /// Ra ≤ 0.8 needs a finishing pass, Ra ≤ 3.2 semi-finishing,
    /// anything rougher is plain roughing.
    pub fn from_roughness(ra_um: f64) -> CutMode {
        if ra_um <= 0.8 {
            CutMode::Finishing
        } else if ra_um <= 3.2 {
            CutMode::SemiFinishing
        } else {
            CutMode::Roughing
        }
    }
}

impl fmt::Display for CutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CutMode::Roughing => f.write_str("roughing"),
            CutMode::SemiFinishing => f.write_str("semi-finishing"),
            CutMode::Finishing => f.write_str("finishing"),
        }
    }
}

impl FromStr for CutMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        CutMode::ALL
            .iter()
            .copied()
            .find(|m| m.name() == normalized)
            .ok_or_else(|| CoreError::UnknownMode(s.to_string()))
    }
}
