//! Workpiece geometry for stock-removal jobs.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Start/target diameters and optional machined length of a turning job.
///
/// The constructor enforces that the job actually removes material:
/// `start > target`, both positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub start_diameter_mm: f64,
    pub target_diameter_mm: f64,
    pub length_mm: Option<f64>,
}

impl Geometry {
    pub fn new(start_mm: f64, target_mm: f64, length_mm: Option<f64>) -> Result<Self> {
        if !start_mm.is_finite() || !target_mm.is_finite() || start_mm <= 0.0 || target_mm <= 0.0 {
            return Err(CoreError::InvalidGeometry(format!(
                "diameters must be positive, got {start_mm} -> {target_mm}"
            )));
        }
        if start_mm <= target_mm {
            return Err(CoreError::InvalidGeometry(format!(
                "start diameter {start_mm} mm must exceed target {target_mm} mm"
            )));
        }
        if let Some(len) = length_mm {
            if !len.is_finite() || len <= 0.0 {
                return Err(CoreError::InvalidGeometry(format!(
                    "length must be positive, got {len}"
                )));
            }
        }
        Ok(Geometry {
            start_diameter_mm: start_mm,
            target_diameter_mm: target_mm,
            length_mm,
        })
    }

    /// Stock to remove per side, mm.
    pub fn stock_per_side_mm(&self) -> f64 {
        (self.start_diameter_mm - self.target_diameter_mm) / 2.0
    }

    /// Volume of removed material, mm³. Needs the machined length.
    pub fn removed_volume_mm3(&self) -> Option<f64> {
        let length = self.length_mm?;
        let avg_diameter = (self.start_diameter_mm + self.target_diameter_mm) / 2.0;
        Some(self.stock_per_side_mm() * avg_diameter * PI * length)
    }

    /// More than 10 mm per side is considered heavy stock.
    pub fn is_heavy_stock(&self) -> bool {
        self.stock_per_side_mm() > 10.0
    }
}
