//! Core domain model for the CNC cutting-mode assistant.
//!
//! This crate defines the vocabulary every other crate speaks:
//! - Workpiece materials and their machining properties
//! - Operations, cut modes and their units
//! - Machine, tool and workpiece geometry descriptions
//! - Cutting parameters and recommendations
//! - Operator classification enums
//!
//! No I/O, no rules tables, no dialog logic lives here.

pub mod error;
pub mod geometry;
pub mod machine;
pub mod material;
pub mod operation;
pub mod operator;
pub mod params;
pub mod tool;

pub use error::{CoreError, Result};
pub use geometry::Geometry;
pub use machine::{MachineClass, MachineSpecs};
pub use material::{Material, MaterialProperties};
pub use operation::{CutMode, FeedUnit, Operation};
pub use operator::{ExperienceLevel, Strategy};
pub use params::{CuttingParameters, JobSummary, Pass, PassPlan, Recommendation};
pub use tool::{InsertMaterial, Tool};
