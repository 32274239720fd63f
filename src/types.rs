//! Public types for the cncassist unified API.
//!
//! Re-exports from the internal crates, so consumers only depend on the
//! facade.

// Domain vocabulary
pub use cnc_core::{
    CutMode, CuttingParameters, ExperienceLevel, FeedUnit, Geometry, InsertMaterial,
    MachineClass, MachineSpecs, Material, MaterialProperties, Operation, Pass, PassPlan,
    Recommendation, Strategy, Tool,
};

// Engine surface for embedding without the dialog layer
pub use cnc_engine::{Job, Recommender, RuleSet};

// Dialog surface
pub use cnc_dialog::{DialogContext, DialogState};

// Persistence records
pub use cnc_storage::{CorrectionRecord, InteractionRecord, OperatorProfile};

// Analytics
pub use cnc_analytics::{DatasetReport, SampleClass};
