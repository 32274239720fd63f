//! Rules and physics for cutting-mode recommendations.
//!
//! Pipeline: rules table → limits-aware calculator → pass planner →
//! validator, orchestrated by [`Recommender`].

pub mod calculator;
pub mod error;
pub mod passes;
pub mod recommend;
pub mod rules;
pub mod validate;

pub use calculator::Calculator;
pub use error::{EngineError, Result};
pub use recommend::{Job, Recommender};
pub use rules::{BaseParameters, MaterialRules, Range, RuleSet};
pub use validate::validate_parameters;
