//! Passive learning analytics.
//!
//! Scores the gap between what was recommended and what the operator
//! actually set, and turns the journal into a filtered training dataset.
//! Nothing here judges the operator; the numbers feed the learning loop.

pub mod dataset;
pub mod experience;

pub use dataset::{classify_sample, DatasetBuilder, DatasetReport, SampleClass};
pub use experience::{
    consistency_score, context_weighted_score, deviation_score, ContextScore,
};
