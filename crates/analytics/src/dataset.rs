//! Dataset curation: classify journal records and emit a training set.

use std::path::Path;

use serde::{Deserialize, Serialize};

use cnc_storage::{InteractionRecord, Journal, Result};

/// Quality class of one logged exchange as a training sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleClass {
    /// Operator landed close to the recommendation.
    Good,
    /// Noticeable but explainable gap.
    Questionable,
    /// Way off; keep for edge-case analysis only.
    Edge,
    /// Physically impossible recommendation; never train on it.
    Trash,
}

/// Classify a sample by deviation and physical validity.
pub fn classify_sample(delta: f64, physics_valid: bool) -> SampleClass {
    if !physics_valid {
        return SampleClass::Trash;
    }
    if delta.abs() < 0.25 {
        SampleClass::Good
    } else if delta.abs() < 0.6 {
        SampleClass::Questionable
    } else {
        SampleClass::Edge
    }
}

/// Per-class counts plus the filtered training records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetReport {
    pub total: usize,
    pub good: usize,
    pub questionable: usize,
    pub edge: usize,
    pub trash: usize,
    /// Good + questionable records, in journal order.
    pub training: Vec<InteractionRecord>,
}

impl DatasetReport {
    pub fn summary(&self) -> String {
        format!(
            "{} records: {} good, {} questionable, {} edge, {} trash; {} usable for training",
            self.total,
            self.good,
            self.questionable,
            self.edge,
            self.trash,
            self.training.len()
        )
    }
}

/// Streams `dialogs.jsonl` and buckets every record.
pub struct DatasetBuilder<'a> {
    journal: &'a Journal,
}

impl<'a> DatasetBuilder<'a> {
    pub fn new(journal: &'a Journal) -> DatasetBuilder<'a> {
        DatasetBuilder { journal }
    }

    pub fn build(&self) -> Result<DatasetReport> {
        let mut report = DatasetReport::default();
        for record in self.journal.read_interactions()? {
            report.total += 1;
            // An accepted recommendation deviates by zero.
            let delta = record.deviation.unwrap_or(0.0);
            match classify_sample(delta, record.physics_ok) {
                SampleClass::Good => {
                    report.good += 1;
                    report.training.push(record);
                }
                SampleClass::Questionable => {
                    report.questionable += 1;
                    report.training.push(record);
                }
                SampleClass::Edge => report.edge += 1,
                SampleClass::Trash => report.trash += 1,
            }
        }
        tracing::debug!(
            target: "cnc::storage",
            total = report.total,
            usable = report.training.len(),
            "dataset built"
        );
        Ok(report)
    }

    /// Build and write the training set as JSONL next to the journal.
    pub fn export(&self, path: &Path) -> Result<DatasetReport> {
        let report = self.build()?;
        let mut out = String::new();
        for record in &report.training {
            let line = serde_json::to_string(record).map_err(|source| {
                cnc_storage::StorageError::Serde {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            out.push_str(&line);
            out.push('\n');
        }
        std::fs::write(path, out).map_err(|source| cnc_storage::StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(report)
    }
}
