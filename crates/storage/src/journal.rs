//! Append-only JSONL event logs: the learning dataset in the raw.
//!
//! `dialogs.jsonl` gets one record per completed recommendation
//! exchange, `corrections.jsonl` one per operator pushback. Records are
//! single-line JSON; the reader skips blank lines and reports parse
//! failures with their line number.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cnc_core::{CutMode, Material, Operation};

use crate::error::{Result, StorageError};

/// The parameters that were recommended, flattened for the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendedParams {
    pub vc_m_min: f64,
    pub rpm: f64,
    pub feed_mm: f64,
    pub ap_mm: f64,
}

/// One completed recommendation exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub id: Uuid,
    pub user: String,
    pub at: DateTime<Utc>,

    pub material: Material,
    pub operation: Operation,
    pub mode: CutMode,
    pub diameter_mm: f64,

    pub recommended: RecommendedParams,
    /// Within physical limits (no warnings) when recommended.
    pub physics_ok: bool,

    /// What the operator actually set; absent when they accepted as-is.
    pub user_rpm: Option<f64>,
    /// Relative deviation of user_rpm from the recommendation.
    pub deviation: Option<f64>,

    pub source: String,
}

/// One operator pushback on a recommended parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionRecord {
    pub id: Uuid,
    pub user: String,
    pub at: DateTime<Utc>,

    /// Which parameter: "feed", "rpm", "depth of cut", "tool".
    pub parameter: String,
    pub recommended_value: Option<f64>,
    pub corrected_value: Option<f64>,
    /// The raw utterance, for later mining.
    pub utterance: String,
}

/// The pair of append-only logs in the data directory.
#[derive(Debug, Clone)]
pub struct Journal {
    dialogs_path: PathBuf,
    corrections_path: PathBuf,
}

impl Journal {
    pub fn open(data_dir: &Path) -> Result<Journal> {
        fs::create_dir_all(data_dir).map_err(StorageError::io(data_dir))?;
        Ok(Journal {
            dialogs_path: data_dir.join("dialogs.jsonl"),
            corrections_path: data_dir.join("corrections.jsonl"),
        })
    }

    pub fn dialogs_path(&self) -> &Path {
        &self.dialogs_path
    }

    pub fn append_interaction(&self, record: &InteractionRecord) -> Result<()> {
        append_line(&self.dialogs_path, record)?;
        tracing::debug!(
            target: "cnc::storage",
            user = %record.user,
            material = %record.material,
            "interaction journaled"
        );
        Ok(())
    }

    pub fn append_correction(&self, record: &CorrectionRecord) -> Result<()> {
        append_line(&self.corrections_path, record)?;
        tracing::debug!(
            target: "cnc::storage",
            user = %record.user,
            parameter = %record.parameter,
            "correction journaled"
        );
        Ok(())
    }

    pub fn read_interactions(&self) -> Result<Vec<InteractionRecord>> {
        read_lines(&self.dialogs_path)
    }

    pub fn read_corrections(&self) -> Result<Vec<CorrectionRecord>> {
        read_lines(&self.corrections_path)
    }
}

fn append_line<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let line = serde_json::to_string(record).map_err(StorageError::serde(path))?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(StorageError::io(path))?;
    writeln!(file, "{line}").map_err(StorageError::io(path))?;
    Ok(())
}

fn read_lines<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path).map_err(StorageError::io(path))?;
    let mut records = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(line).map_err(|source| StorageError::BadRecord {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user: &str, rpm: f64) -> InteractionRecord {
        InteractionRecord {
            id: Uuid::new_v4(),
            user: user.to_string(),
            at: Utc::now(),
            material: Material::Steel,
            operation: Operation::Turning,
            mode: CutMode::Roughing,
            diameter_mm: 50.0,
            recommended: RecommendedParams {
                vc_m_min: 103.5,
                rpm,
                feed_mm: 0.2,
                ap_mm: 0.54,
            },
            physics_ok: true,
            user_rpm: Some(rpm * 1.1),
            deviation: Some(0.1),
            source: "cli".to_string(),
        }
    }

    #[test]
    fn appended_records_read_back_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::open(dir.path()).unwrap();

        journal.append_interaction(&record("a", 600.0)).unwrap();
        journal.append_interaction(&record("b", 700.0)).unwrap();

        let records = journal.read_interactions().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].user, "a");
        assert_eq!(records[1].recommended.rpm, 700.0);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::open(dir.path()).unwrap();
        journal.append_interaction(&record("a", 600.0)).unwrap();

        let mut file = OpenOptions::new()
            .append(true)
            .open(journal.dialogs_path())
            .unwrap();
        writeln!(file).unwrap();
        writeln!(file).unwrap();
        drop(file);
        journal.append_interaction(&record("b", 700.0)).unwrap();

        assert_eq!(journal.read_interactions().unwrap().len(), 2);
    }

    #[test]
    fn corrupt_lines_report_their_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::open(dir.path()).unwrap();
        journal.append_interaction(&record("a", 600.0)).unwrap();

        let mut file = OpenOptions::new()
            .append(true)
            .open(journal.dialogs_path())
            .unwrap();
        writeln!(file, "{{not json").unwrap();
        drop(file);

        match journal.read_interactions() {
            Err(StorageError::BadRecord { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected BadRecord, got {other:?}"),
        }
    }

    #[test]
    fn corrections_log_is_independent() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::open(dir.path()).unwrap();
        journal
            .append_correction(&CorrectionRecord {
                id: Uuid::new_v4(),
                user: "a".to_string(),
                at: Utc::now(),
                parameter: "feed".to_string(),
                recommended_value: Some(0.2),
                corrected_value: Some(0.15),
                utterance: "no, feed 0.15".to_string(),
            })
            .unwrap();

        assert_eq!(journal.read_corrections().unwrap().len(), 1);
        assert!(journal.read_interactions().unwrap().is_empty());
    }

    #[test]
    fn missing_files_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::open(dir.path()).unwrap();
        assert!(journal.read_interactions().unwrap().is_empty());
        assert!(journal.read_corrections().unwrap().is_empty());
    }
}
