//! Operator profiles: running aggregates over logged decisions.
//!
//! One `profiles.json` for all users; aggregates update incrementally
//! on every logged decision so no history replay is needed.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use cnc_core::{ExperienceLevel, MachineClass};

use crate::error::{Result, StorageError};

/// How many recent |deviation| samples are kept for consistency scoring.
const RECENT_DEVIATIONS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorProfile {
    pub user: String,
    pub total_decisions: u32,
    /// Running mean of |deviation|.
    pub mean_abs_deviation: f64,
    /// Running mean of the rpm the operator actually set.
    pub mean_rpm: f64,
    /// 0..1; None until there are enough samples.
    pub consistency: Option<f64>,
    pub machine: Option<MachineClass>,
    pub experience: ExperienceLevel,
    /// Recent |deviation| samples, newest last.
    pub recent_abs_deviations: Vec<f64>,
    pub updated_at: DateTime<Utc>,
}

impl OperatorProfile {
    fn new(user: &str) -> OperatorProfile {
        OperatorProfile {
            user: user.to_string(),
            total_decisions: 0,
            mean_abs_deviation: 0.0,
            mean_rpm: 0.0,
            consistency: None,
            machine: None,
            experience: ExperienceLevel::Novice,
            recent_abs_deviations: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}

/// All operator profiles, cached in memory and flushed on every update.
pub struct ProfileStore {
    path: PathBuf,
    profiles: RwLock<HashMap<String, OperatorProfile>>,
}

impl ProfileStore {
    pub fn open(data_dir: &Path) -> Result<ProfileStore> {
        fs::create_dir_all(data_dir).map_err(StorageError::io(data_dir))?;
        let path = data_dir.join("profiles.json");
        let profiles = if path.exists() {
            let text = fs::read_to_string(&path).map_err(StorageError::io(&path))?;
            serde_json::from_str(&text).map_err(StorageError::serde(&path))?
        } else {
            HashMap::new()
        };
        Ok(ProfileStore {
            path,
            profiles: RwLock::new(profiles),
        })
    }

    pub fn get(&self, user: &str) -> Option<OperatorProfile> {
        self.profiles.read().get(user).cloned()
    }

    pub fn all(&self) -> Vec<OperatorProfile> {
        self.profiles.read().values().cloned().collect()
    }

    /// Fold one logged decision into the user's aggregates.
    ///
    /// `consistency` is computed by the caller from the recent deviation
    /// window (the scoring lives in the analytics crate).
    pub fn record_decision(
        &self,
        user: &str,
        deviation: f64,
        user_rpm: f64,
        consistency: Option<f64>,
    ) -> Result<OperatorProfile> {
        let updated = {
            let mut profiles = self.profiles.write();
            let profile = profiles
                .entry(user.to_string())
                .or_insert_with(|| OperatorProfile::new(user));

            let n = profile.total_decisions as f64;
            profile.mean_abs_deviation =
                (profile.mean_abs_deviation * n + deviation.abs()) / (n + 1.0);
            profile.mean_rpm = (profile.mean_rpm * n + user_rpm) / (n + 1.0);
            profile.total_decisions += 1;

            profile.recent_abs_deviations.push(deviation.abs());
            if profile.recent_abs_deviations.len() > RECENT_DEVIATIONS {
                let excess = profile.recent_abs_deviations.len() - RECENT_DEVIATIONS;
                profile.recent_abs_deviations.drain(..excess);
            }

            profile.consistency = consistency;
            profile.machine = Some(MachineClass::from_avg_rpm(profile.mean_rpm));
            profile.experience = ExperienceLevel::from_stats(
                profile.total_decisions,
                profile.mean_abs_deviation,
            );
            profile.updated_at = Utc::now();
            profile.clone()
        };

        self.flush()?;
        tracing::debug!(
            target: "cnc::storage",
            user,
            total = updated.total_decisions,
            experience = %updated.experience,
            "profile updated"
        );
        Ok(updated)
    }

    fn flush(&self) -> Result<()> {
        let profiles = self.profiles.read();
        let text = serde_json::to_string_pretty(&*profiles)
            .map_err(StorageError::serde(&self.path))?;
        fs::write(&self.path, text).map_err(StorageError::io(&self.path))?;
        Ok(())
    }
}
