//! Rule-based cutting-mode assistant for CNC operators.
//!
//! An operator describes a job in free text; the assistant tracks a
//! per-user dialog context through an FSM, fills gaps with explicit
//! assumptions, computes physically bounded cutting parameters, and
//! records what the operator actually set - the raw material for the
//! learning loop.
//!
//! [`Assistant`] wires the crates together:
//! dialog → engine → storage → analytics.

pub mod types;

use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use cnc_analytics::{consistency_score, deviation_score, DatasetBuilder};
use cnc_dialog::{DialogError, DialogEvent, DialogManager};
use cnc_engine::EngineError;
use cnc_storage::{Journal, ProfileStore, RecommendedParams, SessionStore, StorageError};

pub use types::*;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error(transparent)]
    Dialog(#[from] DialogError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, AssistantError>;

/// The assistant's answer to one message.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub state: DialogState,
}

/// One handle over the whole assistant: dialog manager, rules engine and
/// the stores under a single data directory.
pub struct Assistant {
    manager: DialogManager,
    sessions: SessionStore<DialogContext>,
    journal: Journal,
    profiles: ProfileStore,
    data_dir: PathBuf,
}

impl Assistant {
    /// Open with the builtin rules table.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Assistant> {
        Self::build(data_dir.as_ref(), RuleSet::builtin())
    }

    /// Open with rule overrides from a `cutting_modes.toml` file.
    pub fn with_rules(data_dir: impl AsRef<Path>, rules_path: &Path) -> Result<Assistant> {
        let rules = RuleSet::load(rules_path)?;
        Self::build(data_dir.as_ref(), rules)
    }

    fn build(data_dir: &Path, rules: RuleSet) -> Result<Assistant> {
        std::fs::create_dir_all(data_dir).map_err(|source| StorageError::Io {
            path: data_dir.to_path_buf(),
            source,
        })?;
        Ok(Assistant {
            manager: DialogManager::new(Recommender::new(rules)),
            sessions: SessionStore::open(data_dir)?,
            journal: Journal::open(data_dir)?,
            profiles: ProfileStore::open(data_dir)?,
            data_dir: data_dir.to_path_buf(),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Process one operator message: run the dialog, persist the session
    /// and journal whatever the exchange produced.
    pub fn handle(&self, user: &str, text: &str) -> Result<Reply> {
        let mut ctx = match self.sessions.load(user)? {
            Some(ctx) => ctx,
            None => DialogContext::new(user),
        };

        let outcome = self.manager.process(&mut ctx, text)?;
        for event in &outcome.events {
            self.apply_event(user, event)?;
        }
        self.sessions.save(user, &ctx)?;
        tracing::debug!(
            target: "cnc::assistant",
            user,
            state = %outcome.state,
            events = outcome.events.len(),
            "exchange handled"
        );

        Ok(Reply {
            text: outcome.reply,
            state: outcome.state,
        })
    }

    fn apply_event(&self, user: &str, event: &DialogEvent) -> Result<()> {
        match event {
            // Rendered but not yet acted on; journaled once the operator
            // answers.
            DialogEvent::Recommended { .. } => Ok(()),

            DialogEvent::OperatorChoice {
                user_rpm,
                recommendation: rec,
            } => {
                let deviation = deviation_score(*user_rpm, rec.params.rpm);
                self.journal.append_interaction(&InteractionRecord {
                    id: Uuid::new_v4(),
                    user: user.to_string(),
                    at: chrono::Utc::now(),
                    material: rec.job.material,
                    operation: rec.job.operation,
                    mode: rec.mode,
                    diameter_mm: rec.job.diameter_mm,
                    recommended: RecommendedParams {
                        vc_m_min: rec.params.vc_m_min,
                        rpm: rec.params.rpm,
                        feed_mm: rec.params.feed_mm,
                        ap_mm: rec.params.ap_mm,
                    },
                    physics_ok: rec.physically_possible(),
                    user_rpm: Some(*user_rpm),
                    deviation: Some(deviation),
                    source: "cli".to_string(),
                })?;

                let mut recent = self
                    .profiles
                    .get(user)
                    .map(|p| p.recent_abs_deviations)
                    .unwrap_or_default();
                recent.push(deviation.abs());
                let consistency = consistency_score(&recent);
                self.profiles
                    .record_decision(user, deviation, *user_rpm, consistency)?;
                Ok(())
            }

            DialogEvent::Affirmed {
                recommendation: rec,
            } => {
                self.journal.append_interaction(&InteractionRecord {
                    id: Uuid::new_v4(),
                    user: user.to_string(),
                    at: chrono::Utc::now(),
                    material: rec.job.material,
                    operation: rec.job.operation,
                    mode: rec.mode,
                    diameter_mm: rec.job.diameter_mm,
                    recommended: RecommendedParams {
                        vc_m_min: rec.params.vc_m_min,
                        rpm: rec.params.rpm,
                        feed_mm: rec.params.feed_mm,
                        ap_mm: rec.params.ap_mm,
                    },
                    physics_ok: rec.physically_possible(),
                    user_rpm: None,
                    deviation: None,
                    source: "cli".to_string(),
                })?;
                Ok(())
            }

            DialogEvent::Corrected {
                parameter,
                recommended_value,
                corrected_value,
                utterance,
            } => {
                self.journal.append_correction(&CorrectionRecord {
                    id: Uuid::new_v4(),
                    user: user.to_string(),
                    at: chrono::Utc::now(),
                    parameter: parameter.label().to_string(),
                    recommended_value: *recommended_value,
                    corrected_value: *corrected_value,
                    utterance: utterance.clone(),
                })?;
                Ok(())
            }
        }
    }

    /// The operator's current dialog context (a fresh one if none yet).
    pub fn context(&self, user: &str) -> Result<DialogContext> {
        Ok(self
            .sessions
            .load(user)?
            .unwrap_or_else(|| DialogContext::new(user)))
    }

    /// Forget the operator's dialog context. Profiles and journals stay.
    pub fn reset(&self, user: &str) -> Result<()> {
        self.sessions.reset(user)?;
        Ok(())
    }

    /// Log the rpm an operator actually set, outside the dialog flow.
    ///
    /// Returns the updated profile, or None when there is no
    /// recommendation on record to compare against.
    pub fn record_operator_choice(
        &self,
        user: &str,
        user_rpm: f64,
    ) -> Result<Option<OperatorProfile>> {
        let mut ctx = self.context(user)?;
        let Some(rec) = ctx.last_recommendation.clone() else {
            return Ok(None);
        };
        self.apply_event(
            user,
            &DialogEvent::OperatorChoice {
                user_rpm,
                recommendation: rec,
            },
        )?;
        ctx.transition_to(DialogState::Completed);
        self.sessions.save(user, &ctx)?;
        Ok(self.profiles.get(user))
    }

    /// Aggregated stats, if the operator has logged decisions.
    pub fn stats(&self, user: &str) -> Option<OperatorProfile> {
        self.profiles.get(user)
    }

    /// Classify the journal and write `training.jsonl` to the data dir.
    pub fn export_dataset(&self) -> Result<DatasetReport> {
        let path = self.data_dir.join("training.jsonl");
        let report = DatasetBuilder::new(&self.journal).export(&path)?;
        Ok(report)
    }
}
