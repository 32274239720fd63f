//! The dialog FSM.
//!
//! `next_state` is the only transition function; the manager applies it
//! and nothing else changes state. Two hard rules dominate everything:
//! a removal goal forces goal processing, and a complete context forces
//! a recommendation.

use serde::{Deserialize, Serialize};

use crate::context::DialogContext;
use crate::intent::{Intent, IntentResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    /// Nothing known yet.
    WaitingStart,
    /// Some job data captured, more needed.
    CollectingContext,
    /// A start/target goal arrived and is being acknowledged.
    ProcessingGoal,
    /// Enough data: compute and present parameters.
    Recommending,
    /// Recommendation given; waiting for the operator's actual numbers,
    /// an acceptance, or a correction.
    AwaitingFeedback,
    /// Exchange logged; a new job restarts collection.
    Completed,
}

impl DialogState {
    pub fn label(&self) -> &'static str {
        match self {
            DialogState::WaitingStart => "waiting_start",
            DialogState::CollectingContext => "collecting_context",
            DialogState::ProcessingGoal => "processing_goal",
            DialogState::Recommending => "recommending",
            DialogState::AwaitingFeedback => "awaiting_feedback",
            DialogState::Completed => "completed",
        }
    }
}

impl std::fmt::Display for DialogState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Pick the next state from the context (already updated with this
/// message's entities) and the parsed message.
pub fn next_state(ctx: &DialogContext, result: &IntentResult) -> DialogState {
    use DialogState::*;

    let current = ctx.state;
    let has_new_data = result.entities.has_job_data();

    // Hard rule: a goal jumps the queue.
    if ctx.has_goal() && matches!(current, WaitingStart | CollectingContext) {
        return ProcessingGoal;
    }
    // Hard rule: a complete context means it is time to recommend.
    if ctx.has_enough_for_recommendation()
        && matches!(current, CollectingContext | ProcessingGoal)
    {
        return Recommending;
    }

    match current {
        WaitingStart => {
            if has_new_data || ctx.material.is_some() || ctx.operation.is_some() {
                CollectingContext
            } else {
                WaitingStart
            }
        }
        CollectingContext => CollectingContext,
        ProcessingGoal => Recommending,
        Recommending => AwaitingFeedback,
        AwaitingFeedback => match result.intent {
            Intent::Affirmation => Completed,
            Intent::Correction => AwaitingFeedback,
            _ if has_new_data => Recommending,
            _ => AwaitingFeedback,
        },
        Completed => {
            if has_new_data {
                CollectingContext
            } else {
                Completed
            }
        }
    }
}
