//! Dialog layer: free-text understanding and the conversation FSM.
//!
//! The intent parser only extracts; it never touches state. The dialog
//! manager is the single place state changes, with the assumption engine
//! filling gaps between what the operator said and what a recommendation
//! needs.

pub mod assumptions;
pub mod context;
pub mod error;
pub mod intent;
pub mod manager;
pub mod state;

pub use assumptions::AssumptionEngine;
pub use context::{DialogContext, Turn, TurnRole};
pub use error::{DialogError, Result};
pub use intent::{CorrectedParameter, Correction, Entities, Intent, IntentParser, IntentResult};
pub use manager::{DialogEvent, DialogManager, Outcome, TransitionRecord};
pub use state::DialogState;
