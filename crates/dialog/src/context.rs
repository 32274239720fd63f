//! Per-operator dialog context: the single object that never loses what
//! the operator already said.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use cnc_core::{
    CutMode, Geometry, MachineSpecs, Material, Operation, Recommendation, Tool,
};
use cnc_engine::Job;

use crate::intent::Entities;
use crate::state::DialogState;

const HISTORY_LIMIT: usize = 50;

/// Who said a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    Operator,
    Assistant,
}

/// One utterance in the conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

/// Per-field parse confidence. A field is only overwritten when the new
/// confidence is at least the stored one, so a low-confidence assumption
/// never displaces what the operator said explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    pub material: f64,
    pub operation: f64,
    pub mode: f64,
    pub diameter: f64,
    pub tool: f64,
}

/// Parameter values the operator corrected after a recommendation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Overrides {
    pub feed_mm: Option<f64>,
    pub rpm: Option<f64>,
    pub ap_mm: Option<f64>,
}

/// Everything known about one operator's current job and conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogContext {
    pub user_id: String,
    pub state: DialogState,

    pub material: Option<Material>,
    pub operation: Option<Operation>,
    pub mode: Option<CutMode>,
    pub current_diameter_mm: Option<f64>,
    pub start_diameter_mm: Option<f64>,
    pub target_diameter_mm: Option<f64>,
    pub length_mm: Option<f64>,
    pub surface_roughness_um: Option<f64>,

    pub machine: MachineSpecs,
    pub tool: Tool,
    /// Human-readable tool note, usually assumption-sourced.
    pub tool_note: Option<String>,

    pub confidence: Confidence,
    pub overrides: Overrides,

    pub history: VecDeque<Turn>,
    pub recommendations_given: Vec<CutMode>,
    pub last_recommendation: Option<Recommendation>,
    pub state_history: Vec<DialogState>,
}

impl DialogContext {
    pub fn new(user_id: impl Into<String>) -> DialogContext {
        DialogContext {
            user_id: user_id.into(),
            state: DialogState::WaitingStart,
            material: None,
            operation: None,
            mode: None,
            current_diameter_mm: None,
            start_diameter_mm: None,
            target_diameter_mm: None,
            length_mm: None,
            surface_roughness_um: None,
            machine: MachineSpecs::default(),
            tool: Tool::standard_carbide(),
            tool_note: None,
            confidence: Confidence::default(),
            overrides: Overrides::default(),
            history: VecDeque::new(),
            recommendations_given: Vec::new(),
            last_recommendation: None,
            state_history: Vec::new(),
        }
    }

    /// Fresh context for the same operator.
    pub fn reset(&self) -> DialogContext {
        DialogContext::new(self.user_id.clone())
    }

    pub fn set_material(&mut self, material: Material, confidence: f64) {
        if self.material.is_none() || confidence >= self.confidence.material {
            self.material = Some(material);
            self.confidence.material = confidence;
        }
    }

    pub fn set_operation(&mut self, operation: Operation, confidence: f64) {
        if self.operation.is_none() || confidence >= self.confidence.operation {
            self.operation = Some(operation);
            self.confidence.operation = confidence;
        }
    }

    pub fn set_mode(&mut self, mode: CutMode, confidence: f64) {
        if self.mode.is_none() || confidence >= self.confidence.mode {
            self.mode = Some(mode);
            self.confidence.mode = confidence;
        }
    }

    pub fn set_tool_note(&mut self, note: impl Into<String>, confidence: f64) {
        if self.tool_note.is_none() || confidence >= self.confidence.tool {
            self.tool_note = Some(note.into());
            self.confidence.tool = confidence;
        }
    }

    /// Fold one message's extracted entities into the context.
    pub fn apply_entities(&mut self, entities: &Entities) {
        if let Some((material, conf)) = entities.material {
            self.set_material(material, conf);
        }
        if let Some((operation, conf)) = entities.operation {
            self.set_operation(operation, conf);
        }
        for mode in &entities.modes {
            self.set_mode(*mode, 0.9);
        }
        if let Some((insert, conf)) = entities.insert {
            if conf >= self.confidence.tool {
                self.tool.insert = insert;
                self.tool_note = Some(format!("{insert} insert"));
                self.confidence.tool = conf;
            }
        }

        if let Some((start, target)) = entities.goal {
            self.start_diameter_mm = Some(start);
            self.target_diameter_mm = Some(target);
            self.current_diameter_mm = Some(target);
            self.confidence.diameter = 0.9;
        } else if let Some((dia, conf)) = entities.diameter_mm {
            if self.current_diameter_mm.is_none() || conf >= self.confidence.diameter {
                self.current_diameter_mm = Some(dia);
                self.confidence.diameter = conf;
                if self.start_diameter_mm.is_none() {
                    self.start_diameter_mm = Some(dia);
                }
            }
        }

        if let Some(ra) = entities.surface_roughness_um {
            self.surface_roughness_um = Some(ra);
            // A required finish implies the mode unless the operator
            // named one explicitly.
            self.set_mode(CutMode::from_roughness(ra), 0.8);
        }
        if let Some(len) = entities.length_mm {
            self.length_mm = Some(len);
        }

        // New job data invalidates previous corrections.
        if entities.has_job_data() {
            self.overrides = Overrides::default();
        }
    }

    /// A removal goal: start and target diameters, start strictly larger.
    pub fn has_goal(&self) -> bool {
        matches!(
            (self.start_diameter_mm, self.target_diameter_mm),
            (Some(start), Some(target)) if start > target
        )
    }

    /// Material + operation + some diameter is the minimum for a
    /// recommendation.
    pub fn has_enough_for_recommendation(&self) -> bool {
        self.material.is_some()
            && self.operation.is_some()
            && (self.current_diameter_mm.is_some() || self.target_diameter_mm.is_some())
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.material.is_none() {
            missing.push("material");
        }
        if self.operation.is_none() {
            missing.push("operation");
        }
        if self.current_diameter_mm.is_none() && self.target_diameter_mm.is_none() {
            missing.push("diameter");
        }
        missing
    }

    /// Goal geometry, when the stored diameters describe a valid one.
    pub fn geometry(&self) -> Option<Geometry> {
        let start = self.start_diameter_mm?;
        let target = self.target_diameter_mm?;
        Geometry::new(start, target, self.length_mm).ok()
    }

    /// Build the engine job, once the context is complete.
    pub fn job(&self) -> Option<Job> {
        if !self.has_enough_for_recommendation() {
            return None;
        }
        let diameter = self.target_diameter_mm.or(self.current_diameter_mm)?;
        Some(Job {
            material: self.material?,
            operation: self.operation?,
            mode: self.mode,
            surface_roughness_um: self.surface_roughness_um,
            diameter_mm: diameter,
            geometry: self.geometry(),
            machine: self.machine,
            tool: self.tool.clone(),
        })
    }

    pub fn push_turn(&mut self, role: TurnRole, text: impl Into<String>) {
        self.history.push_back(Turn {
            role,
            text: text.into(),
        });
        while self.history.len() > HISTORY_LIMIT {
            self.history.pop_front();
        }
    }

    /// Move to a new state, recording the one we left.
    pub fn transition_to(&mut self, next: DialogState) {
        if next != self.state {
            self.state_history.push(self.state);
            self.state = next;
        }
    }

    /// One-line description for `/context` and logs.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(m) = self.material {
            parts.push(format!("material {m} ({:.1})", self.confidence.material));
        }
        if let Some(o) = self.operation {
            parts.push(format!("operation {o} ({:.1})", self.confidence.operation));
        }
        if let Some(mode) = self.mode {
            parts.push(format!("mode {mode} ({:.1})", self.confidence.mode));
        }
        if self.has_goal() {
            parts.push(format!(
                "goal Ø{} -> Ø{} mm",
                self.start_diameter_mm.unwrap_or_default(),
                self.target_diameter_mm.unwrap_or_default()
            ));
        } else if let Some(d) = self.current_diameter_mm {
            parts.push(format!("diameter Ø{d} mm"));
        }
        if let Some(ra) = self.surface_roughness_um {
            parts.push(format!("Ra {ra}"));
        }
        if let Some(note) = &self.tool_note {
            parts.push(format!("tool {note}"));
        }
        if parts.is_empty() {
            "context is empty".to_string()
        } else {
            parts.join(", ")
        }
    }
}
