//! The dialog manager: the only place dialog state changes.
//!
//! Processing order per message: commands and the operator's rpm answer
//! first, then corrections, then the clarification special cases that
//! never change state, and only then the regular
//! update-transition-assume-render pipeline.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use cnc_core::{Material, Recommendation};
use cnc_engine::{validate_parameters, Calculator, Recommender};

use crate::assumptions::AssumptionEngine;
use crate::context::{DialogContext, TurnRole};
use crate::error::Result;
use crate::intent::{CorrectedParameter, Entities, Intent, IntentParser, IntentResult};
use crate::state::{next_state, DialogState};

/// One processed message, for debugging and `/context`.
#[derive(Debug, Clone)]
pub struct TransitionRecord {
    pub at: DateTime<Utc>,
    pub user_id: String,
    pub input: String,
    pub from: DialogState,
    pub to: DialogState,
}

/// Side effects the caller should persist.
#[derive(Debug, Clone)]
pub enum DialogEvent {
    /// A recommendation was rendered to the operator.
    Recommended { recommendation: Recommendation },
    /// The operator reported the rpm they actually set.
    OperatorChoice {
        user_rpm: f64,
        recommendation: Recommendation,
    },
    /// The operator accepted the recommendation as-is.
    Affirmed { recommendation: Recommendation },
    /// The operator pushed back on a parameter.
    Corrected {
        parameter: CorrectedParameter,
        recommended_value: Option<f64>,
        corrected_value: Option<f64>,
        utterance: String,
    },
}

/// Reply plus the state it left the dialog in.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub reply: String,
    pub state: DialogState,
    pub events: Vec<DialogEvent>,
}

pub struct DialogManager {
    parser: IntentParser,
    assumptions: AssumptionEngine,
    recommender: Recommender,
    transitions: Mutex<Vec<TransitionRecord>>,
}

impl DialogManager {
    pub fn new(recommender: Recommender) -> DialogManager {
        DialogManager {
            parser: IntentParser::new(),
            assumptions: AssumptionEngine::new(),
            recommender,
            transitions: Mutex::new(Vec::new()),
        }
    }

    /// Recent transitions, oldest first.
    pub fn transitions(&self) -> Vec<TransitionRecord> {
        self.transitions.lock().clone()
    }

    /// Process one operator message against their context.
    pub fn process(&self, ctx: &mut DialogContext, input: &str) -> Result<Outcome> {
        let result = self.parser.parse(input);
        let from = ctx.state;

        // Commands never change state.
        if let Intent::Command(name) = &result.intent {
            let reply = match name.as_str() {
                "help" | "start" => self.help_text(ctx),
                "context" => format!("I remember: {}.\nState: {}.", ctx.summary(), ctx.state),
                other => format!("Unknown command /{other}. Try /help."),
            };
            return Ok(self.finish(ctx, from, from, input, reply, Vec::new()));
        }

        // A bare number after a recommendation is the operator's answer
        // to "what rpm will you set".
        if ctx.state == DialogState::AwaitingFeedback {
            if let (Some(user_rpm), Some(rec)) = (
                self.parser.bare_number(input),
                ctx.last_recommendation.clone(),
            ) {
                let reply = format!(
                    "Logged: you set {user_rpm:.0} rpm against a recommended {:.0} rpm. \
                     Every answer like this makes the next recommendation better.",
                    rec.params.rpm
                );
                ctx.transition_to(DialogState::Completed);
                let events = vec![DialogEvent::OperatorChoice {
                    user_rpm,
                    recommendation: rec,
                }];
                return Ok(self.finish(ctx, from, DialogState::Completed, input, reply, events));
            }
        }

        // Corrections only make sense once something was recommended.
        if result.intent == Intent::Correction {
            if let Some(prev) = ctx.last_recommendation.clone() {
                return self.handle_correction(ctx, from, input, &result, prev);
            }
        }

        // Clarifications never change state.
        if result.intent == Intent::Question {
            let reply = self.clarification(ctx, input);
            return Ok(self.finish(ctx, from, from, input, reply, Vec::new()));
        }
        if result.intent == Intent::Feedback {
            let reply = if ctx.state == DialogState::AwaitingFeedback {
                "What exactly doesn't fit: feed, rpm, depth of cut or the tool?".to_string()
            } else if ctx.has_enough_for_recommendation() {
                "One moment - say anything with the job data and I'll run the numbers.".to_string()
            } else {
                format!("Nothing to show yet - I still need: {}.", ctx.missing_fields().join(", "))
            };
            return Ok(self.finish(ctx, from, from, input, reply, Vec::new()));
        }

        // Regular pipeline: update context, pick the next state, fill
        // gaps with assumptions, render.
        ctx.apply_entities(&result.entities);
        let mut state = next_state(ctx, &result);

        let mut sections: Vec<String> = Vec::new();
        let mut events: Vec<DialogEvent> = Vec::new();

        if matches!(
            state,
            DialogState::CollectingContext | DialogState::ProcessingGoal
        ) {
            sections.extend(self.assumptions.apply(ctx));
        }

        loop {
            match state {
                DialogState::WaitingStart => {
                    sections.push("What material are we machining?".to_string());
                    break;
                }
                DialogState::CollectingContext => {
                    if ctx.has_goal() {
                        state = DialogState::ProcessingGoal;
                        continue;
                    }
                    if ctx.has_enough_for_recommendation() {
                        state = DialogState::Recommending;
                        continue;
                    }
                    sections.push(self.acknowledge(ctx, &result.entities));
                    break;
                }
                DialogState::ProcessingGoal => {
                    sections.push(self.goal_summary(ctx));
                    if ctx.has_enough_for_recommendation() {
                        state = DialogState::Recommending;
                        continue;
                    }
                    sections.push(self.ask_missing(ctx));
                    break;
                }
                DialogState::Recommending => {
                    let Some(job) = ctx.job() else {
                        state = DialogState::CollectingContext;
                        sections.push(self.ask_missing(ctx));
                        break;
                    };
                    let rec = self.recommender.recommend(&job)?;
                    sections.push(self.render_recommendation(&rec));
                    sections.push(
                        "What rpm will you actually set? Give me a number, say 'ok' to \
                         accept, or tell me what to change."
                            .to_string(),
                    );
                    ctx.recommendations_given.push(rec.mode);
                    ctx.last_recommendation = Some(rec.clone());
                    events.push(DialogEvent::Recommended {
                        recommendation: rec,
                    });
                    state = DialogState::AwaitingFeedback;
                    break;
                }
                DialogState::AwaitingFeedback => {
                    sections.push(
                        "Still waiting for the rpm you set - a number, 'ok', or a correction."
                            .to_string(),
                    );
                    break;
                }
                DialogState::Completed => {
                    // Only the affirmation that closes the feedback loop is
                    // journaled; a second "ok" must not log the job twice.
                    if result.intent == Intent::Affirmation && from == DialogState::AwaitingFeedback
                    {
                        if let Some(rec) = ctx.last_recommendation.clone() {
                            events.push(DialogEvent::Affirmed {
                                recommendation: rec,
                            });
                        }
                    }
                    sections.push(
                        "Job closed. I keep the context - new data starts the next one, \
                         /reset wipes the slate."
                            .to_string(),
                    );
                    break;
                }
            }
        }

        ctx.transition_to(state);
        let reply = sections.join("\n\n");
        Ok(self.finish(ctx, from, state, input, reply, events))
    }

    fn handle_correction(
        &self,
        ctx: &mut DialogContext,
        from: DialogState,
        input: &str,
        result: &IntentResult,
        prev: Recommendation,
    ) -> Result<Outcome> {
        let Some(correction) = result.entities.correction.clone() else {
            let reply =
                "Got it, something is off. Which one: feed, rpm, depth of cut or the tool?"
                    .to_string();
            return Ok(self.finish(ctx, from, from, input, reply, Vec::new()));
        };

        let recommended_value = match correction.parameter {
            CorrectedParameter::Feed => Some(prev.params.feed_mm),
            CorrectedParameter::Speed => Some(prev.params.rpm),
            CorrectedParameter::Depth => Some(prev.params.ap_mm),
            CorrectedParameter::Tool => None,
        };

        let event = DialogEvent::Corrected {
            parameter: correction.parameter,
            recommended_value,
            corrected_value: correction.value,
            utterance: input.to_string(),
        };

        if correction.parameter == CorrectedParameter::Tool {
            let reply = "Understood, wrong tool. What will you use instead?".to_string();
            ctx.transition_to(DialogState::AwaitingFeedback);
            return Ok(self.finish(
                ctx,
                from,
                DialogState::AwaitingFeedback,
                input,
                reply,
                vec![event],
            ));
        }

        let Some(value) = correction.value else {
            let label = correction.parameter.label();
            let reply = format!("Got it, the {label} is off. What {label} should I set?");
            return Ok(self.finish(ctx, from, from, input, reply, vec![event]));
        };

        match correction.parameter {
            CorrectedParameter::Feed => ctx.overrides.feed_mm = Some(value),
            CorrectedParameter::Speed => ctx.overrides.rpm = Some(value),
            CorrectedParameter::Depth => ctx.overrides.ap_mm = Some(value),
            CorrectedParameter::Tool => unreachable!(),
        }

        let rec = self.recompute_with_overrides(ctx, &prev);
        let mut reply = format!(
            "Adjusted the {} to {value}.\n\n{}",
            correction.parameter.label(),
            self.render_recommendation(&rec)
        );
        reply.push_str("\n\nWhat rpm will you set?");
        ctx.last_recommendation = Some(rec);
        ctx.transition_to(DialogState::AwaitingFeedback);
        Ok(self.finish(
            ctx,
            from,
            DialogState::AwaitingFeedback,
            input,
            reply,
            vec![event],
        ))
    }

    /// Overlay the operator's corrected values on the last recommendation
    /// and re-derive the dependent numbers and warnings.
    fn recompute_with_overrides(&self, ctx: &DialogContext, prev: &Recommendation) -> Recommendation {
        let mut rec = prev.clone();
        if let Some(feed) = ctx.overrides.feed_mm {
            rec.params.feed_mm = feed;
        }
        if let Some(ap) = ctx.overrides.ap_mm {
            rec.params.ap_mm = ap;
        }
        if let Some(rpm) = ctx.overrides.rpm {
            rec.params.rpm = rpm;
            // vc follows the spindle: vc = π·D·n / 1000.
            rec.params.vc_m_min =
                (std::f64::consts::PI * rec.job.diameter_mm * rpm / 1000.0 * 10.0).round() / 10.0;
        }

        let calc = Calculator::new(ctx.machine, ctx.tool.clone(), rec.job.material);
        rec.params.power_kw =
            calc.cutting_power_kw(rec.params.ap_mm, rec.params.feed_mm, rec.params.vc_m_min);

        rec.warnings = validate_parameters(self.recommender.rules(), rec.job.material, &rec.params);
        if rec.params.power_kw > ctx.machine.power_kw {
            rec.warnings.push(format!(
                "these values need {:.2} kW, more than the machine's {:.1} kW",
                rec.params.power_kw, ctx.machine.power_kw
            ));
        }
        rec
    }

    fn acknowledge(&self, ctx: &DialogContext, entities: &Entities) -> String {
        let mut noted = Vec::new();
        if let Some((material, _)) = entities.material {
            noted.push(format!("material {material}"));
        }
        if let Some((operation, _)) = entities.operation {
            noted.push(format!("operation {operation}"));
        }
        if let Some((dia, _)) = entities.diameter_mm {
            noted.push(format!("Ø{dia} mm"));
        }

        let mut reply = if noted.is_empty() {
            String::new()
        } else {
            format!("Noted: {}.", noted.join(", "))
        };

        let missing = ctx.missing_fields();
        if !missing.is_empty() {
            if !reply.is_empty() {
                reply.push_str("\n\n");
            }
            reply.push_str(&self.ask_missing(ctx));
        }
        if reply.is_empty() {
            reply = "Tell me more about the job.".to_string();
        }
        reply
    }

    fn ask_missing(&self, ctx: &DialogContext) -> String {
        let mut questions = Vec::new();
        if ctx.material.is_none() {
            questions.push("What material are we machining?");
        }
        if ctx.operation.is_none() {
            questions.push("What's the operation - turning, milling, boring or drilling?");
        }
        if ctx.current_diameter_mm.is_none() && ctx.target_diameter_mm.is_none() {
            questions.push("What diameter, in mm?");
        }
        if questions.is_empty() {
            "I have everything I need.".to_string()
        } else {
            questions.join("\n")
        }
    }

    fn goal_summary(&self, ctx: &DialogContext) -> String {
        let (Some(start), Some(target)) = (ctx.start_diameter_mm, ctx.target_diameter_mm) else {
            return "What's the goal - from which diameter down to which?".to_string();
        };
        let stock = (start - target) / 2.0;
        let mut summary = format!(
            "Got the goal: Ø{start} -> Ø{target} mm, {stock:.1} mm of stock per side."
        );
        if let Some(ra) = ctx.surface_roughness_um {
            summary.push_str(&format!(" Required finish Ra {ra}."));
        }
        if let Some(mode) = ctx.mode {
            summary.push_str(&format!(" Planning this as a {mode} job."));
        }
        summary
    }

    fn render_recommendation(&self, rec: &Recommendation) -> String {
        let unit = rec.job.operation.feed_unit();
        let mut out = format!(
            "Recommendation for {} {} at Ø{} mm ({} mode):\n",
            rec.job.material, rec.job.operation, rec.job.diameter_mm, rec.mode
        );
        out.push_str(&format!(
            "  cutting speed  {:.1} m/min\n  spindle speed  {:.0} rpm\n  feed           {:.3} {unit}\n  depth of cut   {:.2} mm\n  est. power     {:.2} kW",
            rec.params.vc_m_min, rec.params.rpm, rec.params.feed_mm, rec.params.ap_mm, rec.params.power_kw
        ));

        if let Some(plan) = &rec.plan {
            out.push_str(&format!(
                "\n\nPass plan ({} passes over {:.1} mm per side):",
                plan.total_passes(),
                plan.total_stock_mm
            ));
            for pass in &plan.passes {
                out.push_str(&format!(
                    "\n  {}. {:.2} mm {}",
                    pass.number, pass.ap_mm, pass.mode
                ));
            }
        }

        let tips = match rec.job.material {
            Material::Titanium => {
                Some("Titanium: coolant is mandatory, keep the setup rigid, insert must be sharp.")
            }
            Material::Aluminum => {
                Some("Aluminum: sharp insert, high spindle speed, watch for built-up edge.")
            }
            Material::Steel => Some("Steel: use coolant and keep an eye on chip control."),
            _ => None,
        };
        if let Some(tips) = tips {
            out.push_str("\n\n");
            out.push_str(tips);
        }

        if !rec.warnings.is_empty() {
            out.push_str("\n\nWatch out:");
            for warning in &rec.warnings {
                out.push_str(&format!("\n  - {warning}"));
            }
        }
        out
    }

    fn clarification(&self, ctx: &DialogContext, input: &str) -> String {
        let lower = input.to_lowercase();
        if let Some(rec) = &ctx.last_recommendation {
            if lower.contains("feed") || lower.contains("подач") {
                return format!(
                    "Feed: {:.3} {}.",
                    rec.params.feed_mm,
                    rec.job.operation.feed_unit()
                );
            }
            if lower.contains("rpm") || lower.contains("оборот") || lower.contains("скорост")
                || lower.contains("speed")
            {
                return format!(
                    "Spindle speed: {:.0} rpm (cutting speed {:.1} m/min).",
                    rec.params.rpm, rec.params.vc_m_min
                );
            }
            if lower.contains("depth") || lower.contains("глубин") {
                return format!("Depth of cut: {:.2} mm per pass.", rec.params.ap_mm);
            }
        }
        if (lower.contains("how") || lower.contains("как"))
            && (lower.contains("calc") || lower.contains("счит") || lower.contains("рассчит"))
        {
            return "I start from handbook ranges per material, then bound everything by \
                    machine power, insert geometry and tool rigidity. If a number is off \
                    for your machine, correct me - that's how I learn."
                .to_string();
        }
        "Ask about a specific parameter ('what feed?'), or give me material, operation \
         and diameter."
            .to_string()
    }

    fn help_text(&self, ctx: &DialogContext) -> String {
        let mut out = String::from("CNC assistant - I recommend cutting parameters.\n\n");
        out.push_str("I currently remember: ");
        out.push_str(&ctx.summary());
        out.push_str("\n\nExamples:\n");
        out.push_str("  turning aluminum diameter 50\n");
        out.push_str("  титан с 200 до 150 чистота 0.8\n");
        out.push_str("  steel from 60 to 50, length 80, Ra 1.6\n\n");
        out.push_str("Corrections: 'no, feed 0.3 is too much', 'make the depth 2'\n");
        out.push_str("Commands: /help, /context, /reset, /stats, /export\n\n");
        out.push_str(&format!("Current state: {}.", ctx.state));
        out
    }

    fn finish(
        &self,
        ctx: &mut DialogContext,
        from: DialogState,
        to: DialogState,
        input: &str,
        reply: String,
        events: Vec<DialogEvent>,
    ) -> Outcome {
        ctx.push_turn(TurnRole::Operator, input);
        ctx.push_turn(TurnRole::Assistant, reply.clone());

        let mut log = self.transitions.lock();
        log.push(TransitionRecord {
            at: Utc::now(),
            user_id: ctx.user_id.clone(),
            input: input.to_string(),
            from,
            to,
        });
        // Bounded ring: trim back to the most recent half when full.
        if log.len() > 100 {
            let excess = log.len() - 50;
            log.drain(..excess);
        }
        drop(log);

        tracing::debug!(
            target: "cnc::dialog",
            user = %ctx.user_id,
            from = %from,
            to = %to,
            events = events.len(),
            "processed message"
        );

        Outcome {
            reply,
            state: to,
            events,
        }
    }
}

impl Default for DialogManager {
    fn default() -> Self {
        DialogManager::new(Recommender::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> DialogManager {
        DialogManager::default()
    }

    #[test]
    fn one_shot_message_goes_straight_to_a_recommendation() {
        let m = manager();
        let mut ctx = DialogContext::new("op");
        let out = m.process(&mut ctx, "turning steel diameter 50").unwrap();

        assert_eq!(out.state, DialogState::AwaitingFeedback);
        assert!(out.reply.contains("spindle speed"));
        assert!(matches!(out.events[..], [DialogEvent::Recommended { .. }]));
        assert!(ctx.last_recommendation.is_some());
    }

    #[test]
    fn goal_message_renders_summary_and_recommendation() {
        let m = manager();
        let mut ctx = DialogContext::new("op");
        let out = m
            .process(&mut ctx, "steel turning from 60 to 50, length 80")
            .unwrap();

        assert_eq!(out.state, DialogState::AwaitingFeedback);
        assert!(out.reply.contains("Got the goal"));
        assert!(out.reply.contains("5.0 mm of stock"));
        assert!(out.reply.contains("Pass plan"));
    }

    #[test]
    fn incomplete_context_asks_for_whats_missing() {
        let m = manager();
        let mut ctx = DialogContext::new("op");
        let out = m.process(&mut ctx, "milling titanium").unwrap();

        assert_eq!(out.state, DialogState::CollectingContext);
        assert!(out.reply.contains("diameter"));
        assert!(out.events.is_empty());
    }

    #[test]
    fn material_alone_gets_an_assumption_and_a_question() {
        let m = manager();
        let mut ctx = DialogContext::new("op");
        let out = m.process(&mut ctx, "steel").unwrap();

        // The turning assumption fired, so only the diameter is missing.
        assert!(out.reply.contains("Assuming a turning operation"));
        assert!(out.reply.contains("diameter"));
        assert_eq!(ctx.operation, Some(cnc_core::Operation::Turning));
    }

    #[test]
    fn operator_rpm_completes_the_exchange() {
        let m = manager();
        let mut ctx = DialogContext::new("op");
        m.process(&mut ctx, "turning steel diameter 50").unwrap();
        let out = m.process(&mut ctx, "1200").unwrap();

        assert_eq!(out.state, DialogState::Completed);
        assert!(matches!(
            out.events[..],
            [DialogEvent::OperatorChoice { user_rpm, .. }] if user_rpm == 1200.0
        ));
    }

    #[test]
    fn affirmation_completes_without_an_rpm() {
        let m = manager();
        let mut ctx = DialogContext::new("op");
        m.process(&mut ctx, "turning steel diameter 50").unwrap();
        let out = m.process(&mut ctx, "ok, looks good").unwrap();

        assert_eq!(out.state, DialogState::Completed);
        assert!(matches!(out.events[..], [DialogEvent::Affirmed { .. }]));
    }

    #[test]
    fn repeated_affirmation_is_not_journaled_twice() {
        let m = manager();
        let mut ctx = DialogContext::new("op");
        m.process(&mut ctx, "turning steel diameter 50").unwrap();
        let first = m.process(&mut ctx, "ok").unwrap();
        assert!(matches!(first.events[..], [DialogEvent::Affirmed { .. }]));

        let second = m.process(&mut ctx, "ok").unwrap();
        assert_eq!(second.state, DialogState::Completed);
        assert!(second.events.is_empty());
    }

    #[test]
    fn correction_with_value_reissues_the_recommendation() {
        let m = manager();
        let mut ctx = DialogContext::new("op");
        m.process(&mut ctx, "turning steel diameter 50").unwrap();
        let out = m.process(&mut ctx, "no, feed 0.15 is better").unwrap();

        assert_eq!(out.state, DialogState::AwaitingFeedback);
        assert!(out.reply.contains("0.15"));
        let rec = ctx.last_recommendation.as_ref().unwrap();
        assert!((rec.params.feed_mm - 0.15).abs() < 1e-9);
        assert!(matches!(
            out.events[..],
            [DialogEvent::Corrected {
                parameter: CorrectedParameter::Feed,
                corrected_value: Some(v),
                ..
            }] if (v - 0.15).abs() < 1e-9
        ));
    }

    #[test]
    fn replacement_tool_reissues_the_recommendation() {
        let m = manager();
        let mut ctx = DialogContext::new("op");
        m.process(&mut ctx, "turning steel diameter 50").unwrap();
        let before = ctx.last_recommendation.clone().unwrap();

        let out = m.process(&mut ctx, "wrong tool here").unwrap();
        assert!(out.reply.contains("instead"));
        assert_eq!(out.state, DialogState::AwaitingFeedback);

        // Naming the replacement insert recomputes with its speed
        // coefficient; ceramic runs 1.5x carbide.
        let out = m.process(&mut ctx, "I'll put in a ceramic insert").unwrap();
        assert_eq!(out.state, DialogState::AwaitingFeedback);
        let after = ctx.last_recommendation.clone().unwrap();
        assert!(after.params.vc_m_min > before.params.vc_m_min);
        assert_eq!(after.job.tool_insert, "ceramic");
    }

    #[test]
    fn correction_without_value_asks_for_one() {
        let m = manager();
        let mut ctx = DialogContext::new("op");
        m.process(&mut ctx, "turning steel diameter 50").unwrap();
        let out = m.process(&mut ctx, "нет, не подходит подача").unwrap();

        assert_eq!(out.state, DialogState::AwaitingFeedback);
        assert!(out.reply.contains("feed"));
        // The context keeps the recommendation; nothing was overridden.
        assert!(ctx.overrides.feed_mm.is_none());
    }

    #[test]
    fn questions_answer_from_the_last_recommendation() {
        let m = manager();
        let mut ctx = DialogContext::new("op");
        m.process(&mut ctx, "turning steel diameter 50").unwrap();
        let state_before = ctx.state;
        let out = m.process(&mut ctx, "what feed?").unwrap();

        assert_eq!(out.state, state_before);
        assert!(out.reply.starts_with("Feed:"));
    }

    #[test]
    fn help_never_changes_state_and_echoes_context() {
        let m = manager();
        let mut ctx = DialogContext::new("op");
        m.process(&mut ctx, "aluminum milling 40").unwrap();
        let state_before = ctx.state;
        let out = m.process(&mut ctx, "/help").unwrap();

        assert_eq!(out.state, state_before);
        assert!(out.reply.contains("aluminum"));
        assert!(out.reply.contains("milling"));
    }

    #[test]
    fn new_job_after_completion_restarts_collection() {
        let m = manager();
        let mut ctx = DialogContext::new("op");
        m.process(&mut ctx, "turning steel diameter 50").unwrap();
        m.process(&mut ctx, "950").unwrap();
        let out = m.process(&mut ctx, "now titanium").unwrap();

        // Material flips, the rest of the job context is still there, so
        // it recommends again right away.
        assert_eq!(ctx.material, Some(Material::Titanium));
        assert_eq!(out.state, DialogState::AwaitingFeedback);
    }

    #[test]
    fn transition_log_is_bounded() {
        let m = manager();
        let mut ctx = DialogContext::new("op");
        for i in 0..130 {
            m.process(&mut ctx, &format!("message {i}")).unwrap();
        }
        let log = m.transitions();
        assert!(log.len() <= 100);
        assert_eq!(log.last().unwrap().input, "message 129");
    }
}
