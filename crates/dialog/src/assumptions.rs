//! The assumption engine: guess before asking.
//!
//! Fills context gaps with low-confidence values and tells the operator
//! what was assumed, so a single short message still produces a usable
//! recommendation. Assumptions never displace operator-provided values;
//! the confidence gate in `DialogContext` guarantees that.

use cnc_core::{Material, Operation};

use crate::context::DialogContext;

#[derive(Debug, Default)]
pub struct AssumptionEngine;

impl AssumptionEngine {
    pub fn new() -> AssumptionEngine {
        AssumptionEngine
    }

    /// Apply assumption rules to the context; returns one message per
    /// assumption or heads-up for the operator.
    pub fn apply(&self, ctx: &mut DialogContext) -> Vec<String> {
        let mut messages = Vec::new();

        // No guessing on an empty context.
        if ctx.material.is_none() && ctx.operation.is_none() {
            return messages;
        }

        // Diameter heads-ups (no context mutation).
        if let Some(dia) = ctx.current_diameter_mm {
            if dia < 20.0 {
                messages.push(format!(
                    "Ø{dia} mm is small - expect high spindle speeds."
                ));
            } else if dia > 100.0 {
                messages.push(format!(
                    "Ø{dia} mm is large - watch for vibration."
                ));
            }
            if ctx.material == Some(Material::Aluminum) && dia < 15.0 {
                messages.push(
                    "Small-diameter aluminum needs a really sharp insert.".to_string(),
                );
            }
        }

        if ctx.material.is_some() && ctx.operation.is_none() {
            // Most shop jobs on round stock are turning.
            let confidence = match ctx.material {
                Some(Material::Aluminum) => 0.5,
                _ => 0.4,
            };
            ctx.set_operation(Operation::Turning, confidence);
            messages.push(
                "Assuming a turning operation - say 'milling' or 'drilling' if not.".to_string(),
            );
        } else if ctx.operation.is_some() && ctx.material.is_some() && ctx.mode.is_none() {
            ctx.set_mode(cnc_core::CutMode::Roughing, 0.3);
            messages.push(
                "Assuming roughing - name a mode or a required Ra for a finish pass.".to_string(),
            );
        } else if ctx.material == Some(Material::Steel)
            && ctx.operation == Some(Operation::Turning)
            && ctx.tool_note.is_none()
        {
            ctx.set_tool_note("carbide insert", 0.5);
            messages.push("Steel usually runs a carbide insert.".to_string());
        } else if ctx.material == Some(Material::Aluminum)
            && ctx.operation == Some(Operation::Turning)
            && ctx.tool_note.is_none()
        {
            ctx.set_tool_note("sharp polished insert", 0.6);
            messages.push("For aluminum I'd take a sharp polished insert.".to_string());
        }

        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnc_core::CutMode;

    #[test]
    fn no_assumptions_on_empty_context() {
        let mut ctx = DialogContext::new("op");
        assert!(AssumptionEngine::new().apply(&mut ctx).is_empty());
        assert!(ctx.operation.is_none());
    }

    #[test]
    fn material_alone_assumes_turning() {
        let mut ctx = DialogContext::new("op");
        ctx.set_material(Material::Steel, 0.9);
        let messages = AssumptionEngine::new().apply(&mut ctx);
        assert_eq!(ctx.operation, Some(Operation::Turning));
        assert!(ctx.confidence.operation < 0.6);
        assert!(messages.iter().any(|m| m.contains("turning")));
    }

    #[test]
    fn assumption_never_overwrites_explicit_operation() {
        let mut ctx = DialogContext::new("op");
        ctx.set_material(Material::Steel, 0.9);
        ctx.set_operation(Operation::Milling, 0.9);
        ctx.set_mode(CutMode::Finishing, 0.9);
        AssumptionEngine::new().apply(&mut ctx);
        assert_eq!(ctx.operation, Some(Operation::Milling));
        assert_eq!(ctx.mode, Some(CutMode::Finishing));
    }

    #[test]
    fn operation_without_mode_assumes_roughing() {
        let mut ctx = DialogContext::new("op");
        ctx.set_material(Material::Steel, 0.9);
        ctx.set_operation(Operation::Turning, 0.9);
        AssumptionEngine::new().apply(&mut ctx);
        assert_eq!(ctx.mode, Some(CutMode::Roughing));
        assert!((ctx.confidence.mode - 0.3).abs() < 1e-9);
    }

    #[test]
    fn small_diameter_gets_a_heads_up() {
        let mut ctx = DialogContext::new("op");
        ctx.set_material(Material::Aluminum, 0.9);
        ctx.current_diameter_mm = Some(12.0);
        let messages = AssumptionEngine::new().apply(&mut ctx);
        assert!(messages.iter().any(|m| m.contains("small")));
        assert!(messages.iter().any(|m| m.contains("sharp insert")));
    }

    #[test]
    fn steel_turning_suggests_carbide() {
        let mut ctx = DialogContext::new("op");
        ctx.set_material(Material::Steel, 0.9);
        ctx.set_operation(Operation::Turning, 0.9);
        ctx.set_mode(CutMode::Roughing, 0.9);
        AssumptionEngine::new().apply(&mut ctx);
        assert_eq!(ctx.tool_note.as_deref(), Some("carbide insert"));
    }
}
