//! Recommendation orchestration: rules → calculator → planner → validator.

use cnc_core::{
    CutMode, CuttingParameters, Geometry, JobSummary, MachineSpecs, Material, Operation,
    Recommendation, Tool,
};

use crate::calculator::{round1, round2, round3, Calculator};
use crate::error::Result;
use crate::passes;
use crate::rules::RuleSet;
use crate::validate::validate_parameters;

/// Everything known about the job when a recommendation is requested.
#[derive(Debug, Clone)]
pub struct Job {
    pub material: Material,
    pub operation: Operation,
    /// Explicit mode, if the operator named one.
    pub mode: Option<CutMode>,
    /// Required surface roughness Ra, µm.
    pub surface_roughness_um: Option<f64>,
    /// Diameter the parameters are computed for (target diameter when a
    /// goal is set).
    pub diameter_mm: f64,
    pub geometry: Option<Geometry>,
    pub machine: MachineSpecs,
    pub tool: Tool,
}

impl Job {
    /// Explicit mode wins; otherwise the required Ra decides; otherwise
    /// roughing.
    pub fn resolve_mode(&self) -> CutMode {
        if let Some(mode) = self.mode {
            mode
        } else if let Some(ra) = self.surface_roughness_um {
            CutMode::from_roughness(ra)
        } else {
            CutMode::Roughing
        }
    }
}

/// Produces physically bounded recommendations from a rules table.
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    rules: RuleSet,
}

impl Recommender {
    pub fn new(rules: RuleSet) -> Recommender {
        Recommender { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Recommend parameters for the job's resolved mode.
    pub fn recommend(&self, job: &Job) -> Result<Recommendation> {
        self.recommend_mode(job, job.resolve_mode())
    }

    /// Recommend parameters for one explicit mode.
    pub fn recommend_mode(&self, job: &Job, mode: CutMode) -> Result<Recommendation> {
        check_diameter(job.diameter_mm)?;

        let base = self
            .rules
            .base_parameters(job.material, job.operation, mode, &job.tool);
        let calc = Calculator::new(job.machine, job.tool.clone(), job.material);

        let mut warnings = Vec::new();
        let vc = base.vc_m_min;
        let feed = base.feed_mm;
        let rpm = calc.rpm(vc, job.diameter_mm, job.operation);

        // The mode's depth, capped by power, insert and rigidity limits.
        let mut ap = base.ap_mm.min(calc.safe_ap(vc, feed));
        let mut power = calc.cutting_power_kw(ap, feed, vc);

        // Power headroom rule: keep 10% in reserve.
        if power > job.machine.power_kw * 0.9 {
            warnings.push(format!(
                "estimated power {:.2} kW is close to the machine's {:.1} kW, reducing depth of cut",
                power, job.machine.power_kw
            ));
            ap *= 0.7;
            power = calc.cutting_power_kw(ap, feed, vc);
        }

        if rpm > job.machine.max_rpm * 0.9 {
            warnings.push(format!(
                "{rpm:.0} rpm is close to the machine maximum of {:.0} rpm",
                job.machine.max_rpm
            ));
        }

        let plan = job
            .geometry
            .map(|g| passes::plan(g.stock_per_side_mm(), ap, mode));
        if let Some(p) = &plan {
            if p.total_passes() > 15 {
                warnings.push(format!(
                    "{} passes is a lot, consider a tool that takes a deeper cut",
                    p.total_passes()
                ));
            }
        }

        let params = CuttingParameters {
            vc_m_min: round1(vc),
            rpm,
            feed_mm: round3(feed),
            ap_mm: round2(ap),
            power_kw: power,
        };
        warnings.extend(validate_parameters(&self.rules, job.material, &params));

        tracing::debug!(
            target: "cnc::engine",
            material = %job.material,
            operation = %job.operation,
            mode = %mode,
            rpm = params.rpm,
            warnings = warnings.len(),
            "recommendation computed"
        );

        Ok(Recommendation {
            mode,
            params,
            plan,
            warnings,
            job: JobSummary {
                material: job.material,
                operation: job.operation,
                diameter_mm: job.diameter_mm,
                stock_per_side_mm: job.geometry.map(|g| g.stock_per_side_mm()),
                tool_insert: job.tool.insert.name().to_string(),
            },
        })
    }

    /// One recommendation per cut mode, for operators comparing strategies.
    pub fn alternatives(&self, job: &Job) -> Result<Vec<Recommendation>> {
        CutMode::ALL
            .iter()
            .map(|mode| self.recommend_mode(job, *mode))
            .collect()
    }
}

fn check_diameter(diameter_mm: f64) -> Result<()> {
    if !diameter_mm.is_finite() || !(0.1..=10_000.0).contains(&diameter_mm) {
        return Err(cnc_core::CoreError::OutOfRange {
            name: "diameter",
            value: diameter_mm,
            min: 0.1,
            max: 10_000.0,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn steel_job() -> Job {
        Job {
            material: Material::Steel,
            operation: Operation::Turning,
            mode: None,
            surface_roughness_um: None,
            diameter_mm: 50.0,
            geometry: None,
            machine: MachineSpecs::default(),
            tool: Tool::standard_carbide(),
        }
    }

    #[test]
    fn steel_turning_stays_inside_the_handbook_bands() {
        let rec = Recommender::default().recommend(&steel_job()).unwrap();
        assert_eq!(rec.mode, CutMode::Roughing);
        assert!(rec.physically_possible(), "{:?}", rec.warnings);
        assert!(rec.params.vc_m_min > 0.0);
        assert!(rec.params.power_kw < MachineSpecs::default().power_kw);
    }

    #[test]
    fn roughness_drives_the_mode_when_none_is_given() {
        let mut job = steel_job();
        job.surface_roughness_um = Some(0.8);
        let rec = Recommender::default().recommend(&job).unwrap();
        assert_eq!(rec.mode, CutMode::Finishing);

        // An explicit mode wins over Ra.
        job.mode = Some(CutMode::Roughing);
        let rec = Recommender::default().recommend(&job).unwrap();
        assert_eq!(rec.mode, CutMode::Roughing);
    }

    #[test]
    fn goal_geometry_produces_a_pass_plan() {
        let mut job = steel_job();
        job.geometry = Some(Geometry::new(60.0, 50.0, Some(80.0)).unwrap());
        let rec = Recommender::default().recommend(&job).unwrap();

        let plan = rec.plan.expect("goal jobs get a plan");
        assert_eq!(plan.total_stock_mm, 5.0);
        let removed: f64 = plan.passes.iter().map(|p| p.ap_mm).sum();
        assert!((removed - 5.0).abs() < 0.15);
        assert_eq!(rec.job.stock_per_side_mm, Some(5.0));
    }

    #[test]
    fn weak_machine_triggers_the_power_headroom_rule() {
        let mut job = steel_job();
        job.machine.power_kw = 1.0;
        // A large nose radius so the insert limit does not mask the
        // power limit.
        job.tool.insert_radius_mm = 6.0;
        job.tool.overhang_mm = 10.0;

        let rec = Recommender::default().recommend(&job).unwrap();
        assert!(!rec.physically_possible());
        assert!(rec.warnings.iter().any(|w| w.contains("power")));
        assert!(rec.params.power_kw <= 1.0 * 0.9 + 0.1);
    }

    #[test]
    fn small_aluminum_part_flags_rpm_near_machine_limit() {
        let mut job = steel_job();
        job.material = Material::Aluminum;
        job.diameter_mm = 12.0;
        let rec = Recommender::default().recommend(&job).unwrap();
        // Aluminum at Ø12 wants well over 3000 rpm; the clamp leaves it
        // pinned at the machine maximum, which deserves a warning.
        assert_eq!(rec.params.rpm, 3000.0);
        assert!(rec.warnings.iter().any(|w| w.contains("rpm")));
    }

    #[test]
    fn alternatives_cover_all_three_modes() {
        let recs = Recommender::default().alternatives(&steel_job()).unwrap();
        assert_eq!(recs.len(), 3);
        let modes: Vec<CutMode> = recs.iter().map(|r| r.mode).collect();
        assert_eq!(modes, CutMode::ALL.to_vec());
        // Finishing feeds less than roughing.
        assert!(recs[2].params.feed_mm < recs[0].params.feed_mm);
    }

    #[test]
    fn absurd_diameter_is_rejected() {
        let mut job = steel_job();
        job.diameter_mm = 0.0;
        assert!(Recommender::default().recommend(&job).is_err());
        job.diameter_mm = 50_000.0;
        assert!(Recommender::default().recommend(&job).is_err());
    }

    proptest! {
        #[test]
        fn parameters_are_always_finite_and_bounded(
            diameter in 1.0f64..1000.0,
            material_idx in 0usize..Material::ALL.len(),
            mode_idx in 0usize..CutMode::ALL.len(),
        ) {
            let mut job = steel_job();
            job.material = Material::ALL[material_idx];
            job.mode = Some(CutMode::ALL[mode_idx]);
            job.diameter_mm = diameter;

            let rec = Recommender::default().recommend(&job).unwrap();
            let p = rec.params;
            prop_assert!(p.vc_m_min.is_finite() && p.vc_m_min > 0.0);
            prop_assert!(p.feed_mm >= 0.05 && p.feed_mm <= Tool::MAX_FEED_MM_REV);
            prop_assert!(p.ap_mm > 0.0 && p.ap_mm <= 6.0);
            prop_assert!(p.rpm >= 200.0 && p.rpm <= job.machine.max_rpm);
            prop_assert!(p.power_kw >= 0.0 && p.power_kw.is_finite());
        }
    }
}
