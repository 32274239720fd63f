//! Pass planning: split total stock into a realistic number of passes.
//!
//! The two failure modes this guards against are one monster pass that
//! takes the whole stock, and dozens of shaving passes. Real plans land
//! in the single digits.

use cnc_core::{CutMode, Pass, PassPlan};

use crate::calculator::{round2, SAFE_AP_RANGE_MM};

/// Default target depth of cut per mode, mm.
pub fn default_target_ap(mode: CutMode) -> f64 {
    match mode {
        CutMode::Roughing => 4.0,
        CutMode::SemiFinishing => 2.0,
        CutMode::Finishing => 0.5,
    }
}

/// Split `stock_mm` (per side) into passes at roughly `target_ap_mm` each.
///
/// Leftover under half the target depth merges into the last pass; a
/// residual above 0.1 mm becomes a finishing (or semi-finishing) pass.
/// If the plan still exceeds 20 passes the depth was absurdly small for
/// the stock, so the plan is redone at 1.5× depth.
pub fn plan(stock_mm: f64, target_ap_mm: f64, mode: CutMode) -> PassPlan {
    let target = target_ap_mm.clamp(SAFE_AP_RANGE_MM.0, SAFE_AP_RANGE_MM.1);

    let mut passes = Vec::new();
    if stock_mm <= target {
        passes.push(Pass {
            number: 1,
            ap_mm: round2(stock_mm),
            mode,
        });
    } else {
        let mut remaining = stock_mm;
        let mut number = 1u32;
        while remaining > target * 0.5 {
            let ap = target.min(remaining);
            passes.push(Pass {
                number,
                ap_mm: round2(ap),
                mode: CutMode::Roughing,
            });
            remaining -= ap;
            number += 1;
        }
        if remaining > 0.1 {
            let residual_mode = if mode == CutMode::Finishing {
                CutMode::Finishing
            } else {
                CutMode::SemiFinishing
            };
            passes.push(Pass {
                number,
                ap_mm: round2(remaining),
                mode: residual_mode,
            });
        }
    }

    // Escalate the depth rather than emit a 50-pass plan. Once the
    // target is pinned at the safe maximum the plan stands as-is and the
    // recommender warns about the pass count instead.
    if passes.len() > 20 && target < SAFE_AP_RANGE_MM.1 {
        return plan(stock_mm, target * 1.5, mode);
    }

    PassPlan {
        passes,
        total_stock_mm: stock_mm,
        target_ap_mm: target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_stock_is_one_pass() {
        let p = plan(2.0, 4.0, CutMode::Roughing);
        assert_eq!(p.total_passes(), 1);
        assert_eq!(p.passes[0].ap_mm, 2.0);
    }

    #[test]
    fn heavy_stock_splits_into_single_digit_passes() {
        // 100 mm per side at 4 mm target: 25 raw passes would be absurd,
        // so the planner escalates the depth.
        let p = plan(100.0, 4.0, CutMode::Roughing);
        assert!(p.total_passes() <= 20);
        assert!(p.target_ap_mm > 4.0);

        let removed: f64 = p.passes.iter().map(|pass| pass.ap_mm).sum();
        assert!((removed - 100.0).abs() < 0.5);
    }

    #[test]
    fn residual_becomes_a_semi_finishing_pass() {
        // 9 mm at 4 mm: two roughing passes, 1 mm residual.
        let p = plan(9.0, 4.0, CutMode::Roughing);
        let last = p.passes.last().unwrap();
        assert_eq!(last.mode, CutMode::SemiFinishing);
        assert!((last.ap_mm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn finishing_job_finishes_with_a_finishing_pass() {
        let p = plan(3.0, 1.0, CutMode::Finishing);
        assert_eq!(p.passes.last().unwrap().mode, CutMode::Finishing);
    }

    #[test]
    fn tiny_leftover_is_swallowed() {
        // 8.2 mm at 4 mm: two full passes plus a 0.2 mm residual.
        let p = plan(8.2, 4.0, CutMode::Roughing);
        assert_eq!(p.total_passes(), 3);
        // 8.05 mm at 4 mm: leftover 0.05 below the 0.1 mm threshold.
        let p = plan(8.05, 4.0, CutMode::Roughing);
        assert_eq!(p.total_passes(), 2);
    }

    #[test]
    fn escalation_terminates_even_for_extreme_stock() {
        // 400 mm per side cannot fit in 20 passes even at the maximum
        // depth; the planner must still return instead of recursing.
        let p = plan(400.0, 0.5, CutMode::Roughing);
        assert_eq!(p.target_ap_mm, SAFE_AP_RANGE_MM.1);
        let removed: f64 = p.passes.iter().map(|pass| pass.ap_mm).sum();
        assert!((removed - 400.0).abs() < 0.5);
    }

    #[test]
    fn moderate_stock_stays_under_twenty_passes() {
        for stock in [1.0, 5.0, 20.0, 75.0, 100.0] {
            let p = plan(stock, 0.5, CutMode::Roughing);
            assert!(p.total_passes() <= 20, "stock {stock}: {}", p.total_passes());
        }
    }
}
