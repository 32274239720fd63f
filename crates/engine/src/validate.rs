//! Sanity-check parameters against the handbook ranges.

use cnc_core::{CuttingParameters, Material};

use crate::rules::RuleSet;

/// Compare parameters against the material's rule ranges.
///
/// Tolerance bands: speed may stray 30% outside the range before it is
/// flagged, feed and depth 50%. Returns human-readable warnings; an
/// empty list means the parameters sit inside every band.
pub fn validate_parameters(
    rules: &RuleSet,
    material: Material,
    params: &CuttingParameters,
) -> Vec<String> {
    let mut warnings = Vec::new();
    let r = rules.material(material);

    if params.vc_m_min < r.vc.min * 0.7 {
        warnings.push(format!(
            "cutting speed {:.1} m/min is below the recommended {:.0}-{:.0} m/min for {material}",
            params.vc_m_min, r.vc.min, r.vc.max
        ));
    } else if params.vc_m_min > r.vc.max * 1.3 {
        warnings.push(format!(
            "cutting speed {:.1} m/min is above the recommended {:.0}-{:.0} m/min for {material}",
            params.vc_m_min, r.vc.min, r.vc.max
        ));
    }

    if params.feed_mm < r.feed.min * 0.5 {
        warnings.push(format!(
            "feed {:.3} mm is below the recommended {:.2}-{:.2} mm for {material}",
            params.feed_mm, r.feed.min, r.feed.max
        ));
    } else if params.feed_mm > r.feed.max * 1.5 {
        warnings.push(format!(
            "feed {:.3} mm is above the recommended {:.2}-{:.2} mm for {material}",
            params.feed_mm, r.feed.min, r.feed.max
        ));
    }

    if params.ap_mm < r.ap.min * 0.5 {
        warnings.push(format!(
            "depth of cut {:.2} mm is below the recommended {:.1}-{:.1} mm for {material}",
            params.ap_mm, r.ap.min, r.ap.max
        ));
    } else if params.ap_mm > r.ap.max * 1.5 {
        warnings.push(format!(
            "depth of cut {:.2} mm is above the recommended {:.1}-{:.1} mm for {material}",
            params.ap_mm, r.ap.min, r.ap.max
        ));
    }

    warnings
}
