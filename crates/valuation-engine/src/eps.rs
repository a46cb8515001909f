//! EPS resolution: trailing → analyst estimate → projected.

use valuation_core::{AnalystEstimate, EpsSet};

/// Lower/upper clamp (percent) applied to the growth used for the fy2 projection
pub const FY2_GROWTH_FLOOR: f64 = -20.0;
pub const FY2_GROWTH_CAP: f64 = 50.0;

/// Analyst EPS for the next two fiscal years; 0 where no usable estimate exists.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnalystEps {
    pub fy1: f64,
    pub fy2: f64,
}

/// Pick the estimates for `current_year + 1` and `current_year + 2`.
///
/// Order of the input is irrelevant; if a year appears twice the later record wins.
pub fn analyst_eps(estimates: &[AnalystEstimate], current_year: i32) -> AnalystEps {
    let pick = |year: i32| {
        estimates
            .iter()
            .rev()
            .find(|e| e.year == year)
            .map(|e| sanitize(e.estimated_eps_avg))
            .unwrap_or(0.0)
    };

    AnalystEps {
        fy1: pick(current_year + 1),
        fy2: pick(current_year + 2),
    }
}

/// Project fy2 from fy1 with a clamped growth rate in percent.
pub fn project_fy2(fy1: f64, growth_pct: f64) -> f64 {
    let growth = sanitize(growth_pct).clamp(FY2_GROWTH_FLOOR, FY2_GROWTH_CAP);
    fy1 * (1.0 + growth / 100.0)
}

/// Fill every unset (zero) EPS field from the fallback chain.
pub fn resolve_eps(ttm: f64, analyst: AnalystEps, growth_estimate: f64) -> EpsSet {
    let ttm = sanitize(ttm);

    let ntm = if analyst.fy1 != 0.0 { analyst.fy1 } else { ttm };
    let fy1 = if analyst.fy1 != 0.0 { analyst.fy1 } else { ttm };
    let fy2 = if analyst.fy2 != 0.0 {
        analyst.fy2
    } else {
        project_fy2(fy1, growth_estimate)
    };

    EpsSet { ttm, ntm, fy1, fy2 }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}
