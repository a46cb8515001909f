//! Growth derivation and growth scoring.

use valuation_core::{first_non_zero, EpsSet};

/// Number of most recent annual revenue-growth figures averaged
pub const HISTORICAL_WINDOW: usize = 3;

/// Descending breakpoints: growth strictly above the threshold earns the score
const GROWTH_SCORE_BREAKPOINTS: &[(f64, f64)] = &[
    (20.0, 0.9),
    (15.0, 0.8),
    (10.0, 0.7),
    (5.0, 0.6),
    (0.0, 0.5),
    (-5.0, 0.4),
    (-10.0, 0.3),
];
const GROWTH_SCORE_FLOOR: f64 = 0.2;

pub const MIN_GROWTH_SCORE: f64 = 0.1;
pub const MAX_GROWTH_SCORE: f64 = 1.0;

/// Mean of the most recent revenue-growth figures (percent), 0 when none.
///
/// A single reported year is enough; there is no minimum history length.
pub fn historical_growth(revenue_growth: &[f64]) -> f64 {
    let window: Vec<f64> = revenue_growth
        .iter()
        .take(HISTORICAL_WINDOW)
        .map(|g| if g.is_finite() { *g } else { 0.0 })
        .collect();

    if window.is_empty() {
        0.0
    } else {
        window.iter().sum::<f64>() / window.len() as f64
    }
}

/// Analyst-implied EPS growth from fy1 to fy2 in percent.
pub fn analyst_growth(fy1_eps: f64, fy2_eps: f64) -> f64 {
    if fy1_eps > 0.0 && fy2_eps > 0.0 && fy1_eps.is_finite() && fy2_eps.is_finite() {
        (fy2_eps - fy1_eps) / fy1_eps * 100.0
    } else {
        0.0
    }
}

/// Growth used for the fy2 projection and the growth score.
pub fn growth_estimate(analyst: f64, historical: f64) -> f64 {
    first_non_zero(&[Some(analyst), Some(historical)])
}

/// Growth rate reported in the result.
pub fn reported_growth_rate(analyst: f64, historical: f64, eps: &EpsSet) -> f64 {
    let eps_delta = if eps.fy1 > 0.0 && eps.fy2 > eps.fy1 {
        Some((eps.fy2 - eps.fy1) / eps.fy1 * 100.0)
    } else {
        None
    };
    first_non_zero(&[Some(analyst), Some(historical), eps_delta])
}

/// Map a growth rate (percent) to a score in [0.1, 1.0].
pub fn growth_score(growth_pct: f64) -> f64 {
    let score = GROWTH_SCORE_BREAKPOINTS
        .iter()
        .find(|(threshold, _)| growth_pct > *threshold)
        .map(|(_, score)| *score)
        .unwrap_or(GROWTH_SCORE_FLOOR);

    score.clamp(MIN_GROWTH_SCORE, MAX_GROWTH_SCORE)
}
