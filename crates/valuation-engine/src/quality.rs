//! Quality score from profitability, leverage and liquidity ratios.

use valuation_core::FinancialMetrics;

pub const BASE_QUALITY_SCORE: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
enum Threshold {
    Above(f64),
    Below(f64),
}

impl Threshold {
    fn matches(self, value: f64) -> bool {
        match self {
            Threshold::Above(t) => value > t,
            Threshold::Below(t) => value < t,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Bucket {
    when: Threshold,
    adjustment: f64,
}

const fn above(t: f64, adjustment: f64) -> Bucket {
    Bucket { when: Threshold::Above(t), adjustment }
}

const fn below(t: f64, adjustment: f64) -> Bucket {
    Bucket { when: Threshold::Below(t), adjustment }
}

// Checked in order; the first matching bucket applies.
const ROE_BUCKETS: &[Bucket] = &[
    above(0.15, 0.30),
    above(0.10, 0.20),
    above(0.05, 0.10),
    below(0.0, -0.20),
];

const ROIC_BUCKETS: &[Bucket] = &[
    above(0.15, 0.25),
    above(0.10, 0.15),
    above(0.05, 0.05),
    below(0.0, -0.15),
];

const DEBT_TO_EQUITY_BUCKETS: &[Bucket] = &[
    below(0.3, 0.15),
    below(0.6, 0.10),
    below(1.0, 0.05),
    above(2.0, -0.10),
];

const CURRENT_RATIO_BUCKETS: &[Bucket] = &[
    above(2.0, 0.10),
    above(1.5, 0.05),
    below(1.0, -0.05),
];

fn bucket_adjustment(buckets: &[Bucket], value: f64) -> f64 {
    buckets
        .iter()
        .find(|b| b.when.matches(value))
        .map_or(0.0, |b| b.adjustment)
}

/// Quality score in [0, 1]. roe and roic are fractions (0.15 = 15%).
pub fn quality_score(roe: f64, roic: f64, debt_to_equity: f64, current_ratio: f64) -> f64 {
    let score = BASE_QUALITY_SCORE
        + bucket_adjustment(ROE_BUCKETS, roe)
        + bucket_adjustment(ROIC_BUCKETS, roic)
        + bucket_adjustment(DEBT_TO_EQUITY_BUCKETS, debt_to_equity)
        + bucket_adjustment(CURRENT_RATIO_BUCKETS, current_ratio);

    score.clamp(0.0, 1.0)
}

pub fn quality_score_for(metrics: &FinancialMetrics) -> f64 {
    quality_score(
        metrics.roe,
        metrics.roic,
        metrics.debt_to_equity,
        metrics.current_ratio,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_strong_company_clamps_to_one() {
        assert_eq!(quality_score(0.18, 0.12, 0.2, 2.5), 1.0);
    }

    #[test]
    fn test_missing_ratios_score() {
        // roe/roic 0 match nothing; d/e 0 is "low debt"; current ratio 0 is "< 1"
        assert_relative_eq!(quality_score(0.0, 0.0, 0.0, 0.0), 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_weak_company() {
        let s = quality_score(-0.05, -0.02, 3.0, 0.8);
        assert_relative_eq!(s, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_first_matching_bucket_only() {
        // roe 0.20 earns +0.30 only, not +0.30 +0.20 +0.10
        let s = quality_score(0.20, 0.0, 1.5, 1.2);
        assert_relative_eq!(s, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_middle_buckets() {
        // 0.5 + 0.10 + 0.05 + 0.05 + 0.05
        let s = quality_score(0.07, 0.06, 0.9, 1.8);
        assert_relative_eq!(s, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_boundaries_are_strict() {
        // roe exactly 0.15 lands in the > 0.10 bucket; d/e exactly 2.0 gets nothing
        let s = quality_score(0.15, 0.0, 2.0, 1.0);
        assert_relative_eq!(s, 0.7, epsilon = 1e-12);
    }

    #[test]
    fn test_score_bounded_for_any_finite_input() {
        let values = [-1e9, -1.0, -0.01, 0.0, 0.04, 0.11, 0.5, 1.7, 2.5, 1e9];
        for &a in &values {
            for &b in &values {
                let s = quality_score(a, b, a.abs(), b.abs());
                assert!((0.0..=1.0).contains(&s));
            }
        }
    }

    #[test]
    fn test_quality_score_for_metrics() {
        let metrics = FinancialMetrics {
            ttm_eps: 3.0,
            roe: 0.18,
            roic: 0.12,
            debt_to_equity: 0.2,
            current_ratio: 2.5,
        };
        assert_eq!(quality_score_for(&metrics), 1.0);
    }
}
