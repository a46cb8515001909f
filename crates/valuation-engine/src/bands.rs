//! P/E band construction and pricing.

use valuation_core::{BandEstimate, CurrentValuation, PeBands, ValuationBands};

const QUALITY_WEIGHT: f64 = 0.4;
const GROWTH_WEIGHT: f64 = 0.6;

const LOW_MULTIPLIER: f64 = 0.7;
const HIGH_MULTIPLIER: f64 = 1.4;

const LOW_PE_FLOOR: f64 = 8.0;
const BASE_PE_FLOOR: f64 = 12.0;
const HIGH_PE_FLOOR: f64 = 15.0;

/// Scale the sector baseline by the quality and growth adjustments.
///
/// Quality moves the multiple by at most ±20%, growth by at most ±30%.
pub fn adjusted_base_pe(sector_pe: f64, quality_score: f64, growth_score: f64) -> f64 {
    let quality_adjustment = (quality_score - 0.5) * QUALITY_WEIGHT;
    let growth_adjustment = (growth_score - 0.5) * GROWTH_WEIGHT;
    sector_pe * (1.0 + quality_adjustment + growth_adjustment)
}

/// Low/base/high multiples with their floors. Returned as (low, base, high).
pub fn pe_multiples(adjusted_pe: f64) -> (f64, f64, f64) {
    (
        (adjusted_pe * LOW_MULTIPLIER).max(LOW_PE_FLOOR),
        adjusted_pe.max(BASE_PE_FLOOR),
        (adjusted_pe * HIGH_MULTIPLIER).max(HIGH_PE_FLOOR),
    )
}

/// Current P/E on trailing EPS; 0 when trailing EPS is not positive.
pub fn current_pe(price: f64, ttm_eps: f64) -> f64 {
    if ttm_eps > 0.0 { price / ttm_eps } else { 0.0 }
}

pub fn build_bands(adjusted_pe: f64, ntm_eps: f64, price: f64, ttm_eps: f64) -> ValuationBands {
    let (low, base, high) = pe_multiples(adjusted_pe);
    let band = |pe: f64| BandEstimate { pe, price: ntm_eps * pe };

    ValuationBands {
        current: CurrentValuation {
            price,
            pe: current_pe(price, ttm_eps),
        },
        bands: PeBands {
            low: band(low),
            base: band(base),
            high: band(high),
        },
    }
}
