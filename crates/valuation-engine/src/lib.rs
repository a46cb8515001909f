//! Heuristic fair-value estimation from a single fundamentals snapshot.
//!
//! Pipeline: EPS resolution → quality and growth scoring → sector P/E adjustment →
//! low/base/high bands priced on forward EPS. Every stage is a pure function; missing
//! inputs degrade to defaults instead of failing.

pub mod bands;
pub mod eps;
pub mod growth;
pub mod quality;
pub mod sector;

use valuation_core::{QualityMetrics, ValuationInputs, ValuationResult};

pub use bands::{adjusted_base_pe, build_bands, current_pe, pe_multiples};
pub use eps::{analyst_eps, resolve_eps, AnalystEps};
pub use growth::{growth_score, historical_growth};
pub use quality::quality_score;
pub use sector::{sector_base_pe, DEFAULT_SECTOR_PE};

pub struct ValuationEngine;

impl ValuationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Estimate the valuation bands for `inputs`, treating `current_year` as the
    /// fiscal year the forward estimates are measured from.
    pub fn estimate(&self, inputs: &ValuationInputs, current_year: i32) -> ValuationResult {
        let profile = &inputs.profile;
        let metrics = &inputs.metrics;

        // Growth inputs feed both the fy2 projection and the growth score
        let analyst = eps::analyst_eps(&inputs.estimates, current_year);
        let analyst_growth = growth::analyst_growth(analyst.fy1, analyst.fy2);
        let historical_growth = growth::historical_growth(&inputs.revenue_growth);
        let growth_estimate = growth::growth_estimate(analyst_growth, historical_growth);

        let eps = eps::resolve_eps(metrics.ttm_eps, analyst, growth_estimate);

        let quality_score = quality::quality_score_for(metrics);
        let growth_score = growth::growth_score(growth_estimate);

        let sector_pe = sector::sector_base_pe(&profile.sector);
        let adjusted_pe = bands::adjusted_base_pe(sector_pe, quality_score, growth_score);
        let valuations = bands::build_bands(adjusted_pe, eps.ntm, profile.price, eps.ttm);

        let growth_rate = growth::reported_growth_rate(analyst_growth, historical_growth, &eps);

        tracing::debug!(
            "{}: sector P/E {:.1} ({}), quality {:.2}, growth score {:.2}, adjusted P/E {:.2}",
            profile.symbol,
            sector_pe,
            profile.sector,
            quality_score,
            growth_score,
            adjusted_pe
        );

        ValuationResult {
            symbol: profile.symbol.to_uppercase(),
            company_name: profile.company_name.clone(),
            current_price: profile.price,
            market_cap: profile.market_cap,
            eps,
            valuations,
            growth_rate,
            sector: profile.sector.clone(),
            industry: profile.industry.clone(),
            description: profile.description.clone(),
            metrics: Some(QualityMetrics {
                roe: metrics.roe * 100.0,
                roic: metrics.roic * 100.0,
                debt_to_equity: metrics.debt_to_equity,
                current_ratio: metrics.current_ratio,
                quality_score,
                growth_score,
            }),
        }
    }
}

impl Default for ValuationEngine {
    fn default() -> Self {
        Self::new()
    }
}
