use chrono::{Datelike, Utc};
use std::sync::Arc;
use valuation_core::{
    normalize_symbol, FinancialMetrics, MarketDataSource, NewsDigest, PeerComparison,
    SegmentBreakdown, StockAnalysis, ValuationError, ValuationInputs, ValuationResult,
};
use valuation_engine::ValuationEngine;

pub mod facets;
pub use facets::FacetOptions;

pub struct ValuationOrchestrator {
    source: Arc<dyn MarketDataSource>,
    engine: ValuationEngine,
    options: FacetOptions,
}

/// Log a failed non-essential fetch and fall back to the empty value.
fn or_default<T: Default>(symbol: &str, what: &str, result: Result<T, ValuationError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Failed to fetch {} for {}, using defaults: {}", what, symbol, e);
            T::default()
        }
    }
}

impl ValuationOrchestrator {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            source,
            engine: ValuationEngine::new(),
            options: FacetOptions::default(),
        }
    }

    pub fn with_facet_options(mut self, options: FacetOptions) -> Self {
        self.options = options;
        self
    }

    /// Fetch everything the estimator needs for an already-normalized symbol.
    ///
    /// All five fetches run concurrently. A missing profile is fatal; any other failure
    /// degrades to an empty record.
    pub async fn gather_inputs(&self, symbol: &str) -> Result<ValuationInputs, ValuationError> {
        let (profile_result, key_metrics_result, ratios_result, estimates_result, growth_result) = tokio::join!(
            self.source.company_profile(symbol),
            self.source.key_metrics_ttm(symbol),
            self.source.ratios_ttm(symbol),
            self.source.analyst_estimates(symbol),
            self.source.revenue_growth(symbol),
        );

        let profile = profile_result?.ok_or_else(|| {
            ValuationError::NotFound(format!("no company profile for {}", symbol))
        })?;

        let key_metrics = or_default(symbol, "key metrics", key_metrics_result);
        let ratios = or_default(symbol, "ratios", ratios_result);
        let estimates = or_default(symbol, "analyst estimates", estimates_result);
        let revenue_growth = or_default(symbol, "revenue growth", growth_result);

        tracing::info!(
            "Inputs for {}: {} estimates, {} growth years, metrics: {}, ratios: {}",
            symbol,
            estimates.len(),
            revenue_growth.len(),
            key_metrics.is_some(),
            ratios.is_some()
        );

        Ok(ValuationInputs {
            profile,
            metrics: FinancialMetrics::merge(key_metrics.as_ref(), ratios.as_ref()),
            estimates,
            revenue_growth,
        })
    }

    /// Valuation facet, measured from the current calendar year
    pub async fn valuate(&self, symbol: &str) -> Result<ValuationResult, ValuationError> {
        self.valuate_for_year(symbol, Utc::now().year()).await
    }

    pub async fn valuate_for_year(
        &self,
        symbol: &str,
        current_year: i32,
    ) -> Result<ValuationResult, ValuationError> {
        let symbol = normalize_symbol(symbol)?;
        tracing::info!("Starting valuation for {} (fiscal base year {})", symbol, current_year);

        let inputs = self.gather_inputs(&symbol).await?;
        Ok(self.engine.estimate(&inputs, current_year))
    }

    pub async fn peers(&self, symbol: &str) -> Result<PeerComparison, ValuationError> {
        let symbol = normalize_symbol(symbol)?;
        let (profile_result, quotes_result) = tokio::join!(
            self.source.company_profile(&symbol),
            self.source.peer_quotes(&symbol),
        );

        // A missing profile still yields the peer table; a failed fetch does not
        let profile = profile_result?;
        let quotes = or_default(&symbol, "peer quotes", quotes_result);

        Ok(facets::build_peer_comparison(&symbol, profile.as_ref(), quotes))
    }

    pub async fn segments(&self, symbol: &str) -> Result<SegmentBreakdown, ValuationError> {
        let symbol = normalize_symbol(symbol)?;
        let segments = self.source.revenue_segments(&symbol).await?;
        Ok(facets::build_segment_breakdown(&symbol, segments))
    }

    pub async fn news(&self, symbol: &str) -> Result<NewsDigest, ValuationError> {
        let symbol = normalize_symbol(symbol)?;
        let items = self.source.news(&symbol, self.options.news_fetch_limit).await?;
        Ok(facets::build_news_digest(&symbol, items, &self.options))
    }

    /// Run all four facets concurrently. Only an invalid symbol fails the whole call;
    /// each facet otherwise reports its own success or error.
    pub async fn analyze(&self, symbol: &str) -> Result<StockAnalysis, ValuationError> {
        self.analyze_for_year(symbol, Utc::now().year()).await
    }

    pub async fn analyze_for_year(
        &self,
        symbol: &str,
        current_year: i32,
    ) -> Result<StockAnalysis, ValuationError> {
        let symbol = normalize_symbol(symbol)?;
        tracing::info!("Starting analysis for {}", symbol);

        let (valuation, peers, segments, news) = tokio::join!(
            self.valuate_for_year(&symbol, current_year),
            self.peers(&symbol),
            self.segments(&symbol),
            self.news(&symbol),
        );

        let analysis = StockAnalysis {
            symbol,
            valuation: valuation.into(),
            peers: peers.into(),
            segments: segments.into(),
            news: news.into(),
        };

        let failed = analysis.failed_facets();
        if failed.is_empty() {
            tracing::info!("Analysis for {} complete", analysis.symbol);
        } else {
            tracing::warn!("Analysis for {} partially failed: {}", analysis.symbol, failed.join(", "));
        }

        Ok(analysis)
    }
}

mod tests;
