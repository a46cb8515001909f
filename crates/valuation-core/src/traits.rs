use async_trait::async_trait;
use crate::{
    AnalystEstimate, CompanyProfile, KeyMetricsTtm, NewsItem, PeerQuote, RatiosTtm,
    RevenueSegment, ValuationError,
};

/// Upstream market data provider.
///
/// `Ok(None)` / empty vectors mean "no record"; `Err` means the fetch itself failed.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn company_profile(&self, symbol: &str) -> Result<Option<CompanyProfile>, ValuationError>;

    async fn key_metrics_ttm(&self, symbol: &str) -> Result<Option<KeyMetricsTtm>, ValuationError>;

    async fn ratios_ttm(&self, symbol: &str) -> Result<Option<RatiosTtm>, ValuationError>;

    async fn analyst_estimates(&self, symbol: &str) -> Result<Vec<AnalystEstimate>, ValuationError>;

    /// Annual revenue growth in percent, most recent year first
    async fn revenue_growth(&self, symbol: &str) -> Result<Vec<f64>, ValuationError>;

    async fn peer_quotes(&self, symbol: &str) -> Result<Vec<PeerQuote>, ValuationError>;

    async fn revenue_segments(&self, symbol: &str) -> Result<Vec<RevenueSegment>, ValuationError>;

    async fn news(&self, symbol: &str, limit: u32) -> Result<Vec<NewsItem>, ValuationError>;
}
