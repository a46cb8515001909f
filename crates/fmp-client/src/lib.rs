use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use valuation_core::{
    AnalystEstimate, CompanyProfile, KeyMetricsTtm, MarketDataSource, NewsItem, PeerQuote,
    RatiosTtm, RevenueSegment, ValuationError,
};

pub mod config;
pub mod parse;

pub use config::FmpConfig;

/// Upper bound on peers quoted for the peers facet
const MAX_PEERS: usize = 10;

/// Extra delay past the window edge before retrying for a slot
const SLOT_SLACK: Duration = Duration::from_millis(50);

/// Admits at most `capacity` requests in any rolling `window`.
#[derive(Clone)]
struct RateLimiter {
    sent: Arc<Mutex<VecDeque<Instant>>>,
    capacity: usize,
    window: Duration,
}

impl RateLimiter {
    fn new(capacity: usize, window: Duration) -> Self {
        Self {
            sent: Arc::new(Mutex::new(VecDeque::new())),
            capacity: capacity.max(1),
            window,
        }
    }

    async fn acquire(&self) {
        loop {
            let wait = {
                let mut sent = self.sent.lock().await;
                let now = Instant::now();
                while sent
                    .front()
                    .is_some_and(|t| now.duration_since(*t) >= self.window)
                {
                    sent.pop_front();
                }

                if sent.len() < self.capacity {
                    sent.push_back(now);
                    return;
                }
                sent.front().map_or(Duration::ZERO, |oldest| {
                    (*oldest + self.window).saturating_duration_since(now)
                })
            };

            tracing::debug!("FMP quota of {} requests used, next slot in {:.1}s", self.capacity, wait.as_secs_f64());
            tokio::time::sleep(wait + SLOT_SLACK).await;
        }
    }
}

/// Financial Modeling Prep REST client
#[derive(Clone)]
pub struct FmpClient {
    api_key: String,
    base_url: String,
    client: Client,
    rate_limiter: RateLimiter,
}

impl FmpClient {
    pub fn new(config: FmpConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key: config.api_key,
            base_url: config.base_url,
            client,
            rate_limiter: RateLimiter::new(config.rate_limit, Duration::from_secs(60)),
        }
    }

    pub fn from_env() -> Result<Self, ValuationError> {
        Ok(Self::new(FmpConfig::from_env()?))
    }

    async fn send(&self, path: &str, query: &[(&str, &str)]) -> Result<Response, ValuationError> {
        let url = format!("{}{}", self.base_url, path);

        self.rate_limiter.acquire().await;
        self.client
            .get(&url)
            .query(query)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ValuationError::UpstreamUnavailable(format!("{}: {}", path, e)))
    }

    /// Non-2xx statuses are `UpstreamUnavailable`, a 2xx body that is not JSON is
    /// `InvalidData`. Nothing is retried.
    async fn read_json(path: &str, response: Response) -> Result<Value, ValuationError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ValuationError::UpstreamUnavailable(format!(
                "{}: HTTP {}: {}",
                path,
                status,
                response.text().await.unwrap_or_default()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ValuationError::UpstreamUnavailable(format!("{}: {}", path, e)))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ValuationError::InvalidData(format!("{}: {}", path, e)))
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ValuationError> {
        let response = self.send(path, query).await?;
        Self::read_json(path, response).await
    }

    /// Like `get_json`, but a 401/403 from a plan-gated endpoint reads as an empty body.
    async fn get_json_gated(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ValuationError> {
        let response = self.send(path, query).await?;
        if is_subscription_status(response.status()) {
            tracing::info!("FMP endpoint {} not available on this plan, skipping", path);
            return Ok(Value::Array(Vec::new()));
        }
        Self::read_json(path, response).await
    }

    fn warn_on_embedded_error(&self, path: &str, body: &Value) {
        if let Some(msg) = parse::embedded_error(body) {
            tracing::warn!("FMP {} returned an error body: {}", path, msg);
        }
    }

    /// Company profile; `Ok(None)` when FMP has no record for the symbol
    pub async fn get_profile(&self, symbol: &str) -> Result<Option<CompanyProfile>, ValuationError> {
        let body = self.get_json(&format!("/api/v3/profile/{}", symbol), &[]).await?;
        Ok(parse::profile(&body, symbol))
    }

    pub async fn get_key_metrics_ttm(&self, symbol: &str) -> Result<Option<KeyMetricsTtm>, ValuationError> {
        let path = format!("/api/v3/key-metrics-ttm/{}", symbol);
        let body = self.get_json(&path, &[]).await?;
        self.warn_on_embedded_error(&path, &body);
        Ok(parse::key_metrics(&body))
    }

    pub async fn get_ratios_ttm(&self, symbol: &str) -> Result<Option<RatiosTtm>, ValuationError> {
        let path = format!("/api/v3/ratios-ttm/{}", symbol);
        let body = self.get_json(&path, &[]).await?;
        self.warn_on_embedded_error(&path, &body);
        Ok(parse::ratios(&body))
    }

    /// Annual consensus EPS estimates
    pub async fn get_analyst_estimates(&self, symbol: &str) -> Result<Vec<AnalystEstimate>, ValuationError> {
        let path = format!("/api/v3/analyst-estimates/{}", symbol);
        let body = self.get_json(&path, &[("period", "annual")]).await?;
        self.warn_on_embedded_error(&path, &body);
        Ok(parse::analyst_estimates(&body))
    }

    /// Annual revenue growth (percent) for the last five fiscal years
    pub async fn get_revenue_growth(&self, symbol: &str) -> Result<Vec<f64>, ValuationError> {
        let path = format!("/api/v3/financial-growth/{}", symbol);
        let body = self.get_json(&path, &[("period", "annual"), ("limit", "5")]).await?;
        self.warn_on_embedded_error(&path, &body);
        Ok(parse::revenue_growth(&body))
    }

    /// Quotes for the symbol's peer group (the symbol itself excluded)
    pub async fn get_peer_quotes(&self, symbol: &str) -> Result<Vec<PeerQuote>, ValuationError> {
        let body = self
            .get_json_gated("/api/v4/stock_peers", &[("symbol", symbol)])
            .await?;
        let peers: Vec<String> = parse::peer_symbols(&body, symbol)
            .into_iter()
            .take(MAX_PEERS)
            .collect();

        if peers.is_empty() {
            return Ok(Vec::new());
        }

        let body = self
            .get_json(&format!("/api/v3/quote/{}", peers.join(",")), &[])
            .await?;
        Ok(parse::quotes(&body))
    }

    /// Revenue by product segment for the latest fiscal year
    pub async fn get_revenue_segments(&self, symbol: &str) -> Result<Vec<RevenueSegment>, ValuationError> {
        let body = self
            .get_json_gated(
                "/api/v4/revenue-product-segmentation",
                &[("symbol", symbol), ("structure", "flat"), ("period", "annual")],
            )
            .await?;
        Ok(parse::revenue_segments(&body))
    }

    pub async fn get_news(&self, symbol: &str, limit: u32) -> Result<Vec<NewsItem>, ValuationError> {
        let limit = limit.to_string();
        let body = self
            .get_json("/api/v3/stock_news", &[("tickers", symbol), ("limit", &limit)])
            .await?;
        self.warn_on_embedded_error("/api/v3/stock_news", &body);
        Ok(parse::news(&body))
    }
}

fn is_subscription_status(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

#[async_trait]
impl MarketDataSource for FmpClient {
    async fn company_profile(&self, symbol: &str) -> Result<Option<CompanyProfile>, ValuationError> {
        self.get_profile(symbol).await
    }

    async fn key_metrics_ttm(&self, symbol: &str) -> Result<Option<KeyMetricsTtm>, ValuationError> {
        self.get_key_metrics_ttm(symbol).await
    }

    async fn ratios_ttm(&self, symbol: &str) -> Result<Option<RatiosTtm>, ValuationError> {
        self.get_ratios_ttm(symbol).await
    }

    async fn analyst_estimates(&self, symbol: &str) -> Result<Vec<AnalystEstimate>, ValuationError> {
        self.get_analyst_estimates(symbol).await
    }

    async fn revenue_growth(&self, symbol: &str) -> Result<Vec<f64>, ValuationError> {
        self.get_revenue_growth(symbol).await
    }

    async fn peer_quotes(&self, symbol: &str) -> Result<Vec<PeerQuote>, ValuationError> {
        self.get_peer_quotes(symbol).await
    }

    async fn revenue_segments(&self, symbol: &str) -> Result<Vec<RevenueSegment>, ValuationError> {
        self.get_revenue_segments(symbol).await
    }

    async fn news(&self, symbol: &str, limit: u32) -> Result<Vec<NewsItem>, ValuationError> {
        self.get_news(symbol, limit).await
    }
}
