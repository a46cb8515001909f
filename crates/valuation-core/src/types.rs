use serde::{Deserialize, Serialize};

/// Sector label used when the profile source does not report one
pub const UNKNOWN_SECTOR: &str = "unknown";

/// Company profile snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub symbol: String,
    pub company_name: String,
    pub price: f64,
    pub market_cap: f64,
    pub sector: String,
    pub industry: Option<String>,
    pub description: Option<String>,
}

/// Trailing-twelve-month key metrics record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyMetricsTtm {
    pub net_income_per_share: Option<f64>,
    pub roe: Option<f64>,
}

/// Trailing-twelve-month ratios record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatiosTtm {
    pub return_on_equity: Option<f64>,
    pub return_on_invested_capital: Option<f64>,
    pub debt_equity_ratio: Option<f64>,
    pub current_ratio: Option<f64>,
}

/// Trailing metrics consumed by the scorers. Missing upstream values are 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    pub ttm_eps: f64,
    pub roe: f64,
    pub roic: f64,
    pub debt_to_equity: f64,
    pub current_ratio: f64,
}

impl FinancialMetrics {
    /// Merge the key-metrics and ratios records; the first non-zero value wins.
    pub fn merge(key_metrics: Option<&KeyMetricsTtm>, ratios: Option<&RatiosTtm>) -> Self {
        let km = key_metrics.cloned().unwrap_or_default();
        let r = ratios.cloned().unwrap_or_default();

        Self {
            ttm_eps: first_non_zero(&[km.net_income_per_share]),
            roe: first_non_zero(&[r.return_on_equity, km.roe]),
            roic: first_non_zero(&[r.return_on_invested_capital]),
            debt_to_equity: first_non_zero(&[r.debt_equity_ratio]),
            current_ratio: first_non_zero(&[r.current_ratio]),
        }
    }
}

/// First finite, non-zero value in priority order, else 0.
pub fn first_non_zero(candidates: &[Option<f64>]) -> f64 {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|v| v.is_finite() && *v != 0.0)
        .unwrap_or(0.0)
}

/// Annual consensus EPS estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalystEstimate {
    pub year: i32,
    pub estimated_eps_avg: f64,
}

/// Everything the estimator needs for one symbol
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationInputs {
    pub profile: CompanyProfile,
    pub metrics: FinancialMetrics,
    pub estimates: Vec<AnalystEstimate>,
    /// Annual revenue growth in percent, most recent first
    pub revenue_growth: Vec<f64>,
}

/// Resolved EPS figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsSet {
    pub ttm: f64,
    pub ntm: f64,
    pub fy1: f64,
    pub fy2: f64,
}

/// One valuation scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandEstimate {
    pub pe: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeBands {
    pub low: BandEstimate,
    pub base: BandEstimate,
    pub high: BandEstimate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentValuation {
    pub price: f64,
    pub pe: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationBands {
    pub current: CurrentValuation,
    pub bands: PeBands,
}

/// Ratios and scores reported alongside the bands. roe and roic are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub roe: f64,
    pub roic: f64,
    pub debt_to_equity: f64,
    pub current_ratio: f64,
    pub quality_score: f64,
    pub growth_score: f64,
}

/// Valuation estimate for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub symbol: String,
    pub company_name: String,
    pub current_price: f64,
    pub market_cap: f64,
    pub eps: EpsSet,
    pub valuations: ValuationBands,
    /// Signed, in percent
    pub growth_rate: f64,
    pub sector: String,
    pub industry: Option<String>,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<QualityMetrics>,
}

/// Peer quote from the peers feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerQuote {
    pub symbol: String,
    pub name: String,
    pub pe: Option<f64>,
    pub market_cap: Option<f64>,
}

/// Revenue attributed to one business segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSegment {
    pub segment: String,
    pub revenue: f64,
}

/// Raw news item from the news feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub text: Option<String>,
    pub url: String,
    pub published_date: String,
    pub site: Option<String>,
}
