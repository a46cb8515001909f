//! Conversion of FMP response bodies into core types.
//!
//! FMP answers with a JSON array of records, or with an object such as
//! `{"Error Message": "..."}` when something is wrong. Both are handled here so the
//! HTTP layer only deals with transport.

use serde::Deserialize;
use serde_json::Value;
use valuation_core::{
    AnalystEstimate, CompanyProfile, KeyMetricsTtm, NewsItem, PeerQuote, RatiosTtm,
    RevenueSegment, UNKNOWN_SECTOR,
};

/// Error message embedded in a response body, if any
pub fn embedded_error(body: &Value) -> Option<String> {
    let obj = match body {
        Value::Object(obj) => obj,
        Value::Array(items) => items.first()?.as_object()?,
        _ => return None,
    };
    ["Error Message", "error"]
        .iter()
        .find_map(|key| obj.get(*key))
        .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
}

/// Records of an array body; anything else yields no records.
pub fn records(body: &Value) -> &[Value] {
    match body {
        Value::Array(items) => items.as_slice(),
        _ => &[],
    }
}

fn first_record<T: for<'de> Deserialize<'de>>(body: &Value) -> Option<T> {
    if embedded_error(body).is_some() {
        return None;
    }
    records(body)
        .first()
        .and_then(|r| serde_json::from_value(r.clone()).ok())
}

fn all_records<T: for<'de> Deserialize<'de>>(body: &Value) -> Vec<T> {
    records(body)
        .iter()
        .filter_map(|r| serde_json::from_value(r.clone()).ok())
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileRecord {
    symbol: Option<String>,
    company_name: Option<String>,
    price: Option<f64>,
    mkt_cap: Option<f64>,
    sector: Option<String>,
    industry: Option<String>,
    description: Option<String>,
}

/// Profile for `symbol`; `None` when the body has no record or carries an error marker.
pub fn profile(body: &Value, symbol: &str) -> Option<CompanyProfile> {
    let r: ProfileRecord = first_record(body)?;

    let sector = r
        .sector
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN_SECTOR.to_string());

    Some(CompanyProfile {
        symbol: r.symbol.unwrap_or_else(|| symbol.to_string()).to_uppercase(),
        company_name: r.company_name.unwrap_or_default(),
        price: non_negative(r.price),
        market_cap: non_negative(r.mkt_cap),
        sector,
        industry: r.industry.filter(|s| !s.is_empty()),
        description: r.description.filter(|s| !s.is_empty()),
    })
}

#[derive(Debug, Deserialize)]
struct KeyMetricsRecord {
    #[serde(rename = "netIncomePerShareTTM")]
    net_income_per_share: Option<f64>,
    #[serde(rename = "roeTTM")]
    roe: Option<f64>,
}

pub fn key_metrics(body: &Value) -> Option<KeyMetricsTtm> {
    let r: KeyMetricsRecord = first_record(body)?;
    Some(KeyMetricsTtm {
        net_income_per_share: r.net_income_per_share,
        roe: r.roe,
    })
}

#[derive(Debug, Deserialize)]
struct RatiosRecord {
    #[serde(rename = "returnOnEquityTTM")]
    return_on_equity: Option<f64>,
    #[serde(rename = "returnOnInvestedCapitalTTM")]
    return_on_invested_capital: Option<f64>,
    #[serde(rename = "debtEquityRatioTTM")]
    debt_equity_ratio: Option<f64>,
    #[serde(rename = "currentRatioTTM")]
    current_ratio: Option<f64>,
}

pub fn ratios(body: &Value) -> Option<RatiosTtm> {
    let r: RatiosRecord = first_record(body)?;
    Some(RatiosTtm {
        return_on_equity: r.return_on_equity,
        return_on_invested_capital: r.return_on_invested_capital,
        debt_equity_ratio: r.debt_equity_ratio,
        current_ratio: r.current_ratio,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EstimateRecord {
    date: Option<String>,
    estimated_eps_avg: Option<f64>,
}

/// Fiscal year from an FMP date string such as "2027-09-27"
fn fiscal_year(date: &str) -> Option<i32> {
    let digits: String = date.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

pub fn analyst_estimates(body: &Value) -> Vec<AnalystEstimate> {
    all_records::<EstimateRecord>(body)
        .into_iter()
        .filter_map(|r| {
            Some(AnalystEstimate {
                year: fiscal_year(r.date.as_deref()?)?,
                estimated_eps_avg: r.estimated_eps_avg.unwrap_or(0.0),
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GrowthRecord {
    revenue_growth: Option<f64>,
}

/// Annual revenue growth in percent, in response order (most recent first).
/// FMP reports growth as a fraction.
pub fn revenue_growth(body: &Value) -> Vec<f64> {
    all_records::<GrowthRecord>(body)
        .into_iter()
        .map(|r| r.revenue_growth.unwrap_or(0.0) * 100.0)
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PeersRecord {
    #[serde(default)]
    peers_list: Vec<String>,
}

/// Peer symbols, excluding `symbol` itself
pub fn peer_symbols(body: &Value, symbol: &str) -> Vec<String> {
    first_record::<PeersRecord>(body)
        .map(|r| r.peers_list)
        .unwrap_or_default()
        .into_iter()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(symbol))
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteRecord {
    symbol: String,
    name: Option<String>,
    pe: Option<f64>,
    market_cap: Option<f64>,
}

pub fn quotes(body: &Value) -> Vec<PeerQuote> {
    all_records::<QuoteRecord>(body)
        .into_iter()
        .map(|r| PeerQuote {
            name: r.name.unwrap_or_else(|| r.symbol.clone()),
            symbol: r.symbol,
            pe: r.pe,
            market_cap: r.market_cap,
        })
        .collect()
}

/// Segments of the most recent period in a flat revenue-segmentation body:
/// `[{"2024-09-28": {"iPhone": 2.0e11, ...}}, ...]`
pub fn revenue_segments(body: &Value) -> Vec<RevenueSegment> {
    let latest = match records(body).first().and_then(Value::as_object) {
        Some(obj) => obj,
        None => return Vec::new(),
    };

    latest
        .values()
        .filter_map(Value::as_object)
        .flat_map(|segments| segments.iter())
        .filter_map(|(name, revenue)| {
            Some(RevenueSegment {
                segment: name.clone(),
                revenue: revenue.as_f64()?,
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsRecord {
    title: Option<String>,
    text: Option<String>,
    url: Option<String>,
    published_date: Option<String>,
    site: Option<String>,
}

pub fn news(body: &Value) -> Vec<NewsItem> {
    all_records::<NewsRecord>(body)
        .into_iter()
        .filter_map(|r| {
            Some(NewsItem {
                title: r.title?,
                text: r.text.filter(|t| !t.is_empty()),
                url: r.url.unwrap_or_default(),
                published_date: r.published_date.unwrap_or_default(),
                site: r.site,
            })
        })
        .collect()
}

fn non_negative(v: Option<f64>) -> f64 {
    v.filter(|x| x.is_finite()).unwrap_or(0.0).max(0.0)
}
