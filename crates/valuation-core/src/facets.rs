use serde::{Deserialize, Serialize};

use crate::{ValuationError, ValuationResult};

/// Per-facet envelope: either data or an error message, never both
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FacetError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetError {
    pub kind: String,
    pub message: String,
}

impl<T> FacetResult<T> {
    pub fn is_ok(&self) -> bool {
        self.success
    }
}

impl<T> From<Result<T, ValuationError>> for FacetResult<T> {
    fn from(result: Result<T, ValuationError>) -> Self {
        match result {
            Ok(data) => FacetResult {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(e) => FacetResult {
                success: false,
                data: None,
                error: Some(FacetError {
                    kind: e.kind().to_string(),
                    message: e.to_string(),
                }),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerEntry {
    pub symbol: String,
    pub name: String,
    pub pe: Option<f64>,
    pub growth: Option<f64>,
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerComparison {
    pub sector: String,
    pub peers: Vec<PeerEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentShare {
    pub segment: String,
    pub revenue: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentBreakdown {
    pub symbol: String,
    pub segments: Vec<SegmentShare>,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsEntry {
    pub title: String,
    pub summary: String,
    pub url: String,
    pub published_date: String,
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsDigest {
    pub symbol: String,
    pub news: Vec<NewsEntry>,
}

/// Combined output of the four independent facets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAnalysis {
    pub symbol: String,
    pub valuation: FacetResult<ValuationResult>,
    pub peers: FacetResult<PeerComparison>,
    pub segments: FacetResult<SegmentBreakdown>,
    pub news: FacetResult<NewsDigest>,
}

impl StockAnalysis {
    /// Names of the facets that reported an error
    pub fn failed_facets(&self) -> Vec<&'static str> {
        [
            ("valuation", self.valuation.is_ok()),
            ("peers", self.peers.is_ok()),
            ("segments", self.segments.is_ok()),
            ("news", self.news.is_ok()),
        ]
        .iter()
        .filter(|(_, ok)| !ok)
        .map(|(name, _)| *name)
        .collect()
    }

    pub fn has_data(&self) -> bool {
        self.failed_facets().len() < 4
    }
}
