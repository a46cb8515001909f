//! Pass-through formatting for the peers, segments and news facets.

use serde::{Deserialize, Serialize};
use valuation_core::{
    CompanyProfile, NewsDigest, NewsEntry, NewsItem, PeerComparison, PeerEntry, PeerQuote,
    RevenueSegment, SegmentBreakdown, SegmentShare, UNKNOWN_SECTOR,
};

/// Limits applied when shaping facet output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FacetOptions {
    /// Articles requested from the news feed
    pub news_fetch_limit: u32,
    /// Articles kept in the digest
    pub news_display_limit: usize,
    /// Characters of article text kept in a summary
    pub summary_chars: usize,
}

impl Default for FacetOptions {
    fn default() -> Self {
        Self {
            news_fetch_limit: 10,
            news_display_limit: 8,
            summary_chars: 150,
        }
    }
}

/// Current company first, then its peers in feed order. Without a profile the current
/// row carries only the symbol and the sector is "unknown".
pub fn build_peer_comparison(
    symbol: &str,
    profile: Option<&CompanyProfile>,
    quotes: Vec<PeerQuote>,
) -> PeerComparison {
    let current = PeerEntry {
        symbol: symbol.to_string(),
        name: profile.map_or_else(|| symbol.to_string(), |p| p.company_name.clone()),
        pe: None,
        growth: None,
        market_cap: profile.map(|p| p.market_cap),
        is_current: true,
    };

    let peers = std::iter::once(current)
        .chain(
            quotes
                .into_iter()
                .filter(|q| !q.symbol.eq_ignore_ascii_case(symbol))
                .map(|q| PeerEntry {
                    symbol: q.symbol,
                    name: q.name,
                    pe: q.pe,
                    growth: None,
                    market_cap: q.market_cap,
                    is_current: false,
                }),
        )
        .collect();

    PeerComparison {
        sector: profile.map_or_else(|| UNKNOWN_SECTOR.to_string(), |p| p.sector.clone()),
        peers,
    }
}

/// Segments sorted by revenue, each with its share of the total in percent.
pub fn build_segment_breakdown(symbol: &str, segments: Vec<RevenueSegment>) -> SegmentBreakdown {
    let mut segments: Vec<RevenueSegment> = segments
        .into_iter()
        .filter(|s| s.revenue.is_finite())
        .collect();
    segments.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));

    let total_revenue: f64 = segments.iter().map(|s| s.revenue).sum();

    let segments = segments
        .into_iter()
        .map(|s| SegmentShare {
            percentage: if total_revenue > 0.0 {
                s.revenue / total_revenue * 100.0
            } else {
                0.0
            },
            segment: s.segment,
            revenue: s.revenue,
        })
        .collect();

    SegmentBreakdown {
        symbol: symbol.to_string(),
        segments,
        total_revenue,
    }
}

/// First `max_chars` characters followed by "...", or empty when there is no text.
pub fn summarize(text: Option<&str>, max_chars: usize) -> String {
    match text.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => format!("{}...", t.chars().take(max_chars).collect::<String>()),
        None => String::new(),
    }
}

pub fn build_news_digest(symbol: &str, items: Vec<NewsItem>, options: &FacetOptions) -> NewsDigest {
    let news = items
        .into_iter()
        .take(options.news_display_limit)
        .map(|item| NewsEntry {
            summary: summarize(item.text.as_deref(), options.summary_chars),
            title: item.title,
            url: item.url,
            published_date: item.published_date,
            source: item.site,
        })
        .collect();

    NewsDigest {
        symbol: symbol.to_string(),
        news,
    }
}
