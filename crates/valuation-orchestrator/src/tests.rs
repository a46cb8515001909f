#[cfg(test)]
mod orchestrator_tests {
    use crate::{FacetOptions, ValuationOrchestrator};
    use approx::assert_relative_eq;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use valuation_core::{
        AnalystEstimate, CompanyProfile, KeyMetricsTtm, MarketDataSource, NewsItem, PeerQuote,
        RatiosTtm, RevenueSegment, ValuationError,
    };

    const YEAR: i32 = 2026;

    /// In-memory source; each feed returns a canned result.
    struct StubSource {
        profile: Result<Option<CompanyProfile>, ValuationError>,
        key_metrics: Result<Option<KeyMetricsTtm>, ValuationError>,
        ratios: Result<Option<RatiosTtm>, ValuationError>,
        estimates: Result<Vec<AnalystEstimate>, ValuationError>,
        growth: Result<Vec<f64>, ValuationError>,
        peers: Result<Vec<PeerQuote>, ValuationError>,
        segments: Result<Vec<RevenueSegment>, ValuationError>,
        news: Result<Vec<NewsItem>, ValuationError>,
        calls: AtomicUsize,
        last_news_limit: AtomicUsize,
    }

    fn unavailable() -> ValuationError {
        ValuationError::UpstreamUnavailable("connection reset".to_string())
    }

    impl StubSource {
        fn healthy() -> Self {
            Self {
                profile: Ok(Some(CompanyProfile {
                    symbol: "ACME".to_string(),
                    company_name: "Acme Corp".to_string(),
                    price: 100.0,
                    market_cap: 1.0e10,
                    sector: "Technology".to_string(),
                    industry: Some("Software".to_string()),
                    description: Some("Makes everything.".to_string()),
                })),
                key_metrics: Ok(Some(KeyMetricsTtm {
                    net_income_per_share: Some(5.0),
                    roe: Some(0.05),
                })),
                ratios: Ok(Some(RatiosTtm {
                    return_on_equity: Some(0.18),
                    return_on_invested_capital: Some(0.12),
                    debt_equity_ratio: Some(0.2),
                    current_ratio: Some(2.5),
                })),
                estimates: Ok(vec![]),
                growth: Ok(vec![]),
                peers: Ok(vec![PeerQuote {
                    symbol: "BETA".to_string(),
                    name: "Beta Inc".to_string(),
                    pe: Some(21.0),
                    market_cap: Some(3.0e9),
                }]),
                segments: Ok(vec![
                    RevenueSegment { segment: "Widgets".to_string(), revenue: 75.0 },
                    RevenueSegment { segment: "Gadgets".to_string(), revenue: 25.0 },
                ]),
                news: Ok(vec![NewsItem {
                    title: "Acme ships".to_string(),
                    text: Some("Acme shipped a thing.".to_string()),
                    url: "https://news.example/acme".to_string(),
                    published_date: "2026-10-18 09:00:00".to_string(),
                    site: Some("Wire".to_string()),
                }]),
                calls: AtomicUsize::new(0),
                last_news_limit: AtomicUsize::new(0),
            }
        }

        fn hit(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl MarketDataSource for StubSource {
        async fn company_profile(&self, _symbol: &str) -> Result<Option<CompanyProfile>, ValuationError> {
            self.hit();
            self.profile.clone()
        }

        async fn key_metrics_ttm(&self, _symbol: &str) -> Result<Option<KeyMetricsTtm>, ValuationError> {
            self.hit();
            self.key_metrics.clone()
        }

        async fn ratios_ttm(&self, _symbol: &str) -> Result<Option<RatiosTtm>, ValuationError> {
            self.hit();
            self.ratios.clone()
        }

        async fn analyst_estimates(&self, _symbol: &str) -> Result<Vec<AnalystEstimate>, ValuationError> {
            self.hit();
            self.estimates.clone()
        }

        async fn revenue_growth(&self, _symbol: &str) -> Result<Vec<f64>, ValuationError> {
            self.hit();
            self.growth.clone()
        }

        async fn peer_quotes(&self, _symbol: &str) -> Result<Vec<PeerQuote>, ValuationError> {
            self.hit();
            self.peers.clone()
        }

        async fn revenue_segments(&self, _symbol: &str) -> Result<Vec<RevenueSegment>, ValuationError> {
            self.hit();
            self.segments.clone()
        }

        async fn news(&self, _symbol: &str, limit: u32) -> Result<Vec<NewsItem>, ValuationError> {
            self.hit();
            self.last_news_limit.store(limit as usize, Ordering::SeqCst);
            self.news.clone()
        }
    }

    fn orchestrator(source: StubSource) -> (ValuationOrchestrator, Arc<StubSource>) {
        let source = Arc::new(source);
        (ValuationOrchestrator::new(source.clone()), source)
    }

    #[tokio::test]
    async fn test_valuation_end_to_end() {
        let (orch, _) = orchestrator(StubSource::healthy());
        let result = orch.valuate_for_year("acme", YEAR).await.unwrap();

        assert_eq!(result.symbol, "ACME");
        assert_eq!(result.eps.ttm, 5.0);
        assert_eq!(result.eps.fy2, 5.0);

        let metrics = result.metrics.unwrap();
        assert_eq!(metrics.quality_score, 1.0);
        assert_relative_eq!(metrics.roe, 18.0, epsilon = 1e-9);
        assert_relative_eq!(result.valuations.bands.base.pe, 28.5, epsilon = 1e-9);
        assert_relative_eq!(result.valuations.bands.base.price, 142.5, epsilon = 1e-9);
    }

    #[tokio::test]
    async fn test_blank_symbol_rejected_before_any_fetch() {
        let (orch, source) = orchestrator(StubSource::healthy());

        let err = orch.analyze_for_year("  ", YEAR).await.unwrap_err();
        assert!(matches!(err, ValuationError::InvalidInput(_)));
        assert!(matches!(orch.valuate("").await, Err(ValuationError::InvalidInput(_))));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_profile_is_not_found() {
        let mut stub = StubSource::healthy();
        stub.profile = Ok(None);
        let (orch, _) = orchestrator(stub);

        let err = orch.valuate_for_year("ACME", YEAR).await.unwrap_err();
        assert!(matches!(err, ValuationError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_not_found_valuation_does_not_block_other_facets() {
        let mut stub = StubSource::healthy();
        stub.profile = Ok(None);
        let (orch, _) = orchestrator(stub);

        let analysis = orch.analyze_for_year("acme", YEAR).await.unwrap();

        assert_eq!(analysis.symbol, "ACME");
        assert!(!analysis.valuation.success);
        assert_eq!(analysis.valuation.error.as_ref().unwrap().kind, "not_found");
        assert!(analysis.segments.success);
        assert!(analysis.news.success);
        let peers = analysis.peers.data.as_ref().unwrap();
        assert_eq!(peers.sector, "unknown");
        assert_eq!(peers.peers[0].symbol, "ACME");
        assert_eq!(peers.peers[1].symbol, "BETA");
        assert_eq!(analysis.failed_facets(), vec!["valuation"]);
        assert!(analysis.has_data());
    }

    #[tokio::test]
    async fn test_upstream_failures_degrade_to_defaults() {
        let mut stub = StubSource::healthy();
        stub.key_metrics = Err(unavailable());
        stub.ratios = Err(unavailable());
        stub.estimates = Err(unavailable());
        stub.growth = Err(unavailable());
        let (orch, _) = orchestrator(stub);

        let result = orch.valuate_for_year("ACME", YEAR).await.unwrap();

        assert_eq!(result.eps.ttm, 0.0);
        assert_eq!(result.eps.ntm, 0.0);
        assert_eq!(result.valuations.current.pe, 0.0);
        let metrics = result.metrics.unwrap();
        assert_relative_eq!(metrics.quality_score, 0.6, epsilon = 1e-9);
        assert_eq!(metrics.growth_score, 0.4);
    }

    #[tokio::test]
    async fn test_profile_transport_failure_is_fatal_for_valuation() {
        let mut stub = StubSource::healthy();
        stub.profile = Err(unavailable());
        let (orch, _) = orchestrator(stub);

        let err = orch.valuate_for_year("ACME", YEAR).await.unwrap_err();
        assert!(matches!(err, ValuationError::UpstreamUnavailable(_)));
        assert!(matches!(orch.peers("ACME").await, Err(ValuationError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn test_estimates_flow_through_gathered_inputs() {
        let mut stub = StubSource::healthy();
        stub.estimates = Ok(vec![
            AnalystEstimate { year: YEAR + 1, estimated_eps_avg: 6.0 },
            AnalystEstimate { year: YEAR + 2, estimated_eps_avg: 7.5 },
        ]);
        stub.growth = Ok(vec![4.0, 6.0]);
        let (orch, _) = orchestrator(stub);

        let inputs = orch.gather_inputs("ACME").await.unwrap();
        assert_eq!(inputs.estimates.len(), 2);
        assert_eq!(inputs.revenue_growth, vec![4.0, 6.0]);
        assert_eq!(inputs.metrics.roe, 0.18);

        let result = orch.valuate_for_year("ACME", YEAR).await.unwrap();
        assert_eq!(result.eps.ntm, 6.0);
        assert_relative_eq!(result.growth_rate, 25.0, epsilon = 1e-9);
    }

    #[tokio::test]
    async fn test_facet_failures_are_isolated() {
        let mut stub = StubSource::healthy();
        stub.segments = Err(unavailable());
        stub.news = Err(unavailable());
        stub.peers = Err(unavailable());
        let (orch, _) = orchestrator(stub);

        let analysis = orch.analyze_for_year("ACME", YEAR).await.unwrap();

        assert!(analysis.valuation.success);
        // peer quotes degrade to the current company alone
        let peers = analysis.peers.data.unwrap();
        assert_eq!(peers.peers.len(), 1);
        assert!(peers.peers[0].is_current);
        assert_eq!(analysis.segments.error.unwrap().kind, "upstream_unavailable");
        assert!(!analysis.news.success);
    }

    #[tokio::test]
    async fn test_all_facets_succeed() {
        let (orch, _) = orchestrator(StubSource::healthy());
        let analysis = orch.analyze_for_year("ACME", YEAR).await.unwrap();

        assert!(analysis.failed_facets().is_empty());
        let segments = analysis.segments.data.unwrap();
        assert_eq!(segments.segments[0].segment, "Widgets");
        assert_relative_eq!(segments.segments[0].percentage, 75.0, epsilon = 1e-9);
        let peers = analysis.peers.data.unwrap();
        assert_eq!(peers.sector, "Technology");
        assert_eq!(peers.peers[1].symbol, "BETA");
    }

    #[tokio::test]
    async fn test_news_options_applied() {
        let options = FacetOptions {
            news_fetch_limit: 4,
            news_display_limit: 1,
            summary_chars: 4,
        };
        let source = Arc::new(StubSource::healthy());
        let orch = ValuationOrchestrator::new(source.clone()).with_facet_options(options);

        let digest = orch.news("acme").await.unwrap();
        assert_eq!(source.last_news_limit.load(Ordering::SeqCst), 4);
        assert_eq!(digest.news.len(), 1);
        assert_eq!(digest.news[0].summary, "Acme...");
    }

    #[tokio::test]
    async fn test_repeated_valuation_is_identical() {
        let (orch, _) = orchestrator(StubSource::healthy());
        let first = orch.valuate_for_year("ACME", YEAR).await.unwrap();
        let second = orch.valuate_for_year("ACME", YEAR).await.unwrap();
        assert_eq!(first, second);
    }
}
