use anyhow::{Context, Result};
use std::env;
use valuation_orchestrator::FacetOptions;

#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    pub facets: FacetOptions,
}

impl CliConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = FacetOptions::default();

        let facets = FacetOptions {
            news_fetch_limit: match lookup("NEWS_FETCH_LIMIT") {
                Some(v) => v.trim().parse().context("NEWS_FETCH_LIMIT must be an integer")?,
                None => defaults.news_fetch_limit,
            },
            news_display_limit: match lookup("NEWS_DISPLAY_LIMIT") {
                Some(v) => v.trim().parse().context("NEWS_DISPLAY_LIMIT must be an integer")?,
                None => defaults.news_display_limit,
            },
            summary_chars: match lookup("NEWS_SUMMARY_CHARS") {
                Some(v) => v.trim().parse().context("NEWS_SUMMARY_CHARS must be an integer")?,
                None => defaults.summary_chars,
            },
        };

        if facets.news_fetch_limit == 0 {
            anyhow::bail!("NEWS_FETCH_LIMIT must be at least 1");
        }

        Ok(Self { facets })
    }
}
