use std::env;
use std::time::Duration;

use valuation_core::ValuationError;

pub const DEFAULT_BASE_URL: &str = "https://financialmodelingprep.com";

#[derive(Debug, Clone)]
pub struct FmpConfig {
    pub api_key: String,
    pub base_url: String,
    /// Requests per minute
    pub rate_limit: usize,
    pub timeout: Duration,
}

impl Default for FmpConfig {
    fn default() -> Self {
        Self {
            api_key: "demo".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            rate_limit: 300,
            timeout: Duration::from_secs(90),
        }
    }
}

impl FmpConfig {
    /// Read `FMP_API_KEY`, `FMP_BASE_URL`, `FMP_RATE_LIMIT` and `FMP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ValuationError> {
        let defaults = Self::default();

        let rate_limit = match env::var("FMP_RATE_LIMIT") {
            Ok(v) => parse_positive("FMP_RATE_LIMIT", &v)?,
            Err(_) => defaults.rate_limit,
        };
        let timeout = match env::var("FMP_TIMEOUT_SECS") {
            Ok(v) => Duration::from_secs(parse_positive("FMP_TIMEOUT_SECS", &v)? as u64),
            Err(_) => defaults.timeout,
        };

        Ok(Self {
            api_key: env::var("FMP_API_KEY").unwrap_or(defaults.api_key),
            base_url: env::var("FMP_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            rate_limit,
            timeout,
        })
    }
}

fn parse_positive(name: &str, value: &str) -> Result<usize, ValuationError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ValuationError::InvalidInput(format!(
            "{} must be a positive integer, got '{}'",
            name, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive() {
        assert_eq!(parse_positive("X", " 42 ").unwrap(), 42);
        assert!(parse_positive("X", "0").is_err());
        assert!(parse_positive("X", "fast").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = FmpConfig::default();
        assert_eq!(config.api_key, "demo");
        assert_eq!(config.rate_limit, 300);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
