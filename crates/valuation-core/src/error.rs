use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl ValuationError {
    /// Short machine-readable kind, used in facet error envelopes
    pub fn kind(&self) -> &'static str {
        match self {
            ValuationError::InvalidInput(_) => "invalid_input",
            ValuationError::NotFound(_) => "not_found",
            ValuationError::UpstreamUnavailable(_) => "upstream_unavailable",
            ValuationError::InvalidData(_) => "invalid_data",
        }
    }
}

/// Trim and uppercase a ticker symbol, rejecting empty input.
pub fn normalize_symbol(symbol: &str) -> Result<String, ValuationError> {
    let trimmed = symbol.trim();
    if trimmed.is_empty() {
        return Err(ValuationError::InvalidInput(
            "symbol must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_uppercase())
}
