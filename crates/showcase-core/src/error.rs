use showcase_api::ApiError;
use thiserror::Error;

/// All the ways the showcase pipeline can fail
///
/// An empty collection is deliberately not in here: zero items after
/// filtering is a normal empty-state render, not a failure.
#[derive(Error, Debug)]
pub enum Error {
    /// Non-2xx status or transport failure
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Body arrived but wasn't the JSON shape we expected
    #[error("Could not decode response: {0}")]
    DecodeError(String),

    #[error("Cache operation failed: {0}")]
    CacheError(#[from] showcase_cache::CacheError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Failures of the primary fetch that the stale cache may paper over
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Error::NetworkError(_) | Error::DecodeError(_))
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        if err.is_decode() {
            Error::DecodeError(err.to_string())
        } else {
            Error::NetworkError(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_errors_are_classified() {
        let decode: Error = ApiError::from(serde_json::from_str::<u8>("x").unwrap_err()).into();
        assert!(matches!(decode, Error::DecodeError(_)));
        assert!(decode.is_fetch_failure());

        let network: Error = ApiError::RateLimitExceeded.into();
        assert!(matches!(network, Error::NetworkError(_)));
        assert!(network.is_fetch_failure());

        assert!(!Error::ConfigError("x".into()).is_fetch_failure());
    }
}
