use thiserror::Error;

/// Everything that can go wrong talking to GitHub, Discogs or the asset host
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication required")]
    AuthRequired,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl ApiError {
    /// True when the body arrived but didn't have the shape we expected
    pub fn is_decode(&self) -> bool {
        matches!(self, ApiError::ParseError(_))
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Map a non-2xx response onto an error. Success responses pass through.
pub(crate) async fn check_status(
    response: reqwest::Response,
    what: &str,
) -> Result<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(what.to_string()));
    }

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ApiError::AuthRequired);
    }

    // GitHub signals an exhausted quota with 403, Discogs with 429
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || (status == reqwest::StatusCode::FORBIDDEN
            && response
                .headers()
                .get("x-ratelimit-remaining")
                .is_some_and(|v| v == "0"))
    {
        return Err(ApiError::RateLimitExceeded);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::RequestFailed {
        status: status.as_u16(),
        body,
    })
}

/// Read the body as text and parse it ourselves, so a malformed payload
/// surfaces as `ParseError` instead of being folded into a reqwest error.
pub(crate) async fn decode_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_is_decode() {
        let err: ApiError = serde_json::from_str::<Vec<u32>>("{not json")
            .unwrap_err()
            .into();
        assert!(err.is_decode());
    }

    #[test]
    fn test_status_errors_are_not_decode() {
        let err = ApiError::RequestFailed {
            status: 502,
            body: "bad gateway".into(),
        };
        assert!(!err.is_decode());
        assert!(!ApiError::RateLimitExceeded.is_decode());
        assert_eq!(
            err.to_string(),
            "API request failed with status 502: bad gateway"
        );
    }
}
