use thiserror::Error;

/// Failure of a single GitHub API call.
///
/// The three kinds are kept apart so callers can tell a flaky network from a
/// rejected request or a response that does not match the expected schema.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Connection failure or timeout before a response arrived.
    #[error("network error: {message}")]
    Network { message: String },

    /// The server answered with a non-success status code.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the typed schema.
    #[error("unexpected response: {message}")]
    Parse { message: String },
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn timed_out() -> Self {
        Self::network("request timed out")
    }
}

impl From<octocrab::Error> for ApiError {
    fn from(e: octocrab::Error) -> Self {
        match &e {
            // GitHub error bodies look like {"message": "...", "documentation_url": "..."}
            octocrab::Error::GitHub { source, .. } => {
                ApiError::status(source.status_code.as_u16(), source.message.clone())
            }
            octocrab::Error::Serde { .. } | octocrab::Error::Json { .. } => {
                ApiError::parse(e.to_string())
            }
            _ => ApiError::network(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind() {
        assert_eq!(
            ApiError::timed_out().to_string(),
            "network error: request timed out"
        );
        assert_eq!(
            ApiError::status(401, "Bad credentials").to_string(),
            "HTTP 401: Bad credentials"
        );
        assert_eq!(
            ApiError::parse("missing field `user`").to_string(),
            "unexpected response: missing field `user`"
        );
    }

    #[test]
    fn test_kinds_are_distinct() {
        assert_ne!(ApiError::timed_out(), ApiError::parse("request timed out"));
        assert!(matches!(ApiError::status(502, "Bad Gateway"), ApiError::Status { status: 502, .. }));
    }
}
