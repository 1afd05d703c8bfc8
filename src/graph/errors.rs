/// Errors from the Resource Graph service layer.
use thiserror::Error;

/// Typed errors from talking to Resource Graph or establishing a session.
#[derive(Debug, Error)]
pub enum GraphError {
    /// No usable login: the Azure CLI is missing or `az login` failed.
    #[error("Not signed in to Azure: {0}")]
    NotAuthenticated(String),

    /// No subscription could be determined for a subscription-scoped query.
    #[error("No current Azure subscription; pass --subscription or run 'az account set'")]
    NoSubscription,

    /// Network or TLS failure before a response was received.
    #[error("Request to Resource Graph failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Resource Graph returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Service-provided error message, or the raw body.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("Unexpected Resource Graph response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl GraphError {
    /// Machine-readable code used in the JSON error envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAuthenticated(_) => "not_authenticated",
            Self::NoSubscription => "no_subscription",
            Self::Transport(_) => "transport_error",
            Self::Status { status: 429, .. } => "throttled",
            Self::Status { .. } => "query_failed",
            Self::Decode(_) => "decode_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttling_has_its_own_code() {
        let err = GraphError::Status {
            status: 429,
            message: "Too many requests".to_owned(),
        };
        assert_eq!(err.code(), "throttled");
        assert!(err.to_string().contains("HTTP 429"));
    }

    #[test]
    fn bad_request_is_query_failure() {
        let err = GraphError::Status {
            status: 400,
            message: "Query is invalid".to_owned(),
        };
        assert_eq!(err.code(), "query_failed");
    }
}
