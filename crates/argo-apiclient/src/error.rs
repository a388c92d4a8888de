//! API client error types.

use thiserror::Error;

/// Errors returned while building or using an API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client options are invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The selected transport mode cannot serve this request.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// The server could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// The request did not complete in time.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The response could not be understood.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::Protocol(err.to_string())
        } else if err.is_builder() {
            Self::Config(err.to_string())
        } else {
            Self::Connection(err.to_string())
        }
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = ClientError::Config("bad header".into());
        assert_eq!(err.to_string(), "configuration error: bad header");

        let err = ClientError::Server {
            status: 404,
            message: "workflows.argoproj.io \"x\" not found".into(),
        };
        assert_eq!(
            err.to_string(),
            "server returned 404: workflows.argoproj.io \"x\" not found"
        );

        let err = ClientError::Timeout("GET /api/v1/version".into());
        assert_eq!(err.to_string(), "request timed out: GET /api/v1/version");
    }
}
