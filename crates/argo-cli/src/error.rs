//! CLI error types.

use argo_apiclient::ClientError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument parsing failed, or help/version output was requested.
    ///
    /// `main` hands this back to clap, which prints it and picks the exit code.
    #[error(transparent)]
    Usage(#[from] clap::Error),

    /// API client failure.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Command execution failed.
    #[error("command error: {0}")]
    Command(String),

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_error_display_config() {
        let err = CliError::Config("bad header".into());
        assert_eq!(err.to_string(), "configuration error: bad header");
    }

    #[test]
    fn cli_error_client_is_transparent() {
        let err = CliError::from(ClientError::Connection("refused".into()));
        assert_eq!(err.to_string(), "connection error: refused");
    }

    #[test]
    fn cli_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let cli_err = CliError::from(io_err);
        assert!(matches!(cli_err, CliError::Io(_)));
    }
}
