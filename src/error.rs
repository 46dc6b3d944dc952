//! Error types for folder-archive
//!
//! Every failure in this crate is scoped to a single user-initiated action.
//! Nothing here is fatal to the hosting process: settings failures fall back
//! to compiled-in defaults, request failures are reported to the invoking
//! command, and invalid format arguments are rejected before a request is
//! ever built.

use thiserror::Error;

/// Result type alias for folder-archive operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for folder-archive
#[derive(Debug, Error)]
pub enum Error {
    /// The settings source rejected the load or returned malformed data.
    ///
    /// Recovered locally by falling back to compiled-in defaults; surfaced
    /// to the user as a non-fatal notification.
    #[error("failed to load archive settings: {reason}")]
    SettingsLoadFailed {
        /// Human-readable description of why the load failed
        reason: String,
    },

    /// The backend answered with a non-200 status.
    ///
    /// Propagated to the invoking command; the core does not retry and does
    /// not roll back any partial UI state.
    #[error("archive request failed with status {status}")]
    RequestFailed {
        /// HTTP status code returned by the backend
        status: u16,
        /// Response body, when one was readable
        body: Option<String>,
    },

    /// A format argument outside the closed set reached the request layer.
    ///
    /// Callers fall back to the active default format rather than sending
    /// an invalid value to the backend.
    #[error("unrecognized archive format: {format:?}")]
    UnrecognizedFormat {
        /// The offending format string
        format: String,
    },

    /// The configured base URL could not be parsed or joined
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// URL parse error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Network error from the HTTP client
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Machine-readable error code, suitable for host-side notification
    /// routing.
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::SettingsLoadFailed { .. } => "settings_load_failed",
            Error::RequestFailed { .. } => "request_failed",
            Error::UnrecognizedFormat { .. } => "unrecognized_format",
            Error::InvalidBaseUrl(_) => "invalid_base_url",
            Error::Url(_) => "url_error",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
        }
    }

    /// Whether the action that hit this error can simply continue with the
    /// compiled-in defaults.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::SettingsLoadFailed { .. } | Error::UnrecognizedFormat { .. }
        )
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_failed_display_includes_status() {
        let err = Error::RequestFailed {
            status: 500,
            body: Some("backend exploded".into()),
        };
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn unrecognized_format_display_includes_format() {
        let err = Error::UnrecognizedFormat {
            format: "exe".into(),
        };
        assert!(err.to_string().contains("exe"));
    }

    #[test]
    fn settings_load_failed_is_recoverable() {
        let err = Error::SettingsLoadFailed {
            reason: "store unreachable".into(),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.error_code(), "settings_load_failed");
    }

    #[test]
    fn request_failed_is_not_recoverable() {
        let err = Error::RequestFailed {
            status: 404,
            body: None,
        };
        assert!(!err.is_recoverable());
        assert_eq!(err.error_code(), "request_failed");
    }

    #[test]
    fn unrecognized_format_is_recoverable() {
        let err = Error::UnrecognizedFormat {
            format: "rar5".into(),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.error_code(), "unrecognized_format");
    }
}
