//! Failures talking to the menu backend

use std::time::Duration;

/// A failed call to the menu REST API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-success status, or with a success
    /// status but an error envelope.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        /// The envelope's `message`, or the raw body when it was not an
        /// envelope.
        message: String,
        /// The envelope's `error` field.
        detail: Option<String>,
    },

    /// The request never got a response (connection refused, DNS, TLS).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// No response within the client's configured timeout.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// The base URL cannot have `/api/menus` appended to it.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A 2xx body that is not a valid envelope, or an envelope without
    /// `data`.
    #[error("Response parse error: {message}")]
    Parse {
        message: String,
        /// The body that failed to decode. `None` when the envelope decoded
        /// but carried no `data`.
        body: Option<String>,
    },
}

impl ApiError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            detail: None,
        }
    }

    pub fn http_with_detail(status: u16, message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            detail: Some(detail.into()),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The envelope's `error` text, e.g. the backend's reason for rejecting a
    /// move.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Http { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Whether repeating the same call may succeed: rate limiting, gateway
    /// and server errors, and transport failures. A rejected move (4xx) is
    /// never retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Network(_) | Self::Timeout(_) => true,
            Self::InvalidUrl(_) | Self::Parse { .. } => false,
        }
    }
}
