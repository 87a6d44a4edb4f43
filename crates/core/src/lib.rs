//! Shared primitives for all Rust crates in the Folio connector.

#![forbid(unsafe_code)]

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across Folio connector crates.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Structured error body returned by the Folio portal API.
///
/// The portal reports failures as a JSON object carrying the HTTP status,
/// a short error label, a human message, and the request path. The body is
/// passed through to callers unchanged; this connector never reinterprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalApiError {
    /// Server-side timestamp of the failure, when reported.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// HTTP status code reported in the body.
    pub status: u16,
    /// Short error label, e.g. `"Forbidden"`.
    #[serde(rename = "error")]
    pub error_text: String,
    /// Human-readable failure message.
    pub message: String,
    /// Request path that produced the failure.
    pub path: String,
}

impl Display for PortalApiError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{} (HTTP {}): {} - {}",
            self.error_text, self.status, self.message, self.path
        )
    }
}

/// Common connector error categories.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Invalid input or violated invariant; never sent upstream.
    #[error("validation error: {0}")]
    Validation(String),

    /// Operation the connector or the upstream system does not support.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Caller credentials are missing a required capability.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Structured failure reported by the portal API, surfaced verbatim.
    #[error("portal api error: {0}")]
    Api(PortalApiError),

    /// Transport-level failure with no structured error body.
    #[error("transport error: {0}")]
    Transport(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
