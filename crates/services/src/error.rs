//! Shared error types for the services crate.

use thiserror::Error;

use outloud_core::Failure;
use outloud_core::Request;

/// Errors emitted by `Backend` implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    #[error("backend returned status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    /// Collapse into the viewer-facing failure for `request`.
    #[must_use]
    pub fn into_failure(self, request: Request) -> Failure {
        Failure::network(request, self)
    }
}

/// Errors emitted by `AccessGateService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GateError {
    #[error("viewer identity is missing")]
    IdentityMissing,
    #[error("{request} failed: {source}")]
    Backend {
        request: Request,
        #[source]
        source: BackendError,
    },
}

impl GateError {
    #[must_use]
    pub fn into_failure(self) -> Failure {
        match self {
            GateError::IdentityMissing => Failure::IdentityMissing,
            GateError::Backend { request, source } => source.into_failure(request),
        }
    }
}

/// Errors emitted while reading client configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid api url {raw:?}: {source}")]
    InvalidApiUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unknown api flavor {0:?} (expected standard, nested or webapp)")]
    UnknownFlavor(String),
    #[error("invalid user id {0:?}")]
    InvalidUserId(String),
}
