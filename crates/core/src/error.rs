use std::fmt;

use thiserror::Error;

pub use crate::model::IdentityError;

/// Backend calls the viewer makes, named for alerts and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Request {
    Theme,
    Catalog,
    BundlePrice,
    PurchaseCheck,
    Purchase,
    Questions,
    ViewLog,
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Request::Theme => "theme",
            Request::Catalog => "catalog",
            Request::BundlePrice => "bundle price",
            Request::PurchaseCheck => "purchase check",
            Request::Purchase => "purchase",
            Request::Questions => "questions",
            Request::ViewLog => "view log",
        };
        f.write_str(name)
    }
}

/// Failures that reach the viewer. Everything else is a normal transition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Failure {
    #[error("{request} request failed: {detail}")]
    Network { request: Request, detail: String },

    #[error("viewer identity is missing")]
    IdentityMissing,
}

impl Failure {
    #[must_use]
    pub fn network(request: Request, detail: impl fmt::Display) -> Self {
        Self::Network {
            request,
            detail: detail.to_string(),
        }
    }
}
