//! Resource API error taxonomy and its HTTP status mapping.

use crate::model::entity::{EntityKind, ValidationError};
use crate::repo::RepoError;
use serde_json::json;
use std::error::Error;
use std::fmt::{Display, Formatter};

use super::ApiResponse;

#[derive(Debug)]
pub enum ApiError {
    /// Field validation failed; nothing was written.
    Validation(ValidationError),
    /// Body missing, not JSON, or of the wrong shape.
    MalformedBody(String),
    NotFound { kind: EntityKind, id: String },
    MethodNotAllowed { method: String, path: String },
    UnknownRoute(String),
    /// Backing store unavailable or returned unreadable rows.
    Storage(String),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::MalformedBody(_) => 400,
            Self::NotFound { .. } | Self::UnknownRoute(_) => 404,
            Self::MethodNotAllowed { .. } => 405,
            Self::Storage(_) => 500,
        }
    }

    pub fn into_response(self) -> ApiResponse {
        ApiResponse {
            status: self.status(),
            body: Some(json!({ "error": self.to_string() })),
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::MalformedBody(message) => write!(f, "malformed request body: {message}"),
            Self::NotFound { kind, .. } => write!(f, "{} not found", kind.label()),
            Self::MethodNotAllowed { method, path } => {
                write!(f, "method {method} is not allowed on {path}")
            }
            Self::UnknownRoute(path) => write!(f, "no route for {path}"),
            Self::Storage(message) => write!(f, "storage error: {message}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            other @ (RepoError::Db(_) | RepoError::InvalidData(_)) => {
                Self::Storage(other.to_string())
            }
        }
    }
}
