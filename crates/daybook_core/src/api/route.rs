//! Path/verb routing for the REST surface.

use crate::model::entity::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// Resolved target of a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Health,
    Collection(EntityKind),
    Item(EntityKind, String),
}

impl Route {
    /// Parses `/health`, `/api/<collection>` and `/api/<collection>/<id>`.
    /// Query strings and a trailing slash are ignored.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split('?').next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["health"] => Some(Self::Health),
            ["api", collection] => EntityKind::from_collection(collection).map(Self::Collection),
            ["api", collection, id] => {
                EntityKind::from_collection(collection).map(|kind| Self::Item(kind, (*id).to_string()))
            }
            _ => None,
        }
    }
}
