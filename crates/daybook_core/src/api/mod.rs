//! Resource API: stateless REST handlers over the entity store.
//!
//! # Responsibility
//! - Map `(verb, path, JSON body)` to store operations and back.
//! - Apply collection ordering (tasks by date/time ascending, everything
//!   else newest first).
//! - Translate store failures into client/server error statuses.
//!
//! # Invariants
//! - Handlers hold no state between calls; the HTTP framework is a
//!   pass-through that forwards [`ApiRequest`] and writes [`ApiResponse`].
//! - `DELETE` on an item answers 204 whether or not the record existed.
//! - `PUT` merges; fields absent from the body are preserved.

use crate::db::{self, SharedConnection};
use crate::model::entity::EntityKind;
use crate::model::list::List;
use crate::model::note::Note;
use crate::model::tag::Tag;
use crate::model::task::Task;
use crate::repo::list_repo::SqliteListRepository;
use crate::repo::note_repo::SqliteNoteRepository;
use crate::repo::tag_repo::SqliteTagRepository;
use crate::repo::task_repo::SqliteTaskRepository;
use log::{error, info, warn};
use rusqlite::Connection;
use serde_json::{json, Value};
use std::time::Instant;

mod error;
mod resources;
mod route;

pub use error::ApiError;
pub use route::{Method, Route};

/// Transport-neutral request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            body,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path, None)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new("POST", path, Some(body))
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new("PUT", path, Some(body))
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new("DELETE", path, None)
    }
}

/// Transport-neutral response; `body: None` means an empty body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body: Some(body),
        }
    }

    pub fn created(body: Value) -> Self {
        Self {
            status: 201,
            body: Some(body),
        }
    }

    pub fn no_content() -> Self {
        Self {
            status: 204,
            body: None,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `error` message of a failed response, if it carried one.
    pub fn error_message(&self) -> Option<&str> {
        self.body.as_ref()?.get("error")?.as_str()
    }
}

/// Handles one request against an open, migrated connection.
pub fn handle(conn: &Connection, request: &ApiRequest) -> ApiResponse {
    let started_at = Instant::now();
    let response = match dispatch(conn, request) {
        Ok(response) => response,
        Err(err) => {
            if err.status() >= 500 {
                error!(
                    "event=api_request module=api status=error method={} path={} error={}",
                    request.method, request.path, err
                );
            } else {
                warn!(
                    "event=api_request module=api status=rejected method={} path={} http_status={} error={}",
                    request.method,
                    request.path,
                    err.status(),
                    err
                );
            }
            err.into_response()
        }
    };

    info!(
        "event=api_request module=api status=done method={} path={} http_status={} duration_ms={}",
        request.method,
        request.path,
        response.status,
        started_at.elapsed().as_millis()
    );
    response
}

/// Same as [`handle`] for a connection shared behind a mutex.
pub fn handle_shared(shared: &SharedConnection, request: &ApiRequest) -> ApiResponse {
    db::with_shared(shared, |conn| handle(conn, request)).unwrap_or_else(|err| {
        error!(
            "event=api_request module=api status=error method={} path={} error={}",
            request.method, request.path, err
        );
        ApiError::Storage(err.to_string()).into_response()
    })
}

fn dispatch(conn: &Connection, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let route =
        Route::parse(&request.path).ok_or_else(|| ApiError::UnknownRoute(request.path.clone()))?;
    let method = Method::parse(&request.method).ok_or_else(|| ApiError::MethodNotAllowed {
        method: request.method.clone(),
        path: request.path.clone(),
    })?;

    let kind = match &route {
        Route::Health if method == Method::Get => return Ok(health(conn)),
        Route::Health => {
            return Err(ApiError::MethodNotAllowed {
                method: method.as_str().to_string(),
                path: request.path.clone(),
            })
        }
        Route::Collection(kind) | Route::Item(kind, _) => *kind,
    };

    match kind {
        EntityKind::Task => {
            let repo = SqliteTaskRepository::new(conn);
            if route == Route::Collection(EntityKind::Task) && method == Method::Delete {
                repo.delete_all()?;
                return Ok(ApiResponse::ok(json!({ "message": "All tasks deleted" })));
            }
            resources::serve::<Task, _>(&repo, request, method, &route)
        }
        EntityKind::Note => {
            let repo = SqliteNoteRepository::new(conn);
            resources::serve::<Note, _>(&repo, request, method, &route)
        }
        EntityKind::List => {
            let repo = SqliteListRepository::new(conn);
            resources::serve::<List, _>(&repo, request, method, &route)
        }
        EntityKind::Tag => {
            let repo = SqliteTagRepository::new(conn);
            resources::serve::<Tag, _>(&repo, request, method, &route)
        }
    }
}

fn health(conn: &Connection) -> ApiResponse {
    match conn.query_row("SELECT 1;", [], |row| row.get::<_, i64>(0)) {
        Ok(_) => ApiResponse::ok(json!({ "ok": true })),
        Err(err) => {
            error!("event=health_check module=api status=error error={err}");
            ApiResponse {
                status: 500,
                body: Some(json!({ "ok": false, "error": err.to_string() })),
            }
        }
    }
}
