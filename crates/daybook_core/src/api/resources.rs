//! Generic collection/item handlers shared by every entity family.

use super::error::ApiError;
use super::route::{Method, Route};
use super::{ApiRequest, ApiResponse};
use crate::model::entity::Entity;
use crate::repo::Repository;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub(super) fn serve<E, R>(
    repo: &R,
    request: &ApiRequest,
    method: Method,
    route: &Route,
) -> Result<ApiResponse, ApiError>
where
    E: Entity,
    R: Repository<E>,
{
    match (route, method) {
        (Route::Collection(_), Method::Get) => list(repo),
        (Route::Collection(_), Method::Post) => create(repo, request.body.as_ref()),
        (Route::Item(_, id), Method::Get) => match repo.get(id)? {
            Some(record) => Ok(ApiResponse::ok(to_json(&record)?)),
            None => Err(ApiError::NotFound {
                kind: E::KIND,
                id: id.clone(),
            }),
        },
        (Route::Item(kind, id), Method::Put) if kind.supports_update() => {
            update(repo, id, request.body.as_ref())
        }
        (Route::Item(_, id), Method::Delete) => {
            repo.delete(id)?;
            Ok(ApiResponse::no_content())
        }
        _ => Err(ApiError::MethodNotAllowed {
            method: method.as_str().to_string(),
            path: request.path.clone(),
        }),
    }
}

fn list<E, R>(repo: &R) -> Result<ApiResponse, ApiError>
where
    E: Entity,
    R: Repository<E>,
{
    let mut records = repo.list()?;
    records.sort_by(E::listing_order);
    Ok(ApiResponse::ok(to_json(&records)?))
}

fn create<E, R>(repo: &R, body: Option<&Value>) -> Result<ApiResponse, ApiError>
where
    E: Entity,
    R: Repository<E>,
{
    let draft: E::Draft = parse_body(body)?;
    let created = repo.create(draft)?;
    Ok(ApiResponse::created(to_json(&created)?))
}

fn update<E, R>(repo: &R, id: &str, body: Option<&Value>) -> Result<ApiResponse, ApiError>
where
    E: Entity,
    R: Repository<E>,
{
    let patch: E::Patch = parse_body(body)?;
    let updated = repo.update(id, &patch)?;
    Ok(ApiResponse::ok(to_json(&updated)?))
}

fn parse_body<T: DeserializeOwned>(body: Option<&Value>) -> Result<T, ApiError> {
    let body = body.ok_or_else(|| ApiError::MalformedBody("body is required".to_string()))?;
    if !body.is_object() {
        return Err(ApiError::MalformedBody("expected a JSON object".to_string()));
    }
    serde_json::from_value(body.clone()).map_err(|err| ApiError::MalformedBody(err.to_string()))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|err| ApiError::Storage(err.to_string()))
}
