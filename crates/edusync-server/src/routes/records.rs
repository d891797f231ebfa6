//! CRUD routes over the record collections.
//!
//! Reads are public. Writes need an [`AuthenticatedUser`]; the extractor runs
//! before the body is looked at, so an anonymous write is a 401 even when its
//! body is also invalid.
//!
//! Payloads are validated through the typed inputs in `edusync_core::models`
//! and stored normalized. User passwords are only ever stored as an Argon2 hash
//! and never returned.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use edusync_core::{
    Collection, CourseInput, EnrollmentInput, StudentInput, UserInput, validate_username,
};
use edusync_store::StoredRecord;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::auth::{AuthenticatedUser, hash_password};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Stored field holding a user's password hash.
pub const PASSWORD_HASH: &str = "passwordHash";

fn parse_collection(name: &str) -> ApiResult<Collection> {
    name.parse::<Collection>()
        .map_err(|e| ApiError::NotFound(e.to_string()))
}

fn parse_id(id: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| ApiError::BadRequest(format!("malformed id: {id}")))
}

fn json_body(body: Result<Json<Value>, JsonRejection>) -> ApiResult<Map<String, Value>> {
    match body {
        Ok(Json(Value::Object(fields))) => Ok(fields),
        Ok(Json(_)) => Err(ApiError::BadRequest("expected a JSON object".to_string())),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(ApiError::PayloadTooLarge(rejection.body_text()))
        }
        Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
    }
}

fn typed<T: DeserializeOwned>(fields: Map<String, Value>) -> ApiResult<T> {
    serde_json::from_value(Value::Object(fields)).map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn to_value<T: serde::Serialize>(input: &T) -> ApiResult<Value> {
    serde_json::to_value(input).map_err(|e| ApiError::Internal(e.to_string()))
}

/// Validate a full payload and turn it into the stored form.
pub fn prepare_payload(collection: Collection, fields: Map<String, Value>) -> ApiResult<Value> {
    match collection {
        Collection::Students => {
            let input: StudentInput = typed(fields)?;
            input.validate()?;
            to_value(&input)
        }
        Collection::Users => {
            let input: UserInput = typed(fields)?;
            input.validate()?;
            Ok(json!({
                "username": input.username,
                PASSWORD_HASH: hash_password(&input.password)?,
            }))
        }
        Collection::Courses => {
            let input: CourseInput = typed(fields)?;
            input.validate()?;
            to_value(&input)
        }
        Collection::Enrollments => {
            let input: EnrollmentInput = typed(fields)?;
            input.validate()?;
            to_value(&input)
        }
    }
}

/// Merge a (possibly partial) update over a stored payload.
///
/// The merged record is validated as a whole. A user update without a
/// `password` keeps the stored hash.
pub fn merge_payload(
    collection: Collection,
    stored: Value,
    patch: Map<String, Value>,
) -> ApiResult<Value> {
    let mut merged = match stored {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };
    let stored_hash = merged.remove(PASSWORD_HASH);

    let keep_hash = collection == Collection::Users && !patch.contains_key("password");
    merged.extend(patch.into_iter().filter(|(key, _)| key != PASSWORD_HASH));

    if !keep_hash {
        return prepare_payload(collection, merged);
    }

    let username = merged
        .get("username")
        .and_then(Value::as_str)
        .unwrap_or_default();
    validate_username(username)?;
    let hash = stored_hash.ok_or_else(|| {
        ApiError::BadRequest("password is required for this user".to_string())
    })?;

    Ok(json!({ "username": username, PASSWORD_HASH: hash }))
}

/// Shape a stored record for a response: `id` first, secrets dropped.
pub fn present(record: StoredRecord) -> Value {
    let (id, data) = record.into_parts();
    let mut out = Map::new();
    out.insert("id".to_string(), Value::String(id.to_string()));
    if let Value::Object(fields) = data {
        out.extend(fields.into_iter().filter(|(key, _)| key != PASSWORD_HASH));
    }
    Value::Object(out)
}

/// GET /{collection} - List records.
async fn list_records(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> ApiResult<Json<Vec<Value>>> {
    let collection = parse_collection(&collection)?;
    let records = state.store().list(collection).await?;
    Ok(Json(records.into_iter().map(present).collect()))
}

/// GET /{collection}/{id} - Get one record.
async fn get_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let collection = parse_collection(&collection)?;
    let id = parse_id(&id)?;
    let record = state.store().get(collection, id).await?;
    Ok(Json(present(record)))
}

/// POST /{collection} - Create a record.
async fn create_record(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(collection): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let collection = parse_collection(&collection)?;
    let data = prepare_payload(collection, json_body(body)?)?;

    let record = state.store().insert(collection, data).await?;
    tracing::info!(%collection, id = %record.id, login = %identity.login, "Created record");

    Ok((StatusCode::CREATED, Json(present(record))))
}

/// PUT /{collection}/{id} - Update a record.
async fn update_record(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path((collection, id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let collection = parse_collection(&collection)?;
    let id = parse_id(&id)?;
    let patch = json_body(body)?;

    let (_, stored) = state.store().get(collection, id).await?.into_parts();
    let data = merge_payload(collection, stored, patch)?;

    let record = state.store().update(collection, id, data).await?;
    tracing::info!(%collection, %id, login = %identity.login, "Updated record");

    Ok(Json(present(record)))
}

/// DELETE /{collection}/{id} - Delete a record.
async fn delete_record(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path((collection, id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let collection = parse_collection(&collection)?;
    let id = parse_id(&id)?;

    state.store().delete(collection, id).await?;
    tracing::info!(%collection, %id, login = %identity.login, "Deleted record");

    Ok(Json(json!({
        "id": id,
        "message": format!("Deleted {} {}", collection.singular(), id),
    })))
}

/// Build record routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/{collection}", get(list_records).post(create_record))
        .route(
            "/{collection}/{id}",
            get(get_record).put(update_record).delete(delete_record),
        )
}
