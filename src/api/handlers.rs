//! Request handlers for the `/accounts` resource.
//!
//! Each handler decodes the path and body itself so that malformed input always
//! becomes [`Error::InvalidInput`] (400) no matter which content type was sent.

use crate::{
    api::AppState,
    core::client,
    errors::{Error, Result},
    models::Client,
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

/// Parses a client id from a path segment. Ids are base-10 integers starting at 1.
pub(crate) fn parse_client_id(raw: &str) -> Result<i64> {
    let id: i64 = raw.parse().map_err(|e| Error::InvalidInput {
        message: format!("client id {raw:?} is not an integer: {e}"),
    })?;
    if id < 1 {
        return Err(Error::InvalidInput {
            message: format!("client id must be positive, got {id}"),
        });
    }
    Ok(id)
}

fn decode_client(body: &[u8]) -> Result<Client> {
    serde_json::from_slice(body).map_err(|e| Error::InvalidInput {
        message: format!("malformed client body: {e}"),
    })
}

/// `GET /accounts`
#[instrument(skip(state))]
pub async fn list_clients(State(state): State<AppState>) -> Result<Json<Vec<Client>>> {
    client::find_all_clients(&state.db).await.map(Json)
}

/// `POST /accounts` - always creates; any id in the body is discarded.
#[instrument(skip(state, body))]
pub async fn create_client(State(state): State<AppState>, body: Bytes) -> Result<Json<Client>> {
    let mut submitted = decode_client(&body)?;
    submitted.id = 0;
    client::save_client(&state.db, submitted).await.map(Json)
}

/// `GET /accounts/{id}`
#[instrument(skip(state))]
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Client>> {
    let id = parse_client_id(&id)?;
    client::find_client_by_id(&state.db, id).await.map(Json)
}

/// `PUT /accounts/{id}` - the path id wins over any id in the body.
#[instrument(skip(state, body))]
pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Client>> {
    let id = parse_client_id(&id)?;
    let mut submitted = decode_client(&body)?;
    submitted.id = id;
    client::save_client(&state.db, submitted).await.map(Json)
}

/// `DELETE /accounts/{id}` - responds with an empty body.
#[instrument(skip(state))]
pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_client_id(&id)?;
    client::delete_client_by_id(&state.db, id).await?;
    Ok(StatusCode::OK)
}
