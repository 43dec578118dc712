use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use super::{pagination_json, rest_list_query, ListParams};
use crate::database::catalogue::PLAYER_COLUMNS;
use crate::error::ApiError;
use crate::queue::Enqueued;
use crate::state::AppState;

/// GET /players
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let query = rest_list_query(&params, &PLAYER_COLUMNS, state.config.api.max_limit);
    let outcome = state.catalogue.list_players(&query).await?.require_rows()?;
    Ok(Json(json!({
        "players": outcome.rows.value,
        "pagination": pagination_json(
            query.offset,
            query.limit,
            outcome.total.value,
            outcome.filtered.value,
        ),
    })))
}

/// GET /players/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let player = state.catalogue.player(id).await?;
    Ok(Json(serde_json::to_value(player).map_err(|e| {
        ApiError::internal_server_error(format!("Failed to format response: {}", e))
    })?))
}

/// POST /players/:id - funnel a refresh request to the external updater
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    match state.queue.publish("player", &id.to_string()).await? {
        Enqueued::Queued => Ok(Json(json!({ "message": "update queued" }))),
        Enqueued::AlreadyPending => Ok(Json(json!({ "message": "update already pending" }))),
    }
}
