use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use super::{pagination_json, rest_list_query, ListParams};
use crate::backend::proto;
use crate::database::catalogue::GAME_COLUMNS;
use crate::error::ApiError;
use crate::listing::SortDirection;
use crate::state::AppState;

/// GET /games - paginated game list, delegated to the backend facade when
/// one is configured
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let query = rest_list_query(&params, &GAME_COLUMNS, state.config.api.max_limit);

    if let Some(backend) = &state.backend {
        let pagination = proto::PaginationRequest {
            offset: query.offset,
            limit: query.limit,
            sort_field: params.sort.clone().unwrap_or_default(),
            sort_descending: query.sort_direction == SortDirection::Desc,
        };
        let response = if query.search.is_empty() {
            backend.list_games(pagination).await?
        } else {
            backend.search_games(query.search.clone(), pagination).await?
        };

        let games: Vec<Value> = response
            .games
            .iter()
            .map(|g| {
                json!({
                    "id": g.id,
                    "name": g.name,
                    "icon": g.icon,
                    "players_peak_week": g.players,
                    "review_score": g.review_score,
                })
            })
            .collect();
        let p = response.pagination.unwrap_or_default();
        return Ok(Json(json!({
            "games": games,
            "pagination": pagination_json(p.offset, p.limit, p.total, p.total_filtered),
        })));
    }

    let outcome = state.catalogue.list_games(&query).await?.require_rows()?;
    Ok(Json(json!({
        "games": outcome.rows.value,
        "pagination": pagination_json(
            query.offset,
            query.limit,
            outcome.total.value,
            outcome.filtered.value,
        ),
    })))
}

/// GET /games/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let game = state.catalogue.game(id).await?;
    Ok(Json(serde_json::to_value(game).map_err(|e| {
        ApiError::internal_server_error(format!("Failed to format response: {}", e))
    })?))
}

/// GET /games/:id/similar - games sharing the primary genre
pub async fn similar(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    // 404 when the game itself is unknown, empty list when it merely has
    // no genre
    state.catalogue.game(id).await?;
    let games = state.catalogue.similar_games(id).await?;
    Ok(Json(json!({ "games": games })))
}
