use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use super::{pagination_json, rest_list_query, ListParams};
use crate::database::catalogue::ARTICLE_COLUMNS;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /articles
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let query = rest_list_query(&params, &ARTICLE_COLUMNS, state.config.api.max_limit);
    let outcome = state.catalogue.list_articles(&query).await?.require_rows()?;
    Ok(Json(json!({
        "articles": outcome.rows.value,
        "pagination": pagination_json(
            query.offset,
            query.limit,
            outcome.total.value,
            outcome.filtered.value,
        ),
    })))
}
