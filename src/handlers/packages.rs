use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use super::{pagination_json, rest_list_query, ListParams};
use crate::database::catalogue::PACKAGE_COLUMNS;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /packages
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let query = rest_list_query(&params, &PACKAGE_COLUMNS, state.config.api.max_limit);
    let outcome = state.catalogue.list_packages(&query).await?.require_rows()?;
    Ok(Json(json!({
        "packages": outcome.rows.value,
        "pagination": pagination_json(
            query.offset,
            query.limit,
            outcome.total.value,
            outcome.filtered.value,
        ),
    })))
}
