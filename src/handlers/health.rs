use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::database::manager;
use crate::state::AppState;

pub async fn root() -> Json<serde_json::Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Game DB",
        "version": version,
        "endpoints": {
            "games": "/games, /games/:id, /games/:id/similar",
            "players": "/players, /players/:id",
            "groups": "/groups",
            "packages": "/packages",
            "articles": "/articles",
            "tables": "/tables/*.json",
            "health": "/health",
        },
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match manager::health_check(state.catalogue.pool()).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok",
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string(),
            })),
        ),
    }
}
