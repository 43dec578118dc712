//! Table endpoints for the client-side table widget. These degrade silently:
//! a failed sub-query leaves its field empty or zero rather than failing the
//! request.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::database::catalogue::{
    ARTICLE_COLUMNS, GAME_COLUMNS, GROUP_COLUMNS, PACKAGE_COLUMNS, PLAYER_COLUMNS,
};
use crate::database::models::{Article, Game, Group, Package, Player};
use crate::error::ApiError;
use crate::listing::{shape, ListQuery, ListResult};
use crate::session::Session;
use crate::state::AppState;

const TABLE_PAGE_MAX: i64 = 100;

/// GET /tables/games.json (level-limited)
pub async fn games(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResult>, ApiError> {
    let query = ListQuery::from_params(&params, &GAME_COLUMNS, TABLE_PAGE_MAX);
    let outcome = state.catalogue.list_games(&query).await?;
    let rows = outcome.rows.value.iter().map(game_row).collect();
    Ok(Json(shaped(&state, &headers, &query, true, outcome.total.value, outcome.filtered.value, rows)))
}

/// GET /tables/players.json (level-limited)
pub async fn players(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResult>, ApiError> {
    let query = ListQuery::from_params(&params, &PLAYER_COLUMNS, TABLE_PAGE_MAX);
    let outcome = state.catalogue.list_players(&query).await?;
    let rows = outcome.rows.value.iter().map(player_row).collect();
    Ok(Json(shaped(&state, &headers, &query, true, outcome.total.value, outcome.filtered.value, rows)))
}

/// GET /tables/groups.json
pub async fn groups(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResult>, ApiError> {
    let query = ListQuery::from_params(&params, &GROUP_COLUMNS, TABLE_PAGE_MAX);
    let outcome = state.catalogue.list_groups(&query).await?;
    let rows = outcome.rows.value.iter().map(group_row).collect();
    Ok(Json(shaped(&state, &headers, &query, false, outcome.total.value, outcome.filtered.value, rows)))
}

/// GET /tables/packages.json
pub async fn packages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResult>, ApiError> {
    let query = ListQuery::from_params(&params, &PACKAGE_COLUMNS, TABLE_PAGE_MAX);
    let outcome = state.catalogue.list_packages(&query).await?;
    let rows = outcome.rows.value.iter().map(package_row).collect();
    Ok(Json(shaped(&state, &headers, &query, false, outcome.total.value, outcome.filtered.value, rows)))
}

/// GET /tables/articles.json
pub async fn articles(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResult>, ApiError> {
    let query = ListQuery::from_params(&params, &ARTICLE_COLUMNS, TABLE_PAGE_MAX);
    let outcome = state.catalogue.list_articles(&query).await?;
    let rows = outcome.rows.value.iter().map(article_row).collect();
    Ok(Json(shaped(&state, &headers, &query, false, outcome.total.value, outcome.filtered.value, rows)))
}

fn shaped(
    state: &AppState,
    headers: &HeaderMap,
    query: &ListQuery,
    limited: bool,
    total: i64,
    filtered: i64,
    rows: Vec<Value>,
) -> ListResult {
    let session = Session::from_headers(headers, &state.config.security.session_secret);
    shape(
        query.draw.clone(),
        query.limit,
        limited,
        session.as_ref(),
        total,
        filtered,
        rows,
    )
}

// Row tuples. Column order is fixed per endpoint and mirrored by the client
// widget's column definitions.

fn game_row(g: &Game) -> Value {
    json!([
        g.id,               // 0
        g.name,             // 1
        g.icon,             // 2
        g.players_peak_week, // 3
        g.followers,        // 4
        g.review_score,     // 5
        g.price_final,      // 6
    ])
}

fn player_row(p: &Player) -> Value {
    json!([
        p.id,            // 0
        p.persona_name,  // 1
        p.avatar,        // 2
        p.level,         // 3
        p.games_count,   // 4
        p.badges_count,  // 5
        p.friends_count, // 6
    ])
}

fn group_row(g: &Group) -> Value {
    json!([
        g.id,       // 0
        g.name,     // 1
        g.headline, // 2
        g.icon,     // 3
        g.members,  // 4
        g.trending, // 5
    ])
}

fn package_row(p: &Package) -> Value {
    json!([
        p.id,           // 0
        p.name,         // 1
        p.billing_type, // 2
        p.apps_count,   // 3
        p.price_final,  // 4
    ])
}

fn article_row(a: &Article) -> Value {
    json!([
        a.id,           // 0
        a.title,        // 1
        a.author,       // 2
        a.app_id,       // 3
        a.published_at, // 4
    ])
}
