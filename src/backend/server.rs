use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use prost::Message;
use std::collections::HashMap;

use super::{proto, INTERNAL_KEY_HEADER};
use crate::database::catalogue::{GAME_COLUMNS, GROUP_COLUMNS};
use crate::database::StoreError;
use crate::listing::{ColumnSet, ListQuery, SortDirection};
use crate::state::AppState;

/// Internal facade routes. Server-to-server only: every route sits behind
/// the shared-secret gate, so public clients cannot reach the catalogue by
/// speaking protobuf. Errors are returned verbatim as plain text; callers
/// apply their own policy.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/backend/games/list", post(list_games))
        .route("/backend/games/search", post(search_games))
        .route("/backend/groups/list", post(list_groups))
        .layer(from_fn_with_state(state, require_internal_key))
}

/// Rejects calls without the deployment's internal key. An unset key keeps
/// the facade closed entirely.
pub async fn require_internal_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(INTERNAL_KEY_HEADER)
        .and_then(|h| h.to_str().ok());
    if !internal_key_accepted(&state.config.backend.shared_secret, provided) {
        return (StatusCode::UNAUTHORIZED, "internal key required").into_response();
    }
    next.run(request).await
}

fn internal_key_accepted(expected: &str, provided: Option<&str>) -> bool {
    !expected.is_empty() && provided == Some(expected)
}

async fn list_games(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match proto::ListGamesRequest::decode(body.as_ref()) {
        Ok(r) => r,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    let query = list_query(
        request.pagination.as_ref(),
        &GAME_COLUMNS,
        state.config.api.max_limit,
        "",
    );
    games_response(&state, &query).await
}

async fn search_games(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match proto::SearchGamesRequest::decode(body.as_ref()) {
        Ok(r) => r,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    let query = list_query(
        request.pagination.as_ref(),
        &GAME_COLUMNS,
        state.config.api.max_limit,
        &request.query,
    );
    games_response(&state, &query).await
}

async fn list_groups(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match proto::ListGroupsRequest::decode(body.as_ref()) {
        Ok(r) => r,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    let query = list_query(
        request.pagination.as_ref(),
        &GROUP_COLUMNS,
        state.config.api.max_limit,
        "",
    );

    let outcome = match state.catalogue.list_groups(&query).await {
        Ok(outcome) => outcome,
        Err(e) => return store_error(e),
    };
    let outcome = match outcome.require_rows() {
        Ok(outcome) => outcome,
        Err(e) => return store_error(e),
    };

    protobuf(proto::ListGroupsResponse {
        pagination: Some(proto::PaginationResponse::build(
            query.offset,
            query.limit,
            outcome.total.value,
            outcome.filtered.value,
        )),
        groups: outcome
            .rows
            .value
            .iter()
            .map(|g| proto::GroupRow {
                id: g.id,
                name: g.name.clone(),
                headline: g.headline.clone().unwrap_or_default(),
                members: g.members,
                trending: g.trending,
            })
            .collect(),
    })
}

async fn games_response(state: &AppState, query: &ListQuery) -> Response {
    let outcome = match state.catalogue.list_games(query).await {
        Ok(outcome) => outcome,
        Err(e) => return store_error(e),
    };
    let outcome = match outcome.require_rows() {
        Ok(outcome) => outcome,
        Err(e) => return store_error(e),
    };

    protobuf(proto::ListGamesResponse {
        pagination: Some(proto::PaginationResponse::build(
            query.offset,
            query.limit,
            outcome.total.value,
            outcome.filtered.value,
        )),
        games: outcome
            .rows
            .value
            .iter()
            .map(|g| proto::GameRow {
                id: g.id,
                name: g.name.clone(),
                icon: g.icon.clone().unwrap_or_default(),
                players: g.players_peak_week,
                review_score: g.review_score,
            })
            .collect(),
    })
}

fn list_query(
    pagination: Option<&proto::PaginationRequest>,
    columns: &ColumnSet,
    max_limit: i64,
    search: &str,
) -> ListQuery {
    let (offset, limit, sort_field, descending) = match pagination {
        Some(p) => (p.offset, p.limit, p.sort_field.as_str(), p.sort_descending),
        None => (0, 0, "", false),
    };

    ListQuery {
        draw: String::new(),
        offset: offset.max(0),
        limit: if limit > 0 { limit.min(max_limit) } else { max_limit.min(100) },
        sort_key: columns
            .sort_key_by_name(sort_field)
            .unwrap_or_else(|| columns.default_sort()),
        sort_direction: if descending { SortDirection::Desc } else { SortDirection::Asc },
        search: search.trim().to_string(),
        named: HashMap::new(),
    }
}

fn store_error(err: StoreError) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
}

fn protobuf<M: Message>(message: M) -> Response {
    (
        [(CONTENT_TYPE, "application/x-protobuf")],
        message.encode_to_vec(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_are_safe() {
        let q = list_query(None, &GAME_COLUMNS, 1000, "");
        assert_eq!(q.offset, 0);
        assert_eq!(q.limit, 100);
        assert_eq!(q.sort_key, "players_peak_week");
    }

    #[test]
    fn unknown_sort_field_falls_back_to_default() {
        let p = proto::PaginationRequest {
            offset: 10,
            limit: 20,
            sort_field: "no_such_column".into(),
            sort_descending: true,
        };
        let q = list_query(Some(&p), &GAME_COLUMNS, 1000, "");
        assert_eq!(q.sort_key, "players_peak_week");
        assert_eq!(q.sort_direction, SortDirection::Desc);
        assert_eq!(q.offset, 10);
        assert_eq!(q.limit, 20);
    }

    #[test]
    fn internal_key_gate_rejects_everything_but_the_exact_key() {
        assert!(internal_key_accepted("s3cret", Some("s3cret")));
        assert!(!internal_key_accepted("s3cret", Some("wrong")));
        assert!(!internal_key_accepted("s3cret", None));
        // unset key closes the facade
        assert!(!internal_key_accepted("", None));
        assert!(!internal_key_accepted("", Some("")));
    }
}
