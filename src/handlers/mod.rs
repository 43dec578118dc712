use axum::{middleware::from_fn_with_state, routing::get, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::listing::{pages_current, pages_total, ColumnSet, ListQuery, SortDirection};
use crate::middleware::{api_key, rate_limit};
use crate::state::AppState;

pub mod articles;
pub mod games;
pub mod groups;
pub mod health;
pub mod packages;
pub mod players;
pub mod tables;

pub fn router(state: AppState) -> Router {
    // Key-gated JSON API
    let api = Router::new()
        .route("/games", get(games::list))
        .route("/games/:id", get(games::get))
        .route("/games/:id/similar", get(games::similar))
        .route("/players", get(players::list))
        .route("/players/:id", get(players::get).post(players::update))
        .route("/groups", get(groups::list))
        .route("/packages", get(packages::list))
        .route("/articles", get(articles::list))
        .layer(from_fn_with_state(state.clone(), api_key::gate))
        .layer(from_fn_with_state(state.clone(), rate_limit::limit));

    // Session-scoped table endpoints for the client-side table widget
    let tables = Router::new()
        .route("/tables/games.json", get(tables::games))
        .route("/tables/players.json", get(tables::players))
        .route("/tables/groups.json", get(tables::groups))
        .route("/tables/packages.json", get(tables::packages))
        .route("/tables/articles.json", get(tables::articles))
        .layer(from_fn_with_state(state.clone(), rate_limit::limit));

    let mut app = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .merge(api)
        .merge(tables)
        // Internal facade for server-to-server calls, behind its own
        // shared-secret gate
        .merge(crate::backend::server::routes(state.clone()));

    if state.config.security.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// REST list parameters. All fields are parsed leniently: a malformed value
/// behaves like an absent one.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub search: Option<String>,
}

/// Build a ListQuery from REST-style page/limit/sort/order parameters.
/// The sort column comes from `sort`, the direction from `order`.
pub(crate) fn rest_list_query(
    params: &ListParams,
    columns: &ColumnSet,
    max_limit: i64,
) -> ListQuery {
    let limit = match params.limit.as_deref().and_then(|v| v.trim().parse::<i64>().ok()) {
        Some(l) if l > 0 => l.min(max_limit),
        _ => max_limit.min(100),
    };

    let page = params
        .page
        .as_deref()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1);

    let sort_key = params
        .sort
        .as_deref()
        .and_then(|name| columns.sort_key_by_name(name))
        .unwrap_or_else(|| columns.default_sort());

    let sort_direction = match params.order.as_deref() {
        Some("desc") => SortDirection::Desc,
        _ => SortDirection::Asc,
    };

    ListQuery {
        draw: String::new(),
        offset: (page - 1) * limit,
        limit,
        sort_key,
        sort_direction,
        search: params.search.as_deref().unwrap_or("").trim().to_string(),
        named: HashMap::new(),
    }
}

pub(crate) fn pagination_json(offset: i64, limit: i64, total: i64, filtered: i64) -> Value {
    json!({
        "offset": offset,
        "limit": limit,
        "total": total,
        "totalFiltered": filtered,
        "pagesTotal": pages_total(total, limit),
        "pagesCurrent": pages_current(offset, limit),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::catalogue::GAME_COLUMNS;

    #[test]
    fn rest_params_parse_leniently() {
        let params = ListParams {
            page: Some("x".into()),
            limit: Some("nope".into()),
            sort: Some("no_such".into()),
            order: Some("sideways".into()),
            search: None,
        };
        let q = rest_list_query(&params, &GAME_COLUMNS, 1000);
        assert_eq!(q.offset, 0);
        assert_eq!(q.limit, 100);
        assert_eq!(q.sort_key, "players_peak_week");
        assert_eq!(q.sort_direction, SortDirection::Asc);
    }

    #[test]
    fn direction_comes_from_the_order_parameter() {
        let params = ListParams {
            page: Some("3".into()),
            limit: Some("50".into()),
            sort: Some("name".into()),
            order: Some("desc".into()),
            search: None,
        };
        let q = rest_list_query(&params, &GAME_COLUMNS, 1000);
        assert_eq!(q.offset, 100);
        assert_eq!(q.limit, 50);
        assert_eq!(q.sort_key, "name");
        assert_eq!(q.sort_direction, SortDirection::Desc);
    }

    #[test]
    fn page_count_comes_from_the_unfiltered_total() {
        let v = pagination_json(0, 10, 100, 30);
        assert_eq!(v["pagesTotal"], 10);
        assert_eq!(v["totalFiltered"], 30);
        assert_eq!(v["pagesCurrent"], 1);
    }
}
