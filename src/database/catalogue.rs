use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

use crate::database::manager::StoreError;
use crate::database::models::{ApiUser, Article, Game, Group, Package, Player};
use crate::database::query::{build_list_statement, ListStatement};
use crate::listing::{fan_out, Column, ColumnSet, ListOutcome, ListQuery};

/// Column tables for the table endpoints, in client column order
pub const GAME_COLUMNS: ColumnSet = ColumnSet::new(
    &[
        Column { name: "name", sort_key: "name", searchable: true },
        Column { name: "players_peak_week", sort_key: "players_peak_week", searchable: false },
        Column { name: "followers", sort_key: "followers", searchable: false },
        Column { name: "review_score", sort_key: "review_score", searchable: false },
        Column { name: "price_final", sort_key: "price_final", searchable: false },
        Column { name: "release_date", sort_key: "release_date", searchable: false },
        Column { name: "primary_genre", sort_key: "primary_genre", searchable: true },
    ],
    "players_peak_week",
);

pub const PLAYER_COLUMNS: ColumnSet = ColumnSet::new(
    &[
        Column { name: "persona_name", sort_key: "persona_name", searchable: true },
        Column { name: "level", sort_key: "level", searchable: false },
        Column { name: "games_count", sort_key: "games_count", searchable: false },
        Column { name: "badges_count", sort_key: "badges_count", searchable: false },
        Column { name: "friends_count", sort_key: "friends_count", searchable: false },
        Column { name: "country_code", sort_key: "country_code", searchable: true },
    ],
    "level",
);

pub const GROUP_COLUMNS: ColumnSet = ColumnSet::new(
    &[
        Column { name: "name", sort_key: "name", searchable: true },
        Column { name: "headline", sort_key: "headline", searchable: true },
        Column { name: "members", sort_key: "members", searchable: false },
        Column { name: "trending", sort_key: "trending", searchable: false },
    ],
    "members",
);

pub const PACKAGE_COLUMNS: ColumnSet = ColumnSet::new(
    &[
        Column { name: "name", sort_key: "name", searchable: true },
        Column { name: "billing_type", sort_key: "billing_type", searchable: true },
        Column { name: "apps_count", sort_key: "apps_count", searchable: false },
        Column { name: "price_final", sort_key: "price_final", searchable: false },
    ],
    "apps_count",
);

pub const ARTICLE_COLUMNS: ColumnSet = ColumnSet::new(
    &[
        Column { name: "title", sort_key: "title", searchable: true },
        Column { name: "author", sort_key: "author", searchable: true },
        Column { name: "app_id", sort_key: "app_id", searchable: false },
        Column { name: "published_at", sort_key: "published_at", searchable: false },
    ],
    "published_at",
);

const GAME_SELECT: &str = "id, name, icon, release_date, price_final, players_peak_week, \
                           followers, review_score, primary_genre, updated_at";
const PLAYER_SELECT: &str = "id, persona_name, avatar, country_code, level, games_count, \
                             badges_count, friends_count, updated_at";
const GROUP_SELECT: &str = "id, name, headline, icon, members, trending, updated_at";
const PACKAGE_SELECT: &str =
    "id, name, billing_type, license_type, apps_count, price_final, updated_at";
const ARTICLE_SELECT: &str = "id, title, author, excerpt, app_id, published_at";

/// Read-side access to the denormalized catalogue tables
#[derive(Clone)]
pub struct Catalogue {
    pool: PgPool,
}

impl Catalogue {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn list_games(&self, query: &ListQuery) -> Result<ListOutcome<Game, StoreError>, StoreError> {
        let stmt = build_list_statement("games", GAME_SELECT, query, &GAME_COLUMNS)?;
        Ok(self.run_list(&stmt).await)
    }

    pub async fn list_players(&self, query: &ListQuery) -> Result<ListOutcome<Player, StoreError>, StoreError> {
        let stmt = build_list_statement("players", PLAYER_SELECT, query, &PLAYER_COLUMNS)?;
        Ok(self.run_list(&stmt).await)
    }

    pub async fn list_groups(&self, query: &ListQuery) -> Result<ListOutcome<Group, StoreError>, StoreError> {
        let stmt = build_list_statement("groups", GROUP_SELECT, query, &GROUP_COLUMNS)?;
        Ok(self.run_list(&stmt).await)
    }

    pub async fn list_packages(&self, query: &ListQuery) -> Result<ListOutcome<Package, StoreError>, StoreError> {
        let stmt = build_list_statement("packages", PACKAGE_SELECT, query, &PACKAGE_COLUMNS)?;
        Ok(self.run_list(&stmt).await)
    }

    pub async fn list_articles(&self, query: &ListQuery) -> Result<ListOutcome<Article, StoreError>, StoreError> {
        let stmt = build_list_statement("articles", ARTICLE_SELECT, query, &ARTICLE_COLUMNS)?;
        Ok(self.run_list(&stmt).await)
    }

    pub async fn game(&self, id: i64) -> Result<Game, StoreError> {
        let sql = format!("SELECT {} FROM \"games\" WHERE id = $1", GAME_SELECT);
        self.fetch_404(&sql, id, "game").await
    }

    /// Games sharing the primary genre, busiest first. Empty when the game
    /// has no genre on record.
    pub async fn similar_games(&self, id: i64) -> Result<Vec<Game>, StoreError> {
        let sql = format!(
            "SELECT {} FROM \"games\" WHERE id <> $1 AND primary_genre IS NOT NULL \
             AND primary_genre = (SELECT primary_genre FROM \"games\" WHERE id = $1) \
             ORDER BY players_peak_week DESC LIMIT 10",
            GAME_SELECT
        );
        Ok(sqlx::query_as::<_, Game>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn player(&self, id: i64) -> Result<Player, StoreError> {
        let sql = format!("SELECT {} FROM \"players\" WHERE id = $1", PLAYER_SELECT);
        self.fetch_404(&sql, id, "player").await
    }

    pub async fn user_by_key(&self, key: &str) -> Result<Option<ApiUser>, StoreError> {
        Ok(sqlx::query_as::<_, ApiUser>(
            "SELECT id, email, api_key, level, created_at FROM \"api_users\" WHERE api_key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn fetch_404<T>(&self, sql: &str, id: i64, kind: &str) -> Result<T, StoreError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        match sqlx::query_as::<_, T>(sql).bind(id).fetch_one(&self.pool).await {
            Ok(row) => Ok(row),
            Err(sqlx::Error::RowNotFound) => {
                Err(StoreError::NotFound(format!("{} {}", kind, id)))
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Issue the page fetch and counts concurrently; see listing::executor
    /// for the join semantics.
    async fn run_list<T>(&self, stmt: &ListStatement) -> ListOutcome<T, StoreError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let rows = async {
            let mut q = sqlx::query_as::<_, T>(&stmt.page_sql);
            for p in &stmt.params {
                q = q.bind(p);
            }
            q.fetch_all(&self.pool).await.map_err(StoreError::from)
        };

        let total = async {
            sqlx::query_scalar::<_, i64>(&stmt.total_sql)
                .fetch_one(&self.pool)
                .await
                .map_err(StoreError::from)
        };

        let filtered = stmt.filtered_sql.as_deref().map(|sql| async move {
            let mut q = sqlx::query_scalar::<_, i64>(sql);
            for p in &stmt.params {
                q = q.bind(p);
            }
            q.fetch_one(&self.pool).await.map_err(StoreError::from)
        });

        fan_out(rows, total, filtered).await
    }
}
