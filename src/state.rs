use sqlx::PgPool;
use std::sync::Arc;

use crate::backend::BackendClient;
use crate::config::AppConfig;
use crate::database::Catalogue;
use crate::metering::{PostgresUsageSink, UsageSink};
use crate::middleware::{PostgresUserProvider, RateLimiter, UserProvider};
use crate::queue::{PostgresQueue, QueuePublisher};

/// Explicitly constructed process state, built once at startup and handed
/// down through the router. No lazily-initialized globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalogue: Catalogue,
    pub users: Arc<dyn UserProvider>,
    pub metering: Arc<dyn UsageSink>,
    pub queue: Arc<dyn QueuePublisher>,
    pub limiter: Arc<RateLimiter>,
    /// Present when REST list handlers should delegate to a remote facade
    pub backend: Option<Arc<BackendClient>>,
}

impl AppState {
    pub fn new(config: AppConfig, pool: PgPool) -> Self {
        let catalogue = Catalogue::new(pool.clone());
        let limiter = Arc::new(RateLimiter::new(
            config.api.rate_limit_requests,
            config.api.rate_limit_window_secs,
        ));
        let backend = config
            .backend
            .remote_url
            .as_deref()
            .map(|url| Arc::new(BackendClient::new(url, config.backend.shared_secret.clone())));

        Self {
            users: Arc::new(PostgresUserProvider::new(catalogue.clone())),
            metering: Arc::new(PostgresUsageSink::new(pool.clone())),
            queue: Arc::new(PostgresQueue::new(pool)),
            catalogue,
            limiter,
            backend,
            config: Arc::new(config),
        }
    }
}
