use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::error::ApiError;
use crate::state::AppState;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

struct Bucket {
    tokens: f64,
    updated: Instant,
}

/// Token bucket per client IP. Buckets idle past the sweep interval are
/// pruned by a background task.
pub struct RateLimiter {
    buckets: Mutex<HashMap<IpAddr, Bucket>>,
    capacity: f64,
    refill_per_sec: f64,
}

impl RateLimiter {
    pub fn new(requests: u32, window_secs: u64) -> Self {
        let capacity = requests.max(1) as f64;
        Self {
            buckets: Mutex::new(HashMap::new()),
            capacity,
            refill_per_sec: capacity / window_secs.max(1) as f64,
        }
    }

    pub fn allow(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut buckets = self.buckets.lock().unwrap();
        let bucket = buckets.entry(ip).or_insert(Bucket {
            tokens: self.capacity,
            updated: now,
        });

        let elapsed = now.duration_since(bucket.updated).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        bucket.updated = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Drop buckets not touched within `idle`
    pub fn sweep(&self, idle: Duration) {
        let now = Instant::now();
        let mut buckets = self.buckets.lock().unwrap();
        let before = buckets.len();
        buckets.retain(|_, b| now.duration_since(b.updated) < idle);
        let dropped = before - buckets.len();
        if dropped > 0 {
            tracing::debug!("rate limiter swept {} idle buckets", dropped);
        }
    }

    pub fn tracked_ips(&self) -> usize {
        self.buckets.lock().unwrap().len()
    }

    pub fn spawn_sweeper(self: &Arc<Self>) {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
            ticker.tick().await; // first tick fires immediately
            loop {
                ticker.tick().await;
                limiter.sweep(SWEEP_INTERVAL);
            }
        });
    }
}

pub async fn limit(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    if state.config.api.enable_rate_limiting && !state.limiter.allow(addr.ip()) {
        return ApiError::too_many_requests("Rate limit exceeded").into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([127, 0, 0, last])
    }

    #[test]
    fn budget_is_enforced_per_ip() {
        let limiter = RateLimiter::new(3, 60);
        assert!(limiter.allow(ip(1)));
        assert!(limiter.allow(ip(1)));
        assert!(limiter.allow(ip(1)));
        assert!(!limiter.allow(ip(1)));
        // separate bucket
        assert!(limiter.allow(ip(2)));
    }

    #[test]
    fn sweep_prunes_idle_buckets() {
        let limiter = RateLimiter::new(10, 60);
        limiter.allow(ip(1));
        limiter.allow(ip(2));
        assert_eq!(limiter.tracked_ips(), 2);

        limiter.sweep(Duration::ZERO);
        assert_eq!(limiter.tracked_ips(), 0);

        limiter.allow(ip(1));
        limiter.sweep(Duration::from_secs(3600));
        assert_eq!(limiter.tracked_ips(), 1);
    }
}
