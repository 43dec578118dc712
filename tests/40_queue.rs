use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use gamedb::database::models::UpdateRequest;
use gamedb::database::StoreError;
use gamedb::queue::{Enqueued, QueuePublisher};

/// Publisher keeping pending requests in memory, applying the same
/// cooldown suppression rule the Postgres funnel applies in SQL: a request
/// for an entity with an unprocessed row inside the cooldown window is
/// acknowledged but not re-enqueued.
struct MemoryQueue {
    cooldown: Duration,
    requests: Mutex<Vec<UpdateRequest>>,
}

impl MemoryQueue {
    fn new(cooldown: Duration) -> Self {
        Self { cooldown, requests: Mutex::new(Vec::new()) }
    }

    fn backdate_all(&self, by: Duration) {
        let mut requests = self.requests.lock().unwrap();
        for r in requests.iter_mut() {
            r.requested_at = r.requested_at - by;
        }
    }

    fn mark_all_processed(&self) {
        let mut requests = self.requests.lock().unwrap();
        for r in requests.iter_mut() {
            r.processed_at = Some(Utc::now());
        }
    }

    fn rows_for(&self, kind: &str, entity_id: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.kind == kind && r.entity_id == entity_id)
            .count()
    }
}

#[async_trait]
impl QueuePublisher for MemoryQueue {
    async fn publish(&self, kind: &str, entity_id: &str) -> Result<Enqueued, StoreError> {
        let mut requests = self.requests.lock().unwrap();
        let cutoff = Utc::now() - self.cooldown;
        let pending = requests.iter().any(|r| {
            r.kind == kind
                && r.entity_id == entity_id
                && r.processed_at.is_none()
                && r.requested_at > cutoff
        });
        if pending {
            return Ok(Enqueued::AlreadyPending);
        }
        requests.push(UpdateRequest {
            id: Uuid::new_v4(),
            kind: kind.to_string(),
            entity_id: entity_id.to_string(),
            requested_at: Utc::now(),
            processed_at: None,
        });
        Ok(Enqueued::Queued)
    }
}

#[tokio::test]
async fn duplicate_inside_cooldown_is_not_requeued() {
    let queue = MemoryQueue::new(Duration::minutes(30));

    assert_eq!(queue.publish("player", "7656").await.unwrap(), Enqueued::Queued);
    assert_eq!(
        queue.publish("player", "7656").await.unwrap(),
        Enqueued::AlreadyPending
    );
    assert_eq!(queue.rows_for("player", "7656"), 1);

    // Different entity, same kind: its own row
    assert_eq!(queue.publish("player", "9999").await.unwrap(), Enqueued::Queued);
    assert_eq!(queue.rows_for("player", "9999"), 1);
}

#[tokio::test]
async fn expired_cooldown_allows_a_fresh_request() {
    let queue = MemoryQueue::new(Duration::minutes(30));
    queue.publish("player", "7656").await.unwrap();

    queue.backdate_all(Duration::minutes(31));
    assert_eq!(queue.publish("player", "7656").await.unwrap(), Enqueued::Queued);
    assert_eq!(queue.rows_for("player", "7656"), 2);
}

#[tokio::test]
async fn processed_requests_do_not_suppress() {
    let queue = MemoryQueue::new(Duration::minutes(30));
    queue.publish("game", "440").await.unwrap();

    queue.mark_all_processed();
    assert_eq!(queue.publish("game", "440").await.unwrap(), Enqueued::Queued);
}
