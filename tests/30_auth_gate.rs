use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use gamedb::database::models::ApiUser;
use gamedb::database::StoreError;
use gamedb::middleware::{authenticate, UserProvider};
use gamedb::session::UserLevel;

/// Records lookups so tests can assert the database was never touched
struct SpyProvider {
    calls: AtomicUsize,
    user: Option<ApiUser>,
}

impl SpyProvider {
    fn returning(user: Option<ApiUser>) -> Self {
        Self { calls: AtomicUsize::new(0), user }
    }

    fn lookups(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserProvider for SpyProvider {
    async fn user_by_key(&self, _key: &str) -> Result<Option<ApiUser>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.user.clone())
    }
}

fn user(level: i64) -> ApiUser {
    ApiUser {
        id: Uuid::new_v4(),
        email: "test@example.com".into(),
        api_key: "ABCDEFGHIJ0123456789".into(),
        level,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn malformed_keys_are_rejected_before_lookup() {
    let provider = SpyProvider::returning(Some(user(2)));

    for bad in [
        "abcdefghij0123456789", // lowercase
        "ABCDEFGHIJ",           // short
        "ABCDEFGHIJ0123456789X", // long
        "ABCDEFGHIJ-123456789", // punctuation
        "",
    ] {
        let result = authenticate(&provider, Some(bad), UserLevel::Tier1).await;
        let err = result.expect_err("malformed key must fail");
        assert_eq!(err.status_code(), 401, "key {:?}", bad);
    }

    assert_eq!(provider.lookups(), 0, "provider must not be consulted");
}

#[tokio::test]
async fn missing_key_is_rejected_without_lookup() {
    let provider = SpyProvider::returning(Some(user(2)));
    let err = authenticate(&provider, None, UserLevel::Tier1)
        .await
        .expect_err("missing key must fail");
    assert_eq!(err.status_code(), 401);
    assert_eq!(provider.lookups(), 0);
}

#[tokio::test]
async fn well_formed_key_resolves_the_account() {
    let provider = SpyProvider::returning(Some(user(2)));
    let account = authenticate(&provider, Some("ABCDEFGHIJ0123456789"), UserLevel::Tier1)
        .await
        .expect("tier1 account passes");
    assert_eq!(account.user_level(), UserLevel::Tier1);
    assert_eq!(provider.lookups(), 1);
}

#[tokio::test]
async fn unknown_key_is_unauthorized_after_lookup() {
    let provider = SpyProvider::returning(None);
    let err = authenticate(&provider, Some("ABCDEFGHIJ0123456789"), UserLevel::Tier1)
        .await
        .expect_err("unknown key must fail");
    assert_eq!(err.status_code(), 401);
    assert_eq!(provider.lookups(), 1);
}

#[tokio::test]
async fn accounts_below_the_tier_floor_are_rejected() {
    let provider = SpyProvider::returning(Some(user(1)));
    let err = authenticate(&provider, Some("ABCDEFGHIJ0123456789"), UserLevel::Tier1)
        .await
        .expect_err("free account must fail");
    assert_eq!(err.status_code(), 401);
}
