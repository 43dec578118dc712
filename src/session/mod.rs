use axum::http::HeaderMap;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account tier. Guest means "no session at all" and only ever appears as a
/// computed viewer level, never in a stored user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UserLevel {
    Guest,
    Free,
    Tier1,
    Tier2,
    Tier3,
}

/// Page multiplier per level. A table viewer may page through at most
/// `multiplier * limit` rows of a limited listing; 0 means unlimited.
const PAGE_MULTIPLIERS: [i64; 5] = [5, 15, 50, 100, 0];

impl UserLevel {
    pub fn from_i64(level: i64) -> Self {
        match level {
            1 => UserLevel::Free,
            2 => UserLevel::Tier1,
            3 => UserLevel::Tier2,
            4 => UserLevel::Tier3,
            _ => UserLevel::Guest,
        }
    }

    pub fn as_i64(&self) -> i64 {
        match self {
            UserLevel::Guest => 0,
            UserLevel::Free => 1,
            UserLevel::Tier1 => 2,
            UserLevel::Tier2 => 3,
            UserLevel::Tier3 => 4,
        }
    }

    pub fn page_multiplier(&self) -> i64 {
        PAGE_MULTIPLIERS[self.as_i64() as usize]
    }

    /// Max rows of a limited listing this level may page through.
    /// 0 means no cap.
    pub fn max_results(&self, limit: i64) -> i64 {
        self.page_multiplier() * limit
    }
}

/// JWT claims carried by the session cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub level: i64,
    /// API key bound to the account, so key-gated endpoints also accept a
    /// browser session
    pub key: Option<String>,
    pub exp: i64,
}

/// Typed per-request session decoded from the session cookie.
/// Absent or invalid token means the viewer is a guest.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub level: UserLevel,
    pub api_key: Option<String>,
}

pub const SESSION_COOKIE: &str = "gamedb_session";

impl Session {
    pub fn from_headers(headers: &HeaderMap, secret: &str) -> Option<Session> {
        let token = session_cookie_value(headers)?;
        Self::from_token(&token, secret)
    }

    pub fn from_token(token: &str, secret: &str) -> Option<Session> {
        if secret.is_empty() {
            return None;
        }

        let decoding_key = DecodingKey::from_secret(secret.as_bytes());
        let token_data = decode::<Claims>(token, &decoding_key, &Validation::default()).ok()?;

        Some(Session {
            user_id: token_data.claims.sub,
            level: UserLevel::from_i64(token_data.claims.level),
            api_key: token_data.claims.key,
        })
    }

    /// Issue a signed session token, used at login and by tests
    pub fn issue(
        user_id: Uuid,
        level: UserLevel,
        api_key: Option<String>,
        secret: &str,
        ttl_hours: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: user_id,
            level: level.as_i64(),
            key: api_key,
            exp: (Utc::now() + chrono::Duration::hours(ttl_hours)).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }
}

fn session_cookie_value(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get("cookie")?.to_str().ok()?;
    for pair in cookies.split(';') {
        let mut it = pair.trim().splitn(2, '=');
        if it.next() == Some(SESSION_COOKIE) {
            return it.next().map(|v| v.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_multiplier_and_tier3_unlimited() {
        assert_eq!(UserLevel::Guest.max_results(10), 50);
        assert_eq!(UserLevel::Tier3.max_results(10), 0);
    }

    #[test]
    fn session_round_trips_through_cookie() {
        let secret = "test-secret";
        let id = Uuid::new_v4();
        let token =
            Session::issue(id, UserLevel::Tier2, Some("ABCDEFGHIJ0123456789".into()), secret, 1)
                .unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            format!("other=1; {}={}", SESSION_COOKIE, token).parse().unwrap(),
        );

        let session = Session::from_headers(&headers, secret).expect("session");
        assert_eq!(session.user_id, id);
        assert_eq!(session.level, UserLevel::Tier2);
        assert_eq!(session.api_key.as_deref(), Some("ABCDEFGHIJ0123456789"));
    }

    #[test]
    fn bad_token_means_guest() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            format!("{}=not-a-jwt", SESSION_COOKIE).parse().unwrap(),
        );
        assert!(Session::from_headers(&headers, "test-secret").is_none());
    }
}
