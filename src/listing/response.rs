use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::session::{Session, UserLevel};

/// Whether, and for whom, a limited listing was clamped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelLimited {
    NotLimited,
    LoggedIn,
    Guest,
}

impl LevelLimited {
    pub fn as_u8(&self) -> u8 {
        match self {
            LevelLimited::NotLimited => 0,
            LevelLimited::LoggedIn => 1,
            LevelLimited::Guest => 2,
        }
    }
}

// Wire format is the bare number the table widget expects
impl Serialize for LevelLimited {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

/// The JSON shape the client-side table widget consumes
#[derive(Debug, Serialize)]
pub struct ListResult {
    pub draw: String,
    #[serde(rename = "recordsTotal")]
    pub records_total: i64,
    #[serde(rename = "recordsFiltered")]
    pub records_filtered: i64,
    /// Ordered row tuples; column order is fixed per endpoint
    pub data: Vec<Value>,
    #[serde(rename = "levelLimited")]
    pub level_limited: LevelLimited,
}

/// Shape the wire response. `total` is first raised to `filtered` if the
/// caller passed a smaller total; for `limited` endpoints `filtered` is then
/// clamped down (never up) to the viewer's level cap.
pub fn shape(
    draw: String,
    limit: i64,
    limited: bool,
    session: Option<&Session>,
    total: i64,
    filtered: i64,
    data: Vec<Value>,
) -> ListResult {
    let total = total.max(filtered);
    let mut records_filtered = filtered;
    let mut level_limited = LevelLimited::NotLimited;

    if limited {
        let level = session.map(|s| s.level).unwrap_or(UserLevel::Guest);
        let max_results = level.max_results(limit);
        if max_results > 0 && max_results < filtered {
            records_filtered = max_results;
            level_limited = if session.is_some() {
                LevelLimited::LoggedIn
            } else {
                LevelLimited::Guest
            };
        }
    }

    ListResult {
        draw,
        records_total: total,
        records_filtered,
        data,
        level_limited,
    }
}

pub fn pages_total(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

pub fn pages_current(offset: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 1;
    }
    offset / limit + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn session(level: UserLevel) -> Session {
        Session { user_id: Uuid::new_v4(), level, api_key: None }
    }

    #[test]
    fn total_is_raised_to_filtered() {
        let r = shape("1".into(), 10, false, None, 5, 80, vec![]);
        assert_eq!(r.records_total, 80);
        assert_eq!(r.records_filtered, 80);
        assert!(r.records_total >= r.records_filtered);
    }

    #[test]
    fn guest_is_capped_on_limited_listing() {
        let r = shape("1".into(), 10, true, None, 500, 500, vec![]);
        assert_eq!(r.records_filtered, 50);
        assert_eq!(r.level_limited, LevelLimited::Guest);
        assert_eq!(r.records_total, 500);
    }

    #[test]
    fn logged_in_cap_is_marked_differently() {
        let s = session(UserLevel::Free);
        let r = shape("1".into(), 10, true, Some(&s), 500, 500, vec![]);
        assert_eq!(r.records_filtered, 150);
        assert_eq!(r.level_limited, LevelLimited::LoggedIn);
    }

    #[test]
    fn tier3_is_never_capped() {
        let s = session(UserLevel::Tier3);
        let r = shape("1".into(), 10, true, Some(&s), 500, 500, vec![]);
        assert_eq!(r.records_filtered, 500);
        assert_eq!(r.level_limited, LevelLimited::NotLimited);
    }

    #[test]
    fn cap_never_raises_filtered() {
        let s = session(UserLevel::Free);
        // cap (150) above true filtered count: untouched
        let r = shape("1".into(), 10, true, Some(&s), 100, 100, vec![]);
        assert_eq!(r.records_filtered, 100);
        assert_eq!(r.level_limited, LevelLimited::NotLimited);
    }

    #[test]
    fn unlimited_endpoint_ignores_levels() {
        let r = shape("1".into(), 10, false, None, 500, 500, vec![]);
        assert_eq!(r.records_filtered, 500);
        assert_eq!(r.level_limited, LevelLimited::NotLimited);
    }

    #[test]
    fn level_limited_serializes_as_number() {
        let r = shape("3".into(), 10, true, None, 500, 500, vec![]);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["levelLimited"], 2);
        assert_eq!(v["recordsFiltered"], 50);
        assert_eq!(v["draw"], "3");
    }

    #[test]
    fn pagination_math_boundaries() {
        assert_eq!(pages_total(100, 10), 10);
        assert_eq!(pages_total(101, 10), 11);
        assert_eq!(pages_total(0, 10), 0);
        assert_eq!(pages_total(100, 0), 0);

        assert_eq!(pages_current(0, 10), 1);
        assert_eq!(pages_current(9, 10), 1);
        assert_eq!(pages_current(100, 10), 11);
    }
}
