//! Cache keys for gateway reads.
//!
//! A [`QueryKey`] is a structured tuple of typed segments, built as a pure
//! function of the query's parameters. External caching layers index results
//! by it, and the gateway uses it to coalesce identical in-flight reads.
//! Text and number segments never compare equal, so `["users", 2, 25]` and
//! `["users", "2", "25"]` are different keys.

use std::borrow::Cow;
use std::fmt;

use domain::models::Timeframe;
use serde::Serialize;

/// One element of a [`QueryKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum KeySegment {
    Text(Cow<'static, str>),
    Number(u64),
}

impl From<&'static str> for KeySegment {
    fn from(value: &'static str) -> Self {
        KeySegment::Text(Cow::Borrowed(value))
    }
}

impl From<String> for KeySegment {
    fn from(value: String) -> Self {
        KeySegment::Text(Cow::Owned(value))
    }
}

impl From<u32> for KeySegment {
    fn from(value: u32) -> Self {
        KeySegment::Number(u64::from(value))
    }
}

impl From<u64> for KeySegment {
    fn from(value: u64) -> Self {
        KeySegment::Number(value)
    }
}

/// Structured cache key, serialized as a JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct QueryKey(Vec<KeySegment>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<KeySegment>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Extend the key with one more segment.
    pub fn with(mut self, segment: impl Into<KeySegment>) -> Self {
        self.0.push(segment.into());
        self
    }

    pub fn segments(&self) -> &[KeySegment] {
        &self.0
    }

    /// True if `self` starts with all of `prefix`'s segments, for
    /// invalidating a family of keys (e.g. every `users` page).
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            match segment {
                KeySegment::Text(text) => write!(f, "{:?}", text)?,
                KeySegment::Number(n) => write!(f, "{}", n)?,
            }
        }
        write!(f, "]")
    }
}

/// `["dashboard", "metrics"]`
pub fn dashboard_metrics() -> QueryKey {
    QueryKey::new(["dashboard", "metrics"])
}

/// `["ai", "usage", timeframe]`
pub fn token_usage(timeframe: Timeframe) -> QueryKey {
    QueryKey::new(["ai", "usage", timeframe.as_str()])
}

/// `["system", "health"]`
pub fn system_health() -> QueryKey {
    QueryKey::new(["system", "health"])
}

/// `["users", page, limit]`
pub fn users(page: u32, limit: u32) -> QueryKey {
    QueryKey::new(["users"]).with(page).with(limit)
}

/// `["activity", "recent"]`
pub fn recent_activity() -> QueryKey {
    QueryKey::new(["activity", "recent"])
}

/// `["tokens", "quotas"]`
pub fn token_quotas() -> QueryKey {
    QueryKey::new(["tokens", "quotas"])
}

/// `["system", "status"]`
pub fn system_status() -> QueryKey {
    QueryKey::new(["system", "status"])
}

/// `["users", user_id]`
pub fn user(user_id: &str) -> QueryKey {
    QueryKey::new(["users"]).with(user_id.to_string())
}

/// `["auth", "verify"]`
pub fn auth_session() -> QueryKey {
    QueryKey::new(["auth", "verify"])
}

/// `["accessibility", "report"]`
pub fn accessibility_report() -> QueryKey {
    QueryKey::new(["accessibility", "report"])
}

/// `["migration", "status"]`
pub fn migration_status() -> QueryKey {
    QueryKey::new(["migration", "status"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_usage_is_deterministic() {
        assert_eq!(token_usage(Timeframe::Day), token_usage(Timeframe::Day));
    }

    #[test]
    fn test_token_usage_differs_by_timeframe() {
        assert_ne!(token_usage(Timeframe::Day), token_usage(Timeframe::Week));
        assert_ne!(token_usage(Timeframe::Week), token_usage(Timeframe::Month));
    }

    #[test]
    fn test_users_key_depends_on_both_parameters() {
        assert_eq!(users(2, 25), users(2, 25));
        assert_ne!(users(2, 25), users(25, 2));
        assert_ne!(users(1, 50), users(1, 25));
    }

    #[test]
    fn test_number_and_text_segments_never_collide() {
        let numeric = users(2, 25);
        let textual = QueryKey::new(["users", "2", "25"]);
        assert_ne!(numeric, textual);
    }

    #[test]
    fn test_user_key_does_not_collide_with_page_key() {
        assert_ne!(user("1"), QueryKey::new(["users"]).with(1u32));
    }

    #[test]
    fn test_static_keys_match_registry() {
        assert_eq!(
            serde_json::to_value(dashboard_metrics()).unwrap(),
            json!(["dashboard", "metrics"])
        );
        assert_eq!(
            serde_json::to_value(system_health()).unwrap(),
            json!(["system", "health"])
        );
        assert_eq!(
            serde_json::to_value(recent_activity()).unwrap(),
            json!(["activity", "recent"])
        );
        assert_eq!(
            serde_json::to_value(token_quotas()).unwrap(),
            json!(["tokens", "quotas"])
        );
    }

    #[test]
    fn test_parameterized_keys_serialize_as_tuples() {
        assert_eq!(
            serde_json::to_value(token_usage(Timeframe::Week)).unwrap(),
            json!(["ai", "usage", "7d"])
        );
        assert_eq!(
            serde_json::to_value(users(2, 25)).unwrap(),
            json!(["users", 2, 25])
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(users(2, 25).to_string(), r#"["users",2,25]"#);
        assert_eq!(token_usage(Timeframe::Day).to_string(), r#"["ai","usage","24h"]"#);
    }

    #[test]
    fn test_starts_with() {
        let prefix = QueryKey::new(["users"]);
        assert!(users(3, 50).starts_with(&prefix));
        assert!(user("STU001").starts_with(&prefix));
        assert!(!token_quotas().starts_with(&prefix));
    }

    #[test]
    fn test_recent_activity_window_extends_registry_key() {
        let key = recent_activity().with(20u32);
        assert!(key.starts_with(&recent_activity()));
        assert_ne!(key, recent_activity().with(50u32));
    }
}
