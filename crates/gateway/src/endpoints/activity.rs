use domain::models::Activity;

use crate::client::Gateway;
use crate::error::GatewayError;
use crate::query_keys;
use crate::transport::ApiRequest;

/// Number of events returned when the caller does not ask for a window.
pub const DEFAULT_ACTIVITY_LIMIT: u32 = 20;

impl Gateway {
    /// The most recent `limit` events, newest first.
    pub async fn get_recent_activity(&self, limit: u32) -> Result<Vec<Activity>, GatewayError> {
        let request = ApiRequest::get("/activity", ["activity"]).with_query("limit", limit);
        self.request(Some(query_keys::recent_activity().with(limit)), request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use domain::models::{ActivityType, Severity};
    use serde_json::json;

    use super::*;
    use crate::endpoints::fixtures::gateway;
    use crate::transport::MockTransport;

    #[tokio::test]
    async fn test_get_recent_activity() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(
            200,
            json!([{
                "id": "act-1",
                "type": "security",
                "user": "admin@campus.edu",
                "action": "Blocked login from unknown device",
                "timestamp": "2024-03-01T09:30:00Z",
                "severity": "warning",
                "metadata": {"ip": "10.0.0.7"}
            }]),
        );

        let events = gateway(&mock)
            .get_recent_activity(DEFAULT_ACTIVITY_LIMIT)
            .await
            .unwrap();
        assert_eq!(events[0].kind, ActivityType::Security);
        assert_eq!(events[0].severity, Severity::Warning);
        assert_eq!(mock.requests()[0].path_and_query(), "/activity?limit=20");
    }

    #[tokio::test]
    async fn test_get_recent_activity_custom_limit() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(200, json!([]));

        gateway(&mock).get_recent_activity(5).await.unwrap();
        assert_eq!(mock.requests()[0].path_and_query(), "/activity?limit=5");
    }
}
