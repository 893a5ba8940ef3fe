use serde_json::Value as JsonValue;

use crate::client::Gateway;
use crate::error::GatewayError;
use crate::query_keys;
use crate::transport::ApiRequest;

impl Gateway {
    /// Progress of the platform data migration, as reported by the backend.
    pub async fn get_migration_status(&self) -> Result<JsonValue, GatewayError> {
        let request = ApiRequest::get("/migration/status", ["migration", "status"]);
        self.request(Some(query_keys::migration_status()), request)
            .await
    }
}
