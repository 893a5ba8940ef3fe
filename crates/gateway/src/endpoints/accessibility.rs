use domain::models::AccessibilityReport;
use serde_json::{json, Value as JsonValue};

use crate::client::Gateway;
use crate::error::GatewayError;
use crate::query_keys;
use crate::transport::ApiRequest;

impl Gateway {
    /// Latest accessibility audit.
    pub async fn get_accessibility_report(&self) -> Result<AccessibilityReport, GatewayError> {
        let request = ApiRequest::get("/accessibility/report", ["accessibility", "report"]);
        self.request(Some(query_keys::accessibility_report()), request)
            .await
    }

    /// Ask the backend to audit `page_url`. The result is returned as sent.
    pub async fn validate_accessibility(&self, page_url: &str) -> Result<JsonValue, GatewayError> {
        let request = ApiRequest::post("/accessibility/validate", ["accessibility", "validate"])
            .with_json(&json!({ "url": page_url }))?;
        self.request(None, request).await
    }
}
