use domain::models::DashboardMetrics;

use crate::client::Gateway;
use crate::error::GatewayError;
use crate::query_keys;
use crate::transport::ApiRequest;

impl Gateway {
    /// Headline counters for the dashboard landing page.
    pub async fn get_dashboard_metrics(&self) -> Result<DashboardMetrics, GatewayError> {
        let request = ApiRequest::get("/dashboard/metrics", ["dashboard", "metrics"]);
        self.request(Some(query_keys::dashboard_metrics()), request).await
    }
}
