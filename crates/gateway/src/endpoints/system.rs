use domain::models::{SystemMetric, SystemStatus};

use crate::client::Gateway;
use crate::error::GatewayError;
use crate::query_keys;
use crate::transport::ApiRequest;

impl Gateway {
    /// Health of each backing service.
    pub async fn get_system_health(&self) -> Result<Vec<SystemMetric>, GatewayError> {
        let request = ApiRequest::get("/system/health", ["system", "health"]);
        self.request(Some(query_keys::system_health()), request).await
    }

    /// Overall platform state.
    pub async fn get_system_status(&self) -> Result<SystemStatus, GatewayError> {
        let request = ApiRequest::get("/system/status", ["system", "status"]);
        self.request(Some(query_keys::system_status()), request).await
    }
}
