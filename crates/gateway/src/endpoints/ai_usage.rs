use domain::models::{QuotaUpdate, Timeframe, TokenQuota, TokenUsage};
use reqwest::Method;

use crate::client::Gateway;
use crate::error::GatewayError;
use crate::query_keys;
use crate::transport::ApiRequest;

const QUOTA_ROUTE: &str = "/tokens/quota/{userId}";

impl Gateway {
    /// Token consumption records over `timeframe`.
    pub async fn get_token_usage(&self, timeframe: Timeframe) -> Result<Vec<TokenUsage>, GatewayError> {
        let request =
            ApiRequest::get("/ai/usage", ["ai", "usage"]).with_query("timeframe", timeframe);
        self.request(Some(query_keys::token_usage(timeframe)), request).await
    }

    /// Per-user token allowances.
    pub async fn get_token_quotas(&self) -> Result<Vec<TokenQuota>, GatewayError> {
        let request = ApiRequest::get("/tokens/quotas", ["tokens", "quotas"]);
        self.request(Some(query_keys::token_quotas()), request).await
    }

    /// Set a user's token allowance.
    pub async fn update_token_quota(&self, user_id: &str, quota: u64) -> Result<(), GatewayError> {
        self.check_user_id(&Method::PUT, QUOTA_ROUTE, user_id)?;
        let request = ApiRequest::put(QUOTA_ROUTE, ["tokens", "quota", user_id])
            .with_json(&QuotaUpdate { quota })?;
        self.request_empty(request).await
    }
}
