use domain::models::AuthVerification;

use crate::client::Gateway;
use crate::error::GatewayError;
use crate::query_keys;
use crate::transport::ApiRequest;

impl Gateway {
    /// Who the configured credentials belong to, and what they may do.
    pub async fn verify_auth(&self) -> Result<AuthVerification, GatewayError> {
        let request = ApiRequest::get("/auth/verify", ["auth", "verify"]);
        self.request(Some(query_keys::auth_session()), request).await
    }
}
