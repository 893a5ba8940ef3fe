use domain::models::{User, UserPage, UserUpdate};
use reqwest::Method;
use shared::pagination::PageRequest;

use crate::client::Gateway;
use crate::error::GatewayError;
use crate::query_keys;
use crate::transport::ApiRequest;

const USER_ROUTE: &str = "/users/{userId}";

impl Gateway {
    /// One page of accounts.
    ///
    /// `page` and `limit` are sent exactly as given; validating them is up to
    /// the caller (see [`PageRequest::validate`]).
    pub async fn get_users(&self, page: PageRequest) -> Result<UserPage, GatewayError> {
        let request = page
            .query_pairs()
            .into_iter()
            .fold(ApiRequest::get("/users", ["users"]), |request, (key, value)| {
                request.with_query(key, value)
            });
        self.request(Some(query_keys::users(page.page, page.limit)), request)
            .await
    }

    pub async fn get_user_by_id(&self, user_id: &str) -> Result<User, GatewayError> {
        self.check_user_id(&Method::GET, USER_ROUTE, user_id)?;
        let request = ApiRequest::get(USER_ROUTE, ["users", user_id]);
        self.request(Some(query_keys::user(user_id)), request).await
    }

    /// Apply a partial update and return the account as stored.
    pub async fn update_user(&self, user_id: &str, update: &UserUpdate) -> Result<User, GatewayError> {
        self.check_user_id(&Method::PUT, USER_ROUTE, user_id)?;
        let request = ApiRequest::put(USER_ROUTE, ["users", user_id]).with_json(update)?;
        self.request(None, request).await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<(), GatewayError> {
        self.check_user_id(&Method::DELETE, USER_ROUTE, user_id)?;
        let request = ApiRequest::delete(USER_ROUTE, ["users", user_id]);
        self.request_empty(request).await
    }
}
