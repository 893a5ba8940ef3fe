//! Domain access methods, one module per backend area.
//!
//! Each method is a thin `impl Gateway` wrapper: it names the route, builds
//! the request, and lets the transport primitive do the rest. Errors are
//! surfaced unchanged.

mod accessibility;
mod activity;
mod ai_usage;
mod auth;
mod dashboard;
mod migration;
mod system;
mod users;

pub use activity::DEFAULT_ACTIVITY_LIMIT;

use reqwest::Method;
use shared::validation::validate_identifier;

use crate::client::Gateway;
use crate::error::GatewayError;

impl Gateway {
    /// Reject ids that cannot name a user before anything is sent.
    fn check_user_id(
        &self,
        method: &Method,
        route: &'static str,
        user_id: &str,
    ) -> Result<(), GatewayError> {
        validate_identifier(user_id).map_err(|e| {
            self.reject(method, route, format!("Invalid user id {:?}: {}", user_id, e.code))
        })
    }
}
