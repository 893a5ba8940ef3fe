//! Session verification models.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::user::User;

/// Response of `GET /auth/verify`: the signed-in account and its grants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AuthVerification {
    #[validate(nested)]
    pub user: User,
    pub permissions: Vec<String>,
}

impl AuthVerification {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_auth_verification() {
        let auth: AuthVerification = serde_json::from_value(json!({
            "user": {
                "id": "ADM001",
                "name": "Priya Raman",
                "email": "p.raman@campus.edu",
                "role": "admin",
                "department": "Registrar",
                "isActive": true,
                "lastLogin": "2024-03-01T08:00:00Z",
                "tokenQuota": 50000,
                "tokenUsage": 120,
                "createdAt": "2022-01-10T00:00:00Z"
            },
            "permissions": ["users:read", "users:write"]
        }))
        .unwrap();

        assert!(auth.validate().is_ok());
        assert!(auth.has_permission("users:write"));
        assert!(!auth.has_permission("migration:run"));
    }
}
