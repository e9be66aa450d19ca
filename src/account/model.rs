//! Account entity
//!
//! The sole persisted record type. The password hash and the activation
//! token are separate columns: a pending account has an activation token and
//! no hash, an activated account has a hash and (unless a password reset is
//! in flight) no token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Account role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Admin,
    Premium,
    Customer,
    Guest,
}

impl AccountRole {
    /// Convert role to its stored string representation
    pub fn as_str(&self) -> &str {
        match self {
            AccountRole::Admin => "admin",
            AccountRole::Premium => "premium",
            AccountRole::Customer => "customer",
            AccountRole::Guest => "guest",
        }
    }

    /// Parse role from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(AccountRole::Admin),
            "premium" => Some(AccountRole::Premium),
            "customer" => Some(AccountRole::Customer),
            "guest" => Some(AccountRole::Guest),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Account record
///
/// The password hash is never serialized in API responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique account identifier, immutable once assigned
    pub id: Uuid,

    /// Email address (unique, used as login key)
    pub email: String,

    /// Argon2id PHC string; None until the account has been activated
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,

    /// One-time activation / password-reset token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_token: Option<Uuid>,

    /// Account role, defaults to customer
    pub role: AccountRole,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp, maintained by the store
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a pending account awaiting activation
    ///
    /// The account has no usable password until the activation token is
    /// redeemed, so it cannot satisfy a login.
    pub fn new_pending(email: String, active_token: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash: None,
            active_token: Some(active_token),
            role: AccountRole::Customer,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the account still awaits first activation
    pub fn is_pending(&self) -> bool {
        self.password_hash.is_none()
    }

    /// Check if the account has the admin role
    pub fn is_admin(&self) -> bool {
        self.role == AccountRole::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_conversion() {
        assert_eq!(AccountRole::Admin.as_str(), "admin");
        assert_eq!(AccountRole::Premium.as_str(), "premium");
        assert_eq!(AccountRole::Customer.as_str(), "customer");
        assert_eq!(AccountRole::Guest.as_str(), "guest");

        assert_eq!(AccountRole::parse("admin"), Some(AccountRole::Admin));
        assert_eq!(AccountRole::parse("CUSTOMER"), Some(AccountRole::Customer));
        assert_eq!(AccountRole::parse("invalid"), None);
    }

    #[test]
    fn test_new_pending_account() {
        let token = Uuid::new_v4();
        let account = Account::new_pending("test@test.com".to_string(), token);

        assert_eq!(account.email, "test@test.com");
        assert_eq!(account.role, AccountRole::Customer);
        assert_eq!(account.active_token, Some(token));
        assert!(account.is_pending());
        assert!(!account.is_admin());
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let mut account = Account::new_pending("test@test.com".to_string(), Uuid::new_v4());
        account.password_hash = Some("$argon2id$v=19$secret".to_string());

        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2id"));
        assert!(json.contains("activeToken"));
        assert!(json.contains("createdAt"));
    }
}
