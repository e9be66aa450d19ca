//! Authentication and authorization
//!
//! - JWT issuance and validation (access + refresh pairs)
//! - Password hashing with Argon2id
//! - Request guards for protected, refresh-only, and admin-only routes

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{issue_token_pair, verify_token, Claims, JwtConfig, TokenPair};
pub use middleware::{protect, refresh_only, require_admin, AuthError, CurrentAccount, RefreshClaims};
pub use password::{hash_password, verify_password};
