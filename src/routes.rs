//! API route definitions
//!
//! Routes are grouped by the guard they need; guards are applied with
//! `route_layer` so an unmatched path still 404s instead of 401ing.

use crate::auth::middleware::{protect, refresh_only, require_admin};
use crate::handlers::account;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

/// Create the account routes, mounted under `/api/account`
pub fn account_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/login", post(account::login))
        .route("/recover-password", post(account::recover_password))
        .route("/active/:active_token", put(account::active));

    // Admin-only routes (protect runs first, then the role check)
    let admin_routes = Router::new()
        .route("/register", post(account::register))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), protect));

    // Routes requiring an access token
    let protected_routes = Router::new()
        .route("/me", get(account::me))
        .route(
            "/deactivate-password-recovery-link",
            put(account::deactivate_password_recovery_link),
        )
        .route("/delete", delete(account::remove))
        .route_layer(middleware::from_fn_with_state(state.clone(), protect));

    // Routes requiring a refresh token
    let refresh_routes = Router::new()
        .route("/refresh-token", get(account::refresh_token))
        .route_layer(middleware::from_fn_with_state(state, refresh_only));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .merge(protected_routes)
        .merge(refresh_routes)
}
