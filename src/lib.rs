//! Account API
//!
//! REST API for account management: registration, login, password
//! recovery/activation, token refresh, account retrieval, and deletion,
//! with JWT bearer authentication.

pub mod account;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod validate;

use crate::state::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::account::login,
        handlers::account::register,
        handlers::account::recover_password,
        handlers::account::active,
        handlers::account::deactivate_password_recovery_link,
        handlers::account::refresh_token,
        handlers::account::me,
        handlers::account::remove,
        handlers::health::health_check,
    ),
    components(schemas(
        account::Account,
        account::AccountRole,
        handlers::account::LoginRequest,
        handlers::account::RegisterRequest,
        handlers::account::RecoverPasswordRequest,
        handlers::account::ActivateRequest,
        handlers::account::TokenResponse,
        handlers::account::RegisterResponse,
        handlers::account::MessageResponse,
        handlers::account::AccountResponse,
        error::ErrorBody,
        error::FieldError,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "account", description = "The account managing API"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/account", routes::account_routes(state.clone()))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Router wired to a lazy connection pool, for integration tests
///
/// The pool only dials PostgreSQL when a request actually reaches the
/// store, so tests covering validation and token handling run without a
/// database.
#[cfg(feature = "test-utils")]
pub fn create_router_for_testing() -> Router {
    use crate::account::AccountStore;
    use crate::config::AppConfig;
    use sqlx::postgres::PgPoolOptions;

    let config = AppConfig::default();
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .expect("default database url is well-formed");
    let store = AccountStore::new(pool);

    create_router(Arc::new(AppState::new(config, store)))
}
