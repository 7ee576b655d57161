//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: store construction and service wiring
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use shopcore_auth::JwtValidator;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(jwt_secret: String) -> Router {
    let services = Arc::new(services::build_services(jwt_secret));
    let auth_state = middleware::AuthState {
        jwt: Arc::clone(&services.jwt) as Arc<dyn JwtValidator>,
    };

    // Carts and session introspection sit behind the auth middleware. The
    // catalog mixes public reads and admin mutations on the same paths, so
    // its handlers authenticate themselves.
    let protected = Router::new()
        .nest("/api/carts", routes::carts::router())
        .nest("/api/sessions", routes::sessions::protected_router())
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api/products", routes::products::router())
        .nest("/api/sessions", routes::sessions::public_router())
        .merge(protected)
        .layer(Extension(services))
}
