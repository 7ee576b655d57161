//! Handler-side authentication and role gate.
//!
//! Roles live on the token; each route names the roles it admits. Routers
//! that mix public and protected endpoints on the same paths (the catalog)
//! authenticate inside the handler with [`authenticate`]; token-only route
//! trees use the router-level middleware instead.

use axum::http::{HeaderMap, StatusCode};
use chrono::Utc;

use shopcore_auth::JwtValidator;

use crate::app::errors;
use crate::context::AuthContext;
use crate::middleware;

/// Resolve the bearer token into an authenticated context.
pub fn authenticate(
    headers: &HeaderMap,
    jwt: &dyn JwtValidator,
) -> Result<AuthContext, axum::response::Response> {
    let token = middleware::extract_bearer(headers).map_err(|status| {
        errors::json_error(status, "unauthorized", "missing or malformed bearer token")
    })?;

    let claims = jwt.validate(token, Utc::now()).map_err(|_| {
        errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "invalid token")
    })?;

    Ok(AuthContext::new(claims.sub, claims.email, claims.role))
}

/// Admit the request only when the authenticated role is one of `allowed`.
pub fn require_role(
    ctx: &AuthContext,
    allowed: &[&str],
) -> Result<(), axum::response::Response> {
    if allowed.iter().any(|r| ctx.role().as_str() == *r) {
        Ok(())
    } else {
        Err(errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            format!("requires one of roles: {}", allowed.join(", ")),
        ))
    }
}
