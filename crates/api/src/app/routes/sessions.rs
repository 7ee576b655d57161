use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{Duration, Utc};

use shopcore_auth::{Account, JwtClaims, NewAccount};
use shopcore_core::AccountId;
use shopcore_infra::AccountStore;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::AuthContext;

/// Issued tokens are valid for one hour.
const TOKEN_TTL_MINUTES: i64 = 60;

pub fn public_router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn protected_router() -> Router {
    Router::new().route("/current", get(current))
}

fn account_to_json(account: &Account) -> serde_json::Value {
    // Never echo the password hash.
    serde_json::json!({
        "id": account.id.to_string(),
        "first_name": account.first_name,
        "last_name": account.last_name,
        "email": account.email,
        "age": account.age,
        "role": account.role.as_str(),
    })
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewAccount>,
) -> axum::response::Response {
    let account = match Account::register(AccountId::new(), body) {
        Ok(a) => a,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.accounts.insert(account) {
        Ok(account) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "status": "success",
                "payload": account_to_json(&account),
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let account = match services.accounts.find_by_email(&body.email) {
        Ok(Some(account)) => account,
        Ok(None) => {
            return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "invalid credentials");
        }
        Err(e) => return errors::domain_error_to_response(e),
    };

    if !account.verify_password(&body.password) {
        return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "invalid credentials");
    }

    let now = Utc::now();
    let claims = JwtClaims {
        sub: account.id,
        email: account.email.clone(),
        role: account.role.clone(),
        issued_at: now,
        expires_at: now + Duration::minutes(TOKEN_TTL_MINUTES),
    };

    match services.jwt.issue(&claims) {
        Ok(token) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "success",
                "token": token,
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "token issuance failed");
            errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_error",
                "failed to issue token",
            )
        }
    }
}

pub async fn current(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
) -> axum::response::Response {
    // Prefer the stored account; fall back to the claims if it is gone.
    match services.accounts.get(ctx.account_id()) {
        Ok(Some(account)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "success",
                "user": account_to_json(&account),
            })),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "success",
                "user": {
                    "id": ctx.account_id().to_string(),
                    "email": ctx.email(),
                    "role": ctx.role().as_str(),
                },
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
