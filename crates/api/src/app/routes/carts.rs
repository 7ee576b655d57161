use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use shopcore_core::{CartId, DomainError, ProductId};
use shopcore_infra::CartStore;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::AuthContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_cart).get(list_carts))
        .route("/:cid", get(get_cart).delete(clear_cart))
        .route(
            "/:cid/products/:pid",
            post(add_product).put(set_quantity).delete(remove_product),
        )
        .route("/:cid/purchase", post(purchase))
}

fn parse_cart_id(raw: &str) -> Result<CartId, axum::response::Response> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid cart id"))
}

fn parse_product_id(raw: &str) -> Result<ProductId, axum::response::Response> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"))
}

fn cart_response(cart: &shopcore_carts::Cart) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "success",
            "payload": dto::cart_to_json(cart),
        })),
    )
        .into_response()
}

pub async fn create_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_role(&ctx, &["user", "admin"]) {
        return resp;
    }

    match services.carts.create() {
        Ok(cart) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "status": "success",
                "payload": dto::cart_to_json(&cart),
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_carts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_role(&ctx, &["admin"]) {
        return resp;
    }

    match services.carts.list() {
        Ok(carts) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "success",
                "payload": carts.iter().map(dto::cart_to_json).collect::<Vec<_>>(),
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(cid): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_role(&ctx, &["user", "admin"]) {
        return resp;
    }
    let cart_id = match parse_cart_id(&cid) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.carts.get(cart_id) {
        Ok(Some(cart)) => cart_response(&cart),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "cart not found"),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn add_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path((cid, pid)): Path<(String, String)>,
    body: Option<Json<dto::AddLineItemRequest>>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_role(&ctx, &["user"]) {
        return resp;
    }
    let cart_id = match parse_cart_id(&cid) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let product_id = match parse_product_id(&pid) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let quantity = body
        .map(|Json(b)| b.quantity.unwrap_or(1))
        .unwrap_or(1);

    match services.cart_service.add_line_item(cart_id, product_id, quantity) {
        Ok(cart) => cart_response(&cart),
        Err(DomainError::NotFound) => {
            errors::json_error(StatusCode::NOT_FOUND, "not_found", "cart not found")
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn set_quantity(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path((cid, pid)): Path<(String, String)>,
    Json(body): Json<dto::SetQuantityRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_role(&ctx, &["user", "admin"]) {
        return resp;
    }
    let cart_id = match parse_cart_id(&cid) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let product_id = match parse_product_id(&pid) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.carts.set_line_quantity(cart_id, product_id, body.quantity) {
        Ok(cart) => cart_response(&cart),
        Err(DomainError::NotFound) => errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "product not found in cart",
        ),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn remove_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path((cid, pid)): Path<(String, String)>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_role(&ctx, &["user", "admin"]) {
        return resp;
    }
    let cart_id = match parse_cart_id(&cid) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let product_id = match parse_product_id(&pid) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.carts.remove_line(cart_id, product_id) {
        Ok(cart) => cart_response(&cart),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn clear_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(cid): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_role(&ctx, &["user", "admin"]) {
        return resp;
    }
    let cart_id = match parse_cart_id(&cid) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.carts.clear(cart_id) {
        Ok(cart) => cart_response(&cart),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn purchase(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(cid): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_role(&ctx, &["user"]) {
        return resp;
    }
    let cart_id = match parse_cart_id(&cid) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.checkout.checkout(cart_id, ctx.email()) {
        Ok(outcome) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "success",
                "payload": {
                    "ticket": outcome.receipt.as_ref().map(dto::receipt_to_json),
                    "productsNotProcessed": outcome.unfulfilled.iter().map(|l| serde_json::json!({
                        "product_id": l.product_id.to_string(),
                        "quantity": l.quantity,
                    })).collect::<Vec<_>>(),
                },
            })),
        )
            .into_response(),
        Err(DomainError::NotFound) => {
            errors::json_error(StatusCode::NOT_FOUND, "not_found", "cart not found")
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
