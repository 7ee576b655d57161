use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};

use shopcore_catalog::{NewProduct, PageRequest, Product, ProductUpdate};
use shopcore_core::ProductId;
use shopcore_infra::CatalogStore;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::AuthContext;

/// Catalog routes. Reads are public; mutations authenticate in the handler
/// and require the admin role.
pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

fn admin_context(
    headers: &HeaderMap,
    services: &AppServices,
) -> Result<AuthContext, axum::response::Response> {
    let ctx = authz::authenticate(headers, services.jwt.as_ref())?;
    authz::require_role(&ctx, &["admin"])?;
    Ok(ctx)
}

fn parse_product_id(raw: &str) -> Result<ProductId, axum::response::Response> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    let limit = query.limit.unwrap_or(PageRequest::DEFAULT_LIMIT);
    let request = match PageRequest::new(query.page.unwrap_or(1), limit) {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.catalog.page(&query.filter(), query.sort(), request) {
        Ok(page) => (StatusCode::OK, Json(dto::page_to_json(&page, limit))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id = match parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.catalog.get(product_id) {
        Ok(Some(product)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "success",
                "payload": dto::product_to_json(&product),
            })),
        )
            .into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<NewProduct>,
) -> axum::response::Response {
    if let Err(resp) = admin_context(&headers, &services) {
        return resp;
    }

    let product = match Product::new(ProductId::new(), body) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.catalog.insert(product) {
        Ok(product) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "status": "success",
                "payload": dto::product_to_json(&product),
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<ProductUpdate>,
) -> axum::response::Response {
    if let Err(resp) = admin_context(&headers, &services) {
        return resp;
    }
    let product_id = match parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.catalog.update(product_id, body) {
        Ok(product) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "success",
                "payload": dto::product_to_json(&product),
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = admin_context(&headers, &services) {
        return resp;
    }
    let product_id = match parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.catalog.delete(product_id) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "success",
                "payload": "product deleted",
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
