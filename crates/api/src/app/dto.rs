use serde::Deserialize;

use shopcore_carts::Cart;
use shopcore_catalog::{PriceSort, Product, ProductFilter, ProductPage};
use shopcore_receipts::Receipt;

// -------------------------
// Request DTOs
// -------------------------

/// Listing query parameters (`?limit=&page=&sort=&query=`).
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub sort: Option<String>,
    pub query: Option<String>,
}

impl ListQuery {
    pub fn sort(&self) -> PriceSort {
        PriceSort::parse(self.sort.as_deref())
    }

    pub fn filter(&self) -> ProductFilter {
        ProductFilter::parse_query(self.query.as_deref())
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct AddLineItemRequest {
    /// Units to merge in; defaults to 1.
    pub quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn product_to_json(product: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": product.id.to_string(),
        "title": product.title,
        "description": product.description,
        "code": product.code,
        "price": product.price,
        "stock": product.stock,
        "category": product.category,
        "available": product.available,
        "thumbnails": product.thumbnails,
    })
}

pub fn cart_to_json(cart: &Cart) -> serde_json::Value {
    serde_json::json!({
        "id": cart.id.to_string(),
        "items": cart.items().iter().map(|l| serde_json::json!({
            "product_id": l.product_id.to_string(),
            "quantity": l.quantity,
        })).collect::<Vec<_>>(),
    })
}

pub fn receipt_to_json(receipt: &Receipt) -> serde_json::Value {
    serde_json::json!({
        "id": receipt.id.to_string(),
        "code": receipt.code,
        "amount": receipt.amount,
        "purchaser": receipt.purchaser,
        "created_at": receipt.created_at.to_rfc3339(),
    })
}

/// Listing envelope, pagination metadata included.
pub fn page_to_json(page: &ProductPage, limit: u32) -> serde_json::Value {
    serde_json::json!({
        "status": "success",
        "payload": page.items.iter().map(product_to_json).collect::<Vec<_>>(),
        "page": page.page,
        "totalPages": page.total_pages,
        "prevPage": page.prev_page,
        "nextPage": page.next_page,
        "hasPrevPage": page.has_prev(),
        "hasNextPage": page.has_next(),
        "prevLink": page
            .prev_page
            .map(|p| format!("/api/products?limit={limit}&page={p}")),
        "nextLink": page
            .next_page
            .map(|p| format!("/api/products?limit={limit}&page={p}")),
    })
}
