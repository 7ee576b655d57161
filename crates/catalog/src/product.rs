use serde::{Deserialize, Serialize};

use shopcore_core::{DomainError, DomainResult, ProductId};

/// Catalog product record.
///
/// `stock` is mutated only by the inventory store's compare-and-set
/// adjustment during checkout; every other field is owned by catalog CRUD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: Option<String>,
    /// Merchant-assigned SKU, if any.
    pub code: Option<String>,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
    pub stock: u32,
    pub category: String,
    pub available: bool,
    pub thumbnails: Vec<String>,
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewProduct {
    pub title: String,
    pub description: Option<String>,
    pub code: Option<String>,
    pub price: u64,
    pub stock: u32,
    pub category: String,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub thumbnails: Vec<String>,
}

fn default_available() -> bool {
    true
}

/// Partial update for a product; `None` fields are left untouched.
///
/// Stock is deliberately absent: stock moves only through the inventory
/// store's conditional adjustment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub price: Option<u64>,
    pub category: Option<String>,
    pub available: Option<bool>,
    pub thumbnails: Option<Vec<String>>,
}

impl Product {
    pub fn new(id: ProductId, input: NewProduct) -> DomainResult<Self> {
        if input.title.trim().is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }
        if input.category.trim().is_empty() {
            return Err(DomainError::validation("category cannot be empty"));
        }

        Ok(Self {
            id,
            title: input.title,
            description: input.description,
            code: input.code,
            price: input.price,
            stock: input.stock,
            category: input.category,
            available: input.available,
            thumbnails: input.thumbnails,
        })
    }

    /// Apply a partial update, re-validating the affected fields.
    pub fn apply_update(&mut self, update: ProductUpdate) -> DomainResult<()> {
        if let Some(title) = update.title {
            if title.trim().is_empty() {
                return Err(DomainError::validation("title cannot be empty"));
            }
            self.title = title;
        }
        if let Some(category) = update.category {
            if category.trim().is_empty() {
                return Err(DomainError::validation("category cannot be empty"));
            }
            self.category = category;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(code) = update.code {
            self.code = Some(code);
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(available) = update.available {
            self.available = available;
        }
        if let Some(thumbnails) = update.thumbnails {
            self.thumbnails = thumbnails;
        }
        Ok(())
    }

    /// Current stock and price, as the checkout path reads them.
    pub fn quote(&self) -> StockQuote {
        StockQuote {
            stock: self.stock,
            price: self.price,
        }
    }
}

/// Stock and price of a product at a single point in time.
///
/// Read fresh at reconciliation time; never cached across a request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockQuote {
    pub stock: u32,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
}
