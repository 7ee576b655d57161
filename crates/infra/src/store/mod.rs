//! Store contracts the services are written against.
//!
//! The core is indifferent to the concrete storage technology; these traits
//! are the whole contract. Each method is atomic with respect to the record
//! it touches, and operations on the same cart serialize at the store layer.

use std::sync::Arc;

use shopcore_auth::Account;
use shopcore_carts::{Cart, LineItem};
use shopcore_catalog::{PageRequest, PriceSort, Product, ProductFilter, ProductPage, ProductUpdate, StockQuote};
use shopcore_core::{AccountId, CartId, DomainResult, ProductId, ReceiptId};
use shopcore_receipts::Receipt;

pub mod in_memory;

/// Outcome of a conditional stock adjustment.
///
/// `Conflict` is data, not an error: the caller re-reads and retries or
/// gives the item up.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StockAdjust {
    /// The expected value matched; the new stock is committed.
    Adjusted,
    /// Another writer changed the stock since it was read.
    Conflict,
}

/// Catalog CRUD + listing.
pub trait CatalogStore: Send + Sync {
    fn insert(&self, product: Product) -> DomainResult<Product>;
    fn get(&self, id: ProductId) -> DomainResult<Option<Product>>;
    /// Apply a partial update. `NotFound` when the product does not exist.
    fn update(&self, id: ProductId, update: ProductUpdate) -> DomainResult<Product>;
    fn delete(&self, id: ProductId) -> DomainResult<()>;
    fn page(
        &self,
        filter: &ProductFilter,
        sort: PriceSort,
        request: PageRequest,
    ) -> DomainResult<ProductPage>;
}

/// The narrow inventory contract the checkout reconciler consumes.
pub trait InventoryStore: Send + Sync {
    /// Current stock and price. `Ok(None)` when the product no longer resolves.
    fn stock_and_price(&self, id: ProductId) -> DomainResult<Option<StockQuote>>;

    /// Compare-and-set the stock: applies `new` only while the current value
    /// still equals `expected`.
    fn adjust_stock(&self, id: ProductId, expected: u32, new: u32) -> DomainResult<StockAdjust>;
}

/// Cart persistence.
///
/// `increment_line` and `insert_line` together form the merge engine's
/// conditional-update-then-fallback pair; both run atomically under the
/// store's cart lock, and `insert_line` merges if a line for the product
/// appeared in the meantime (the uniqueness backstop).
pub trait CartStore: Send + Sync {
    fn create(&self) -> DomainResult<Cart>;
    fn get(&self, id: CartId) -> DomainResult<Option<Cart>>;
    fn list(&self) -> DomainResult<Vec<Cart>>;

    /// Increment an existing line's quantity. `Ok(None)` when the cart has no
    /// line for the product; `NotFound` when the cart itself is missing.
    fn increment_line(&self, id: CartId, product_id: ProductId, by: u32)
    -> DomainResult<Option<Cart>>;

    /// Insert a line, merging quantities if one already exists.
    fn insert_line(&self, id: CartId, line: LineItem) -> DomainResult<Cart>;

    /// Overwrite a line's quantity. `NotFound` when cart or line is missing.
    fn set_line_quantity(
        &self,
        id: CartId,
        product_id: ProductId,
        quantity: u32,
    ) -> DomainResult<Cart>;

    /// Remove a line if present.
    fn remove_line(&self, id: CartId, product_id: ProductId) -> DomainResult<Cart>;

    /// Replace the cart's items wholesale (checkout's final step).
    fn replace_items(&self, id: CartId, items: Vec<LineItem>) -> DomainResult<Cart>;

    fn clear(&self, id: CartId) -> DomainResult<Cart>;
}

/// Receipt persistence; code uniqueness is enforced here.
pub trait ReceiptStore: Send + Sync {
    fn append(&self, receipt: Receipt) -> DomainResult<Receipt>;
    fn get(&self, id: ReceiptId) -> DomainResult<Option<Receipt>>;
    fn list_for(&self, purchaser: &str) -> DomainResult<Vec<Receipt>>;
}

/// Customer account persistence; email uniqueness is enforced here.
pub trait AccountStore: Send + Sync {
    fn insert(&self, account: Account) -> DomainResult<Account>;
    fn get(&self, id: AccountId) -> DomainResult<Option<Account>>;
    fn find_by_email(&self, email: &str) -> DomainResult<Option<Account>>;
}

// Shared handles: services hold `Arc`ed stores.

impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    fn stock_and_price(&self, id: ProductId) -> DomainResult<Option<StockQuote>> {
        (**self).stock_and_price(id)
    }

    fn adjust_stock(&self, id: ProductId, expected: u32, new: u32) -> DomainResult<StockAdjust> {
        (**self).adjust_stock(id, expected, new)
    }
}

impl<S> CartStore for Arc<S>
where
    S: CartStore + ?Sized,
{
    fn create(&self) -> DomainResult<Cart> {
        (**self).create()
    }

    fn get(&self, id: CartId) -> DomainResult<Option<Cart>> {
        (**self).get(id)
    }

    fn list(&self) -> DomainResult<Vec<Cart>> {
        (**self).list()
    }

    fn increment_line(
        &self,
        id: CartId,
        product_id: ProductId,
        by: u32,
    ) -> DomainResult<Option<Cart>> {
        (**self).increment_line(id, product_id, by)
    }

    fn insert_line(&self, id: CartId, line: LineItem) -> DomainResult<Cart> {
        (**self).insert_line(id, line)
    }

    fn set_line_quantity(
        &self,
        id: CartId,
        product_id: ProductId,
        quantity: u32,
    ) -> DomainResult<Cart> {
        (**self).set_line_quantity(id, product_id, quantity)
    }

    fn remove_line(&self, id: CartId, product_id: ProductId) -> DomainResult<Cart> {
        (**self).remove_line(id, product_id)
    }

    fn replace_items(&self, id: CartId, items: Vec<LineItem>) -> DomainResult<Cart> {
        (**self).replace_items(id, items)
    }

    fn clear(&self, id: CartId) -> DomainResult<Cart> {
        (**self).clear(id)
    }
}

impl<S> ReceiptStore for Arc<S>
where
    S: ReceiptStore + ?Sized,
{
    fn append(&self, receipt: Receipt) -> DomainResult<Receipt> {
        (**self).append(receipt)
    }

    fn get(&self, id: ReceiptId) -> DomainResult<Option<Receipt>> {
        (**self).get(id)
    }

    fn list_for(&self, purchaser: &str) -> DomainResult<Vec<Receipt>> {
        (**self).list_for(purchaser)
    }
}
