//! In-memory stores for tests and single-process deployments.
//!
//! Every store keeps its records behind one `RwLock`; a poisoned lock
//! surfaces as `DomainError::Storage`. The cart store's single write lock is
//! what serializes operations on the same cart.

use std::collections::HashMap;
use std::sync::RwLock;

use shopcore_auth::Account;
use shopcore_carts::{Cart, LineItem};
use shopcore_catalog::{
    PageRequest, PriceSort, Product, ProductFilter, ProductPage, ProductUpdate, StockQuote, listing,
};
use shopcore_core::{AccountId, CartId, DomainError, DomainResult, ProductId, ReceiptId};
use shopcore_receipts::Receipt;

use super::{
    AccountStore, CartStore, CatalogStore, InventoryStore, ReceiptStore, StockAdjust,
};

fn poisoned(store: &str) -> DomainError {
    DomainError::storage(format!("{store} store lock poisoned"))
}

/// Products live in insertion order, which is the unsorted listing order.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    inner: RwLock<Vec<Product>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn insert(&self, product: Product) -> DomainResult<Product> {
        let mut products = self.inner.write().map_err(|_| poisoned("catalog"))?;
        products.push(product.clone());
        Ok(product)
    }

    fn get(&self, id: ProductId) -> DomainResult<Option<Product>> {
        let products = self.inner.read().map_err(|_| poisoned("catalog"))?;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    fn update(&self, id: ProductId, update: ProductUpdate) -> DomainResult<Product> {
        let mut products = self.inner.write().map_err(|_| poisoned("catalog"))?;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DomainError::NotFound)?;

        // Apply against a copy so a failed validation commits nothing.
        let mut updated = product.clone();
        updated.apply_update(update)?;
        *product = updated.clone();
        Ok(updated)
    }

    fn delete(&self, id: ProductId) -> DomainResult<()> {
        let mut products = self.inner.write().map_err(|_| poisoned("catalog"))?;
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    fn page(
        &self,
        filter: &ProductFilter,
        sort: PriceSort,
        request: PageRequest,
    ) -> DomainResult<ProductPage> {
        let products = self.inner.read().map_err(|_| poisoned("catalog"))?;
        Ok(listing::paginate(products.clone(), filter, sort, request))
    }
}

impl InventoryStore for InMemoryCatalogStore {
    fn stock_and_price(&self, id: ProductId) -> DomainResult<Option<StockQuote>> {
        let products = self.inner.read().map_err(|_| poisoned("catalog"))?;
        Ok(products.iter().find(|p| p.id == id).map(Product::quote))
    }

    fn adjust_stock(&self, id: ProductId, expected: u32, new: u32) -> DomainResult<StockAdjust> {
        let mut products = self.inner.write().map_err(|_| poisoned("catalog"))?;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DomainError::NotFound)?;

        if product.stock != expected {
            return Ok(StockAdjust::Conflict);
        }
        product.stock = new;
        Ok(StockAdjust::Adjusted)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    inner: RwLock<HashMap<CartId, Cart>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a closure against one cart under the write lock.
    fn with_cart<T>(
        &self,
        id: CartId,
        f: impl FnOnce(&mut Cart) -> DomainResult<T>,
    ) -> DomainResult<T> {
        let mut carts = self.inner.write().map_err(|_| poisoned("cart"))?;
        let cart = carts.get_mut(&id).ok_or(DomainError::NotFound)?;
        f(cart)
    }
}

impl CartStore for InMemoryCartStore {
    fn create(&self) -> DomainResult<Cart> {
        let mut carts = self.inner.write().map_err(|_| poisoned("cart"))?;
        let cart = Cart::new(CartId::new());
        carts.insert(cart.id, cart.clone());
        Ok(cart)
    }

    fn get(&self, id: CartId) -> DomainResult<Option<Cart>> {
        let carts = self.inner.read().map_err(|_| poisoned("cart"))?;
        Ok(carts.get(&id).cloned())
    }

    fn list(&self) -> DomainResult<Vec<Cart>> {
        let carts = self.inner.read().map_err(|_| poisoned("cart"))?;
        Ok(carts.values().cloned().collect())
    }

    fn increment_line(
        &self,
        id: CartId,
        product_id: ProductId,
        by: u32,
    ) -> DomainResult<Option<Cart>> {
        self.with_cart(id, |cart| {
            if cart.increment_line(product_id, by) {
                Ok(Some(cart.clone()))
            } else {
                Ok(None)
            }
        })
    }

    fn insert_line(&self, id: CartId, line: LineItem) -> DomainResult<Cart> {
        self.with_cart(id, |cart| {
            cart.merge_line(line);
            Ok(cart.clone())
        })
    }

    fn set_line_quantity(
        &self,
        id: CartId,
        product_id: ProductId,
        quantity: u32,
    ) -> DomainResult<Cart> {
        self.with_cart(id, |cart| {
            cart.set_line_quantity(product_id, quantity)?;
            Ok(cart.clone())
        })
    }

    fn remove_line(&self, id: CartId, product_id: ProductId) -> DomainResult<Cart> {
        self.with_cart(id, |cart| {
            cart.remove_line(product_id);
            Ok(cart.clone())
        })
    }

    fn replace_items(&self, id: CartId, items: Vec<LineItem>) -> DomainResult<Cart> {
        self.with_cart(id, |cart| {
            cart.replace_items(items)?;
            Ok(cart.clone())
        })
    }

    fn clear(&self, id: CartId) -> DomainResult<Cart> {
        self.with_cart(id, |cart| {
            cart.clear();
            Ok(cart.clone())
        })
    }
}

#[derive(Debug, Default)]
pub struct InMemoryReceiptStore {
    inner: RwLock<Vec<Receipt>>,
}

impl InMemoryReceiptStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReceiptStore for InMemoryReceiptStore {
    fn append(&self, receipt: Receipt) -> DomainResult<Receipt> {
        let mut receipts = self.inner.write().map_err(|_| poisoned("receipt"))?;
        if receipts.iter().any(|r| r.code == receipt.code) {
            return Err(DomainError::conflict(format!(
                "receipt code {} already exists",
                receipt.code
            )));
        }
        receipts.push(receipt.clone());
        Ok(receipt)
    }

    fn get(&self, id: ReceiptId) -> DomainResult<Option<Receipt>> {
        let receipts = self.inner.read().map_err(|_| poisoned("receipt"))?;
        Ok(receipts.iter().find(|r| r.id == id).cloned())
    }

    fn list_for(&self, purchaser: &str) -> DomainResult<Vec<Receipt>> {
        let receipts = self.inner.read().map_err(|_| poisoned("receipt"))?;
        Ok(receipts
            .iter()
            .filter(|r| r.purchaser == purchaser)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    inner: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn insert(&self, account: Account) -> DomainResult<Account> {
        let mut accounts = self.inner.write().map_err(|_| poisoned("account"))?;
        if accounts
            .values()
            .any(|a| a.email.eq_ignore_ascii_case(&account.email))
        {
            return Err(DomainError::conflict("account already exists"));
        }
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    fn get(&self, id: AccountId) -> DomainResult<Option<Account>> {
        let accounts = self.inner.read().map_err(|_| poisoned("account"))?;
        Ok(accounts.get(&id).cloned())
    }

    fn find_by_email(&self, email: &str) -> DomainResult<Option<Account>> {
        let accounts = self.inner.read().map_err(|_| poisoned("account"))?;
        Ok(accounts
            .values()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}
