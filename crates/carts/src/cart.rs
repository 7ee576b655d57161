use serde::{Deserialize, Serialize};

use shopcore_core::{CartId, DomainError, DomainResult, ProductId};

/// One (product, quantity) pairing inside a cart.
///
/// The product reference is non-owning: price and stock are read fresh from
/// inventory at checkout time, never embedded here.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl LineItem {
    pub fn new(product_id: ProductId, quantity: u32) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be >= 1"));
        }
        Ok(Self {
            product_id,
            quantity,
        })
    }
}

/// A customer cart.
///
/// # Invariants
/// - At most one `LineItem` per distinct `ProductId`.
/// - Every line quantity is >= 1.
///
/// All mutation goes through the methods below; they are the uniqueness
/// backstop the store layer relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    items: Vec<LineItem>,
}

impl Cart {
    /// A new, empty cart.
    pub fn new(id: CartId) -> Self {
        Self {
            id,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn line(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|l| l.product_id == product_id)
    }

    /// Increment the quantity of an existing line. Returns `false` when no
    /// line for the product exists (the caller then falls back to insertion).
    pub fn increment_line(&mut self, product_id: ProductId, by: u32) -> bool {
        match self.items.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity += by;
                true
            }
            None => false,
        }
    }

    /// Merge a line into the cart: increment on collision, append otherwise.
    ///
    /// This is the only insertion path, so a duplicate line cannot appear
    /// even when two callers race on an absent product.
    pub fn merge_line(&mut self, line: LineItem) {
        if !self.increment_line(line.product_id, line.quantity) {
            self.items.push(line);
        }
    }

    /// Overwrite the quantity of an existing line.
    pub fn set_line_quantity(&mut self, product_id: ProductId, quantity: u32) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be >= 1"));
        }
        match self.items.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = quantity;
                Ok(())
            }
            None => Err(DomainError::NotFound),
        }
    }

    /// Remove a line. Returns `false` when no line for the product exists.
    pub fn remove_line(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|l| l.product_id != product_id);
        self.items.len() < before
    }

    /// Replace the item list wholesale (checkout writes the unfulfilled
    /// remainder through this), re-validating both cart invariants.
    pub fn replace_items(&mut self, items: Vec<LineItem>) -> DomainResult<()> {
        for (i, line) in items.iter().enumerate() {
            if line.quantity == 0 {
                return Err(DomainError::validation("quantity must be >= 1"));
            }
            if items[..i].iter().any(|l| l.product_id == line.product_id) {
                return Err(DomainError::conflict(format!(
                    "duplicate line item for product {}",
                    line.product_id
                )));
            }
        }
        self.items = items;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
