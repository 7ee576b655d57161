//! Line-item merge engine.
//!
//! Adding a product to a cart merges into an existing line or inserts a new
//! one, without ever producing two lines for the same product. The ordering
//! requirement: the conditional increment runs first, and insertion is only
//! the fallback for the no-line-matched case. Both halves execute atomically
//! inside the cart store, which also enforces line uniqueness on insert.

use shopcore_carts::{Cart, LineItem};
use shopcore_core::{CartId, DomainError, DomainResult, ProductId};

use crate::store::CartStore;

/// The merge engine, generic over the cart store handle it was given.
#[derive(Debug, Clone)]
pub struct CartService<S> {
    carts: S,
}

impl<S: CartStore> CartService<S> {
    pub fn new(carts: S) -> Self {
        Self { carts }
    }

    /// Merge `increment_by` units of a product into the cart.
    ///
    /// Returns the full updated cart. `NotFound` when the cart does not
    /// exist; zero increments are rejected up front.
    pub fn add_line_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        increment_by: u32,
    ) -> DomainResult<Cart> {
        if increment_by == 0 {
            return Err(DomainError::validation("increment must be >= 1"));
        }

        if let Some(cart) = self.carts.increment_line(cart_id, product_id, increment_by)? {
            return Ok(cart);
        }

        // No existing line matched; fall back to insertion. The store merges
        // if a concurrent add created the line between the two calls.
        let cart = self
            .carts
            .insert_line(cart_id, LineItem::new(product_id, increment_by)?)?;

        tracing::debug!(
            cart_id = %cart_id,
            product_id = %product_id,
            quantity = increment_by,
            "inserted new cart line"
        );
        Ok(cart)
    }
}
