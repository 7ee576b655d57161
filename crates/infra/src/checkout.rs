//! Checkout reconciler.
//!
//! One checkout is a single logical pass over the cart: every line item is
//! classified fulfilled or unfulfilled against the stock read at that
//! moment, stock is decremented per item with a compare-and-set, one receipt
//! covers the fulfilled subset, and the cart is rewritten to hold exactly
//! the unfulfilled remainder. There is no persisted intermediate state.
//!
//! Failure semantics: a single item's shortfall (or a per-item store error,
//! after one retry) is data; the item lands in the unfulfilled list. Only
//! failing to load the cart or to persist the receipt aborts the call, and
//! neither mutates the cart. Cart replacement runs last, so an interruption
//! beforehand leaves decremented stock with the cart still intact. That is
//! the documented degraded outcome, never a lost line item.

use shopcore_carts::LineItem;
use shopcore_core::{CartId, DomainError, DomainResult};
use shopcore_receipts::Receipt;

use crate::store::{CartStore, InventoryStore, ReceiptStore, StockAdjust};

/// Result of one checkout: the receipt (absent when nothing could be
/// fulfilled) and the unfulfilled items in their original cart order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOutcome {
    pub receipt: Option<Receipt>,
    pub unfulfilled: Vec<LineItem>,
}

/// The reconciler, generic over the store handles it was given.
#[derive(Debug, Clone)]
pub struct CheckoutService<I, C, R> {
    inventory: I,
    carts: C,
    receipts: R,
}

impl<I, C, R> CheckoutService<I, C, R>
where
    I: InventoryStore,
    C: CartStore,
    R: ReceiptStore,
{
    pub fn new(inventory: I, carts: C, receipts: R) -> Self {
        Self {
            inventory,
            carts,
            receipts,
        }
    }

    /// Reconcile one cart into a purchase.
    pub fn checkout(&self, cart_id: CartId, purchaser: &str) -> DomainResult<CheckoutOutcome> {
        let cart = self.carts.get(cart_id)?.ok_or(DomainError::NotFound)?;

        let mut amount: u64 = 0;
        let mut fulfilled_count = 0usize;
        let mut unfulfilled: Vec<LineItem> = Vec::new();

        for item in cart.items().iter().copied() {
            match self.try_fulfill(&item) {
                Some(line_total) => {
                    amount += line_total;
                    fulfilled_count += 1;
                }
                None => unfulfilled.push(item),
            }
        }

        let receipt = if amount > 0 {
            let receipt = Receipt::issue(amount, purchaser)?;
            Some(self.receipts.append(receipt)?)
        } else {
            None
        };

        // Last step: the cart keeps exactly what could not be completed.
        self.carts.replace_items(cart_id, unfulfilled.clone())?;

        tracing::info!(
            cart_id = %cart_id,
            purchaser,
            fulfilled = fulfilled_count,
            unfulfilled = unfulfilled.len(),
            amount,
            "checkout reconciled"
        );

        Ok(CheckoutOutcome { receipt, unfulfilled })
    }

    /// Attempt the read-check-adjust sequence for one line item.
    ///
    /// Returns the line total on success, `None` when the item cannot be
    /// fulfilled. Runs at most twice: the initial attempt plus one retry
    /// after a compare-and-set conflict.
    fn try_fulfill(&self, item: &LineItem) -> Option<u64> {
        for _ in 0..2 {
            let quote = match self.inventory.stock_and_price(item.product_id) {
                Ok(Some(quote)) => quote,
                // Product deleted or missing: skip, do not abort the checkout.
                Ok(None) => return None,
                Err(err) => {
                    tracing::warn!(product_id = %item.product_id, error = %err, "stock read failed");
                    return None;
                }
            };

            if quote.stock < item.quantity {
                return None;
            }

            let new_stock = quote.stock - item.quantity;
            match self
                .inventory
                .adjust_stock(item.product_id, quote.stock, new_stock)
            {
                Ok(StockAdjust::Adjusted) => {
                    return Some(quote.price * u64::from(item.quantity));
                }
                // A concurrent checkout moved the stock; re-read and retry once.
                Ok(StockAdjust::Conflict) => continue,
                Err(err) => {
                    tracing::warn!(product_id = %item.product_id, error = %err, "stock adjust failed");
                    return None;
                }
            }
        }
        None
    }
}
