//! `shopcore-infra` — store contracts, in-memory stores, and the two core
//! services: the line-item merge engine and the checkout reconciler.

pub mod cart_service;
pub mod checkout;
pub mod store;


pub use cart_service::CartService;
pub use checkout::{CheckoutOutcome, CheckoutService};
pub use store::{
    AccountStore, CartStore, CatalogStore, InventoryStore, ReceiptStore, StockAdjust,
    in_memory::{InMemoryAccountStore, InMemoryCartStore, InMemoryCatalogStore, InMemoryReceiptStore},
};
