//! `shopcore-carts` — cart and line-item domain types.

pub mod cart;

pub use cart::{Cart, LineItem};
