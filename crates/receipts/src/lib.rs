//! `shopcore-receipts` — immutable purchase receipts.

pub mod receipt;

pub use receipt::Receipt;
