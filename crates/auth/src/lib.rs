//! `shopcore-auth` — authentication boundary: accounts, claims, tokens.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod account;
pub mod claims;
pub mod jwt;
pub mod password;
pub mod roles;

pub use account::{Account, NewAccount};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256Jwt, JwtValidator};
pub use password::PasswordError;
pub use roles::Role;
