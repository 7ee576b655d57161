use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role attached to an account and carried in its tokens.
///
/// Roles are opaque strings at this layer; the API layer decides which
/// roles a route admits. The two roles the system ships with are
/// [`Role::user`] (shoppers) and [`Role::admin`] (catalog managers).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Regular shopper: owns a cart, may purchase.
    pub fn user() -> Self {
        Self(Cow::Borrowed("user"))
    }

    /// Catalog manager: product CRUD, cart listing.
    pub fn admin() -> Self {
        Self(Cow::Borrowed("admin"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
