use shopcore_auth::Role;
use shopcore_core::AccountId;

/// Authenticated identity for a request, derived from the bearer token.
///
/// The email is the purchaser identity the checkout reconciler records on
/// receipts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    account_id: AccountId,
    email: String,
    role: Role,
}

impl AuthContext {
    pub fn new(account_id: AccountId, email: String, role: Role) -> Self {
        Self {
            account_id,
            email,
            role,
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> &Role {
        &self.role
    }
}
