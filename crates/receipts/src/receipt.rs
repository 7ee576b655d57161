use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shopcore_core::{DomainError, DomainResult, ReceiptId};

/// Record of a completed (possibly partial) purchase.
///
/// Immutable once created. Created only when at least one line item of the
/// checkout was fulfilled, which is why `amount` is strictly positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: ReceiptId,
    /// Globally unique purchase code, handed to the customer.
    pub code: String,
    /// Total in smallest currency unit (sum of price × quantity over the
    /// fulfilled items).
    pub amount: u64,
    /// Purchaser identity (account email).
    pub purchaser: String,
    pub created_at: DateTime<Utc>,
}

impl Receipt {
    /// Issue a receipt with a freshly generated code.
    pub fn issue(amount: u64, purchaser: impl Into<String>) -> DomainResult<Self> {
        let purchaser = purchaser.into();
        if amount == 0 {
            return Err(DomainError::validation(
                "a receipt covers at least one fulfilled item",
            ));
        }
        if purchaser.trim().is_empty() {
            return Err(DomainError::validation("purchaser cannot be empty"));
        }

        Ok(Self {
            id: ReceiptId::new(),
            code: Uuid::new_v4().to_string(),
            amount,
            purchaser,
            created_at: Utc::now(),
        })
    }
}
