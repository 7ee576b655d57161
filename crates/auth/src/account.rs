use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopcore_core::{AccountId, DomainError, DomainResult};

use crate::password::{self, PasswordError};
use crate::roles::Role;

/// A registered customer account.
///
/// `password_hash` is an Argon2id PHC string; the cleartext never leaves
/// [`Account::register`] / [`Account::verify_password`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: Option<u8>,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Registration input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: Option<u8>,
    pub password: String,
}

impl Account {
    /// Validate registration input and hash the password.
    ///
    /// Every self-registered account gets the `user` role; admin accounts
    /// are provisioned out of band.
    pub fn register(id: AccountId, input: NewAccount) -> DomainResult<Self> {
        if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
            return Err(DomainError::validation("first and last name are required"));
        }
        if !input.email.contains('@') {
            return Err(DomainError::validation("email is not valid"));
        }

        password::check_strength(&input.password).map_err(password_error)?;
        let password_hash = password::hash_password(&input.password).map_err(password_error)?;

        Ok(Self {
            id,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            age: input.age,
            password_hash,
            role: Role::user(),
            created_at: Utc::now(),
        })
    }

    pub fn verify_password(&self, password: &str) -> bool {
        password::verify_password(password, &self.password_hash).unwrap_or(false)
    }
}

fn password_error(err: PasswordError) -> DomainError {
    match err {
        PasswordError::Weak(msg) => DomainError::validation(msg),
        PasswordError::InvalidHash | PasswordError::Hashing => {
            DomainError::storage("password hashing failed")
        }
    }
}
