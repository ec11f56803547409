//! Account domain model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::money::Money;
use crate::error::DomainError;

/// Maximum length of an account identifier.
pub const MAX_ACCOUNT_ID_LEN: usize = 11;

/// Unique identifier for an Account.
///
/// A trimmed, non-empty string of at most eleven characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Validates and creates an AccountId from raw input.
    ///
    /// # Validation
    /// - Trimmed value cannot be empty
    /// - At most [`MAX_ACCOUNT_ID_LEN`] characters
    pub fn new(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::ValidationError(
                "Account ID cannot be empty".into(),
            ));
        }
        if trimmed.len() > MAX_ACCOUNT_ID_LEN {
            return Err(DomainError::ValidationError(format!(
                "Account ID must be at most {MAX_ACCOUNT_ID_LEN} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AccountId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A financial account holding a payable balance.
///
/// Accounts pre-exist this service; the payment workflow only ever reads them
/// and decrements their balance. Timestamps are owned by the store.
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,
    /// Current balance
    pub current_balance: Money,
    /// When the account was created (store-owned)
    pub created_at: DateTime<Utc>,
    /// When the account was last modified (store-owned)
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates an account with all fields specified (for database reconstruction).
    pub fn from_parts(
        id: AccountId,
        current_balance: Money,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            current_balance,
            created_at,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_trims_input() {
        let id = AccountId::new("  00000000001  ").unwrap();
        assert_eq!(id.as_str(), "00000000001");
    }

    #[test]
    fn test_empty_account_id_fails() {
        let result = AccountId::new("   ");
        assert!(
            matches!(result, Err(DomainError::ValidationError(msg)) if msg == "Account ID cannot be empty")
        );
    }

    #[test]
    fn test_account_id_max_length() {
        assert!(AccountId::new("00000000001").is_ok());
        assert!(matches!(
            AccountId::new("000000000012"),
            Err(DomainError::ValidationError(_))
        ));
    }
}
