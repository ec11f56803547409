//! Card cross-reference domain model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::account::AccountId;
use crate::error::DomainError;

/// Length of a card number.
pub const CARD_NUMBER_LEN: usize = 16;

/// A sixteen-character card number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CardNumber(String);

impl CardNumber {
    /// Validates and creates a CardNumber.
    pub fn new(raw: &str) -> Result<Self, DomainError> {
        if raw.len() != CARD_NUMBER_LEN {
            return Err(DomainError::ValidationError(format!(
                "Card number must be exactly {CARD_NUMBER_LEN} characters"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// Returns the card number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CardNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maps an account to its associated card.
///
/// Read-only to the payment workflow; at most one cross-reference exists per
/// account.
#[derive(Debug, Clone)]
pub struct CardCrossReference {
    /// Surrogate identifier
    pub id: i64,
    /// The account this cross-reference belongs to (unique)
    pub account_id: AccountId,
    /// Card number associated with the account
    pub card_number: CardNumber,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CardCrossReference {
    /// Creates a cross-reference with all fields specified (for database reconstruction).
    pub fn from_parts(
        id: i64,
        account_id: AccountId,
        card_number: CardNumber,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            account_id,
            card_number,
            created_at,
            updated_at,
        }
    }
}
