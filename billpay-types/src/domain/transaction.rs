//! Transaction domain model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::account::AccountId;
use super::card::CardNumber;
use super::money::Money;
use crate::error::DomainError;

/// Length of a transaction identifier.
pub const TRANSACTION_ID_LEN: usize = 16;

/// Unique identifier for a Transaction.
///
/// A sixteen-digit zero-padded decimal string. Ordering the string
/// lexicographically is the same as ordering the ids numerically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// The id assigned when no transaction exists yet.
    pub fn first() -> Self {
        Self::from_sequence(1)
    }

    /// Renders a sequence number as a sixteen-digit zero-padded id.
    pub fn from_sequence(n: u64) -> Self {
        Self(format!("{n:016}"))
    }

    /// Parses a stored identifier.
    ///
    /// A stored id that is not sixteen decimal digits indicates data
    /// corruption and must not be silently recovered from.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.len() != TRANSACTION_ID_LEN || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::CorruptTransactionId(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Returns the next sequential identifier.
    pub fn next(&self) -> Result<Self, DomainError> {
        let n: u64 = self
            .0
            .parse()
            .map_err(|_| DomainError::CorruptTransactionId(self.0.clone()))?;
        Ok(Self::from_sequence(n + 1))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recorded bill-payment transaction.
///
/// Transactions are immutable once created - they represent a historical
/// record of what happened. Every field except id, amount, card number,
/// account and timestamps carries a fixed sentinel value.
#[derive(Debug, Clone)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,
    /// Type code, fixed "02" for bill payment
    pub type_code: String,
    /// Category code, fixed 2
    pub category_code: i32,
    /// Source, fixed "POS TERM"
    pub source: String,
    /// Description, fixed "BILL PAYMENT - ONLINE"
    pub description: String,
    /// Amount paid (the full balance at payment time)
    pub amount: Money,
    /// Card number from the account's cross-reference
    pub card_number: CardNumber,
    pub merchant_id: i64,
    pub merchant_name: String,
    pub merchant_city: String,
    pub merchant_zip: String,
    /// When the payment originated; equal to `process_timestamp`
    pub origin_timestamp: DateTime<Utc>,
    /// When the payment was processed; equal to `origin_timestamp`
    pub process_timestamp: DateTime<Utc>,
    /// The account that was paid off
    pub account_id: AccountId,
    /// Store-owned timestamps
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub const TYPE_CODE: &'static str = "02";
    pub const CATEGORY_CODE: i32 = 2;
    pub const SOURCE: &'static str = "POS TERM";
    pub const DESCRIPTION: &'static str = "BILL PAYMENT - ONLINE";
    pub const MERCHANT_ID: i64 = 999_999_999;
    pub const MERCHANT_NAME: &'static str = "BILL PAYMENT";
    pub const MERCHANT_CITY: &'static str = "N/A";
    pub const MERCHANT_ZIP: &'static str = "N/A";

    /// Creates a new bill-payment transaction.
    ///
    /// A single captured `at` timestamp is used for both the origin and
    /// process timestamps.
    pub fn bill_payment(
        id: TransactionId,
        amount: Money,
        card_number: CardNumber,
        account_id: AccountId,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            type_code: Self::TYPE_CODE.to_string(),
            category_code: Self::CATEGORY_CODE,
            source: Self::SOURCE.to_string(),
            description: Self::DESCRIPTION.to_string(),
            amount,
            card_number,
            merchant_id: Self::MERCHANT_ID,
            merchant_name: Self::MERCHANT_NAME.to_string(),
            merchant_city: Self::MERCHANT_CITY.to_string(),
            merchant_zip: Self::MERCHANT_ZIP.to_string(),
            origin_timestamp: at,
            process_timestamp: at,
            account_id,
            created_at: at,
            updated_at: at,
        }
    }

    /// Reconstructs a transaction from database fields.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: TransactionId,
        type_code: String,
        category_code: i32,
        source: String,
        description: String,
        amount: Money,
        card_number: CardNumber,
        merchant_id: i64,
        merchant_name: String,
        merchant_city: String,
        merchant_zip: String,
        origin_timestamp: DateTime<Utc>,
        process_timestamp: DateTime<Utc>,
        account_id: AccountId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            type_code,
            category_code,
            source,
            description,
            amount,
            card_number,
            merchant_id,
            merchant_name,
            merchant_city,
            merchant_zip,
            origin_timestamp,
            process_timestamp,
            account_id,
            created_at,
            updated_at,
        }
    }
}
