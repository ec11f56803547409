//! Database row structs with explicit domain conversions.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use billpay_types::{
    Account, AccountId, CardCrossReference, CardNumber, Money, RepoError, Transaction,
    TransactionId,
};

/// Account row from database.
#[derive(FromRow)]
pub struct DbAccount {
    pub account_id: String,
    pub current_balance: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Card cross-reference row from database.
#[derive(FromRow)]
pub struct DbCardCrossReference {
    pub id: i64,
    pub account_id: String,
    pub card_number: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Transaction row from database.
#[derive(FromRow)]
pub struct DbTransaction {
    pub transaction_id: String,
    pub type_code: String,
    pub category_code: i32,
    pub source: String,
    pub description: String,
    pub amount: i64,
    pub card_number: String,
    pub merchant_id: i64,
    pub merchant_name: String,
    pub merchant_city: String,
    pub merchant_zip: String,
    pub origin_timestamp: String,
    pub process_timestamp: String,
    pub account_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Balance-only row for queries inside the payment transaction.
#[derive(FromRow)]
pub struct DbBalance {
    pub current_balance: i64,
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, RepoError> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepoError::Database(e.to_string()))
}

impl DbAccount {
    /// Convert database row to domain Account.
    pub fn into_domain(self) -> Result<Account, RepoError> {
        let id = AccountId::new(&self.account_id).map_err(RepoError::Domain)?;
        Ok(Account::from_parts(
            id,
            Money::from_minor(self.current_balance),
            parse_timestamp(&self.created_at)?,
            parse_timestamp(&self.updated_at)?,
        ))
    }
}

impl DbCardCrossReference {
    /// Convert database row to domain CardCrossReference.
    pub fn into_domain(self) -> Result<CardCrossReference, RepoError> {
        let account_id = AccountId::new(&self.account_id).map_err(RepoError::Domain)?;
        let card_number = CardNumber::new(&self.card_number).map_err(RepoError::Domain)?;
        Ok(CardCrossReference::from_parts(
            self.id,
            account_id,
            card_number,
            parse_timestamp(&self.created_at)?,
            parse_timestamp(&self.updated_at)?,
        ))
    }
}

impl DbTransaction {
    /// Convert database row to domain Transaction.
    ///
    /// A non-numeric stored id fails here with the corruption error rather
    /// than being silently recovered from.
    pub fn into_domain(self) -> Result<Transaction, RepoError> {
        let id = TransactionId::parse(&self.transaction_id).map_err(RepoError::Domain)?;
        let account_id = AccountId::new(&self.account_id).map_err(RepoError::Domain)?;
        let card_number = CardNumber::new(&self.card_number).map_err(RepoError::Domain)?;

        Ok(Transaction::from_parts(
            id,
            self.type_code,
            self.category_code,
            self.source,
            self.description,
            Money::from_minor(self.amount),
            card_number,
            self.merchant_id,
            self.merchant_name,
            self.merchant_city,
            self.merchant_zip,
            parse_timestamp(&self.origin_timestamp)?,
            parse_timestamp(&self.process_timestamp)?,
            account_id,
            parse_timestamp(&self.created_at)?,
            parse_timestamp(&self.updated_at)?,
        ))
    }
}
