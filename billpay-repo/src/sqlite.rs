//! SQLite repository adapter.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use billpay_types::{
    Account, AccountId, BillPaymentRepository, CardCrossReference, CardNumber, DomainError, Money,
    PaymentReceipt, RepoError, Transaction, TransactionId,
};

use crate::types::{DbAccount, DbBalance, DbCardCrossReference, DbTransaction};

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent()
                    && !parent.as_os_str().is_empty()
                {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        let ddl = include_str!("../migrations/0001_create_tables.sql");
        sqlx::raw_sql(ddl).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn db_err(e: sqlx::Error) -> RepoError {
    RepoError::Database(e.to_string())
}

/// SQLITE_BUSY and its extended result codes share the low byte (5).
fn is_busy(db: &dyn sqlx::error::DatabaseError) -> bool {
    db.code()
        .and_then(|code| code.parse::<u32>().ok())
        .is_some_and(|code| code & 0xFF == 5)
}

/// Maps lock contention to the retryable conflict error.
fn contended_err(e: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db) = &e
        && is_busy(db.as_ref())
    {
        return RepoError::Conflict(format!("database busy: {db}"));
    }
    RepoError::Database(e.to_string())
}

/// Maps a duplicate transaction id to the retryable conflict error.
fn insert_err(e: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db) = &e
        && db.is_unique_violation()
    {
        return RepoError::Conflict(format!("duplicate transaction id: {db}"));
    }
    contended_err(e)
}

#[async_trait]
impl BillPaymentRepository for SqliteRepo {
    async fn get_account(&self, id: &AccountId) -> Result<Option<Account>, RepoError> {
        let row: Option<DbAccount> = sqlx::query_as(
            r#"SELECT account_id, current_balance, created_at, updated_at
               FROM accounts WHERE account_id = ?"#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(DbAccount::into_domain).transpose()
    }

    async fn get_card_xref(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<CardCrossReference>, RepoError> {
        let row: Option<DbCardCrossReference> = sqlx::query_as(
            r#"SELECT id, account_id, card_number, created_at, updated_at
               FROM card_cross_references WHERE account_id = ?"#,
        )
        .bind(account_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(DbCardCrossReference::into_domain).transpose()
    }

    async fn last_transaction(&self) -> Result<Option<Transaction>, RepoError> {
        // Ids are fixed-width zero-padded, so lexicographic order is numeric order.
        let row: Option<DbTransaction> = sqlx::query_as(
            r#"SELECT transaction_id, type_code, category_code, source, description,
                      amount, card_number, merchant_id, merchant_name, merchant_city,
                      merchant_zip, origin_timestamp, process_timestamp, account_id,
                      created_at, updated_at
               FROM transactions ORDER BY transaction_id DESC LIMIT 1"#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(DbTransaction::into_domain).transpose()
    }

    async fn submit_payment(
        &self,
        account_id: &AccountId,
        card_number: &CardNumber,
    ) -> Result<PaymentReceipt, RepoError> {
        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        // Allocate the next id from the single-row sequence. Running this
        // write first takes the store's write lock for the whole unit, so
        // concurrent submits queue here instead of failing a later lock
        // upgrade. Flooring against the transactions table keeps ids
        // monotonic when rows were loaded out of band. Rolling back undoes
        // the bump on every failure path below.
        let (next_id,): (i64,) = sqlx::query_as(
            r#"UPDATE transaction_sequence
               SET last_id = MAX(last_id, COALESCE((SELECT MAX(CAST(transaction_id AS INTEGER)) FROM transactions), 0)) + 1
               WHERE id = 1
               RETURNING last_id"#,
        )
        .fetch_one(&mut *db_tx)
        .await
        .map_err(contended_err)?;

        // Re-read the balance under the write lock; a concurrent payment may
        // have drained it since the service's validation pass.
        let row: Option<DbBalance> =
            sqlx::query_as(r#"SELECT current_balance FROM accounts WHERE account_id = ?"#)
                .bind(account_id.as_str())
                .fetch_optional(&mut *db_tx)
                .await
                .map_err(db_err)?;

        let balance = row.ok_or(RepoError::NotFound)?.current_balance;
        if balance <= 0 {
            return Err(RepoError::Domain(DomainError::NothingToPay));
        }
        let payment_amount = Money::from_minor(balance);

        let now = Utc::now();
        let transaction = Transaction::bill_payment(
            TransactionId::from_sequence(next_id as u64),
            payment_amount,
            card_number.clone(),
            account_id.clone(),
            now,
        );

        let now_str = now.to_rfc3339();
        sqlx::query(
            r#"INSERT INTO transactions (transaction_id, type_code, category_code, source,
                   description, amount, card_number, merchant_id, merchant_name, merchant_city,
                   merchant_zip, origin_timestamp, process_timestamp, account_id, created_at,
                   updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(transaction.id.as_str())
        .bind(&transaction.type_code)
        .bind(transaction.category_code)
        .bind(&transaction.source)
        .bind(&transaction.description)
        .bind(transaction.amount.minor())
        .bind(transaction.card_number.as_str())
        .bind(transaction.merchant_id)
        .bind(&transaction.merchant_name)
        .bind(&transaction.merchant_city)
        .bind(&transaction.merchant_zip)
        .bind(&now_str)
        .bind(&now_str)
        .bind(transaction.account_id.as_str())
        .bind(&now_str)
        .bind(&now_str)
        .execute(&mut *db_tx)
        .await
        .map_err(insert_err)?;

        sqlx::query(
            r#"UPDATE accounts SET current_balance = current_balance - ?, updated_at = ?
               WHERE account_id = ?"#,
        )
        .bind(payment_amount.minor())
        .bind(&now_str)
        .bind(account_id.as_str())
        .execute(&mut *db_tx)
        .await
        .map_err(db_err)?;

        db_tx.commit().await.map_err(contended_err)?;

        tracing::debug!(
            transaction_id = %transaction.id,
            account_id = %account_id,
            amount = %payment_amount,
            "bill payment committed"
        );

        let new_balance = Money::from_minor(balance - payment_amount.minor());
        Ok(PaymentReceipt {
            transaction,
            payment_amount,
            new_balance,
        })
    }
}
