//! # Billpay Repository
//!
//! Concrete repository adapter for the bill-payment service.
//! This crate provides the SQLite adapter that implements the
//! `BillPaymentRepository` port.

mod types;

pub mod sqlite;

#[cfg(test)]
mod sqlite_tests;

pub use sqlite::SqliteRepo;

/// Build and initialize a repository from a database URL.
///
/// This function:
/// 1. Connects to the database
/// 2. Runs migrations to create tables
/// 3. Returns a ready-to-use repository
///
/// # Examples
///
/// ```ignore
/// let repo = build_repo("sqlite://billpay.db?mode=rwc").await?;
/// ```
pub async fn build_repo(database_url: &str) -> anyhow::Result<SqliteRepo> {
    SqliteRepo::new(database_url).await
}
