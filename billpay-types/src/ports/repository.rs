//! Repository port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (SQLite, in-memory) implement this trait.

use crate::domain::{Account, AccountId, CardCrossReference, CardNumber, Transaction};
use crate::dto::PaymentReceipt;
use crate::error::RepoError;

/// The repository port for the bill-payment stores.
///
/// `submit_payment` is the single atomic unit of work: implementations must
/// commit the transaction insert and the balance decrement together or not
/// at all.
#[async_trait::async_trait]
pub trait BillPaymentRepository: Send + Sync + 'static {
    /// Gets an account by id.
    async fn get_account(&self, id: &AccountId) -> Result<Option<Account>, RepoError>;

    /// Gets the card cross-reference for an account.
    async fn get_card_xref(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<CardCrossReference>, RepoError>;

    /// Gets the most recent transaction, ordered by descending numeric id.
    async fn last_transaction(&self) -> Result<Option<Transaction>, RepoError>;

    /// Pays off the full current balance of the account.
    ///
    /// Inside one store transaction: allocates the next transaction id,
    /// re-reads the balance (rejecting a balance drained by a concurrent
    /// payment with
    /// [`DomainError::NothingToPay`](crate::error::DomainError::NothingToPay)),
    /// inserts the transaction record and zeroes the balance. Store lock
    /// contention and duplicate-id inserts map to the retryable
    /// [`RepoError::Conflict`].
    async fn submit_payment(
        &self,
        account_id: &AccountId,
        card_number: &CardNumber,
    ) -> Result<PaymentReceipt, RepoError>;
}
