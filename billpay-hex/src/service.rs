//! Bill Payment Application Service
//!
//! Orchestrates the payment workflow through the repository port:
//! ordered fail-fast validation, lookups, and the atomic payment unit.
//! Contains NO infrastructure logic.

use billpay_types::{
    AccountId, AppError, BalanceResponse, BillPaymentRepository, BillPaymentResponse, CardNumber,
    PaymentReceipt, RepoError,
};

/// Attempts for the atomic payment unit when the store reports contention.
const MAX_SUBMIT_ATTEMPTS: u32 = 3;

/// Application service for the bill-payment operations.
///
/// Generic over `R: BillPaymentRepository` - the adapter is injected at
/// compile time, which enables testing with an in-memory repo.
pub struct BillPaymentService<R: BillPaymentRepository> {
    repo: R,
}

impl<R: BillPaymentRepository> BillPaymentService<R> {
    /// Creates a new service with the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Returns the stored account id and current balance. No side effects.
    pub async fn get_balance(&self, account_id: &str) -> Result<BalanceResponse, AppError> {
        if account_id.trim().is_empty() {
            return Err(AppError::BadRequest("Account ID cannot be empty".into()));
        }
        let id = AccountId::new(account_id)?;

        let account = self
            .repo
            .get_account(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("Account ID NOT found...".into()))?;

        Ok(BalanceResponse {
            account_id: account.id,
            current_balance: account.current_balance,
        })
    }

    /// Pays off the full current balance of the account.
    ///
    /// Checks run in a fixed order and the first failure wins:
    /// blank id, missing confirmation, unknown account, nothing to pay,
    /// missing card cross-reference. Only then is the atomic payment unit
    /// submitted.
    pub async fn process_payment(
        &self,
        account_id: &str,
        confirm_payment: Option<bool>,
    ) -> Result<BillPaymentResponse, AppError> {
        if account_id.trim().is_empty() {
            return Err(AppError::BadRequest("Account ID cannot be empty".into()));
        }
        if confirm_payment != Some(true) {
            return Err(AppError::BadRequest(
                "Confirm to make a bill payment...".into(),
            ));
        }
        let id = AccountId::new(account_id)?;

        let account = self
            .repo
            .get_account(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("Account ID NOT found...".into()))?;

        if !account.current_balance.is_payable() {
            return Err(AppError::BadRequest("You have nothing to pay...".into()));
        }

        let xref = self
            .repo
            .get_card_xref(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("Unable to lookup XREF AIX file...".into()))?;

        let receipt = self.submit_with_retry(&id, &xref.card_number).await?;

        let message = format!(
            "Payment successful. Your Transaction ID is {}.",
            receipt.transaction.id
        );

        Ok(BillPaymentResponse {
            transaction_id: receipt.transaction.id.clone(),
            message,
            account_id: account.id,
            payment_amount: receipt.payment_amount,
            new_balance: receipt.new_balance,
        })
    }

    /// Submits the atomic payment unit, retrying a bounded number of times
    /// when it raced with another payment. A retried pass re-reads the
    /// balance, so a payment that lost the race resolves to "nothing to pay".
    async fn submit_with_retry(
        &self,
        id: &AccountId,
        card_number: &CardNumber,
    ) -> Result<PaymentReceipt, AppError> {
        let mut attempt = 1;
        loop {
            match self.repo.submit_payment(id, card_number).await {
                Err(RepoError::Conflict(reason)) if attempt < MAX_SUBMIT_ATTEMPTS => {
                    tracing::warn!(attempt, %reason, "payment submit contended, retrying");
                    attempt += 1;
                }
                other => return other.map_err(Into::into),
            }
        }
    }
}
