//! Data Transfer Objects (DTOs) for requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, Money, Transaction, TransactionId};

/// Request to pay off the full balance of an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillPaymentRequest {
    /// Account whose balance is paid in full
    pub account_id: String,
    /// Must be explicitly `true`; absent and `false` both reject the payment
    #[serde(default)]
    pub confirm_payment: Option<bool>,
}

/// Response to a balance query.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceResponse {
    /// The stored account identifier
    pub account_id: AccountId,
    /// Current balance, e.g. "100.00"
    pub current_balance: Money,
}

/// Response after a successful bill payment.
#[derive(Debug, Clone, Serialize)]
pub struct BillPaymentResponse {
    /// Identifier of the recorded transaction
    pub transaction_id: TransactionId,
    /// Formatted confirmation, e.g.
    /// "Payment successful. Your Transaction ID is 0000000000000001."
    pub message: String,
    pub account_id: AccountId,
    /// The amount paid (the full pre-payment balance)
    pub payment_amount: Money,
    /// Balance after the payment (exactly "0.00")
    pub new_balance: Money,
}

/// Outcome of the atomic payment unit, produced by the repository.
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    /// The transaction that was inserted
    pub transaction: Transaction,
    /// The balance that was paid off
    pub payment_amount: Money,
    /// The balance after the decrement
    pub new_balance: Money,
}
