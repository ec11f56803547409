//! Domain models for the bill-payment service.

pub mod account;
pub mod card;
pub mod money;
pub mod transaction;

pub use account::{Account, AccountId};
pub use card::{CardCrossReference, CardNumber};
pub use money::Money;
pub use transaction::{Transaction, TransactionId};
