//! Error types for the bill-payment service.

/// Domain-level errors (business rule violations).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Amount cannot be negative")]
    NegativeAmount,

    #[error("Insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds { available: i64, requested: i64 },

    #[error("You have nothing to pay...")]
    NothingToPay,

    #[error("Unable to generate new transaction ID: stored id {0:?} is not numeric")]
    CorruptTransactionId(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Entity not found")]
    NotFound,

    /// Retryable write contention (duplicate transaction id or a busy store).
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ValidationError(msg) => AppError::BadRequest(msg),
            DomainError::CorruptTransactionId(_) => AppError::Internal(err.to_string()),
            e => AppError::BadRequest(e.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(e) => e.into(),
            RepoError::NotFound => AppError::NotFound("Resource not found".into()),
            RepoError::Database(e) => AppError::Internal(e),
            RepoError::Transaction(e) => AppError::Internal(e),
            // Surfaced only once the caller has exhausted its retries.
            RepoError::Conflict(e) => AppError::Internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_to_pay_maps_to_bad_request() {
        let err: AppError = RepoError::Domain(DomainError::NothingToPay).into();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "You have nothing to pay..."));
    }

    #[test]
    fn test_corrupt_id_maps_to_internal() {
        let err: AppError = RepoError::Domain(DomainError::CorruptTransactionId("XYZ".into())).into();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_conflict_maps_to_internal() {
        let err: AppError = RepoError::Conflict("duplicate transaction id".into()).into();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
