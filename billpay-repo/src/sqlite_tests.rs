//! SQLite repository integration tests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use billpay_types::{
        AccountId, BillPaymentRepository, CardNumber, DomainError, RepoError, Transaction,
    };
    use chrono::Utc;

    use crate::SqliteRepo;

    async fn setup_repo() -> SqliteRepo {
        SqliteRepo::new("sqlite::memory:").await.unwrap()
    }

    async fn seed_account(repo: &SqliteRepo, account_id: &str, balance_minor: i64) {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO accounts (account_id, current_balance, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(account_id)
        .bind(balance_minor)
        .bind(&now)
        .bind(&now)
        .execute(repo.pool())
        .await
        .unwrap();
    }

    async fn seed_xref(repo: &SqliteRepo, account_id: &str, card_number: &str) {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO card_cross_references (account_id, card_number, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(account_id)
        .bind(card_number)
        .bind(&now)
        .bind(&now)
        .execute(repo.pool())
        .await
        .unwrap();
    }

    /// Inserts a transaction row directly, bypassing the allocator.
    async fn seed_transaction(repo: &SqliteRepo, transaction_id: &str, account_id: &str) {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO transactions (transaction_id, type_code, category_code, source, description, \
             amount, card_number, merchant_id, merchant_name, merchant_city, merchant_zip, \
             origin_timestamp, process_timestamp, account_id, created_at, updated_at) \
             VALUES (?, '02', 2, 'POS TERM', 'BILL PAYMENT - ONLINE', 100, '1234567812345678', \
             999999999, 'BILL PAYMENT', 'N/A', 'N/A', ?, ?, ?, ?, ?)",
        )
        .bind(transaction_id)
        .bind(&now)
        .bind(&now)
        .bind(account_id)
        .bind(&now)
        .bind(&now)
        .execute(repo.pool())
        .await
        .unwrap();
    }

    async fn transaction_count(repo: &SqliteRepo) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transactions")
            .fetch_one(repo.pool())
            .await
            .unwrap();
        count
    }

    fn account_id(raw: &str) -> AccountId {
        AccountId::new(raw).unwrap()
    }

    fn card(raw: &str) -> CardNumber {
        CardNumber::new(raw).unwrap()
    }

    #[tokio::test]
    async fn test_get_account() {
        let repo = setup_repo().await;
        seed_account(&repo, "00000000001", 10000).await;

        let account = repo
            .get_account(&account_id("00000000001"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(account.id.as_str(), "00000000001");
        assert_eq!(account.current_balance.minor(), 10000);
    }

    #[tokio::test]
    async fn test_get_account_not_found() {
        let repo = setup_repo().await;

        let result = repo.get_account(&account_id("99999999999")).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_get_card_xref() {
        let repo = setup_repo().await;
        seed_account(&repo, "00000000001", 10000).await;
        seed_xref(&repo, "00000000001", "1234567812345678").await;

        let xref = repo
            .get_card_xref(&account_id("00000000001"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(xref.account_id.as_str(), "00000000001");
        assert_eq!(xref.card_number.as_str(), "1234567812345678");
    }

    #[tokio::test]
    async fn test_get_card_xref_missing() {
        let repo = setup_repo().await;
        seed_account(&repo, "00000000001", 10000).await;

        let result = repo.get_card_xref(&account_id("00000000001")).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_last_transaction_empty() {
        let repo = setup_repo().await;

        assert!(repo.last_transaction().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_submit_payment_zeroes_balance_and_records_transaction() {
        let repo = setup_repo().await;
        seed_account(&repo, "00000000001", 10000).await;
        seed_xref(&repo, "00000000001", "1234567812345678").await;

        let receipt = repo
            .submit_payment(&account_id("00000000001"), &card("1234567812345678"))
            .await
            .unwrap();

        assert_eq!(receipt.transaction.id.as_str(), "0000000000000001");
        assert_eq!(receipt.payment_amount.minor(), 10000);
        assert_eq!(receipt.new_balance.minor(), 0);

        let account = repo
            .get_account(&account_id("00000000001"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.current_balance.minor(), 0);

        let stored = repo.last_transaction().await.unwrap().unwrap();
        assert_eq!(stored.id.as_str(), "0000000000000001");
        assert_eq!(stored.type_code, Transaction::TYPE_CODE);
        assert_eq!(stored.category_code, Transaction::CATEGORY_CODE);
        assert_eq!(stored.source, Transaction::SOURCE);
        assert_eq!(stored.description, Transaction::DESCRIPTION);
        assert_eq!(stored.merchant_id, Transaction::MERCHANT_ID);
        assert_eq!(stored.merchant_name, Transaction::MERCHANT_NAME);
        assert_eq!(stored.merchant_city, Transaction::MERCHANT_CITY);
        assert_eq!(stored.merchant_zip, Transaction::MERCHANT_ZIP);
        assert_eq!(stored.amount.minor(), 10000);
        assert_eq!(stored.card_number.as_str(), "1234567812345678");
        assert_eq!(stored.account_id.as_str(), "00000000001");
        assert_eq!(stored.origin_timestamp, stored.process_timestamp);
    }

    #[tokio::test]
    async fn test_submit_payment_unknown_account() {
        let repo = setup_repo().await;

        let result = repo
            .submit_payment(&account_id("99999999999"), &card("1234567812345678"))
            .await;

        assert!(matches!(result, Err(RepoError::NotFound)));
        assert_eq!(transaction_count(&repo).await, 0);
    }

    #[tokio::test]
    async fn test_submit_payment_nothing_to_pay() {
        let repo = setup_repo().await;
        seed_account(&repo, "00000000001", 0).await;
        seed_xref(&repo, "00000000001", "1234567812345678").await;

        let result = repo
            .submit_payment(&account_id("00000000001"), &card("1234567812345678"))
            .await;

        assert!(matches!(
            result,
            Err(RepoError::Domain(DomainError::NothingToPay))
        ));
        assert_eq!(transaction_count(&repo).await, 0);
    }

    #[tokio::test]
    async fn test_second_submit_rejected() {
        let repo = setup_repo().await;
        seed_account(&repo, "00000000001", 10000).await;
        seed_xref(&repo, "00000000001", "1234567812345678").await;

        repo.submit_payment(&account_id("00000000001"), &card("1234567812345678"))
            .await
            .unwrap();

        let result = repo
            .submit_payment(&account_id("00000000001"), &card("1234567812345678"))
            .await;

        assert!(matches!(
            result,
            Err(RepoError::Domain(DomainError::NothingToPay))
        ));
        assert_eq!(transaction_count(&repo).await, 1);
    }

    #[tokio::test]
    async fn test_ids_continue_from_existing_rows() {
        let repo = setup_repo().await;
        seed_account(&repo, "00000000001", 10000).await;
        seed_xref(&repo, "00000000001", "1234567812345678").await;
        seed_transaction(&repo, "0000000000000005", "00000000001").await;

        let receipt = repo
            .submit_payment(&account_id("00000000001"), &card("1234567812345678"))
            .await
            .unwrap();

        assert_eq!(receipt.transaction.id.as_str(), "0000000000000006");
    }

    #[tokio::test]
    async fn test_ids_increment_across_accounts() {
        let repo = setup_repo().await;
        seed_account(&repo, "00000000001", 10000).await;
        seed_xref(&repo, "00000000001", "1234567812345678").await;
        seed_account(&repo, "00000000002", 5000).await;
        seed_xref(&repo, "00000000002", "8765432187654321").await;

        let first = repo
            .submit_payment(&account_id("00000000001"), &card("1234567812345678"))
            .await
            .unwrap();
        let second = repo
            .submit_payment(&account_id("00000000002"), &card("8765432187654321"))
            .await
            .unwrap();

        assert_eq!(first.transaction.id.as_str(), "0000000000000001");
        assert_eq!(second.transaction.id.as_str(), "0000000000000002");
    }

    // A file-backed store gives every pooled connection the same database,
    // unlike `sqlite::memory:` where each connection is its own.
    #[tokio::test]
    async fn test_concurrent_submits_single_success() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}/billpay.db?mode=rwc", dir.path().display());
        let repo = Arc::new(SqliteRepo::new(&url).await.unwrap());
        seed_account(&repo, "00000000001", 10000).await;
        seed_xref(&repo, "00000000001", "1234567812345678").await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.submit_payment(&account_id("00000000001"), &card("1234567812345678"))
                    .await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(receipt) => {
                    successes += 1;
                    assert_eq!(receipt.new_balance.minor(), 0);
                }
                Err(RepoError::Domain(DomainError::NothingToPay)) => {}
                Err(RepoError::Conflict(_)) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(transaction_count(&repo).await, 1);

        let account = repo
            .get_account(&account_id("00000000001"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.current_balance.minor(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_stored_id_fails_read() {
        let repo = setup_repo().await;
        seed_account(&repo, "00000000001", 10000).await;
        seed_transaction(&repo, "BADBADBADBADBAD1", "00000000001").await;

        let result = repo.last_transaction().await;

        assert!(matches!(
            result,
            Err(RepoError::Domain(DomainError::CorruptTransactionId(_)))
        ));
    }
}
