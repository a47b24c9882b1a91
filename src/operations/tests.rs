//! Tests for bank operations
//!
//! Exercises transfers end to end against ledger doubles and the in-memory
//! ledger, and the feedback submission pipeline against the in-memory store

#[cfg(test)]
mod tests {
    use crate::{
        accounts::encode_account_list,
        config::{AccountSource, AccountsConfig, DEFAULT_ACCOUNT_COOKIE},
        ledger::{
            FeedbackStore, FundsLedger, InMemoryFeedbackStore, InMemoryLedger, LedgerRejection,
            StoreError,
        },
        operations::{check_transfer, FeedbackError, FeedbackService, TransferOutcome, TransferService},
        Account, AccountId, FeedbackRecord, Field, RequestContext, TransferError, User,
        ValidationError,
    };
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Ledger double counting calls and answering with a fixed result
    struct RecordingLedger {
        calls: AtomicUsize,
        rejection: Option<String>,
    }

    impl RecordingLedger {
        fn accepting() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                rejection: None,
            }
        }

        fn rejecting(message: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                rejection: Some(message.to_string()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl FundsLedger for RecordingLedger {
        async fn transfer_funds(
            &self,
            _user_name: &str,
            _credit: AccountId,
            _debit: AccountId,
            _amount: Decimal,
        ) -> Result<(), LedgerRejection> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.rejection {
                Some(message) => Err(LedgerRejection(message.clone())),
                None => Ok(()),
            }
        }
    }

    /// Feedback store that is always down
    struct BrokenStore;

    impl FeedbackStore for BrokenStore {
        async fn store_feedback(&self, _record: FeedbackRecord) -> Result<i64, StoreError> {
            Err(StoreError::Unavailable("disk full".to_string()))
        }
    }

    /// Helper function to create the authenticated user "jsmith"
    fn jsmith() -> User {
        User {
            username: "jsmith".to_string(),
            accounts: vec![
                Account::new(800002, "Savings", Decimal::new(1000, 0)).owned_by("jsmith"),
                Account::new(800003, "Checking", Decimal::new(500, 0)).owned_by("jsmith"),
            ],
        }
    }

    /// Helper function to create another customer's account
    fn victim_account() -> Account {
        Account::new(900001, "Retirement", Decimal::new(50000, 0)).owned_by("victim")
    }

    fn accounts_config(source: AccountSource) -> AccountsConfig {
        AccountsConfig {
            source,
            cookie_name: DEFAULT_ACCOUNT_COOKIE.to_string(),
        }
    }

    fn service<L: FundsLedger>(ledger: L, source: AccountSource) -> TransferService<L> {
        TransferService::new(ledger, accounts_config(source))
    }

    async fn bank_ledger() -> InMemoryLedger {
        let ledger = InMemoryLedger::with_users(&[jsmith()]);
        ledger.open(victim_account()).await;
        ledger
    }

    fn valid_form() -> FeedbackRecord {
        FeedbackRecord {
            name: "Jane O'Hara".to_string(),
            email: "jane@example.com".to_string(),
            subject: "Online banking".to_string(),
            comments: "Works well, thanks".to_string(),
        }
    }

    #[test]
    fn test_check_transfer_reports_first_failure() {
        assert_eq!(
            check_transfer(-1, -1, Decimal::NEGATIVE_ONE),
            Err(TransferError::InvalidDestination)
        );
        assert_eq!(
            check_transfer(5, -1, Decimal::NEGATIVE_ONE),
            Err(TransferError::InvalidOrigin)
        );
        assert_eq!(
            check_transfer(5, 5, Decimal::NEGATIVE_ONE),
            Err(TransferError::InvalidAmount)
        );
        assert_eq!(check_transfer(0, 0, Decimal::ZERO), Ok(()));
    }

    #[tokio::test]
    async fn test_negative_destination_is_reported() {
        let service = service(RecordingLedger::accepting(), AccountSource::Session);

        let outcome = service.transfer("jsmith", -1, 5, Decimal::new(10, 0)).await;

        assert!(!outcome.is_success());
        assert!(outcome.message().contains("Destination account is invalid"));
        assert!(outcome.message().starts_with("ERROR: "));
        assert_eq!(service.ledger().calls(), 0);
    }

    #[tokio::test]
    async fn test_negative_origin_and_amount_are_reported() {
        let service = service(RecordingLedger::accepting(), AccountSource::Session);

        let outcome = service.transfer("jsmith", 5, -3, Decimal::new(10, 0)).await;
        assert_eq!(outcome.message(), "ERROR: Originating account is invalid");

        let outcome = service.transfer("jsmith", 5, 6, Decimal::new(-1, 2)).await;
        assert_eq!(outcome.message(), "ERROR: Transfer amount is invalid");

        assert_eq!(service.ledger().calls(), 0);
    }

    #[tokio::test]
    async fn test_zero_amount_succeeds_without_ledger() {
        let service = service(RecordingLedger::accepting(), AccountSource::Session);

        let outcome = service.transfer("jsmith", 5, 5, Decimal::ZERO).await;

        assert!(outcome.is_success());
        match &outcome {
            TransferOutcome::Completed(receipt) => assert!(!receipt.posted),
            TransferOutcome::Rejected(reason) => panic!("Expected success, got {reason}"),
        }
        assert_eq!(service.ledger().calls(), 0);
    }

    #[tokio::test]
    async fn test_success_message_names_amount_and_accounts() {
        let service = service(RecordingLedger::accepting(), AccountSource::Session);

        let outcome = service.transfer("jsmith", 800003, 800002, Decimal::new(2550, 2)).await;

        assert_eq!(service.ledger().calls(), 1);
        let message = outcome.message();
        assert!(message.starts_with(
            "25.50 was successfully transferred from Account 800002 into Account 800003 at "
        ));
        assert!(message.ends_with("M."));
    }

    #[tokio::test]
    async fn test_ledger_rejection_message_is_passed_through() {
        let service = service(
            RecordingLedger::rejecting("Transaction failed. Please try again later."),
            AccountSource::Session,
        );

        let outcome = service.transfer("jsmith", 1, 2, Decimal::ONE).await;

        assert_eq!(service.ledger().calls(), 1);
        assert_eq!(
            outcome.message(),
            "ERROR: Transaction failed. Please try again later."
        );
        assert!(matches!(
            outcome,
            TransferOutcome::Rejected(TransferError::Ledger(_))
        ));
    }

    #[tokio::test]
    async fn test_request_transfer_by_account_name() {
        let service = service(bank_ledger().await, AccountSource::Session);
        let ctx = RequestContext::new(jsmith());

        let outcome = service
            .transfer_from_request(&ctx, 800003, "savings", Decimal::new(100, 0))
            .await;

        assert!(outcome.is_success(), "{outcome}");
        assert_eq!(service.ledger().balance(800002).await, Some(Decimal::new(900, 0)));
        assert_eq!(service.ledger().balance(800003).await, Some(Decimal::new(600, 0)));
    }

    #[tokio::test]
    async fn test_request_transfer_reports_unresolved_accounts() {
        let service = service(RecordingLedger::accepting(), AccountSource::Session);
        let ctx = RequestContext::new(jsmith());

        let outcome = service
            .transfer_from_request(&ctx, 800003, "Retirement", Decimal::ONE)
            .await;
        assert_eq!(
            outcome.message(),
            "ERROR: Originating account Retirement was not found"
        );

        let outcome = service
            .transfer_from_request(&ctx, 800003, "-4", Decimal::ONE)
            .await;
        assert_eq!(
            outcome.message(),
            "ERROR: Originating account identifier '-4' is malformed"
        );

        assert_eq!(service.ledger().calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_destination_and_amount_win_over_unresolved_origin() {
        let service = service(RecordingLedger::accepting(), AccountSource::Session);
        let ctx = RequestContext::new(jsmith());

        let outcome = service
            .transfer_from_request(&ctx, -1, "Nope", Decimal::ONE)
            .await;
        assert_eq!(outcome.message(), "ERROR: Destination account is invalid");

        let outcome = service
            .transfer_from_request(&ctx, 800003, "-4", Decimal::NEGATIVE_ONE)
            .await;
        assert_eq!(outcome.message(), "ERROR: Transfer amount is invalid");

        assert_eq!(service.ledger().calls(), 0);
    }

    #[tokio::test]
    async fn test_session_source_blocks_cookie_supplied_account() {
        let service = service(bank_ledger().await, AccountSource::Session);
        let cookie = encode_account_list(&[victim_account()]);
        let ctx = RequestContext::new(jsmith()).with_cookie(DEFAULT_ACCOUNT_COOKIE, cookie);

        let outcome = service
            .transfer_from_request(&ctx, 800002, "900001", Decimal::new(1000, 0))
            .await;

        assert!(matches!(
            outcome,
            TransferOutcome::Rejected(TransferError::UnknownDebitAccount { .. })
        ));
        assert_eq!(service.ledger().balance(900001).await, Some(Decimal::new(50000, 0)));
    }

    #[tokio::test]
    async fn test_cookie_source_lets_client_debit_foreign_account() {
        let service = service(bank_ledger().await, AccountSource::Cookie);
        let cookie = encode_account_list(&[victim_account()]);
        let ctx = RequestContext::new(jsmith()).with_cookie(DEFAULT_ACCOUNT_COOKIE, cookie);

        let outcome = service
            .transfer_from_request(&ctx, 800002, "900001", Decimal::new(1000, 0))
            .await;

        // The cookie overrides the session's ownership: the foreign account is debited
        assert!(outcome.is_success(), "{outcome}");
        assert_eq!(service.ledger().balance(900001).await, Some(Decimal::new(49000, 0)));
        assert_eq!(service.ledger().balance(800002).await, Some(Decimal::new(2000, 0)));
        let history = service.ledger().history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].user_name, "jsmith");
    }

    #[tokio::test]
    async fn test_cookie_source_rejects_unreadable_cookie() {
        let service = service(RecordingLedger::accepting(), AccountSource::Cookie);
        let ctx = RequestContext::new(jsmith()).with_cookie(DEFAULT_ACCOUNT_COOKIE, "%%%");

        let outcome = service
            .transfer_from_request(&ctx, 800003, "800002", Decimal::ONE)
            .await;

        assert_eq!(outcome.message(), "ERROR: Account cookie could not be read");
        assert_eq!(service.ledger().calls(), 0);
    }

    #[tokio::test]
    async fn test_cookie_source_without_cookie_uses_session_accounts() {
        let service = service(RecordingLedger::accepting(), AccountSource::Cookie);
        let ctx = RequestContext::new(jsmith()).with_cookie("JSESSIONID", "abc");

        let outcome = service
            .transfer_from_request(&ctx, 800003, "800002", Decimal::ONE)
            .await;

        assert!(outcome.is_success());
        assert_eq!(service.ledger().calls(), 1);
    }

    #[tokio::test]
    async fn test_submit_feedback_escapes_quotes_and_returns_id() {
        let service = FeedbackService::new(InMemoryFeedbackStore::new());

        let first = service
            .submit_feedback("Jane O'Hara", "jane@example.com", "It's slow", "Don't change")
            .await
            .unwrap();
        let second = service
            .submit_feedback("Joe", "joe@example.com", "Hi", "Hello")
            .await
            .unwrap();

        assert_eq!(first, "1");
        assert_eq!(second, "2");

        let stored = service.store().get(1).await.unwrap();
        assert_eq!(stored.name, "Jane O''Hara");
        assert_eq!(stored.email, "jane@example.com");
        assert_eq!(stored.subject, "It''s slow");
        assert_eq!(stored.comments, "Don''t change");
        assert_eq!(service.store().len().await, 2);
    }

    #[tokio::test]
    async fn test_submit_form_sanitizes_fields() {
        let service = FeedbackService::new(InMemoryFeedbackStore::new());

        let id = service.submit_form(&valid_form()).await.unwrap();

        let stored = service.store().get(id.parse().unwrap()).await.unwrap();
        assert_eq!(stored.name, "Jane O&#x27;Hara");
        assert_eq!(stored.email, "jane&#x40;example.com");
        assert_eq!(stored.subject, "Online banking");
        assert_eq!(stored.comments, "Works well, thanks");
    }

    #[tokio::test]
    async fn test_submit_form_stops_at_first_invalid_field() {
        let service = FeedbackService::new(InMemoryFeedbackStore::new());

        let mut form = valid_form();
        form.email = "not-an-email".to_string();
        form.comments = "<script>".to_string();

        let err = service.submit_form(&form).await.unwrap_err();
        assert!(matches!(
            err,
            FeedbackError::Invalid(ValidationError::Rejected { field: Field::Email })
        ));
        assert_eq!(service.store().len().await, 0);

        let mut form = valid_form();
        form.subject = "  ".to_string();
        let err = service.submit_form(&form).await.unwrap_err();
        assert!(matches!(
            err,
            FeedbackError::Invalid(ValidationError::Blank { field: Field::Text })
        ));
    }

    #[tokio::test]
    async fn test_store_failure_is_propagated() {
        let service = FeedbackService::new(BrokenStore);

        let err = service.submit_form(&valid_form()).await.unwrap_err();

        assert!(matches!(err, FeedbackError::Store(StoreError::Unavailable(_))));
        assert_eq!(err.to_string(), "feedback store is unavailable: disk full");
    }
}
