mod common;

use common::{alice, balance_of, cents, credit_card, date, debit_account, engine_with_db};
use engine::{
    AccountKind, AccountSubtype, AccountUpdate, EngineError, NewAccount, NewCategory,
    NewTransaction, TransactionKind, TransactionListFilter, TransactionUpdate, TransferCmd,
};

#[tokio::test]
async fn opening_balance_has_no_ledger_entry() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let account = debit_account(&engine, user, "Checking", 10_000).await;

    assert_eq!(account.balance, cents(10_000));
    let txs = engine
        .transactions(user, &TransactionListFilter::default())
        .await
        .unwrap();
    assert!(txs.is_empty());
}

#[tokio::test]
async fn expense_then_delete_restores_balance() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let account = debit_account(&engine, user, "Checking", 20_000).await;

    let tx = engine
        .create_transaction(
            user,
            NewTransaction::new(
                account.id,
                TransactionKind::Expense,
                cents(5_000),
                date(2026, 10, 1),
            )
            .description("Groceries"),
        )
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, user, account.id).await, cents(15_000));

    engine.delete_transaction(user, tx.id).await.unwrap();
    assert_eq!(balance_of(&engine, user, account.id).await, cents(20_000));
    assert!(matches!(
        engine.transaction(user, tx.id).await,
        Err(EngineError::NotFound(_))
    ));
}

#[tokio::test]
async fn debit_expense_may_overdraw_without_full_guard() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let account = debit_account(&engine, user, "Checking", 1_000).await;

    engine
        .create_transaction(
            user,
            NewTransaction::new(
                account.id,
                TransactionKind::Expense,
                cents(3_000),
                date(2026, 10, 1),
            ),
        )
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, user, account.id).await, cents(-2_000));
}

#[tokio::test]
async fn credit_limit_blocks_expense_and_keeps_balance() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let card = credit_card(&engine, user, 90_000, 100_000).await;

    let err = engine
        .create_transaction(
            user,
            NewTransaction::new(
                card.id,
                TransactionKind::Expense,
                cents(15_000),
                date(2026, 10, 2),
            ),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::CreditLimitExceeded(_)));
    assert_eq!(balance_of(&engine, user, card.id).await, cents(90_000));

    // Paying the card down is always accepted.
    engine
        .create_transaction(
            user,
            NewTransaction::new(
                card.id,
                TransactionKind::Income,
                cents(40_000),
                date(2026, 10, 3),
            ),
        )
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, user, card.id).await, cents(50_000));
}

#[tokio::test]
async fn overflowing_amount_is_rejected_and_keeps_balance() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let card = credit_card(&engine, user, 90_000, 100_000).await;
    let checking = debit_account(&engine, user, "Checking", 10).await;

    let err = engine
        .create_transaction(
            user,
            NewTransaction::new(
                card.id,
                TransactionKind::Expense,
                cents(i64::MAX),
                date(2026, 10, 2),
            ),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
    assert_eq!(balance_of(&engine, user, card.id).await, cents(90_000));

    let err = engine
        .create_transaction(
            user,
            NewTransaction::new(
                checking.id,
                TransactionKind::Income,
                cents(i64::MAX),
                date(2026, 10, 2),
            ),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
    assert_eq!(balance_of(&engine, user, checking.id).await, cents(10));
    let txs = engine
        .transactions(user, &TransactionListFilter::default())
        .await
        .unwrap();
    assert!(txs.is_empty());
}

#[tokio::test]
async fn non_positive_amount_is_rejected() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let account = debit_account(&engine, user, "Checking", 0).await;

    for amount in [0, -10] {
        let err = engine
            .create_transaction(
                user,
                NewTransaction::new(
                    account.id,
                    TransactionKind::Income,
                    cents(amount),
                    date(2026, 10, 1),
                ),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }
}

#[tokio::test]
async fn transfer_creates_linked_legs() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let checking = debit_account(&engine, user, "Checking", 50_000).await;
    let savings = debit_account(&engine, user, "Savings", 0).await;

    let (out, inc) = engine
        .transfer(
            user,
            TransferCmd::new(checking.id, savings.id, cents(20_000), date(2026, 10, 5)),
        )
        .await
        .unwrap();

    assert_eq!(out.kind, TransactionKind::Expense);
    assert_eq!(inc.kind, TransactionKind::Income);
    assert_eq!(out.transfer_pair_id, Some(inc.id));
    assert_eq!(inc.transfer_pair_id, Some(out.id));
    assert_eq!(out.description, "Transfer to Savings");
    assert_eq!(inc.description, "Transfer from Checking");
    assert_eq!(balance_of(&engine, user, checking.id).await, cents(30_000));
    assert_eq!(balance_of(&engine, user, savings.id).await, cents(20_000));

    let stored = engine.transaction(user, inc.id).await.unwrap();
    assert_eq!(stored.transfer_pair_id, Some(out.id));
}

#[tokio::test]
async fn transfer_to_same_account_is_rejected() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let checking = debit_account(&engine, user, "Checking", 50_000).await;

    let err = engine
        .transfer(
            user,
            TransferCmd::new(checking.id, checking.id, cents(100), date(2026, 10, 5)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransfer(_)));
}

#[tokio::test]
async fn transfer_rolls_back_when_card_limit_is_hit() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let card = credit_card(&engine, user, 95_000, 100_000).await;
    let checking = debit_account(&engine, user, "Checking", 0).await;

    let err = engine
        .transfer(
            user,
            TransferCmd::new(card.id, checking.id, cents(10_000), date(2026, 10, 5)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::CreditLimitExceeded(_)));
    assert_eq!(balance_of(&engine, user, card.id).await, cents(95_000));
    assert_eq!(balance_of(&engine, user, checking.id).await, cents(0));
    assert!(
        engine
            .transactions(user, &TransactionListFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn deleting_one_transfer_leg_deletes_both() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let checking = debit_account(&engine, user, "Checking", 50_000).await;
    let savings = debit_account(&engine, user, "Savings", 0).await;

    let (out, inc) = engine
        .transfer(
            user,
            TransferCmd::new(checking.id, savings.id, cents(20_000), date(2026, 10, 5)),
        )
        .await
        .unwrap();

    engine.delete_transaction(user, inc.id).await.unwrap();
    assert_eq!(balance_of(&engine, user, checking.id).await, cents(50_000));
    assert_eq!(balance_of(&engine, user, savings.id).await, cents(0));
    assert!(engine.transaction(user, out.id).await.is_err());
}

#[tokio::test]
async fn transfer_leg_accepts_only_metadata_updates() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let checking = debit_account(&engine, user, "Checking", 50_000).await;
    let savings = debit_account(&engine, user, "Savings", 0).await;
    let (out, _) = engine
        .transfer(
            user,
            TransferCmd::new(checking.id, savings.id, cents(20_000), date(2026, 10, 5)),
        )
        .await
        .unwrap();

    let err = engine
        .update_transaction(user, out.id, TransactionUpdate::default().amount(cents(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransfer(_)));

    let updated = engine
        .update_transaction(
            user,
            out.id,
            TransactionUpdate::default().description("Monthly saving"),
        )
        .await
        .unwrap();
    assert_eq!(updated.description, "Monthly saving");
    assert_eq!(balance_of(&engine, user, checking.id).await, cents(30_000));
}

#[tokio::test]
async fn moving_a_transaction_between_accounts() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let checking = debit_account(&engine, user, "Checking", 10_000).await;
    let cash = debit_account(&engine, user, "Cash", 10_000).await;

    let tx = engine
        .create_transaction(
            user,
            NewTransaction::new(
                checking.id,
                TransactionKind::Expense,
                cents(2_000),
                date(2026, 10, 1),
            ),
        )
        .await
        .unwrap();

    let updated = engine
        .update_transaction(
            user,
            tx.id,
            TransactionUpdate::default()
                .account_id(cash.id)
                .amount(cents(3_000)),
        )
        .await
        .unwrap();
    assert_eq!(updated.account_id, cash.id);
    assert_eq!(balance_of(&engine, user, checking.id).await, cents(10_000));
    assert_eq!(balance_of(&engine, user, cash.id).await, cents(7_000));

    // Switching the kind flips the effect.
    engine
        .update_transaction(
            user,
            tx.id,
            TransactionUpdate::default().kind(TransactionKind::Income),
        )
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, user, cash.id).await, cents(13_000));
}

#[tokio::test]
async fn failed_update_leaves_everything_untouched() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let checking = debit_account(&engine, user, "Checking", 10_000).await;
    let card = credit_card(&engine, user, 0, 5_000).await;

    let tx = engine
        .create_transaction(
            user,
            NewTransaction::new(
                checking.id,
                TransactionKind::Expense,
                cents(2_000),
                date(2026, 10, 1),
            ),
        )
        .await
        .unwrap();

    let err = engine
        .update_transaction(
            user,
            tx.id,
            TransactionUpdate::default()
                .account_id(card.id)
                .amount(cents(6_000)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::CreditLimitExceeded(_)));
    assert_eq!(balance_of(&engine, user, checking.id).await, cents(8_000));
    assert_eq!(balance_of(&engine, user, card.id).await, cents(0));
    assert_eq!(
        engine.transaction(user, tx.id).await.unwrap().account_id,
        checking.id
    );
}

#[tokio::test]
async fn deleting_an_account_unpairs_transfer_legs() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let checking = debit_account(&engine, user, "Checking", 50_000).await;
    let savings = debit_account(&engine, user, "Savings", 0).await;
    let (_, inc) = engine
        .transfer(
            user,
            TransferCmd::new(checking.id, savings.id, cents(20_000), date(2026, 10, 5)),
        )
        .await
        .unwrap();

    engine.delete_account(user, checking.id).await.unwrap();

    let remaining = engine.transaction(user, inc.id).await.unwrap();
    assert_eq!(remaining.transfer_pair_id, None);
    assert_eq!(balance_of(&engine, user, savings.id).await, cents(20_000));

    // The orphan leg can now be deleted like any transaction.
    engine.delete_transaction(user, inc.id).await.unwrap();
    assert_eq!(balance_of(&engine, user, savings.id).await, cents(0));
}

#[tokio::test]
async fn other_users_entities_are_not_found() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let bob = engine.new_user("bob@example.com", "Bob").await.unwrap().id;
    let account = debit_account(&engine, user, "Checking", 10_000).await;

    assert!(matches!(
        engine.account(bob, account.id).await,
        Err(EngineError::NotFound(_))
    ));
    let err = engine
        .create_transaction(
            bob,
            NewTransaction::new(
                account.id,
                TransactionKind::Expense,
                cents(100),
                date(2026, 10, 1),
            ),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
    assert_eq!(balance_of(&engine, user, account.id).await, cents(10_000));
}

#[tokio::test]
async fn credit_limit_rules_on_accounts() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;

    let err = engine
        .new_account(
            user,
            NewAccount::new("Checking", AccountKind::Debit, AccountSubtype::Checking)
                .credit_limit(cents(1_000)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidValue(_)));

    let card = credit_card(&engine, user, 4_000, 5_000).await;
    let err = engine
        .update_account(
            user,
            card.id,
            AccountUpdate::default().credit_limit(Some(cents(3_000))),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::CreditLimitExceeded(_)));

    let updated = engine
        .update_account(
            user,
            card.id,
            AccountUpdate::default().name("Visa").credit_limit(None),
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Visa");
    assert_eq!(updated.credit_limit, None);
}

#[tokio::test]
async fn listing_filters_and_orders_transactions() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let account = debit_account(&engine, user, "Checking", 100_000).await;
    let food = engine
        .new_category(user, NewCategory::new("Food", TransactionKind::Expense))
        .await
        .unwrap();

    for (day, kind, amount) in [
        (1, TransactionKind::Income, 50_000),
        (3, TransactionKind::Expense, 1_200),
        (2, TransactionKind::Expense, 800),
    ] {
        let mut cmd = NewTransaction::new(account.id, kind, cents(amount), date(2026, 10, day));
        if kind == TransactionKind::Expense {
            cmd = cmd.category_id(food.id);
        }
        engine.create_transaction(user, cmd).await.unwrap();
    }

    let all = engine
        .transactions(user, &TransactionListFilter::default())
        .await
        .unwrap();
    let days: Vec<_> = all.iter().map(|t| t.date).collect();
    assert_eq!(
        days,
        vec![date(2026, 10, 3), date(2026, 10, 2), date(2026, 10, 1)]
    );

    let food_only = engine
        .transactions(
            user,
            &TransactionListFilter {
                category_id: Some(food.id),
                from: Some(date(2026, 10, 2)),
                to: Some(date(2026, 10, 2)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(food_only.len(), 1);
    assert_eq!(food_only[0].amount, cents(800));

    let latest = engine
        .transactions(
            user,
            &TransactionListFilter {
                limit: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].date, date(2026, 10, 3));
}
