mod common;

use common::{alice, balance_of, cents, credit_card, date, debit_account, engine_with_db};
use engine::{
    DebtPaymentCmd, DebtPolarity, DebtStatus, DebtUpdate, EngineError, NewDebt,
    TransactionKind, TransactionListFilter, TransactionUpdate,
};

#[tokio::test]
async fn payments_reduce_remaining_until_paid() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let checking = debit_account(&engine, user, "Checking", 20_000).await;

    let debt = engine
        .new_debt(
            user,
            NewDebt::new(DebtPolarity::Owe, "Bob", cents(10_000), date(2026, 9, 1)),
        )
        .await
        .unwrap();
    assert_eq!(debt.remaining_amount, cents(10_000));
    assert_eq!(debt.status, DebtStatus::Active);
    // Registering an owe debt does not move money.
    assert_eq!(balance_of(&engine, user, checking.id).await, cents(20_000));

    let (debt, payment) = engine
        .add_debt_payment(
            user,
            debt.id,
            DebtPaymentCmd::new(cents(4_000), checking.id, date(2026, 9, 10)),
        )
        .await
        .unwrap();
    assert_eq!(debt.remaining_amount, cents(6_000));
    assert_eq!(debt.status, DebtStatus::Active);
    assert!(payment.transaction_id.is_some());
    assert_eq!(balance_of(&engine, user, checking.id).await, cents(16_000));

    let (debt, _) = engine
        .add_debt_payment(
            user,
            debt.id,
            DebtPaymentCmd::new(cents(6_000), checking.id, date(2026, 9, 20)),
        )
        .await
        .unwrap();
    assert_eq!(debt.remaining_amount, cents(0));
    assert_eq!(debt.status, DebtStatus::Paid);

    let details = engine.debt(user, debt.id).await.unwrap();
    assert_eq!(details.payments.len(), 2);
    assert_eq!(details.payments[0].date, date(2026, 9, 10));

    let txs = engine
        .transactions(user, &TransactionListFilter::default())
        .await
        .unwrap();
    assert!(txs.iter().all(|t| t.kind == TransactionKind::Expense));
    assert!(txs.iter().all(|t| t.description == "Payment to Bob"));
}

#[tokio::test]
async fn over_payment_is_rejected_without_side_effects() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let checking = debit_account(&engine, user, "Checking", 20_000).await;
    let debt = engine
        .new_debt(
            user,
            NewDebt::new(DebtPolarity::Owe, "Bob", cents(10_000), date(2026, 9, 1)),
        )
        .await
        .unwrap();
    engine
        .add_debt_payment(
            user,
            debt.id,
            DebtPaymentCmd::new(cents(5_000), checking.id, date(2026, 9, 2)),
        )
        .await
        .unwrap();

    let err = engine
        .add_debt_payment(
            user,
            debt.id,
            DebtPaymentCmd::new(cents(6_000), checking.id, date(2026, 9, 3)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::OverPayment(_)));

    let details = engine.debt(user, debt.id).await.unwrap();
    assert_eq!(details.debt.remaining_amount, cents(5_000));
    assert_eq!(details.payments.len(), 1);
    assert_eq!(balance_of(&engine, user, checking.id).await, cents(15_000));
}

#[tokio::test]
async fn payment_needs_funds_on_a_debit_account() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let checking = debit_account(&engine, user, "Checking", 1_000).await;
    let debt = engine
        .new_debt(
            user,
            NewDebt::new(DebtPolarity::Owe, "Bob", cents(10_000), date(2026, 9, 1)),
        )
        .await
        .unwrap();

    let err = engine
        .add_debt_payment(
            user,
            debt.id,
            DebtPaymentCmd::new(cents(2_000), checking.id, date(2026, 9, 2)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));
    assert_eq!(
        engine.debt(user, debt.id).await.unwrap().debt.remaining_amount,
        cents(10_000)
    );
    assert_eq!(balance_of(&engine, user, checking.id).await, cents(1_000));
}

#[tokio::test]
async fn owe_debt_cannot_be_funded_from_an_account() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let checking = debit_account(&engine, user, "Checking", 1_000).await;

    let err = engine
        .new_debt(
            user,
            NewDebt::new(DebtPolarity::Owe, "Bob", cents(500), date(2026, 9, 1))
                .account_id(checking.id),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidDebt(_)));
}

#[tokio::test]
async fn lending_money_moves_it_out_and_back() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let checking = debit_account(&engine, user, "Checking", 30_000).await;

    let debt = engine
        .new_debt(
            user,
            NewDebt::new(DebtPolarity::Owed, "Carol", cents(10_000), date(2026, 9, 1))
                .account_id(checking.id),
        )
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, user, checking.id).await, cents(20_000));

    let (debt, _) = engine
        .add_debt_payment(
            user,
            debt.id,
            DebtPaymentCmd::new(cents(3_000), checking.id, date(2026, 9, 15)),
        )
        .await
        .unwrap();
    assert_eq!(debt.remaining_amount, cents(7_000));
    assert_eq!(balance_of(&engine, user, checking.id).await, cents(23_000));

    engine
        .delete_debt(user, debt.id, date(2026, 10, 1))
        .await
        .unwrap();
    // What was not repaid comes back.
    assert_eq!(balance_of(&engine, user, checking.id).await, cents(30_000));
    assert!(matches!(
        engine.debt(user, debt.id).await,
        Err(EngineError::NotFound(_))
    ));

    let descriptions: Vec<_> = engine
        .transactions(user, &TransactionListFilter::default())
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.description)
        .collect();
    assert_eq!(
        descriptions,
        vec![
            "Loan to Carol cancelled".to_string(),
            "Payment from Carol".to_string(),
            "Loan to Carol".to_string(),
        ]
    );

    let audit = engine.audit_records(user).await.unwrap();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].action, "debt.deleted");
    let details: serde_json::Value =
        serde_json::from_str(audit[0].details.as_deref().unwrap()).unwrap();
    assert_eq!(details["counterpart_name"], "Carol");
    assert_eq!(details["remaining_amount"], 7_000);
    assert_eq!(details["paid_amount"], 3_000);
}

#[tokio::test]
async fn lending_more_than_the_balance_fails() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let checking = debit_account(&engine, user, "Checking", 5_000).await;

    let err = engine
        .new_debt(
            user,
            NewDebt::new(DebtPolarity::Owed, "Carol", cents(10_000), date(2026, 9, 1))
                .account_id(checking.id),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));
    assert!(engine.debts(user).await.unwrap().is_empty());
    assert_eq!(balance_of(&engine, user, checking.id).await, cents(5_000));
}

#[tokio::test]
async fn update_changes_only_metadata() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let debt = engine
        .new_debt(
            user,
            NewDebt::new(DebtPolarity::Owe, "Bob", cents(10_000), date(2026, 9, 1)),
        )
        .await
        .unwrap();

    let updated = engine
        .update_debt(
            user,
            debt.id,
            DebtUpdate {
                counterpart_name: Some("Robert".to_string()),
                description: Some("  concert tickets ".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.counterpart_name, "Robert");
    assert_eq!(updated.description, "concert tickets");
    assert_eq!(updated.remaining_amount, cents(10_000));
}

#[tokio::test]
async fn loan_transaction_moves_only_through_its_debt() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let checking = debit_account(&engine, user, "Checking", 30_000).await;

    let debt = engine
        .new_debt(
            user,
            NewDebt::new(DebtPolarity::Owed, "Carol", cents(10_000), date(2026, 9, 1))
                .account_id(checking.id),
        )
        .await
        .unwrap();
    let loan_id = debt.loan_transaction_id.unwrap();
    assert_eq!(balance_of(&engine, user, checking.id).await, cents(20_000));

    let err = engine.delete_transaction(user, loan_id).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidDebt(_)));
    let err = engine
        .update_transaction(user, loan_id, TransactionUpdate::default().amount(cents(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidDebt(_)));
    assert_eq!(balance_of(&engine, user, checking.id).await, cents(20_000));

    let renamed = engine
        .update_transaction(
            user,
            loan_id,
            TransactionUpdate::default().description("Loan to Carol for the car"),
        )
        .await
        .unwrap();
    assert_eq!(renamed.amount, cents(10_000));

    // The refund happens once, through the debt.
    engine
        .delete_debt(user, debt.id, date(2026, 10, 1))
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, user, checking.id).await, cents(30_000));
}

#[tokio::test]
async fn payment_transaction_moves_only_through_its_debt() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let checking = debit_account(&engine, user, "Checking", 20_000).await;
    let debt = engine
        .new_debt(
            user,
            NewDebt::new(DebtPolarity::Owe, "Bob", cents(10_000), date(2026, 9, 1)),
        )
        .await
        .unwrap();
    let (_, payment) = engine
        .add_debt_payment(
            user,
            debt.id,
            DebtPaymentCmd::new(cents(4_000), checking.id, date(2026, 9, 10)),
        )
        .await
        .unwrap();
    let payment_tx = payment.transaction_id.unwrap();

    let err = engine.delete_transaction(user, payment_tx).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidDebt(_)));
    let err = engine
        .update_transaction(
            user,
            payment_tx,
            TransactionUpdate::default().kind(TransactionKind::Income),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidDebt(_)));

    assert_eq!(balance_of(&engine, user, checking.id).await, cents(16_000));
    assert_eq!(
        engine.debt(user, debt.id).await.unwrap().debt.remaining_amount,
        cents(6_000)
    );
}

#[tokio::test]
async fn lending_from_a_card_respects_its_limit() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let card = credit_card(&engine, user, 95_000, 100_000).await;

    let err = engine
        .new_debt(
            user,
            NewDebt::new(DebtPolarity::Owed, "Carol", cents(10_000), date(2026, 9, 1))
                .account_id(card.id),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::CreditLimitExceeded(_)));
    assert!(engine.debts(user).await.unwrap().is_empty());
    assert_eq!(balance_of(&engine, user, card.id).await, cents(95_000));

    engine
        .new_debt(
            user,
            NewDebt::new(DebtPolarity::Owed, "Carol", cents(5_000), date(2026, 9, 1))
                .account_id(card.id),
        )
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, user, card.id).await, cents(100_000));
}

#[tokio::test]
async fn paying_a_debt_with_a_card_respects_its_limit() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let card = credit_card(&engine, user, 0, 5_000).await;
    let debt = engine
        .new_debt(
            user,
            NewDebt::new(DebtPolarity::Owe, "Bob", cents(10_000), date(2026, 9, 1)),
        )
        .await
        .unwrap();

    let err = engine
        .add_debt_payment(
            user,
            debt.id,
            DebtPaymentCmd::new(cents(6_000), card.id, date(2026, 9, 2)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::CreditLimitExceeded(_)));
    assert_eq!(balance_of(&engine, user, card.id).await, cents(0));
    assert_eq!(
        engine.debt(user, debt.id).await.unwrap().debt.remaining_amount,
        cents(10_000)
    );

    let (debt, _) = engine
        .add_debt_payment(
            user,
            debt.id,
            DebtPaymentCmd::new(cents(4_000), card.id, date(2026, 9, 3)),
        )
        .await
        .unwrap();
    assert_eq!(debt.remaining_amount, cents(6_000));
    assert_eq!(balance_of(&engine, user, card.id).await, cents(4_000));
}

#[tokio::test]
async fn repayment_onto_a_card_lowers_what_is_owed() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let card = credit_card(&engine, user, 5_000, 100_000).await;
    let debt = engine
        .new_debt(
            user,
            NewDebt::new(DebtPolarity::Owed, "Carol", cents(3_000), date(2026, 9, 1)),
        )
        .await
        .unwrap();

    let (debt, payment) = engine
        .add_debt_payment(
            user,
            debt.id,
            DebtPaymentCmd::new(cents(2_000), card.id, date(2026, 9, 5)),
        )
        .await
        .unwrap();
    assert_eq!(debt.remaining_amount, cents(1_000));
    assert_eq!(payment.account_id, Some(card.id));
    assert_eq!(balance_of(&engine, user, card.id).await, cents(3_000));
}
