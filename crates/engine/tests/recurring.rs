mod common;

use common::{alice, balance_of, cents, credit_card, date, debit_account, engine_with_db};
use engine::{
    EngineError, Frequency, NewCategory, NewRecurring, RecurringUpdate, TransactionKind,
};

#[tokio::test]
async fn execution_charges_and_advances() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let checking = debit_account(&engine, user, "Checking", 10_000).await;
    let streaming = engine
        .new_category(user, NewCategory::new("Streaming", TransactionKind::Expense))
        .await
        .unwrap();

    let expense = engine
        .new_recurring(
            user,
            NewRecurring::new(
                checking.id,
                "Netflix",
                cents(1_599),
                Frequency::Monthly,
                date(2026, 1, 31),
            )
            .category_id(streaming.id),
        )
        .await
        .unwrap();
    assert_eq!(expense.day_of_charge, 31);

    let execution = engine
        .execute_recurring(user, expense.id, date(2026, 2, 1))
        .await
        .unwrap();
    assert_eq!(execution.next_date, date(2026, 2, 28));
    assert_eq!(execution.transaction.description, "Recurring payment: Netflix");
    assert_eq!(execution.transaction.category_id, Some(streaming.id));
    assert_eq!(execution.transaction.date, date(2026, 2, 1));
    assert_eq!(execution.payment.transaction_id, Some(execution.transaction.id));
    assert_eq!(balance_of(&engine, user, checking.id).await, cents(8_401));

    let stored = engine.recurring_expense(user, expense.id).await.unwrap();
    assert_eq!(stored.next_date, date(2026, 2, 28));

    let payments = engine.recurring_payments(user, expense.id).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].amount, cents(1_599));
}

#[tokio::test]
async fn inactive_expense_still_executes_on_request() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let checking = debit_account(&engine, user, "Checking", 10_000).await;
    let expense = engine
        .new_recurring(
            user,
            NewRecurring::new(
                checking.id,
                "Gym",
                cents(3_000),
                Frequency::Weekly,
                date(2026, 10, 1),
            ),
        )
        .await
        .unwrap();
    engine
        .update_recurring(user, expense.id, RecurringUpdate::default().is_active(false))
        .await
        .unwrap();

    assert!(
        engine
            .due_recurring(user, date(2026, 10, 15))
            .await
            .unwrap()
            .is_empty()
    );
    let execution = engine
        .execute_recurring(user, expense.id, date(2026, 10, 15))
        .await
        .unwrap();
    assert_eq!(execution.next_date, date(2026, 10, 8));
    assert_eq!(balance_of(&engine, user, checking.id).await, cents(7_000));
}

#[tokio::test]
async fn due_listing_respects_date_and_activity() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let bob = engine.new_user("bob@example.com", "Bob").await.unwrap().id;
    let checking = debit_account(&engine, user, "Checking", 10_000).await;
    let bob_checking = debit_account(&engine, bob, "Checking", 10_000).await;

    for (name, next) in [("Rent", date(2026, 10, 1)), ("Phone", date(2026, 10, 20))] {
        engine
            .new_recurring(
                user,
                NewRecurring::new(checking.id, name, cents(100), Frequency::Monthly, next),
            )
            .await
            .unwrap();
    }
    engine
        .new_recurring(
            bob,
            NewRecurring::new(
                bob_checking.id,
                "Rent",
                cents(100),
                Frequency::Yearly,
                date(2026, 10, 10),
            ),
        )
        .await
        .unwrap();

    let due = engine.due_recurring(user, date(2026, 10, 15)).await.unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].name, "Rent");

    let everyone = engine.all_due_recurring(date(2026, 10, 15)).await.unwrap();
    assert_eq!(everyone.len(), 2);
    assert!(everyone.windows(2).all(|w| w[0].next_date <= w[1].next_date));
}

#[tokio::test]
async fn card_limit_blocks_execution() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let card = credit_card(&engine, user, 9_500, 10_000).await;
    let expense = engine
        .new_recurring(
            user,
            NewRecurring::new(
                card.id,
                "Insurance",
                cents(1_000),
                Frequency::Monthly,
                date(2026, 10, 1),
            ),
        )
        .await
        .unwrap();

    let err = engine
        .execute_recurring(user, expense.id, date(2026, 10, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::CreditLimitExceeded(_)));
    let stored = engine.recurring_expense(user, expense.id).await.unwrap();
    assert_eq!(stored.next_date, date(2026, 10, 1));
    assert!(
        engine
            .recurring_payments(user, expense.id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn expense_goes_away_with_its_account() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let checking = debit_account(&engine, user, "Checking", 10_000).await;
    let expense = engine
        .new_recurring(
            user,
            NewRecurring::new(
                checking.id,
                "Rent",
                cents(100),
                Frequency::Monthly,
                date(2026, 10, 1),
            ),
        )
        .await
        .unwrap();

    engine.delete_account(user, checking.id).await.unwrap();
    let err = engine
        .execute_recurring(user, expense.id, date(2026, 10, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn invalid_day_of_charge_is_rejected() {
    let engine = engine_with_db().await;
    let user = alice(&engine).await;
    let checking = debit_account(&engine, user, "Checking", 10_000).await;

    let err = engine
        .new_recurring(
            user,
            NewRecurring::new(
                checking.id,
                "Rent",
                cents(100),
                Frequency::Monthly,
                date(2026, 10, 1),
            )
            .day_of_charge(32),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidValue(_)));
}
