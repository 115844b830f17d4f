//! Debt lifecycle.
//!
//! `active --(remaining reaches 0)--> paid`. Nothing leaves `paid`.
//!
//! - Owe: I owe the counterpart. Payments are expenses on the paying account.
//! - Owed: the counterpart owes me. Payments are income. When the debt is
//!   created with a funding account the lent money leaves that account right
//!   away, and deleting the debt gives back whatever was not repaid yet.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    AuditEntry, Debt, DebtPayment, DebtPaymentCmd, DebtPolarity, DebtStatus, DebtUpdate,
    EngineError, Guard, NewDebt, ResultEngine, Transaction, TransactionKind, debt_payments, debts,
    util::require_positive,
};

use super::{Engine, normalize_required_name, normalize_text, with_tx};

/// A debt with its payments, oldest payment first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtDetails {
    pub debt: Debt,
    pub payments: Vec<DebtPayment>,
}

impl Engine {
    /// Registers a debt.
    ///
    /// An `Owed` debt with a funding account is money lent right now: the
    /// amount leaves the account as an expense under the full guard and a
    /// `Loan to {counterpart}` transaction is recorded.
    pub async fn new_debt(&self, user_id: Uuid, cmd: NewDebt) -> ResultEngine<Debt> {
        require_positive(cmd.original_amount, "debt amount")?;
        let counterpart_name = normalize_required_name(&cmd.counterpart_name, "counterpart")?;
        if cmd.account_id.is_some() && cmd.polarity == DebtPolarity::Owe {
            return Err(EngineError::InvalidDebt(
                "only debts owed to you can be funded from an account".to_string(),
            ));
        }

        let debt = with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;

            let mut loan_transaction_id = None;
            if let Some(account_id) = cmd.account_id {
                let account = self.require_account(&db_tx, user_id, account_id).await?;
                let loan = Transaction::new(
                    user_id,
                    account.id,
                    TransactionKind::Expense,
                    cmd.original_amount,
                    cmd.date,
                    format!("Loan to {counterpart_name}"),
                )?;
                self.post_transaction(&db_tx, &account, &loan, Guard::Full)
                    .await?;
                loan_transaction_id = Some(loan.id);
            }

            let debt = Debt {
                id: Uuid::new_v4(),
                user_id,
                polarity: cmd.polarity,
                counterpart_name: counterpart_name.clone(),
                description: normalize_text(&cmd.description),
                date: cmd.date,
                original_amount: cmd.original_amount,
                remaining_amount: cmd.original_amount,
                status: DebtStatus::Active,
                account_id: cmd.account_id,
                loan_transaction_id,
                created_at: Utc::now(),
            };
            debts::ActiveModel::from(&debt).insert(&db_tx).await?;
            Ok(debt)
        })?;
        tracing::debug!(
            debt_id = %debt.id,
            polarity = debt.polarity.as_str(),
            amount = %debt.original_amount,
            "debt created"
        );
        Ok(debt)
    }

    /// Applies a payment to a debt.
    ///
    /// The payment moves money on `cmd.account_id` (out for `Owe`, in for
    /// `Owed`) under the full guard and is traced by a ledger transaction.
    /// The remaining amount is written only if it still holds the value the
    /// payment was checked against, so two racing payments cannot both be
    /// applied past zero.
    pub async fn add_debt_payment(
        &self,
        user_id: Uuid,
        debt_id: Uuid,
        cmd: DebtPaymentCmd,
    ) -> ResultEngine<(Debt, DebtPayment)> {
        require_positive(cmd.amount, "payment amount")?;
        let (debt, payment) = with_tx!(self, |db_tx| {
            let debt = self.require_debt(&db_tx, user_id, debt_id).await?;
            if cmd.amount > debt.remaining_amount {
                return Err(EngineError::OverPayment(format!(
                    "payment {} exceeds remaining {}",
                    cmd.amount, debt.remaining_amount
                )));
            }
            let account = self.require_account(&db_tx, user_id, cmd.account_id).await?;

            let description = match debt.polarity {
                DebtPolarity::Owe => format!("Payment to {}", debt.counterpart_name),
                DebtPolarity::Owed => format!("Payment from {}", debt.counterpart_name),
            };
            let tx = Transaction::new(
                user_id,
                account.id,
                debt.polarity.payment_kind(),
                cmd.amount,
                cmd.date,
                description,
            )?;
            self.post_transaction(&db_tx, &account, &tx, Guard::Full)
                .await?;

            let (remaining, status) = debt.after_payment(cmd.amount);
            let result = debts::Entity::update_many()
                .col_expr(debts::Column::RemainingAmount, Expr::value(remaining.cents()))
                .col_expr(debts::Column::Status, Expr::value(status.as_str()))
                .filter(debts::Column::Id.eq(debt.id))
                .filter(debts::Column::RemainingAmount.eq(debt.remaining_amount.cents()))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                let latest = self.require_debt(&db_tx, user_id, debt_id).await?;
                if cmd.amount > latest.remaining_amount {
                    return Err(EngineError::OverPayment(format!(
                        "payment {} exceeds remaining {}",
                        cmd.amount, latest.remaining_amount
                    )));
                }
                return Err(EngineError::Conflict(format!(
                    "debt {debt_id} changed concurrently"
                )));
            }

            let debt = Debt {
                remaining_amount: remaining,
                status,
                ..debt
            };

            let payment = DebtPayment {
                id: Uuid::new_v4(),
                debt_id: debt.id,
                amount: cmd.amount,
                date: cmd.date,
                notes: normalize_text(&cmd.notes),
                account_id: Some(account.id),
                transaction_id: Some(tx.id),
            };
            debt_payments::ActiveModel::from(&payment)
                .insert(&db_tx)
                .await?;
            Ok((debt, payment))
        })?;
        tracing::debug!(
            %debt_id,
            amount = %payment.amount,
            remaining = %debt.remaining_amount,
            status = debt.status.as_str(),
            "debt payment applied"
        );
        Ok((debt, payment))
    }

    /// Edits the descriptive fields of a debt.
    pub async fn update_debt(
        &self,
        user_id: Uuid,
        debt_id: Uuid,
        update: DebtUpdate,
    ) -> ResultEngine<Debt> {
        let counterpart_name = update
            .counterpart_name
            .as_deref()
            .map(|name| normalize_required_name(name, "counterpart"))
            .transpose()?;
        with_tx!(self, |db_tx| {
            let mut debt = self.require_debt(&db_tx, user_id, debt_id).await?;
            let mut active = debts::ActiveModel {
                id: ActiveValue::Unchanged(debt.id),
                ..Default::default()
            };
            if let Some(name) = counterpart_name {
                active.counterpart_name = ActiveValue::Set(name.clone());
                debt.counterpart_name = name;
            }
            if let Some(description) = update.description.as_deref() {
                let description = normalize_text(description);
                active.description = ActiveValue::Set(description.clone());
                debt.description = description;
            }
            if active.is_changed() {
                active.update(&db_tx).await?;
            }
            Ok(debt)
        })
    }

    /// Deletes a debt and its payments.
    ///
    /// For an `Owed` debt funded from a still existing account, the part not
    /// yet repaid goes back into the account, traced by a
    /// `Loan to {counterpart} cancelled` transaction dated `today`.
    pub async fn delete_debt(
        &self,
        user_id: Uuid,
        debt_id: Uuid,
        today: NaiveDate,
    ) -> ResultEngine<()> {
        let (debt, refunded) = with_tx!(self, |db_tx| {
            let debt = self.require_debt(&db_tx, user_id, debt_id).await?;

            let mut refunded = None;
            if debt.polarity == DebtPolarity::Owed
                && debt.remaining_amount.is_positive()
                && let Some(account_id) = debt.account_id
                && let Some(account) = self.find_account(&db_tx, user_id, account_id).await?
            {
                let reversal = Transaction::new(
                    user_id,
                    account.id,
                    TransactionKind::Income,
                    debt.remaining_amount,
                    today,
                    format!("Loan to {} cancelled", debt.counterpart_name),
                )?;
                self.post_transaction(&db_tx, &account, &reversal, Guard::Unguarded)
                    .await?;
                refunded = Some((account.id, reversal.id));
            }

            debt_payments::Entity::delete_many()
                .filter(debt_payments::Column::DebtId.eq(debt.id))
                .exec(&db_tx)
                .await?;
            debts::Entity::delete_by_id(debt.id).exec(&db_tx).await?;
            Ok((debt, refunded))
        })?;

        tracing::debug!(%debt_id, refunded = refunded.is_some(), "debt deleted");
        let mut details = json!({
            "debt_id": debt.id,
            "counterpart_name": debt.counterpart_name,
            "polarity": debt.polarity.as_str(),
            "original_amount": debt.original_amount.cents(),
            "remaining_amount": debt.remaining_amount.cents(),
            "paid_amount": debt.paid_amount().cents(),
        });
        if let Some((account_id, transaction_id)) = refunded {
            details["refund_account_id"] = json!(account_id);
            details["refund_transaction_id"] = json!(transaction_id);
        }
        self.record_audit(
            AuditEntry::new("debt.deleted")
                .user_id(user_id)
                .details(details),
        )
        .await;
        Ok(())
    }

    pub async fn debt(&self, user_id: Uuid, debt_id: Uuid) -> ResultEngine<DebtDetails> {
        with_tx!(self, |db_tx| {
            let debt = self.require_debt(&db_tx, user_id, debt_id).await?;
            let payments = debt_payments::Entity::find()
                .filter(debt_payments::Column::DebtId.eq(debt.id))
                .order_by_asc(debt_payments::Column::Date)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(DebtPayment::from)
                .collect();
            Ok(DebtDetails { debt, payments })
        })
    }

    /// Debts of a user, most recent first.
    pub async fn debts(&self, user_id: Uuid) -> ResultEngine<Vec<Debt>> {
        with_tx!(self, |db_tx| {
            debts::Entity::find()
                .filter(debts::Column::UserId.eq(user_id))
                .order_by_desc(debts::Column::Date)
                .order_by_desc(debts::Column::CreatedAt)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Debt::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Fails with `InvalidDebt` when `transaction_id` funded a loan or paid
    /// a debt. Those rows move only through the debt that owns them.
    pub(super) async fn require_not_debt_linked(
        &self,
        db: &DatabaseTransaction,
        transaction_id: Uuid,
    ) -> ResultEngine<()> {
        let loan = debts::Entity::find()
            .filter(debts::Column::LoanTransactionId.eq(transaction_id))
            .one(db)
            .await?;
        let payment = debt_payments::Entity::find()
            .filter(debt_payments::Column::TransactionId.eq(transaction_id))
            .one(db)
            .await?;
        if loan.is_some() || payment.is_some() {
            return Err(EngineError::InvalidDebt(format!(
                "transaction {transaction_id} belongs to a debt; change the debt instead"
            )));
        }
        Ok(())
    }
}
