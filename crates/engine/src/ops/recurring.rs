use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Guard, NewRecurring, RecurringExpense, RecurringPayment, RecurringUpdate,
    ResultEngine, Transaction, TransactionKind, next_occurrence, recurring_expenses,
    recurring_payments, util::require_positive,
};

use super::{Engine, normalize_required_name, with_tx};

/// Outcome of one execution of a recurring expense.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringExecution {
    pub payment: RecurringPayment,
    pub transaction: Transaction,
    pub next_date: NaiveDate,
}

fn validate_day_of_charge(day: u32) -> ResultEngine<()> {
    if !(1..=31).contains(&day) {
        return Err(EngineError::InvalidValue(format!(
            "day of charge must be within 1..=31, got {day}"
        )));
    }
    Ok(())
}

impl Engine {
    pub async fn new_recurring(
        &self,
        user_id: Uuid,
        cmd: NewRecurring,
    ) -> ResultEngine<RecurringExpense> {
        require_positive(cmd.amount, "recurring amount")?;
        validate_day_of_charge(cmd.day_of_charge)?;
        let name = normalize_required_name(&cmd.name, "recurring expense")?;
        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, user_id, cmd.account_id).await?;
            self.require_optional_category(&db_tx, user_id, cmd.category_id)
                .await?;

            let expense = RecurringExpense {
                id: Uuid::new_v4(),
                user_id,
                account_id: cmd.account_id,
                category_id: cmd.category_id,
                name,
                amount: cmd.amount,
                frequency: cmd.frequency,
                day_of_charge: cmd.day_of_charge,
                next_date: cmd.next_date,
                is_active: true,
                created_at: Utc::now(),
            };
            recurring_expenses::ActiveModel::from(&expense)
                .insert(&db_tx)
                .await?;
            Ok(expense)
        })
    }

    pub async fn update_recurring(
        &self,
        user_id: Uuid,
        recurring_id: Uuid,
        update: RecurringUpdate,
    ) -> ResultEngine<RecurringExpense> {
        if let Some(amount) = update.amount {
            require_positive(amount, "recurring amount")?;
        }
        if let Some(day) = update.day_of_charge {
            validate_day_of_charge(day)?;
        }
        let name = update
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "recurring expense"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let mut expense = self
                .require_recurring(&db_tx, user_id, recurring_id)
                .await?;
            if let Some(account_id) = update.account_id {
                self.require_account(&db_tx, user_id, account_id).await?;
                expense.account_id = account_id;
            }
            if let Some(category_id) = update.category_id {
                self.require_optional_category(&db_tx, user_id, category_id)
                    .await?;
                expense.category_id = category_id;
            }
            if let Some(name) = name {
                expense.name = name;
            }
            if let Some(amount) = update.amount {
                expense.amount = amount;
            }
            if let Some(frequency) = update.frequency {
                expense.frequency = frequency;
            }
            if let Some(day) = update.day_of_charge {
                expense.day_of_charge = day;
            }
            if let Some(next_date) = update.next_date {
                expense.next_date = next_date;
            }
            if let Some(is_active) = update.is_active {
                expense.is_active = is_active;
            }

            let mut active = recurring_expenses::ActiveModel::from(&expense);
            active.id = ActiveValue::Unchanged(expense.id);
            active.user_id = ActiveValue::Unchanged(expense.user_id);
            active.created_at = ActiveValue::Unchanged(expense.created_at);
            active.update(&db_tx).await?;
            Ok(expense)
        })
    }

    pub async fn delete_recurring(&self, user_id: Uuid, recurring_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_recurring(&db_tx, user_id, recurring_id)
                .await?;
            recurring_expenses::Entity::delete_by_id(recurring_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    pub async fn recurring_expense(
        &self,
        user_id: Uuid,
        recurring_id: Uuid,
    ) -> ResultEngine<RecurringExpense> {
        with_tx!(self, |db_tx| {
            self.require_recurring(&db_tx, user_id, recurring_id).await
        })
    }

    /// Recurring expenses of a user, next charge first.
    pub async fn recurring(&self, user_id: Uuid) -> ResultEngine<Vec<RecurringExpense>> {
        with_tx!(self, |db_tx| {
            recurring_expenses::Entity::find()
                .filter(recurring_expenses::Column::UserId.eq(user_id))
                .order_by_asc(recurring_expenses::Column::NextDate)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(RecurringExpense::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Active recurring expenses of a user charged on or before `as_of`.
    pub async fn due_recurring(
        &self,
        user_id: Uuid,
        as_of: NaiveDate,
    ) -> ResultEngine<Vec<RecurringExpense>> {
        self.find_due_recurring(Some(user_id), as_of).await
    }

    /// Active recurring expenses of every user charged on or before `as_of`.
    ///
    /// This is what a scheduler walks before calling
    /// [`Engine::execute_recurring`] on each entry.
    pub async fn all_due_recurring(&self, as_of: NaiveDate) -> ResultEngine<Vec<RecurringExpense>> {
        self.find_due_recurring(None, as_of).await
    }

    async fn find_due_recurring(
        &self,
        user_id: Option<Uuid>,
        as_of: NaiveDate,
    ) -> ResultEngine<Vec<RecurringExpense>> {
        with_tx!(self, |db_tx| {
            let mut query = recurring_expenses::Entity::find()
                .filter(recurring_expenses::Column::IsActive.eq(true))
                .filter(recurring_expenses::Column::NextDate.lte(as_of));
            if let Some(user_id) = user_id {
                query = query.filter(recurring_expenses::Column::UserId.eq(user_id));
            }
            query
                .order_by_asc(recurring_expenses::Column::NextDate)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(RecurringExpense::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Charges one occurrence of a recurring expense.
    ///
    /// Creates a `Recurring payment: {name}` expense dated `today` on the
    /// expense's account, records the execution and moves `next_date` one
    /// period forward from its previous value.
    ///
    /// `is_active` is not checked here: callers pick what to execute, usually
    /// from [`Engine::due_recurring`].
    pub async fn execute_recurring(
        &self,
        user_id: Uuid,
        recurring_id: Uuid,
        today: NaiveDate,
    ) -> ResultEngine<RecurringExecution> {
        let execution = with_tx!(self, |db_tx| {
            let expense = self
                .require_recurring(&db_tx, user_id, recurring_id)
                .await?;
            let account = self
                .require_account(&db_tx, user_id, expense.account_id)
                .await?;

            let tx = Transaction::new(
                user_id,
                account.id,
                TransactionKind::Expense,
                expense.amount,
                today,
                format!("Recurring payment: {}", expense.name),
            )?
            .with_category(expense.category_id);
            self.post_transaction(&db_tx, &account, &tx, Guard::CreditLimit)
                .await?;

            let payment = RecurringPayment {
                id: Uuid::new_v4(),
                recurring_expense_id: expense.id,
                paid_date: today,
                amount: expense.amount,
                transaction_id: Some(tx.id),
            };
            recurring_payments::ActiveModel::from(&payment)
                .insert(&db_tx)
                .await?;

            let next_date = next_occurrence(expense.next_date, expense.frequency);
            recurring_expenses::ActiveModel {
                id: ActiveValue::Unchanged(expense.id),
                next_date: ActiveValue::Set(next_date),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;

            Ok(RecurringExecution {
                payment,
                transaction: tx,
                next_date,
            })
        })?;
        tracing::debug!(
            %recurring_id,
            amount = %execution.payment.amount,
            next_date = %execution.next_date,
            "recurring expense executed"
        );
        Ok(execution)
    }

    /// Executions of a recurring expense, most recent first.
    pub async fn recurring_payments(
        &self,
        user_id: Uuid,
        recurring_id: Uuid,
    ) -> ResultEngine<Vec<RecurringPayment>> {
        with_tx!(self, |db_tx| {
            self.require_recurring(&db_tx, user_id, recurring_id)
                .await?;
            let models = recurring_payments::Entity::find()
                .filter(recurring_payments::Column::RecurringExpenseId.eq(recurring_id))
                .order_by_desc(recurring_payments::Column::PaidDate)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(RecurringPayment::from).collect())
        })
    }
}
