use chrono::{Datelike, Days, NaiveDate};
use sea_orm::{QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Account, AccountKind, Debt, DebtPolarity, DebtStatus, MoneyCents, RecurringExpense,
    ResultEngine, Transaction, TransactionKind, accounts, debts, recurring_expenses,
    transactions, util::month_range,
};

use super::{Engine, with_tx};

/// Dashboard snapshot of a user's finances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Sum of debit account balances.
    pub total_assets: MoneyCents,
    /// Sum of credit account balances (owed on cards).
    pub total_debt: MoneyCents,
    pub net_balance: MoneyCents,
    /// Income of the current month, transfers excluded.
    pub income_month: MoneyCents,
    /// Expenses of the current month, transfers excluded.
    pub expense_month: MoneyCents,
    /// Remaining on active debts I owe.
    pub debts_owed_by_me: MoneyCents,
    /// Remaining on active debts owed to me.
    pub debts_owed_to_me: MoneyCents,
    pub accounts: Vec<Account>,
    /// Active recurring expenses due within the upcoming window.
    pub upcoming_recurring: Vec<RecurringExpense>,
    pub recent_transactions: Vec<Transaction>,
}

impl Engine {
    /// Builds the dashboard as of `today`.
    ///
    /// The upcoming window and the number of recent transactions come from
    /// [`LedgerSettings`](crate::LedgerSettings).
    pub async fn summary(&self, user_id: Uuid, today: NaiveDate) -> ResultEngine<Summary> {
        let (month_start, month_end) = month_range(today.year(), today.month())?;
        let window_end = today
            .checked_add_days(Days::new(u64::from(self.settings.upcoming_window_days)))
            .unwrap_or(NaiveDate::MAX);

        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;

            let accounts = accounts::Entity::find()
                .filter(accounts::Column::UserId.eq(user_id))
                .order_by_asc(accounts::Column::CreatedAt)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Account::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;
            let total_of = |kind: AccountKind| -> MoneyCents {
                accounts
                    .iter()
                    .filter(|a| a.kind == kind)
                    .map(|a| a.balance)
                    .sum()
            };
            let total_assets = total_of(AccountKind::Debit);
            let total_debt = total_of(AccountKind::Credit);

            let month_rows = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id))
                .filter(transactions::Column::TransferPairId.is_null())
                .filter(transactions::Column::Date.gte(month_start))
                .filter(transactions::Column::Date.lt(month_end))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Transaction::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;
            let month_total = |kind: TransactionKind| -> MoneyCents {
                month_rows
                    .iter()
                    .filter(|t| t.kind == kind)
                    .map(|t| t.amount)
                    .sum()
            };

            let active_debts = debts::Entity::find()
                .filter(debts::Column::UserId.eq(user_id))
                .filter(debts::Column::Status.eq(DebtStatus::Active.as_str()))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Debt::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;
            let debt_total = |polarity: DebtPolarity| -> MoneyCents {
                active_debts
                    .iter()
                    .filter(|d| d.polarity == polarity)
                    .map(|d| d.remaining_amount)
                    .sum()
            };

            let upcoming_recurring = recurring_expenses::Entity::find()
                .filter(recurring_expenses::Column::UserId.eq(user_id))
                .filter(recurring_expenses::Column::IsActive.eq(true))
                .filter(recurring_expenses::Column::NextDate.gte(today))
                .filter(recurring_expenses::Column::NextDate.lte(window_end))
                .order_by_asc(recurring_expenses::Column::NextDate)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(RecurringExpense::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            let recent_transactions = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id))
                .order_by_desc(transactions::Column::Date)
                .order_by_desc(transactions::Column::CreatedAt)
                .limit(self.settings.recent_transactions)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Transaction::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            Ok(Summary {
                total_assets,
                total_debt,
                net_balance: total_assets - total_debt,
                income_month: month_total(TransactionKind::Income),
                expense_month: month_total(TransactionKind::Expense),
                debts_owed_by_me: debt_total(DebtPolarity::Owe),
                debts_owed_to_me: debt_total(DebtPolarity::Owed),
                accounts,
                upcoming_recurring,
                recent_transactions,
            })
        })
    }
}
