//! Ledger consistency engine.
//!
//! Keeps account balances, debt remaining amounts, savings goal progress and
//! the transaction history consistent while money moves between them. Every
//! operation is a method on [`Engine`] and runs inside a single database
//! transaction.

use serde::{Deserialize, Serialize};

pub use accounts::{Account, AccountKind, AccountSubtype};
pub use audit_logs::{AuditEntry, AuditRecord};
pub use balance::{Guard, balance_delta, check_guard};
pub use budgets::{Budget, BudgetStatus};
pub use categories::Category;
pub use commands::{
    AccountUpdate, ContributionCmd, DebtPaymentCmd, DebtUpdate, GoalUpdate, NewAccount,
    NewBudget, NewCategory, NewDebt, NewGoal, NewRecurring, NewTransaction, RecurringUpdate,
    TransactionUpdate, TransferCmd,
};
pub use debt_payments::DebtPayment;
pub use debts::{Debt, DebtPolarity, DebtStatus};
pub use error::EngineError;
pub use goal_contributions::GoalContribution;
pub use goals::{GoalProgress, GoalProjection};
pub use money::MoneyCents;
pub use ops::{
    DebtDetails, Engine, EngineBuilder, GoalView, RecurringExecution, Summary,
    TransactionListFilter,
};
pub use recurring_expenses::{Frequency, RecurringExpense, next_occurrence};
pub use recurring_payments::RecurringPayment;
pub use savings_goals::{GoalStatus, QuotaFrequency, SavingsGoal};
pub use transactions::{Transaction, TransactionKind};
pub use users::User;

mod accounts;
mod audit_logs;
mod balance;
mod budgets;
mod categories;
mod commands;
mod debt_payments;
mod debts;
mod error;
mod goal_contributions;
mod goals;
mod money;
mod ops;
mod recurring_expenses;
mod recurring_payments;
mod savings_goals;
mod transactions;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;

/// Tunables of the read side. Passed to [`EngineBuilder::settings`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSettings {
    /// How many days ahead the summary looks for recurring charges.
    pub upcoming_window_days: u32,
    /// How many transactions the summary lists.
    pub recent_transactions: u64,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            upcoming_window_days: 7,
            recent_transactions: 5,
        }
    }
}
