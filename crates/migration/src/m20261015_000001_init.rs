//! Initial schema.
//!
//! - `users`: tenant root, every other row is removed with its owner
//! - `accounts`: debit and credit accounts with their running balance
//! - `categories`: income/expense labels
//! - `transactions`: the ledger, one row per balance movement
//! - `budgets`: monthly limit per category
//! - `recurring_expenses` / `recurring_payments`: scheduled charges and their executions
//! - `debts` / `debt_payments`: money owed in both directions
//! - `savings_goals` / `goal_contributions`: wishlist goals
//! - `audit_logs`: append-only audit trail
//!
//! UUIDs are stored as 16-byte blobs, money as integer cents.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    UserId,
    Name,
    Kind,
    Subtype,
    Balance,
    CreditLimit,
    Color,
    CreatedAt,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    UserId,
    Name,
    Kind,
    Color,
    Icon,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    UserId,
    AccountId,
    CategoryId,
    Kind,
    AmountMinor,
    Date,
    Description,
    TransferPairId,
    CreatedAt,
}

#[derive(Iden)]
enum Budgets {
    Table,
    Id,
    UserId,
    CategoryId,
    Month,
    Year,
    LimitAmount,
    CreatedAt,
}

#[derive(Iden)]
enum RecurringExpenses {
    Table,
    Id,
    UserId,
    AccountId,
    CategoryId,
    Name,
    Amount,
    Frequency,
    DayOfCharge,
    NextDate,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum RecurringPayments {
    Table,
    Id,
    RecurringExpenseId,
    PaidDate,
    Amount,
    TransactionId,
}

#[derive(Iden)]
enum Debts {
    Table,
    Id,
    UserId,
    Polarity,
    CounterpartName,
    Description,
    Date,
    OriginalAmount,
    RemainingAmount,
    Status,
    AccountId,
    LoanTransactionId,
    CreatedAt,
}

#[derive(Iden)]
enum DebtPayments {
    Table,
    Id,
    DebtId,
    Amount,
    Date,
    Notes,
    AccountId,
    TransactionId,
}

#[derive(Iden)]
enum SavingsGoals {
    Table,
    Id,
    UserId,
    Name,
    Description,
    Color,
    TargetAmount,
    QuotaAmount,
    Frequency,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum GoalContributions {
    Table,
    Id,
    GoalId,
    Amount,
    Date,
    Notes,
    IsQuotaPayment,
}

#[derive(Iden)]
enum AuditLogs {
    Table,
    Id,
    Action,
    UserId,
    Ip,
    Details,
    CreatedAt,
}

fn id_column<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name).blob().not_null().primary_key().to_owned()
}

fn owner_fk<T: IntoIden + 'static, C: IntoIden + 'static>(
    name: &str,
    table: T,
    column: C,
) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(table, column)
        .to(Users::Table, Users::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(id_column(Users::Id))
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Accounts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(id_column(Accounts::Id))
                    .col(ColumnDef::new(Accounts::UserId).blob().not_null())
                    .col(ColumnDef::new(Accounts::Name).string().not_null())
                    .col(ColumnDef::new(Accounts::Kind).string().not_null())
                    .col(ColumnDef::new(Accounts::Subtype).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::Balance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Accounts::CreditLimit).big_integer())
                    .col(ColumnDef::new(Accounts::Color).string().not_null())
                    .col(ColumnDef::new(Accounts::CreatedAt).timestamp().not_null())
                    .foreign_key(&mut owner_fk(
                        "fk-accounts-user_id",
                        Accounts::Table,
                        Accounts::UserId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-accounts-user_id")
                    .table(Accounts::Table)
                    .col(Accounts::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Categories
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(id_column(Categories::Id))
                    .col(ColumnDef::new(Categories::UserId).blob().not_null())
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(ColumnDef::new(Categories::Kind).string().not_null())
                    .col(ColumnDef::new(Categories::Color).string().not_null())
                    .col(ColumnDef::new(Categories::Icon).string().not_null())
                    .foreign_key(&mut owner_fk(
                        "fk-categories-user_id",
                        Categories::Table,
                        Categories::UserId,
                    ))
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(id_column(Transactions::Id))
                    .col(ColumnDef::new(Transactions::UserId).blob().not_null())
                    .col(ColumnDef::new(Transactions::AccountId).blob().not_null())
                    .col(ColumnDef::new(Transactions::CategoryId).blob())
                    .col(ColumnDef::new(Transactions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Date).date().not_null())
                    .col(
                        ColumnDef::new(Transactions::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Transactions::TransferPairId).blob())
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(&mut owner_fk(
                        "fk-transactions-user_id",
                        Transactions::Table,
                        Transactions::UserId,
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-account_id")
                            .from(Transactions::Table, Transactions::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-category_id")
                            .from(Transactions::Table, Transactions::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-user_id-date")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-account_id")
                    .table(Transactions::Table)
                    .col(Transactions::AccountId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Budgets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Budgets::Table)
                    .if_not_exists()
                    .col(id_column(Budgets::Id))
                    .col(ColumnDef::new(Budgets::UserId).blob().not_null())
                    .col(ColumnDef::new(Budgets::CategoryId).blob().not_null())
                    .col(ColumnDef::new(Budgets::Month).integer().not_null())
                    .col(ColumnDef::new(Budgets::Year).integer().not_null())
                    .col(ColumnDef::new(Budgets::LimitAmount).big_integer().not_null())
                    .col(ColumnDef::new(Budgets::CreatedAt).timestamp().not_null())
                    .foreign_key(&mut owner_fk(
                        "fk-budgets-user_id",
                        Budgets::Table,
                        Budgets::UserId,
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budgets-category_id")
                            .from(Budgets::Table, Budgets::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-budgets-user_id-category_id-month-year-unique")
                    .table(Budgets::Table)
                    .col(Budgets::UserId)
                    .col(Budgets::CategoryId)
                    .col(Budgets::Month)
                    .col(Budgets::Year)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Recurring expenses and their executions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(RecurringExpenses::Table)
                    .if_not_exists()
                    .col(id_column(RecurringExpenses::Id))
                    .col(ColumnDef::new(RecurringExpenses::UserId).blob().not_null())
                    .col(
                        ColumnDef::new(RecurringExpenses::AccountId)
                            .blob()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RecurringExpenses::CategoryId).blob())
                    .col(ColumnDef::new(RecurringExpenses::Name).string().not_null())
                    .col(
                        ColumnDef::new(RecurringExpenses::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecurringExpenses::Frequency)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecurringExpenses::DayOfCharge)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecurringExpenses::NextDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecurringExpenses::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(RecurringExpenses::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(&mut owner_fk(
                        "fk-recurring_expenses-user_id",
                        RecurringExpenses::Table,
                        RecurringExpenses::UserId,
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recurring_expenses-account_id")
                            .from(RecurringExpenses::Table, RecurringExpenses::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recurring_expenses-category_id")
                            .from(RecurringExpenses::Table, RecurringExpenses::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RecurringPayments::Table)
                    .if_not_exists()
                    .col(id_column(RecurringPayments::Id))
                    .col(
                        ColumnDef::new(RecurringPayments::RecurringExpenseId)
                            .blob()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecurringPayments::PaidDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecurringPayments::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RecurringPayments::TransactionId).blob())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recurring_payments-recurring_expense_id")
                            .from(
                                RecurringPayments::Table,
                                RecurringPayments::RecurringExpenseId,
                            )
                            .to(RecurringExpenses::Table, RecurringExpenses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recurring_payments-transaction_id")
                            .from(RecurringPayments::Table, RecurringPayments::TransactionId)
                            .to(Transactions::Table, Transactions::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Debts and payments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Debts::Table)
                    .if_not_exists()
                    .col(id_column(Debts::Id))
                    .col(ColumnDef::new(Debts::UserId).blob().not_null())
                    .col(ColumnDef::new(Debts::Polarity).string().not_null())
                    .col(ColumnDef::new(Debts::CounterpartName).string().not_null())
                    .col(
                        ColumnDef::new(Debts::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Debts::Date).date().not_null())
                    .col(
                        ColumnDef::new(Debts::OriginalAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Debts::RemainingAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Debts::Status).string().not_null())
                    .col(ColumnDef::new(Debts::AccountId).blob())
                    .col(ColumnDef::new(Debts::LoanTransactionId).blob())
                    .col(ColumnDef::new(Debts::CreatedAt).timestamp().not_null())
                    .foreign_key(&mut owner_fk(
                        "fk-debts-user_id",
                        Debts::Table,
                        Debts::UserId,
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-debts-account_id")
                            .from(Debts::Table, Debts::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-debts-loan_transaction_id")
                            .from(Debts::Table, Debts::LoanTransactionId)
                            .to(Transactions::Table, Transactions::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DebtPayments::Table)
                    .if_not_exists()
                    .col(id_column(DebtPayments::Id))
                    .col(ColumnDef::new(DebtPayments::DebtId).blob().not_null())
                    .col(ColumnDef::new(DebtPayments::Amount).big_integer().not_null())
                    .col(ColumnDef::new(DebtPayments::Date).date().not_null())
                    .col(
                        ColumnDef::new(DebtPayments::Notes)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(DebtPayments::AccountId).blob())
                    .col(ColumnDef::new(DebtPayments::TransactionId).blob())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-debt_payments-debt_id")
                            .from(DebtPayments::Table, DebtPayments::DebtId)
                            .to(Debts::Table, Debts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-debt_payments-account_id")
                            .from(DebtPayments::Table, DebtPayments::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-debt_payments-transaction_id")
                            .from(DebtPayments::Table, DebtPayments::TransactionId)
                            .to(Transactions::Table, Transactions::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Savings goals and contributions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(SavingsGoals::Table)
                    .if_not_exists()
                    .col(id_column(SavingsGoals::Id))
                    .col(ColumnDef::new(SavingsGoals::UserId).blob().not_null())
                    .col(ColumnDef::new(SavingsGoals::Name).string().not_null())
                    .col(
                        ColumnDef::new(SavingsGoals::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(SavingsGoals::Color).string().not_null())
                    .col(
                        ColumnDef::new(SavingsGoals::TargetAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SavingsGoals::QuotaAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(SavingsGoals::Frequency).string().not_null())
                    .col(ColumnDef::new(SavingsGoals::Status).string().not_null())
                    .col(
                        ColumnDef::new(SavingsGoals::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(&mut owner_fk(
                        "fk-savings_goals-user_id",
                        SavingsGoals::Table,
                        SavingsGoals::UserId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GoalContributions::Table)
                    .if_not_exists()
                    .col(id_column(GoalContributions::Id))
                    .col(ColumnDef::new(GoalContributions::GoalId).blob().not_null())
                    .col(
                        ColumnDef::new(GoalContributions::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GoalContributions::Date).date().not_null())
                    .col(
                        ColumnDef::new(GoalContributions::Notes)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(GoalContributions::IsQuotaPayment)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-goal_contributions-goal_id")
                            .from(GoalContributions::Table, GoalContributions::GoalId)
                            .to(SavingsGoals::Table, SavingsGoals::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 9. Audit log
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(id_column(AuditLogs::Id))
                    .col(ColumnDef::new(AuditLogs::Action).string().not_null())
                    .col(ColumnDef::new(AuditLogs::UserId).blob())
                    .col(ColumnDef::new(AuditLogs::Ip).string())
                    .col(ColumnDef::new(AuditLogs::Details).text())
                    .col(ColumnDef::new(AuditLogs::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-audit_logs-user_id")
                            .from(AuditLogs::Table, AuditLogs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse creation order so foreign keys never dangle.
        manager
            .drop_table(Table::drop().table(AuditLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GoalContributions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SavingsGoals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DebtPayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Debts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecurringPayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecurringExpenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Budgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
