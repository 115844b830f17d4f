use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    Account, AccountKind, EngineError, Guard, MoneyCents, ResultEngine, TransactionKind, accounts,
    balance_delta, check_guard,
};

use super::Engine;

impl Engine {
    /// Applies the balance effect of `operation` for `amount` to an account
    /// and returns the new balance.
    ///
    /// The write is a relative `balance = balance + delta` whose filter
    /// repeats the guard bound, so a concurrent writer can neither be
    /// overwritten nor push the account past its limits. If the guarded
    /// update matches no row, the account is re-read to report the precise
    /// failure; a row that still passes the guard means the race was lost and
    /// yields [`EngineError::Conflict`].
    pub(super) async fn apply_balance(
        &self,
        db: &DatabaseTransaction,
        account: &Account,
        operation: TransactionKind,
        amount: MoneyCents,
        reverse: bool,
        guard: Guard,
    ) -> ResultEngine<MoneyCents> {
        let delta = balance_delta(account.kind, operation, amount, reverse);
        if delta.is_zero() {
            return Ok(account.balance);
        }

        let current = self.reload_account(db, account.id).await?;
        let next = current.balance.try_add(delta)?;
        check_guard(
            current.kind,
            current.balance,
            current.credit_limit,
            delta,
            guard,
        )?;

        let mut update = accounts::Entity::update_many()
            .col_expr(
                accounts::Column::Balance,
                Expr::col(accounts::Column::Balance).add(delta.cents()),
            )
            .filter(accounts::Column::Id.eq(current.id));
        if let Some(bound) = guard_bound(&current, delta, guard) {
            update = match current.kind {
                AccountKind::Credit => update.filter(accounts::Column::Balance.lte(bound.cents())),
                AccountKind::Debit => update.filter(accounts::Column::Balance.gte(bound.cents())),
            };
        }

        let result = update.exec(db).await?;
        if result.rows_affected == 0 {
            let latest = self.reload_account(db, current.id).await?;
            check_guard(
                latest.kind,
                latest.balance,
                latest.credit_limit,
                delta,
                guard,
            )?;
            return Err(EngineError::Conflict(format!(
                "balance of account {} changed concurrently",
                current.id
            )));
        }

        Ok(next)
    }

    async fn reload_account(
        &self,
        db: &DatabaseTransaction,
        account_id: Uuid,
    ) -> ResultEngine<Account> {
        accounts::Entity::find_by_id(account_id)
            .one(db)
            .await?
            .map(Account::try_from)
            .transpose()?
            .ok_or_else(|| EngineError::NotFound("account not exists".to_string()))
    }
}

/// The balance the row must still satisfy for `delta` to pass `guard`:
/// an upper bound on credit accounts, a lower bound on debit accounts.
fn guard_bound(account: &Account, delta: MoneyCents, guard: Guard) -> Option<MoneyCents> {
    match (account.kind, guard) {
        (_, Guard::Unguarded) => None,
        (AccountKind::Credit, _) if delta.is_positive() => account
            .credit_limit
            .and_then(|limit| limit.checked_sub(delta)),
        (AccountKind::Debit, Guard::Full) if delta.is_negative() => Some(-delta),
        _ => None,
    }
}
