//! Transaction ledger operations.
//!
//! Every write pairs a ledger row with its balance effect inside the same
//! database transaction. Reversals run unguarded so that undoing an accepted
//! movement can never fail on a limit.

use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Account, EngineError, Guard, NewTransaction, ResultEngine, Transaction, TransactionKind,
    TransactionUpdate, TransferCmd, transactions, util::require_positive,
};

use super::{Engine, normalize_text, with_tx};

/// Filters for [`Engine::transactions`]. Dates are inclusive.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransactionListFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
    pub kind: Option<TransactionKind>,
    pub account_id: Option<Uuid>,
    /// Maximum number of rows, newest first.
    pub limit: Option<u64>,
}

fn validate_list_filter(filter: &TransactionListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from > to
    {
        return Err(EngineError::InvalidValue(
            "invalid range: from must be <= to".to_string(),
        ));
    }
    if filter.limit == Some(0) {
        return Err(EngineError::InvalidValue(
            "limit must be > 0".to_string(),
        ));
    }
    Ok(())
}

trait ApplyTxFilters {
    fn apply_tx_filters(self, filter: &TransactionListFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionListFilter) -> Self {
        if let Some(from) = filter.from {
            self = self.filter(transactions::Column::Date.gte(from));
        }
        if let Some(to) = filter.to {
            self = self.filter(transactions::Column::Date.lte(to));
        }
        if let Some(category_id) = filter.category_id {
            self = self.filter(transactions::Column::CategoryId.eq(category_id));
        }
        if let Some(kind) = filter.kind {
            self = self.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(account_id) = filter.account_id {
            self = self.filter(transactions::Column::AccountId.eq(account_id));
        }
        self
    }
}

impl Engine {
    /// Applies the balance effect of `tx` to `account` under `guard` and
    /// stores the ledger row.
    pub(super) async fn post_transaction(
        &self,
        db: &DatabaseTransaction,
        account: &Account,
        tx: &Transaction,
        guard: Guard,
    ) -> ResultEngine<()> {
        self.apply_balance(db, account, tx.kind, tx.amount, false, guard)
            .await?;
        transactions::ActiveModel::from(tx).insert(db).await?;
        Ok(())
    }

    /// Undoes the balance effect of `tx` if its account still exists.
    async fn reverse_transaction_effect(
        &self,
        db: &DatabaseTransaction,
        tx: &Transaction,
    ) -> ResultEngine<()> {
        match self.find_account(db, tx.user_id, tx.account_id).await? {
            Some(account) => {
                self.apply_balance(db, &account, tx.kind, tx.amount, true, Guard::Unguarded)
                    .await?;
            }
            None => {
                tracing::debug!(
                    transaction_id = %tx.id,
                    account_id = %tx.account_id,
                    "account gone, skipping balance reversal"
                );
            }
        }
        Ok(())
    }

    /// Records an income or an expense and moves the account balance.
    ///
    /// A credit account may not go above its limit.
    pub async fn create_transaction(
        &self,
        user_id: Uuid,
        cmd: NewTransaction,
    ) -> ResultEngine<Transaction> {
        require_positive(cmd.amount, "transaction amount")?;
        let tx = with_tx!(self, |db_tx| {
            let account = self.require_account(&db_tx, user_id, cmd.account_id).await?;
            self.require_optional_category(&db_tx, user_id, cmd.category_id)
                .await?;

            let tx = Transaction::new(
                user_id,
                account.id,
                cmd.kind,
                cmd.amount,
                cmd.date,
                normalize_text(&cmd.description),
            )?
            .with_category(cmd.category_id);
            self.post_transaction(&db_tx, &account, &tx, Guard::CreditLimit)
                .await?;
            Ok(tx)
        })?;
        tracing::debug!(
            transaction_id = %tx.id,
            account_id = %tx.account_id,
            kind = tx.kind.as_str(),
            amount = %tx.amount,
            "transaction created"
        );
        Ok(tx)
    }

    /// Amends a transaction.
    ///
    /// When the account, kind or amount change, the old effect is reversed
    /// on the old account (skipped if that account is gone) and the new one
    /// applied on the new account, all in one database transaction. Transfer
    /// legs and transactions owned by a debt only accept metadata changes.
    pub async fn update_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
        update: TransactionUpdate,
    ) -> ResultEngine<Transaction> {
        if let Some(amount) = update.amount {
            require_positive(amount, "transaction amount")?;
        }
        with_tx!(self, |db_tx| {
            let existing = self
                .require_transaction(&db_tx, user_id, transaction_id)
                .await?;
            if existing.is_transfer_leg() && update.touches_balance() {
                return Err(EngineError::InvalidTransfer(
                    "transfer legs only accept date, description and category changes"
                        .to_string(),
                ));
            }
            if update.touches_balance() {
                self.require_not_debt_linked(&db_tx, existing.id).await?;
            }
            if let Some(category_id) = update.category_id {
                self.require_optional_category(&db_tx, user_id, category_id)
                    .await?;
            }

            let mut updated = existing.clone();
            if let Some(account_id) = update.account_id {
                updated.account_id = account_id;
            }
            if let Some(kind) = update.kind {
                updated.kind = kind;
            }
            if let Some(amount) = update.amount {
                updated.amount = amount;
            }
            if let Some(date) = update.date {
                updated.date = date;
            }
            if let Some(category_id) = update.category_id {
                updated.category_id = category_id;
            }
            if let Some(description) = update.description.as_deref() {
                updated.description = normalize_text(description);
            }

            if update.touches_balance() {
                let new_account = self
                    .require_account(&db_tx, user_id, updated.account_id)
                    .await?;
                self.reverse_transaction_effect(&db_tx, &existing).await?;
                self.apply_balance(
                    &db_tx,
                    &new_account,
                    updated.kind,
                    updated.amount,
                    false,
                    Guard::CreditLimit,
                )
                .await?;
            }

            transactions::ActiveModel {
                id: ActiveValue::Unchanged(updated.id),
                account_id: ActiveValue::Set(updated.account_id),
                category_id: ActiveValue::Set(updated.category_id),
                kind: ActiveValue::Set(updated.kind.as_str().to_string()),
                amount_minor: ActiveValue::Set(updated.amount.cents()),
                date: ActiveValue::Set(updated.date),
                description: ActiveValue::Set(updated.description.clone()),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;

            tracing::debug!(transaction_id = %updated.id, "transaction updated");
            Ok(updated)
        })
    }

    /// Deletes a transaction and reverses its balance effect.
    ///
    /// Deleting either leg of a transfer deletes both. Loan and debt payment
    /// transactions are removed through their debt only.
    pub async fn delete_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let existing = self
                .require_transaction(&db_tx, user_id, transaction_id)
                .await?;

            let mut legs = Vec::with_capacity(2);
            if let Some(pair_id) = existing.transfer_pair_id
                && let Some(pair) = self.find_transaction(&db_tx, user_id, pair_id).await?
            {
                legs.push(pair);
            }
            legs.push(existing);
            for leg in &legs {
                self.require_not_debt_linked(&db_tx, leg.id).await?;
            }

            for leg in &legs {
                self.reverse_transaction_effect(&db_tx, leg).await?;
            }
            transactions::Entity::delete_many()
                .filter(transactions::Column::Id.is_in(legs.iter().map(|leg| leg.id)))
                .exec(&db_tx)
                .await?;

            tracing::debug!(%transaction_id, legs = legs.len(), "transaction deleted");
            Ok(())
        })
    }

    /// Moves `amount` from one account to another.
    ///
    /// Produces an expense leg on the source and an income leg on the
    /// destination, linked through `transfer_pair_id`. The source may not
    /// exceed its credit limit.
    pub async fn transfer(
        &self,
        user_id: Uuid,
        cmd: TransferCmd,
    ) -> ResultEngine<(Transaction, Transaction)> {
        if cmd.from_account_id == cmd.to_account_id {
            return Err(EngineError::InvalidTransfer(
                "source and destination must differ".to_string(),
            ));
        }
        require_positive(cmd.amount, "transfer amount")?;
        let description = cmd
            .description
            .as_deref()
            .map(normalize_text)
            .filter(|d| !d.is_empty());

        let (leg_out, leg_in) = with_tx!(self, |db_tx| {
            let from = self
                .require_account(&db_tx, user_id, cmd.from_account_id)
                .await?;
            let to = self
                .require_account(&db_tx, user_id, cmd.to_account_id)
                .await?;

            let mut leg_out = Transaction::new(
                user_id,
                from.id,
                TransactionKind::Expense,
                cmd.amount,
                cmd.date,
                description
                    .clone()
                    .unwrap_or_else(|| format!("Transfer to {}", to.name)),
            )?;
            let mut leg_in = Transaction::new(
                user_id,
                to.id,
                TransactionKind::Income,
                cmd.amount,
                cmd.date,
                description
                    .clone()
                    .unwrap_or_else(|| format!("Transfer from {}", from.name)),
            )?;
            leg_out.transfer_pair_id = Some(leg_in.id);
            leg_in.transfer_pair_id = Some(leg_out.id);

            self.post_transaction(&db_tx, &from, &leg_out, Guard::CreditLimit)
                .await?;
            self.post_transaction(&db_tx, &to, &leg_in, Guard::CreditLimit)
                .await?;
            Ok((leg_out, leg_in))
        })?;
        tracing::debug!(
            from = %leg_out.account_id,
            to = %leg_in.account_id,
            amount = %leg_out.amount,
            "transfer created"
        );
        Ok((leg_out, leg_in))
    }

    pub async fn transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            self.require_transaction(&db_tx, user_id, transaction_id)
                .await
        })
    }

    /// Transactions matching `filter`, newest date first, then newest
    /// creation first.
    pub async fn transactions(
        &self,
        user_id: Uuid,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        validate_list_filter(filter)?;
        with_tx!(self, |db_tx| {
            let mut query = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id))
                .apply_tx_filters(filter)
                .order_by_desc(transactions::Column::Date)
                .order_by_desc(transactions::Column::CreatedAt);
            if let Some(limit) = filter.limit {
                query = query.limit(limit);
            }
            query
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Transaction::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn list_filter_validation() {
        let ok = TransactionListFilter {
            from: Some(date(1)),
            to: Some(date(1)),
            ..Default::default()
        };
        assert!(validate_list_filter(&ok).is_ok());

        let reversed = TransactionListFilter {
            from: Some(date(2)),
            to: Some(date(1)),
            ..Default::default()
        };
        assert!(matches!(
            validate_list_filter(&reversed),
            Err(EngineError::InvalidValue(_))
        ));

        let empty_page = TransactionListFilter {
            limit: Some(0),
            ..Default::default()
        };
        assert!(validate_list_filter(&empty_page).is_err());
    }
}
