use chrono::Utc;
use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Account, AccountKind, AccountUpdate, EngineError, MoneyCents, NewAccount, ResultEngine,
    accounts, transactions,
};

use super::{Engine, normalize_required_name, normalize_text, with_tx};

impl Engine {
    /// Opens an account.
    ///
    /// The opening balance is stored as is, without a ledger entry. On a
    /// credit account it is the amount already owed and must fit the limit.
    pub async fn new_account(&self, user_id: Uuid, cmd: NewAccount) -> ResultEngine<Account> {
        let name = normalize_required_name(&cmd.name, "account")?;
        validate_credit_limit(cmd.kind, cmd.credit_limit, cmd.balance)?;
        let account = Account {
            id: Uuid::new_v4(),
            user_id,
            name,
            kind: cmd.kind,
            subtype: cmd.subtype,
            balance: cmd.balance,
            credit_limit: cmd.credit_limit,
            color: normalize_text(&cmd.color),
            created_at: Utc::now(),
        };
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;
            accounts::ActiveModel::from(&account).insert(&db_tx).await?;
            Ok(())
        })?;
        tracing::debug!(account_id = %account.id, kind = account.kind.as_str(), "account created");
        Ok(account)
    }

    pub async fn account(&self, user_id: Uuid, account_id: Uuid) -> ResultEngine<Account> {
        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, user_id, account_id).await
        })
    }

    /// Accounts of a user in creation order.
    pub async fn accounts(&self, user_id: Uuid) -> ResultEngine<Vec<Account>> {
        with_tx!(self, |db_tx| {
            accounts::Entity::find()
                .filter(accounts::Column::UserId.eq(user_id))
                .order_by_asc(accounts::Column::CreatedAt)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Account::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Changes account metadata. The balance only moves through the ledger.
    pub async fn update_account(
        &self,
        user_id: Uuid,
        account_id: Uuid,
        update: AccountUpdate,
    ) -> ResultEngine<Account> {
        let name = update
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "account"))
            .transpose()?;
        with_tx!(self, |db_tx| {
            let mut account = self.require_account(&db_tx, user_id, account_id).await?;
            let mut active = accounts::ActiveModel {
                id: ActiveValue::Unchanged(account.id),
                ..Default::default()
            };
            if let Some(name) = name {
                active.name = ActiveValue::Set(name.clone());
                account.name = name;
            }
            if let Some(color) = update.color.as_deref() {
                let color = normalize_text(color);
                active.color = ActiveValue::Set(color.clone());
                account.color = color;
            }
            if let Some(limit) = update.credit_limit {
                validate_credit_limit(account.kind, limit, account.balance)?;
                active.credit_limit = ActiveValue::Set(limit.map(MoneyCents::cents));
                account.credit_limit = limit;
            }
            if active.is_changed() {
                active.update(&db_tx).await?;
            }
            Ok(account)
        })
    }

    /// Deletes an account with its transactions and recurring expenses.
    ///
    /// Transfer legs on other accounts that pointed at this account lose
    /// their pairing and remain as plain transactions. Debts funded from the
    /// account are detached.
    pub async fn delete_account(&self, user_id: Uuid, account_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, user_id, account_id).await?;

            let paired_ids: Vec<Uuid> = transactions::Entity::find()
                .select_only()
                .column(transactions::Column::TransferPairId)
                .filter(transactions::Column::AccountId.eq(account_id))
                .filter(transactions::Column::TransferPairId.is_not_null())
                .into_tuple::<Option<Uuid>>()
                .all(&db_tx)
                .await?
                .into_iter()
                .flatten()
                .collect();
            if !paired_ids.is_empty() {
                transactions::Entity::update_many()
                    .col_expr(
                        transactions::Column::TransferPairId,
                        Expr::value(Option::<Uuid>::None),
                    )
                    .filter(transactions::Column::Id.is_in(paired_ids))
                    .exec(&db_tx)
                    .await?;
            }

            accounts::Entity::delete_by_id(account_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })?;
        tracing::debug!(%account_id, "account deleted");
        Ok(())
    }
}

fn validate_credit_limit(
    kind: AccountKind,
    limit: Option<MoneyCents>,
    balance: MoneyCents,
) -> ResultEngine<()> {
    let Some(limit) = limit else {
        return Ok(());
    };
    if kind != AccountKind::Credit {
        return Err(EngineError::InvalidValue(
            "credit limit is only valid on credit accounts".to_string(),
        ));
    }
    if !limit.is_positive() {
        return Err(EngineError::InvalidAmount(
            "credit limit must be > 0".to_string(),
        ));
    }
    if balance > limit {
        return Err(EngineError::CreditLimitExceeded(format!(
            "balance {balance} is above limit {limit}"
        )));
    }
    Ok(())
}
