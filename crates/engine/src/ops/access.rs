//! Ownership-scoped lookups.
//!
//! Every entity is reached through its owner: a row that exists but belongs
//! to another user is reported exactly like a missing one.

use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    Account, Budget, Category, Debt, EngineError, RecurringExpense, ResultEngine, SavingsGoal,
    Transaction, accounts, budgets, categories, debts, recurring_expenses, savings_goals,
    transactions, users,
};

use super::Engine;

/// Generates `find_*` and `require_*` methods for an entity owned by a user.
macro_rules! impl_owned_lookup {
    (
        $find_fn:ident,
        $require_fn:ident,
        $entity:path,
        $domain:ty,
        $user_col:expr,
        $err_msg:literal
    ) => {
        pub(super) async fn $find_fn(
            &self,
            db: &DatabaseTransaction,
            user_id: Uuid,
            id: Uuid,
        ) -> ResultEngine<Option<$domain>> {
            <$entity>::find_by_id(id)
                .filter($user_col.eq(user_id))
                .one(db)
                .await?
                .map(<$domain>::try_from)
                .transpose()
        }

        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            user_id: Uuid,
            id: Uuid,
        ) -> ResultEngine<$domain> {
            self.$find_fn(db, user_id, id)
                .await?
                .ok_or_else(|| EngineError::NotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_owned_lookup!(
        find_account,
        require_account,
        accounts::Entity,
        Account,
        accounts::Column::UserId,
        "account not exists"
    );

    impl_owned_lookup!(
        find_category,
        require_category,
        categories::Entity,
        Category,
        categories::Column::UserId,
        "category not exists"
    );

    impl_owned_lookup!(
        find_transaction,
        require_transaction,
        transactions::Entity,
        Transaction,
        transactions::Column::UserId,
        "transaction not exists"
    );

    impl_owned_lookup!(
        find_debt,
        require_debt,
        debts::Entity,
        Debt,
        debts::Column::UserId,
        "debt not exists"
    );

    impl_owned_lookup!(
        find_recurring,
        require_recurring,
        recurring_expenses::Entity,
        RecurringExpense,
        recurring_expenses::Column::UserId,
        "recurring expense not exists"
    );

    impl_owned_lookup!(
        find_goal,
        require_goal,
        savings_goals::Entity,
        SavingsGoal,
        savings_goals::Column::UserId,
        "savings goal not exists"
    );

    impl_owned_lookup!(
        find_budget,
        require_budget,
        budgets::Entity,
        Budget,
        budgets::Column::UserId,
        "budget not exists"
    );

    pub(super) async fn require_user_exists(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("user not exists".to_string()))
    }

    /// Checks an optional category reference before it is stored.
    pub(super) async fn require_optional_category(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        category_id: Option<Uuid>,
    ) -> ResultEngine<()> {
        if let Some(category_id) = category_id {
            self.require_category(db, user_id, category_id).await?;
        }
        Ok(())
    }
}
