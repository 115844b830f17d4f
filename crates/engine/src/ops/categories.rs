use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{Category, EngineError, NewCategory, ResultEngine, TransactionKind, categories};

use super::{Engine, normalize_required_name, normalize_text, with_tx};

impl Engine {
    /// Creates a category. Names are unique per user and kind, ignoring case.
    pub async fn new_category(&self, user_id: Uuid, cmd: NewCategory) -> ResultEngine<Category> {
        let name = normalize_required_name(&cmd.name, "category")?;
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;

            let exists = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id))
                .filter(categories::Column::Kind.eq(cmd.kind.as_str()))
                .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::InvalidValue(format!(
                    "category already exists: {name}"
                )));
            }

            let category = Category {
                id: Uuid::new_v4(),
                user_id,
                name,
                kind: cmd.kind,
                color: normalize_text(&cmd.color),
                icon: normalize_text(&cmd.icon),
            };
            categories::ActiveModel::from(&category)
                .insert(&db_tx)
                .await?;
            Ok(category)
        })
    }

    pub async fn category(&self, user_id: Uuid, category_id: Uuid) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            self.require_category(&db_tx, user_id, category_id).await
        })
    }

    /// Categories of a user, optionally only one kind, sorted by name.
    pub async fn categories(
        &self,
        user_id: Uuid,
        kind: Option<TransactionKind>,
    ) -> ResultEngine<Vec<Category>> {
        with_tx!(self, |db_tx| {
            let mut query =
                categories::Entity::find().filter(categories::Column::UserId.eq(user_id));
            if let Some(kind) = kind {
                query = query.filter(categories::Column::Kind.eq(kind.as_str()));
            }
            query
                .order_by_asc(categories::Column::Name)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Category::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Deletes a category. Transactions and recurring expenses keep existing
    /// without a category, budgets on it are removed.
    pub async fn delete_category(&self, user_id: Uuid, category_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_category(&db_tx, user_id, category_id).await?;
            categories::Entity::delete_by_id(category_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
