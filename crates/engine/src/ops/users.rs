use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, User, users, util::normalize_email};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Registers a user. Emails are unique after trimming and lowercasing.
    pub async fn new_user(&self, email: &str, name: &str) -> ResultEngine<User> {
        let email = normalize_email(email)?;
        let name = normalize_required_name(name, "user")?;
        let user = with_tx!(self, |db_tx| {
            let exists = users::Entity::find()
                .filter(users::Column::Email.eq(email.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::InvalidValue(format!(
                    "email already registered: {email}"
                )));
            }

            let model = users::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                email: ActiveValue::Set(email.clone()),
                name: ActiveValue::Set(name),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            Ok(User::from(model))
        })?;
        tracing::debug!(user_id = %user.id, "user created");
        Ok(user)
    }

    pub async fn user(&self, user_id: Uuid) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = self.require_user_exists(&db_tx, user_id).await?;
            Ok(User::from(model))
        })
    }

    pub async fn user_by_email(&self, email: &str) -> ResultEngine<User> {
        let email = normalize_email(email)?;
        with_tx!(self, |db_tx| {
            users::Entity::find()
                .filter(users::Column::Email.eq(email))
                .one(&db_tx)
                .await?
                .map(User::from)
                .ok_or_else(|| EngineError::NotFound("user not exists".to_string()))
        })
    }

    pub async fn users(&self) -> ResultEngine<Vec<User>> {
        with_tx!(self, |db_tx| {
            let models = users::Entity::find()
                .order_by_asc(users::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(User::from).collect())
        })
    }

    /// Deletes a user together with everything it owns.
    pub async fn delete_user(&self, user_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;
            users::Entity::delete_by_id(user_id).exec(&db_tx).await?;
            Ok(())
        })?;
        tracing::debug!(%user_id, "user deleted");
        Ok(())
    }
}
