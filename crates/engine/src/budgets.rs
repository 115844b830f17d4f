//! Monthly spending limits per category.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub month: u32,
    pub year: i32,
    pub limit_amount: MoneyCents,
    pub created_at: DateTime<Utc>,
}

/// A budget together with what was spent in its month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub spent: MoneyCents,
}

impl BudgetStatus {
    /// Limit minus spent. Negative once the budget is blown.
    #[must_use]
    pub fn left(&self) -> MoneyCents {
        self.budget.limit_amount - self.spent
    }

    #[must_use]
    pub fn is_exceeded(&self) -> bool {
        self.spent > self.budget.limit_amount
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub limit_amount: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(value: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            user_id: ActiveValue::Set(value.user_id),
            category_id: ActiveValue::Set(value.category_id),
            month: ActiveValue::Set(value.month as i32),
            year: ActiveValue::Set(value.year),
            limit_amount: ActiveValue::Set(value.limit_amount.cents()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Budget {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let month = u32::try_from(model.month)
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or_else(|| EngineError::InvalidValue(format!("invalid month: {}", model.month)))?;
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            category_id: model.category_id,
            month,
            year: model.year,
            limit_amount: MoneyCents::new(model.limit_amount),
            created_at: model.created_at,
        })
    }
}
