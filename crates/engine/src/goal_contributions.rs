use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::MoneyCents;

/// Money put aside for a goal. Append only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalContribution {
    pub id: Uuid,
    pub goal_id: Uuid,
    pub amount: MoneyCents,
    pub date: NaiveDate,
    pub notes: String,
    pub is_quota_payment: bool,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "goal_contributions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub goal_id: Uuid,
    pub amount: i64,
    pub date: Date,
    pub notes: String,
    pub is_quota_payment: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::savings_goals::Entity",
        from = "Column::GoalId",
        to = "super::savings_goals::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Goal,
}

impl Related<super::savings_goals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Goal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&GoalContribution> for ActiveModel {
    fn from(value: &GoalContribution) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            goal_id: ActiveValue::Set(value.goal_id),
            amount: ActiveValue::Set(value.amount.cents()),
            date: ActiveValue::Set(value.date),
            notes: ActiveValue::Set(value.notes.clone()),
            is_quota_payment: ActiveValue::Set(value.is_quota_payment),
        }
    }
}

impl From<Model> for GoalContribution {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            goal_id: model.goal_id,
            amount: MoneyCents::new(model.amount),
            date: model.date,
            notes: model.notes,
            is_quota_payment: model.is_quota_payment,
        }
    }
}
