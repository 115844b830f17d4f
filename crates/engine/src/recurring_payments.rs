//! Execution records of recurring expenses, one per charged occurrence.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::MoneyCents;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringPayment {
    pub id: Uuid,
    pub recurring_expense_id: Uuid,
    pub paid_date: NaiveDate,
    pub amount: MoneyCents,
    pub transaction_id: Option<Uuid>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recurring_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub recurring_expense_id: Uuid,
    pub paid_date: Date,
    pub amount: i64,
    pub transaction_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::recurring_expenses::Entity",
        from = "Column::RecurringExpenseId",
        to = "super::recurring_expenses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    RecurringExpense,
}

impl Related<super::recurring_expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecurringExpense.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&RecurringPayment> for ActiveModel {
    fn from(value: &RecurringPayment) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            recurring_expense_id: ActiveValue::Set(value.recurring_expense_id),
            paid_date: ActiveValue::Set(value.paid_date),
            amount: ActiveValue::Set(value.amount.cents()),
            transaction_id: ActiveValue::Set(value.transaction_id),
        }
    }
}

impl From<Model> for RecurringPayment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            recurring_expense_id: model.recurring_expense_id,
            paid_date: model.paid_date,
            amount: MoneyCents::new(model.amount),
            transaction_id: model.transaction_id,
        }
    }
}
