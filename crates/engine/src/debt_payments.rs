//! Payments applied to a debt. Immutable once written.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::MoneyCents;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtPayment {
    pub id: Uuid,
    pub debt_id: Uuid,
    pub amount: MoneyCents,
    pub date: NaiveDate,
    pub notes: String,
    /// Account the money moved through. `None` once that account is deleted.
    pub account_id: Option<Uuid>,
    /// Ledger record created for this payment.
    pub transaction_id: Option<Uuid>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "debt_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub debt_id: Uuid,
    pub amount: i64,
    pub date: Date,
    pub notes: String,
    pub account_id: Option<Uuid>,
    pub transaction_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::debts::Entity",
        from = "Column::DebtId",
        to = "super::debts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Debt,
}

impl Related<super::debts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Debt.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&DebtPayment> for ActiveModel {
    fn from(value: &DebtPayment) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            debt_id: ActiveValue::Set(value.debt_id),
            amount: ActiveValue::Set(value.amount.cents()),
            date: ActiveValue::Set(value.date),
            notes: ActiveValue::Set(value.notes.clone()),
            account_id: ActiveValue::Set(value.account_id),
            transaction_id: ActiveValue::Set(value.transaction_id),
        }
    }
}

impl From<Model> for DebtPayment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            debt_id: model.debt_id,
            amount: MoneyCents::new(model.amount),
            date: model.date,
            notes: model.notes,
            account_id: model.account_id,
            transaction_id: model.transaction_id,
        }
    }
}
