//! Debts between the user and a counterpart.
//!
//! A debt starts `Active` with `remaining_amount == original_amount` and
//! becomes `Paid` once payments bring the remaining amount to zero. There is
//! no way back from `Paid`.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, TransactionKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtPolarity {
    /// I owe the counterpart.
    Owe,
    /// The counterpart owes me.
    Owed,
}

impl DebtPolarity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owe => "owe",
            Self::Owed => "owed",
        }
    }

    /// Ledger direction of a payment on a debt of this polarity: paying what
    /// I owe is money leaving, being repaid is money arriving.
    #[must_use]
    pub fn payment_kind(self) -> TransactionKind {
        match self {
            Self::Owe => TransactionKind::Expense,
            Self::Owed => TransactionKind::Income,
        }
    }
}

impl TryFrom<&str> for DebtPolarity {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "owe" => Ok(Self::Owe),
            "owed" => Ok(Self::Owed),
            other => Err(EngineError::InvalidValue(format!(
                "invalid debt polarity: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtStatus {
    Active,
    Paid,
}

impl DebtStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paid => "paid",
        }
    }
}

impl TryFrom<&str> for DebtStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "paid" => Ok(Self::Paid),
            other => Err(EngineError::InvalidValue(format!(
                "invalid debt status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    pub id: Uuid,
    pub user_id: Uuid,
    pub polarity: DebtPolarity,
    pub counterpart_name: String,
    pub description: String,
    pub date: NaiveDate,
    pub original_amount: MoneyCents,
    pub remaining_amount: MoneyCents,
    pub status: DebtStatus,
    /// Account the lent money left from. Only set on `Owed` debts.
    pub account_id: Option<Uuid>,
    /// Ledger row that moved the lent money out of `account_id`.
    pub loan_transaction_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Debt {
    /// Sum of the payments applied so far.
    #[must_use]
    pub fn paid_amount(&self) -> MoneyCents {
        self.original_amount - self.remaining_amount
    }

    /// Remaining amount and status after a payment of `amount`.
    #[must_use]
    pub fn after_payment(&self, amount: MoneyCents) -> (MoneyCents, DebtStatus) {
        let remaining = (self.remaining_amount - amount).non_negative();
        let status = if remaining.is_zero() {
            DebtStatus::Paid
        } else {
            self.status
        };
        (remaining, status)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "debts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub polarity: String,
    pub counterpart_name: String,
    pub description: String,
    pub date: Date,
    pub original_amount: i64,
    pub remaining_amount: i64,
    pub status: String,
    pub account_id: Option<Uuid>,
    pub loan_transaction_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::debt_payments::Entity")]
    Payments,
}

impl Related<super::debt_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Debt> for ActiveModel {
    fn from(value: &Debt) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            user_id: ActiveValue::Set(value.user_id),
            polarity: ActiveValue::Set(value.polarity.as_str().to_string()),
            counterpart_name: ActiveValue::Set(value.counterpart_name.clone()),
            description: ActiveValue::Set(value.description.clone()),
            date: ActiveValue::Set(value.date),
            original_amount: ActiveValue::Set(value.original_amount.cents()),
            remaining_amount: ActiveValue::Set(value.remaining_amount.cents()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            account_id: ActiveValue::Set(value.account_id),
            loan_transaction_id: ActiveValue::Set(value.loan_transaction_id),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Debt {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            polarity: DebtPolarity::try_from(model.polarity.as_str())?,
            counterpart_name: model.counterpart_name,
            description: model.description,
            date: model.date,
            original_amount: MoneyCents::new(model.original_amount),
            remaining_amount: MoneyCents::new(model.remaining_amount),
            status: DebtStatus::try_from(model.status.as_str())?,
            account_id: model.account_id,
            loan_transaction_id: model.loan_transaction_id,
            created_at: model.created_at,
        })
    }
}
