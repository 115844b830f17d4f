//! The module contains `Account` struct and its persistence model.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents};

/// How an account balance reacts to income and expenses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    /// Money held: cash, checking, savings. Balance is what you have.
    Debit,
    /// A credit card. Balance is what you owe on it.
    Credit,
}

impl AccountKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

impl TryFrom<&str> for AccountKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            other => Err(EngineError::InvalidValue(format!(
                "invalid account kind: {other}"
            ))),
        }
    }
}

/// Informational label, it never changes balance semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountSubtype {
    Cash,
    Savings,
    Checking,
    Digital,
    CreditCard,
}

impl AccountSubtype {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Savings => "savings",
            Self::Checking => "checking",
            Self::Digital => "digital",
            Self::CreditCard => "credit_card",
        }
    }
}

impl TryFrom<&str> for AccountSubtype {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "cash" => Ok(Self::Cash),
            "savings" => Ok(Self::Savings),
            "checking" => Ok(Self::Checking),
            "digital" => Ok(Self::Digital),
            "credit_card" => Ok(Self::CreditCard),
            other => Err(EngineError::InvalidValue(format!(
                "invalid account subtype: {other}"
            ))),
        }
    }
}

/// An account.
///
/// The balance is only ever changed through the balance rules, so that each
/// movement has a matching transaction in the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub kind: AccountKind,
    pub subtype: AccountSubtype,
    pub balance: MoneyCents,
    /// Only meaningful for [`AccountKind::Credit`].
    pub credit_limit: Option<MoneyCents>,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub kind: String,
    pub subtype: String,
    pub balance: i64,
    pub credit_limit: Option<i64>,
    pub color: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Account> for ActiveModel {
    fn from(value: &Account) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            user_id: ActiveValue::Set(value.user_id),
            name: ActiveValue::Set(value.name.clone()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            subtype: ActiveValue::Set(value.subtype.as_str().to_string()),
            balance: ActiveValue::Set(value.balance.cents()),
            credit_limit: ActiveValue::Set(value.credit_limit.map(MoneyCents::cents)),
            color: ActiveValue::Set(value.color.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            kind: AccountKind::try_from(model.kind.as_str())?,
            subtype: AccountSubtype::try_from(model.subtype.as_str())?,
            balance: MoneyCents::new(model.balance),
            credit_limit: model.credit_limit.map(MoneyCents::new),
            color: model.color,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip_through_storage_strings() {
        for kind in [AccountKind::Debit, AccountKind::Credit] {
            assert_eq!(AccountKind::try_from(kind.as_str()).unwrap(), kind);
        }
        assert!(matches!(
            AccountKind::try_from("savings"),
            Err(EngineError::InvalidValue(_))
        ));
        assert!(AccountSubtype::try_from("crypto").is_err());
    }
}
