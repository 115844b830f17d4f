//! Recurring expenses and their schedule.

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl TryFrom<&str> for Frequency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(EngineError::InvalidValue(format!(
                "invalid frequency: {other}"
            ))),
        }
    }
}

/// Date of the occurrence after `current`.
///
/// Calendar steps keep the day of month and clamp it to the length of the
/// target month (Jan 31 -> Feb 28, Feb 29 -> Feb 28 next year). A result past
/// the representable range leaves `current` unchanged.
#[must_use]
pub fn next_occurrence(current: NaiveDate, frequency: Frequency) -> NaiveDate {
    let next = match frequency {
        Frequency::Daily => current.checked_add_days(Days::new(1)),
        Frequency::Weekly => current.checked_add_days(Days::new(7)),
        Frequency::Biweekly => current.checked_add_days(Days::new(14)),
        Frequency::Monthly => current.checked_add_months(Months::new(1)),
        Frequency::Yearly => current.checked_add_months(Months::new(12)),
    };
    next.unwrap_or(current)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringExpense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub amount: MoneyCents,
    pub frequency: Frequency,
    pub day_of_charge: u32,
    pub next_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recurring_expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub amount: i64,
    pub frequency: String,
    pub day_of_charge: i32,
    pub next_date: Date,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recurring_payments::Entity")]
    Payments,
}

impl Related<super::recurring_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&RecurringExpense> for ActiveModel {
    fn from(value: &RecurringExpense) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            user_id: ActiveValue::Set(value.user_id),
            account_id: ActiveValue::Set(value.account_id),
            category_id: ActiveValue::Set(value.category_id),
            name: ActiveValue::Set(value.name.clone()),
            amount: ActiveValue::Set(value.amount.cents()),
            frequency: ActiveValue::Set(value.frequency.as_str().to_string()),
            day_of_charge: ActiveValue::Set(value.day_of_charge as i32),
            next_date: ActiveValue::Set(value.next_date),
            is_active: ActiveValue::Set(value.is_active),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for RecurringExpense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            account_id: model.account_id,
            category_id: model.category_id,
            name: model.name,
            amount: MoneyCents::new(model.amount),
            frequency: Frequency::try_from(model.frequency.as_str())?,
            day_of_charge: u32::try_from(model.day_of_charge).map_err(|_| {
                EngineError::InvalidValue(format!("invalid day of charge: {}", model.day_of_charge))
            })?,
            next_date: model.next_date,
            is_active: model.is_active,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fixed_day_steps() {
        let start = date(2026, 3, 30);
        assert_eq!(next_occurrence(start, Frequency::Daily), date(2026, 3, 31));
        assert_eq!(next_occurrence(start, Frequency::Weekly), date(2026, 4, 6));
        assert_eq!(next_occurrence(start, Frequency::Biweekly), date(2026, 4, 13));
    }

    #[test]
    fn monthly_keeps_day_of_month() {
        assert_eq!(
            next_occurrence(date(2026, 4, 15), Frequency::Monthly),
            date(2026, 5, 15)
        );
        assert_eq!(
            next_occurrence(date(2026, 12, 5), Frequency::Monthly),
            date(2027, 1, 5)
        );
    }

    #[test]
    fn monthly_clamps_to_month_end() {
        assert_eq!(
            next_occurrence(date(2026, 1, 31), Frequency::Monthly),
            date(2026, 2, 28)
        );
        assert_eq!(
            next_occurrence(date(2028, 1, 31), Frequency::Monthly),
            date(2028, 2, 29)
        );
    }

    #[test]
    fn yearly_clamps_leap_day() {
        assert_eq!(
            next_occurrence(date(2028, 2, 29), Frequency::Yearly),
            date(2029, 2, 28)
        );
        assert_eq!(
            next_occurrence(date(2026, 7, 1), Frequency::Yearly),
            date(2027, 7, 1)
        );
    }

    #[test]
    fn overflow_leaves_date_unchanged() {
        assert_eq!(
            next_occurrence(NaiveDate::MAX, Frequency::Daily),
            NaiveDate::MAX
        );
    }

    #[test]
    fn unknown_frequency_is_rejected() {
        assert!(matches!(
            Frequency::try_from("fortnightly"),
            Err(EngineError::InvalidValue(_))
        ));
    }
}
