//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists. `*Update` structs carry one
//! `Option` per field: `None` leaves the stored value unchanged. Fields that
//! may be cleared use `Option<Option<T>>`.

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::{
    AccountKind, AccountSubtype, DebtPolarity, Frequency, MoneyCents, QuotaFrequency,
    TransactionKind,
};

/// Open a new account.
#[derive(Clone, Debug)]
pub struct NewAccount {
    pub name: String,
    pub kind: AccountKind,
    pub subtype: AccountSubtype,
    /// Opening balance. For credit accounts this is the amount already owed.
    pub balance: MoneyCents,
    pub credit_limit: Option<MoneyCents>,
    pub color: String,
}

impl NewAccount {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: AccountKind, subtype: AccountSubtype) -> Self {
        Self {
            name: name.into(),
            kind,
            subtype,
            balance: MoneyCents::ZERO,
            credit_limit: None,
            color: "#6366f1".to_string(),
        }
    }

    #[must_use]
    pub fn balance(mut self, balance: MoneyCents) -> Self {
        self.balance = balance;
        self
    }

    #[must_use]
    pub fn credit_limit(mut self, limit: MoneyCents) -> Self {
        self.credit_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// Metadata changes on an account. The balance is not editable.
#[derive(Clone, Debug, Default)]
pub struct AccountUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    /// `Some(None)` removes the limit.
    pub credit_limit: Option<Option<MoneyCents>>,
}

impl AccountUpdate {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn credit_limit(mut self, limit: Option<MoneyCents>) -> Self {
        self.credit_limit = Some(limit);
        self
    }
}

/// Record an income or an expense on one account.
#[derive(Clone, Debug)]
pub struct NewTransaction {
    pub account_id: Uuid,
    pub kind: TransactionKind,
    pub amount: MoneyCents,
    pub date: NaiveDate,
    pub category_id: Option<Uuid>,
    pub description: String,
}

impl NewTransaction {
    #[must_use]
    pub fn new(
        account_id: Uuid,
        kind: TransactionKind,
        amount: MoneyCents,
        date: NaiveDate,
    ) -> Self {
        Self {
            account_id,
            kind,
            amount,
            date,
            category_id: None,
            description: String::new(),
        }
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Amend a transaction.
///
/// Transfer legs only accept `date`, `description` and `category_id`.
#[derive(Clone, Debug, Default)]
pub struct TransactionUpdate {
    pub account_id: Option<Uuid>,
    pub kind: Option<TransactionKind>,
    pub amount: Option<MoneyCents>,
    pub date: Option<NaiveDate>,
    pub category_id: Option<Option<Uuid>>,
    pub description: Option<String>,
}

impl TransactionUpdate {
    #[must_use]
    pub fn account_id(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: MoneyCents) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Option<Uuid>) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether the update changes the balance effect of the transaction.
    pub(crate) fn touches_balance(&self) -> bool {
        self.account_id.is_some() || self.kind.is_some() || self.amount.is_some()
    }
}

/// Move money between two accounts of the same user.
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    pub amount: MoneyCents,
    pub date: NaiveDate,
    /// Applied to both legs. When absent each leg names the other account.
    pub description: Option<String>,
}

impl TransferCmd {
    #[must_use]
    pub fn new(
        from_account_id: Uuid,
        to_account_id: Uuid,
        amount: MoneyCents,
        date: NaiveDate,
    ) -> Self {
        Self {
            from_account_id,
            to_account_id,
            amount,
            date,
            description: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Register a debt.
#[derive(Clone, Debug)]
pub struct NewDebt {
    pub polarity: DebtPolarity,
    pub counterpart_name: String,
    pub original_amount: MoneyCents,
    pub date: NaiveDate,
    pub description: String,
    /// Account the lent money leaves from. Only valid for
    /// [`DebtPolarity::Owed`].
    pub account_id: Option<Uuid>,
}

impl NewDebt {
    #[must_use]
    pub fn new(
        polarity: DebtPolarity,
        counterpart_name: impl Into<String>,
        original_amount: MoneyCents,
        date: NaiveDate,
    ) -> Self {
        Self {
            polarity,
            counterpart_name: counterpart_name.into(),
            original_amount,
            date,
            description: String::new(),
            account_id: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn account_id(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }
}

#[derive(Clone, Debug)]
pub struct DebtPaymentCmd {
    pub amount: MoneyCents,
    pub account_id: Uuid,
    pub date: NaiveDate,
    pub notes: String,
}

impl DebtPaymentCmd {
    #[must_use]
    pub fn new(amount: MoneyCents, account_id: Uuid, date: NaiveDate) -> Self {
        Self {
            amount,
            account_id,
            date,
            notes: String::new(),
        }
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Amounts, polarity and status of a debt are not editable.
#[derive(Clone, Debug, Default)]
pub struct DebtUpdate {
    pub counterpart_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug)]
pub struct NewRecurring {
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub amount: MoneyCents,
    pub frequency: Frequency,
    pub day_of_charge: u32,
    pub next_date: NaiveDate,
}

impl NewRecurring {
    /// `day_of_charge` defaults to the day of `next_date`.
    #[must_use]
    pub fn new(
        account_id: Uuid,
        name: impl Into<String>,
        amount: MoneyCents,
        frequency: Frequency,
        next_date: NaiveDate,
    ) -> Self {
        Self {
            account_id,
            category_id: None,
            name: name.into(),
            amount,
            frequency,
            day_of_charge: next_date.day(),
            next_date,
        }
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn day_of_charge(mut self, day: u32) -> Self {
        self.day_of_charge = day;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct RecurringUpdate {
    pub account_id: Option<Uuid>,
    pub category_id: Option<Option<Uuid>>,
    pub name: Option<String>,
    pub amount: Option<MoneyCents>,
    pub frequency: Option<Frequency>,
    pub day_of_charge: Option<u32>,
    pub next_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

impl RecurringUpdate {
    #[must_use]
    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: MoneyCents) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn next_date(mut self, next_date: NaiveDate) -> Self {
        self.next_date = Some(next_date);
        self
    }
}

#[derive(Clone, Debug)]
pub struct NewGoal {
    pub name: String,
    pub description: String,
    pub color: String,
    pub target_amount: MoneyCents,
    pub quota_amount: MoneyCents,
    pub frequency: QuotaFrequency,
}

impl NewGoal {
    #[must_use]
    pub fn new(name: impl Into<String>, target_amount: MoneyCents) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            color: "#10b981".to_string(),
            target_amount,
            quota_amount: MoneyCents::ZERO,
            frequency: QuotaFrequency::Monthly,
        }
    }

    #[must_use]
    pub fn quota(mut self, amount: MoneyCents, frequency: QuotaFrequency) -> Self {
        self.quota_amount = amount;
        self.frequency = frequency;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct GoalUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub target_amount: Option<MoneyCents>,
    pub quota_amount: Option<MoneyCents>,
    pub frequency: Option<QuotaFrequency>,
}

#[derive(Clone, Debug)]
pub struct ContributionCmd {
    pub amount: MoneyCents,
    pub date: NaiveDate,
    pub notes: String,
    pub is_quota_payment: bool,
}

impl ContributionCmd {
    #[must_use]
    pub fn new(amount: MoneyCents, date: NaiveDate) -> Self {
        Self {
            amount,
            date,
            notes: String::new(),
            is_quota_payment: false,
        }
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    #[must_use]
    pub fn quota_payment(mut self) -> Self {
        self.is_quota_payment = true;
        self
    }
}

#[derive(Clone, Debug)]
pub struct NewBudget {
    pub category_id: Uuid,
    pub month: u32,
    pub year: i32,
    pub limit_amount: MoneyCents,
}

#[derive(Clone, Debug)]
pub struct NewCategory {
    pub name: String,
    pub kind: TransactionKind,
    pub color: String,
    pub icon: String,
}

impl NewCategory {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TransactionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            color: "#64748b".to_string(),
            icon: "tag".to_string(),
        }
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}
