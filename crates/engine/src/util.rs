//! Internal helpers for input validation.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every operation rejects bad input the same way.

use chrono::{Months, NaiveDate};

use crate::{EngineError, MoneyCents, ResultEngine};

/// Reject zero and negative amounts with a labeled error.
pub(crate) fn require_positive(amount: MoneyCents, label: &str) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(format!("{label} must be > 0")));
    }
    Ok(())
}

/// First day of the month and first day of the following month.
pub(crate) fn month_range(year: i32, month: u32) -> ResultEngine<(NaiveDate, NaiveDate)> {
    let invalid = || EngineError::InvalidValue(format!("invalid month: {year}-{month}"));
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let end = start
        .checked_add_months(Months::new(1))
        .ok_or_else(invalid)?;
    Ok((start, end))
}

/// Trim and lowercase an email. Anything without an `@` between two
/// non-empty parts is rejected.
pub(crate) fn normalize_email(value: &str) -> ResultEngine<String> {
    let email = value.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(EngineError::InvalidValue(format!("invalid email: {value}"))),
    }
}
