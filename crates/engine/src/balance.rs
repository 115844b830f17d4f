//! Balance rules.
//!
//! Pure functions that decide how an operation moves an account balance and
//! whether the resulting balance is acceptable. Nothing here touches the
//! database: [`Engine::apply_balance`](crate::Engine) persists the delta.
//!
//! | account kind | operation | effect on balance |
//! |---|---|---|
//! | debit | expense | `-amount` |
//! | debit | income | `+amount` |
//! | credit | expense | `+amount` (card debt grows) |
//! | credit | income | `-amount` (card debt shrinks) |

use crate::{AccountKind, EngineError, MoneyCents, ResultEngine, TransactionKind};

/// Which checks a balance application must pass before it is persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Guard {
    /// No checks. Used when undoing an effect that was already accepted.
    Unguarded,
    /// A credit account may not go above its limit.
    CreditLimit,
    /// Credit limit, plus a debit account may not go below zero.
    Full,
}

/// Returns the signed delta `operation` of `amount` applies to an account of
/// `account_kind`. With `reverse` the delta is negated, so applying and then
/// reversing the same operation always nets to zero.
#[must_use]
pub fn balance_delta(
    account_kind: AccountKind,
    operation: TransactionKind,
    amount: MoneyCents,
    reverse: bool,
) -> MoneyCents {
    let forward = match (account_kind, operation) {
        (AccountKind::Debit, TransactionKind::Income) => amount,
        (AccountKind::Debit, TransactionKind::Expense) => -amount,
        (AccountKind::Credit, TransactionKind::Expense) => amount,
        (AccountKind::Credit, TransactionKind::Income) => -amount,
    };
    if reverse { -forward } else { forward }
}

/// Checks that applying `delta` to `balance` respects `guard`.
///
/// Only movements in the risky direction are checked: money leaving a debit
/// account and debt growing on a credit card. A delta that improves the
/// position is always accepted, even when the account is already out of
/// bounds.
pub fn check_guard(
    account_kind: AccountKind,
    balance: MoneyCents,
    credit_limit: Option<MoneyCents>,
    delta: MoneyCents,
    guard: Guard,
) -> ResultEngine<()> {
    if guard == Guard::Unguarded {
        return Ok(());
    }
    match account_kind {
        AccountKind::Credit => {
            if let Some(limit) = credit_limit
                && delta.is_positive()
                && balance.try_add(delta)? > limit
            {
                return Err(EngineError::CreditLimitExceeded(format!(
                    "balance {balance} plus {delta} exceeds limit {limit}"
                )));
            }
        }
        AccountKind::Debit => {
            if guard == Guard::Full
                && delta.is_negative()
                && balance.try_add(delta)? < MoneyCents::ZERO
            {
                return Err(EngineError::InsufficientFunds(format!(
                    "balance {balance} cannot cover {}",
                    delta.abs()
                )));
            }
        }
    }
    Ok(())
}
