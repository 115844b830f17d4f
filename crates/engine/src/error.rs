//! The module contains the error the engine can throw.
//!
//! Every ledger operation reports failures as a typed [`EngineError`]. The
//! variants a caller is expected to branch on are:
//!
//! - [`NotFound`] when an entity is missing or owned by another user.
//! - [`InsufficientFunds`] when a debit account cannot cover an outgoing amount.
//! - [`CreditLimitExceeded`] when a credit account would go above its limit.
//! - [`OverPayment`] when a debt payment exceeds the remaining amount.
//!
//!  [`NotFound`]: EngineError::NotFound
//!  [`InsufficientFunds`]: EngineError::InsufficientFunds
//!  [`CreditLimitExceeded`]: EngineError::CreditLimitExceeded
//!  [`OverPayment`]: EngineError::OverPayment
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Credit limit exceeded: {0}")]
    CreditLimitExceeded(String),
    #[error("Over payment: {0}")]
    OverPayment(String),
    #[error("Budget already present: {0}")]
    DuplicateBudget(String),
    #[error("Invalid transfer: {0}")]
    InvalidTransfer(String),
    #[error("Invalid debt: {0}")]
    InvalidDebt(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Concurrent update: {0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::CreditLimitExceeded(a), Self::CreditLimitExceeded(b)) => a == b,
            (Self::OverPayment(a), Self::OverPayment(b)) => a == b,
            (Self::DuplicateBudget(a), Self::DuplicateBudget(b)) => a == b,
            (Self::InvalidTransfer(a), Self::InvalidTransfer(b)) => a == b,
            (Self::InvalidDebt(a), Self::InvalidDebt(b)) => a == b,
            (Self::InvalidValue(a), Self::InvalidValue(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
