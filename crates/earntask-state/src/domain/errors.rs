//! # Domain Errors
//!
//! Typed validation failures. Display text is the exact reason shown to the
//! end user; the presentation layer renders it verbatim.

use thiserror::Error;

/// Login and registration failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is blocked")]
    Blocked,

    /// Strict mode only; the permissive default allows duplicate emails.
    #[error("Email is already registered")]
    EmailTaken,
}

/// Task creation failures. Only raised in strict mode; the permissive
/// default stores whatever the caller supplies.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task reward must be greater than zero")]
    NonPositiveReward,

    #[error("Task quantity must be greater than zero")]
    NonPositiveQuantity,
}

/// Proof submission failures, in the order the checks run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("User not logged in")]
    NotLoggedIn,

    #[error("Duplicate image detected. Please upload an original screenshot.")]
    DuplicateImage,

    #[error("Task not found")]
    TaskNotFound,

    #[error("Task is full")]
    TaskFull,
}

/// Withdrawal request failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WithdrawError {
    /// Also returned when no session exists; a balance of nothing cannot
    /// cover any request.
    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Minimum withdrawal is $1")]
    BelowMinimum,
}

/// Review failures shared by submissions and withdrawals.
///
/// Unknown ids are deliberately NOT an error: review of a nonexistent item
/// is a silent no-op, which keeps retries forgiving.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    /// The item already left `Pending`. Guards against double-crediting a
    /// reward or double-refunding a withdrawal.
    #[error("Item has already been reviewed")]
    AlreadyReviewed,
}

/// Failures at the persistence boundary. Never propagated out of a store
/// operation; saves are best-effort and loads fall back to the seed state.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Persistence unavailable: {0}")]
    Unavailable(String),

    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),

    #[error("Lock poisoned")]
    LockPoisoned,
}
