//! # earntask-state
//!
//! State & transaction engine for the EarnTask micro-task rewards platform.
//!
//! ## Role in System
//!
//! - **Single Source of Truth**: One authoritative snapshot holding users,
//!   tasks, proof submissions, withdrawal requests, currency settings, and
//!   the audit log
//! - **Atomic Transitions**: Every mutation derives the next snapshot in full
//!   before any reader can observe it; an approval is never visible without
//!   its balance credit and counter increment
//! - **Reservation of Funds**: Withdrawals debit the balance at request time,
//!   so a user's balance always reflects spendable funds
//!
//! ## Data Flow
//!
//! ```text
//! [Caller (UI / console)] ──operation──→ [StateStore]
//!                                             │ validate against snapshot
//!                                             │ apply new snapshot
//!                                             │ append audit entry
//!                                             ↓
//!                                    [StatePersistence port]
//!                                     (best-effort save; failures
//!                                      logged, never propagated)
//! ```
//!
//! ## Failure Semantics
//!
//! Business-rule violations come back as typed errors whose display text is
//! the user-facing reason. Lookups that miss on mutation are silent no-ops.
//! Nothing in this crate panics for a business-rule violation.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
