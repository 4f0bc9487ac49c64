//! # EarnTask Test Suite
//!
//! Unified test crate containing cross-module scenarios:
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs      # End-to-end reward and withdrawal scenarios
//!     └── retention.rs  # Audit log retention, persistence fallback
//! ```
//!
//! Run with `cargo test -p earntask-tests`.

#[cfg(test)]
mod integration;
