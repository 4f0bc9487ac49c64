//! # Seed State
//!
//! Constructs the default snapshot used on first run or when the persisted
//! snapshot cannot be loaded: one admin account, a small published task
//! catalog, default currency, empty queues and log.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::entities::{
    AppState, CurrencySettings, Task, TaskStatus, User, UserRole, UserStatus,
};
use super::money::Amount;
use super::store::StoreConfig;

impl AppState {
    /// Build the default snapshot for a fresh installation.
    ///
    /// The admin identity and starting balance come from the store
    /// configuration so tests can seed their own credentials.
    pub fn seeded(config: &StoreConfig, now: DateTime<Utc>) -> Self {
        let admin = User {
            id: Uuid::new_v4(),
            email: config.admin_email.clone(),
            role: UserRole::Admin,
            balance: config.admin_starting_balance,
            status: UserStatus::Active,
            registered_at: now,
            password_digest: None,
        };

        Self {
            session: None,
            tasks: seed_tasks(),
            submissions: Vec::new(),
            withdrawals: Vec::new(),
            users: vec![admin],
            currency: CurrencySettings::default(),
            logs: Vec::new(),
        }
    }
}

/// The launch task catalog.
fn seed_tasks() -> Vec<Task> {
    vec![
        Task {
            id: Uuid::new_v4(),
            title: "Subscribe to YouTube Channel".to_string(),
            description: "Visit our main channel and subscribe. Turn on all notifications."
                .to_string(),
            reward: Amount::from_cents(50),
            quantity: 100,
            completed_count: 0,
            instruction: "Upload a screenshot showing your subscription and bell icon."
                .to_string(),
            status: TaskStatus::Published,
        },
        Task {
            id: Uuid::new_v4(),
            title: "Follow on Twitter".to_string(),
            description: "Follow @EarnTaskPro on Twitter and like our latest pinned post."
                .to_string(),
            reward: Amount::from_cents(25),
            quantity: 500,
            completed_count: 12,
            instruction: "Screenshot of your follow button and the liked post.".to_string(),
            status: TaskStatus::Published,
        },
    ]
}
