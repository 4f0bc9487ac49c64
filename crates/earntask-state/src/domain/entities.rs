//! # Domain Entities
//!
//! The complete snapshot held by the state store, and every entity inside it.
//!
//! ## Invariants
//!
//! - `User.balance` never goes negative (checked debits only)
//! - `Task.completed_count` never exceeds `Task.quantity`
//! - Submission and withdrawal reviews happen at most once; `Pending` is the
//!   only reviewable state
//! - `AppState.logs` is newest-first and capped (oldest evicted)
//!
//! Denormalized fields (`TaskSubmission.task_title`, `TaskSubmission.reward`,
//! the email copies on submissions and withdrawals) are frozen at creation
//! time so later task or account edits never rewrite history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fingerprint::ProofFingerprint;
use super::money::Amount;

/// Account role. Exactly one Admin is seeded at initialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    User,
}

/// Account standing. Blocked users cannot authenticate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Blocked,
}

impl UserStatus {
    /// The opposite standing, for the admin block/unblock toggle.
    pub fn toggled(self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Blocked,
            UserStatus::Blocked => UserStatus::Active,
        }
    }
}

/// A platform account. Never deleted, only blocked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Uniqueness is only enforced in strict mode; the permissive default
    /// mirrors the reference behavior.
    pub email: String,
    pub role: UserRole,
    /// Spendable funds. Withdrawal requests debit this immediately
    /// (reservation of funds); a rejected withdrawal refunds it.
    pub balance: Amount,
    pub status: UserStatus,
    pub registered_at: DateTime<Utc>,
    /// SHA-256 of the password, present only for accounts registered in
    /// strict mode. `None` means the password is not verified at login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_digest: Option<[u8; 32]>,
}

/// Task lifecycle. `Deleted` is terminal and hides the task from discovery;
/// the row is retained so historical submissions keep a valid reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Published,
    Hold,
    Deleted,
}

/// A micro-task in the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Paid per approved submission.
    pub reward: Amount,
    /// Capacity: how many approvals this task can accumulate.
    pub quantity: u32,
    /// Increments only on submission approval, saturating at `quantity`.
    pub completed_count: u32,
    /// Shown to the user when preparing proof.
    pub instruction: String,
    pub status: TaskStatus,
}

impl Task {
    /// True once the task has no remaining capacity.
    pub fn is_full(&self) -> bool {
        self.completed_count >= self.quantity
    }
}

/// Fields an admin supplies when creating a task.
#[derive(Clone, Debug)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub reward: Amount,
    pub quantity: u32,
    pub instruction: String,
    pub status: TaskStatus,
}

/// Partial update applied to an existing task. `None` fields keep the
/// stored value.
#[derive(Clone, Debug, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub reward: Option<Amount>,
    pub quantity: Option<u32>,
    pub instruction: Option<String>,
    pub status: Option<TaskStatus>,
}

/// Review outcome state shared by submissions and withdrawals.
/// Transitions `Pending -> {Approved, Rejected}` exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

/// The verdict an admin hands down on a pending item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewVerdict {
    Approved,
    Rejected,
}

impl From<ReviewVerdict> for ReviewStatus {
    fn from(verdict: ReviewVerdict) -> Self {
        match verdict {
            ReviewVerdict::Approved => ReviewStatus::Approved,
            ReviewVerdict::Rejected => ReviewStatus::Rejected,
        }
    }
}

/// A user's proof of task completion, awaiting admin review.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskSubmission {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    /// Snapshot of the submitter's email at submission time.
    pub user_email: String,
    /// Snapshot of the task title; later task edits do not affect history.
    pub task_title: String,
    /// Snapshot of the reward; this exact amount is credited on approval.
    pub reward: Amount,
    /// Opaque image payload. The store never inspects it beyond the
    /// fingerprint slice.
    pub proof_image: Vec<u8>,
    /// Byte size as declared by the capture collaborator.
    pub image_size: u64,
    /// Duplicate-detection key, compared globally across all submissions.
    pub fingerprint: ProofFingerprint,
    pub status: ReviewStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_note: Option<String>,
}

/// Crypto networks supported for payouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Network {
    Bep20,
    Trc20,
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Bep20 => write!(f, "BEP20"),
            Network::Trc20 => write!(f, "TRC20"),
        }
    }
}

/// A queued payout. The amount was already debited from the user's balance
/// when the request was created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub amount: Amount,
    pub network: Network,
    /// External wallet address; the store treats it as opaque text.
    pub address: String,
    pub status: ReviewStatus,
    pub requested_at: DateTime<Utc>,
}

/// Display currency. Purely presentational; changing it never touches any
/// stored amount.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencySettings {
    pub symbol: String,
    pub code: String,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            code: "USD".to_string(),
        }
    }
}

/// Audit log severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogSeverity {
    Info,
    Warning,
    Error,
}

/// One audit log entry. The log lives inside the snapshot, newest-first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SystemLog {
    pub id: Uuid,
    pub action: String,
    /// Acting identity (session email) or `"System"` when no session exists.
    pub user: String,
    pub timestamp: DateTime<Utc>,
    pub severity: LogSeverity,
}

/// The complete application snapshot: the single source of truth for every
/// reader and the unit of persistence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// The authenticated user, kept as an id and re-resolved against `users`
    /// on every read so balance and status changes are always current.
    pub session: Option<Uuid>,
    pub tasks: Vec<Task>,
    pub submissions: Vec<TaskSubmission>,
    pub withdrawals: Vec<WithdrawalRequest>,
    pub users: Vec<User>,
    pub currency: CurrencySettings,
    /// Newest-first, capped by the configured retention.
    pub logs: Vec<SystemLog>,
}

impl AppState {
    /// Resolve a user by id.
    pub fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Resolve the session user against the canonical collection.
    pub fn session_user(&self) -> Option<&User> {
        self.session.and_then(|id| self.user(id))
    }

    /// Resolve a task by id.
    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}
