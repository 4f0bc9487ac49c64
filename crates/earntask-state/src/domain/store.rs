//! # State Store
//!
//! The single mutable owner of the application snapshot, exposing every
//! validated mutation as a named operation.
//!
//! ## Invariants Enforced
//!
//! - Balances never go negative: withdrawal debits use checked subtraction
//!   and are rejected, never clamped
//! - `completed_count` never exceeds `quantity`: capacity is checked at
//!   submission time and the counter saturates at approval time
//! - Rewards credit exactly once and refunds apply exactly once: reviewing
//!   an item that already left `Pending` is rejected
//! - An approval's status write, balance credit, and counter increment land
//!   in the same snapshot before any save or read
//!
//! ## Execution Model
//!
//! Synchronous and single-writer. Every operation runs to completion on the
//! caller's thread; `&mut self` is the whole concurrency story. After each
//! mutation the snapshot is handed to the persistence port best-effort: a
//! failed save is logged and the in-memory state stays authoritative.

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use uuid::Uuid;

use super::entities::{
    AppState, CurrencySettings, LogSeverity, Network, ReviewStatus, ReviewVerdict, SystemLog,
    Task, TaskDraft, TaskStatus, TaskSubmission, TaskUpdate, User, UserRole, UserStatus,
    WithdrawalRequest,
};
use super::errors::{AuthError, ReviewError, SubmitError, TaskError, WithdrawError};
use super::fingerprint::ProofFingerprint;
use super::money::Amount;
use crate::ports::StatePersistence;

/// Built-in administrator identity, also used to seed the admin account.
pub const DEFAULT_ADMIN_EMAIL: &str = "t6068422@gmail.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "Aass1122@";

/// Store configuration.
///
/// The defaults reproduce the reference platform behavior exactly. `strict`
/// opts into the hardened checks (email uniqueness, password verification,
/// positive task fields) that the reference omits.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Enable hardened validation.
    pub strict: bool,
    /// Audit log retention; oldest entries beyond this are evicted.
    pub log_capacity: usize,
    /// Fixed withdrawal floor. Deliberately not currency-aware.
    pub min_withdrawal: Amount,
    /// Administrator credential pair matched before normal lookup.
    pub admin_email: String,
    pub admin_password: String,
    /// Balance the seeded admin account starts with.
    pub admin_starting_balance: Amount,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            strict: false,
            log_capacity: 100,
            min_withdrawal: Amount::from_units(1),
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            admin_starting_balance: Amount::from_units(1000),
        }
    }
}

impl StoreConfig {
    /// Configuration with the hardened checks enabled.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Default::default()
        }
    }
}

/// The state & transaction engine.
///
/// Owns the snapshot exclusively. Callers mutate only through the named
/// operations below, which is what preserves the atomicity invariants.
pub struct StateStore {
    config: StoreConfig,
    state: AppState,
    persistence: Box<dyn StatePersistence>,
}

impl StateStore {
    /// Open the store: restore the persisted snapshot, or fall back to the
    /// seed state when none exists or loading fails. Never fails startup.
    pub fn open(persistence: Box<dyn StatePersistence>, config: StoreConfig) -> Self {
        let state = match persistence.load() {
            Ok(Some(state)) => {
                info!(
                    users = state.users.len(),
                    tasks = state.tasks.len(),
                    "restored persisted snapshot"
                );
                state
            }
            Ok(None) => {
                info!("no persisted snapshot; seeding default state");
                AppState::seeded(&config, Utc::now())
            }
            Err(err) => {
                warn!(error = %err, "failed to load persisted snapshot; falling back to seed state");
                AppState::seeded(&config, Utc::now())
            }
        };
        Self {
            config,
            state,
            persistence,
        }
    }

    /// Open over a fresh seed state without consulting persistence.
    /// Intended for tests.
    pub fn seeded(persistence: Box<dyn StatePersistence>, config: StoreConfig) -> Self {
        let state = AppState::seeded(&config, Utc::now());
        Self {
            config,
            state,
            persistence,
        }
    }

    // ------------------------------------------------------------------
    // Read surface
    // ------------------------------------------------------------------

    /// The current snapshot.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The session user, re-resolved against the canonical users collection
    /// so balance and status are always current.
    pub fn current_user(&self) -> Option<&User> {
        self.state.session_user()
    }

    /// Tasks visible in discovery: everything not soft-deleted.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.state
            .tasks
            .iter()
            .filter(|t| t.status != TaskStatus::Deleted)
            .collect()
    }

    /// Submissions awaiting review.
    pub fn pending_submissions(&self) -> Vec<&TaskSubmission> {
        self.state
            .submissions
            .iter()
            .filter(|s| s.status == ReviewStatus::Pending)
            .collect()
    }

    /// Withdrawals awaiting review.
    pub fn pending_withdrawals(&self) -> Vec<&WithdrawalRequest> {
        self.state
            .withdrawals
            .iter()
            .filter(|w| w.status == ReviewStatus::Pending)
            .collect()
    }

    /// A user's submission history.
    pub fn submissions_for(&self, user_id: Uuid) -> Vec<&TaskSubmission> {
        self.state
            .submissions
            .iter()
            .filter(|s| s.user_id == user_id)
            .collect()
    }

    /// A user's withdrawal history.
    pub fn withdrawals_for(&self, user_id: Uuid) -> Vec<&WithdrawalRequest> {
        self.state
            .withdrawals
            .iter()
            .filter(|w| w.user_id == user_id)
            .collect()
    }

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------

    /// Authenticate a user and start a session.
    ///
    /// The fixed administrator credential pair is matched first; on a match
    /// the stored admin record becomes the session. A credential match with
    /// no stored admin record still reports failure. Blocked accounts are
    /// rejected. In the permissive default, non-admin passwords are not
    /// verified; strict mode checks the stored digest when one exists.
    pub fn authenticate(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        if email == self.config.admin_email && password == self.config.admin_password {
            let admin = self.state.users.iter().find(|u| u.email == email).cloned();
            return match admin {
                Some(user) => {
                    self.state.session = Some(user.id);
                    self.audit("Admin logged in".to_string(), LogSeverity::Info);
                    self.persist();
                    Ok(user)
                }
                None => Err(AuthError::InvalidCredentials),
            };
        }

        let user = self.state.users.iter().find(|u| u.email == email).cloned();
        match user {
            None => Err(AuthError::InvalidCredentials),
            Some(user) if user.status == UserStatus::Blocked => Err(AuthError::Blocked),
            Some(user) => {
                if self.config.strict {
                    if let Some(digest) = user.password_digest {
                        if digest != password_digest(password) {
                            return Err(AuthError::InvalidCredentials);
                        }
                    }
                }
                self.state.session = Some(user.id);
                self.audit(format!("User {} logged in", user.email), LogSeverity::Info);
                self.persist();
                Ok(user)
            }
        }
    }

    /// Create a new user account and start a session for it.
    ///
    /// The permissive default never fails and allows duplicate emails;
    /// strict mode enforces uniqueness and stores a password digest.
    pub fn register(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        if self.config.strict && self.state.users.iter().any(|u| u.email == email) {
            return Err(AuthError::EmailTaken);
        }

        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            role: UserRole::User,
            balance: Amount::ZERO,
            status: UserStatus::Active,
            registered_at: Utc::now(),
            password_digest: self.config.strict.then(|| password_digest(password)),
        };
        self.state.users.push(user.clone());
        self.state.session = Some(user.id);
        self.audit(
            format!("New user registered: {}", user.email),
            LogSeverity::Info,
        );
        self.persist();
        Ok(user)
    }

    /// End the current session, logging the departing identity.
    pub fn logout(&mut self) {
        if let Some(user) = self.state.session_user() {
            let action = format!("User {} logged out", user.email);
            self.audit(action, LogSeverity::Info);
        }
        self.state.session = None;
        self.persist();
    }

    // ------------------------------------------------------------------
    // Task catalog
    // ------------------------------------------------------------------

    /// Add a task to the catalog with a fresh id and zero completions.
    ///
    /// The permissive default stores the draft as given; strict mode rejects
    /// non-positive reward or quantity.
    pub fn create_task(&mut self, draft: TaskDraft) -> Result<Task, TaskError> {
        if self.config.strict {
            if draft.reward.is_zero() {
                return Err(TaskError::NonPositiveReward);
            }
            if draft.quantity == 0 {
                return Err(TaskError::NonPositiveQuantity);
            }
        }

        let task = Task {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            reward: draft.reward,
            quantity: draft.quantity,
            completed_count: 0,
            instruction: draft.instruction,
            status: draft.status,
        };
        self.state.tasks.push(task.clone());
        self.audit(format!("Task created: {}", task.title), LogSeverity::Info);
        self.persist();
        Ok(task)
    }

    /// Merge partial updates into an existing task. Unknown id is a silent
    /// no-op returning `None`.
    pub fn update_task(&mut self, id: Uuid, updates: TaskUpdate) -> Option<Task> {
        let task = self.state.tasks.iter_mut().find(|t| t.id == id)?;
        if let Some(title) = updates.title {
            task.title = title;
        }
        if let Some(description) = updates.description {
            task.description = description;
        }
        if let Some(reward) = updates.reward {
            task.reward = reward;
        }
        if let Some(quantity) = updates.quantity {
            task.quantity = quantity;
        }
        if let Some(instruction) = updates.instruction {
            task.instruction = instruction;
        }
        if let Some(status) = updates.status {
            task.status = status;
        }
        let updated = task.clone();
        self.persist();
        Some(updated)
    }

    /// Soft-delete: flip the status to `Deleted`, keep the row so historical
    /// submissions stay resolvable. Unknown id is a silent no-op.
    pub fn delete_task(&mut self, id: Uuid) {
        let Some(task) = self.state.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };
        task.status = TaskStatus::Deleted;
        self.audit(format!("Task deleted (soft): {id}"), LogSeverity::Info);
        self.persist();
    }

    // ------------------------------------------------------------------
    // Proof submissions
    // ------------------------------------------------------------------

    /// Submit proof of task completion. Checks run in order: session,
    /// global duplicate fingerprint, task existence, task capacity.
    ///
    /// The duplicate check spans every submission from any user on any task,
    /// so a screenshot reused across tasks is still caught; a hit is logged
    /// as a WARNING fraud alert naming the submitter.
    pub fn submit_proof(
        &mut self,
        task_id: Uuid,
        proof_image: Vec<u8>,
        declared_size: u64,
    ) -> Result<TaskSubmission, SubmitError> {
        let submitter = self
            .state
            .session_user()
            .cloned()
            .ok_or(SubmitError::NotLoggedIn)?;

        let fingerprint = ProofFingerprint::derive(declared_size, &proof_image);
        if self
            .state
            .submissions
            .iter()
            .any(|s| s.fingerprint == fingerprint)
        {
            warn!(submitter = %submitter.email, "duplicate proof image detected");
            self.audit(
                format!(
                    "Fraud alert: Duplicate image detected from {}",
                    submitter.email
                ),
                LogSeverity::Warning,
            );
            self.persist();
            return Err(SubmitError::DuplicateImage);
        }

        let task = self
            .state
            .task(task_id)
            .cloned()
            .ok_or(SubmitError::TaskNotFound)?;
        if task.is_full() {
            return Err(SubmitError::TaskFull);
        }

        // Title and reward are frozen here; later task edits must not
        // rewrite pending or historical submissions.
        let submission = TaskSubmission {
            id: Uuid::new_v4(),
            task_id,
            user_id: submitter.id,
            user_email: submitter.email,
            task_title: task.title.clone(),
            reward: task.reward,
            proof_image,
            image_size: declared_size,
            fingerprint,
            status: ReviewStatus::Pending,
            submitted_at: Utc::now(),
            admin_note: None,
        };
        self.state.submissions.push(submission.clone());
        self.audit(
            format!("Task proof submitted for: {}", task.title),
            LogSeverity::Info,
        );
        self.persist();
        Ok(submission)
    }

    /// Review a pending submission.
    ///
    /// Approval writes the status, credits the frozen reward onto the
    /// submitter's balance, and increments the task's completion counter in
    /// one snapshot transition. Rejection writes status and note only.
    /// Unknown id is a silent no-op; an item that already left `Pending` is
    /// rejected so the reward can never credit twice.
    pub fn review_submission(
        &mut self,
        id: Uuid,
        verdict: ReviewVerdict,
        note: Option<String>,
    ) -> Result<(), ReviewError> {
        let Some(idx) = self.state.submissions.iter().position(|s| s.id == id) else {
            return Ok(());
        };
        if self.state.submissions[idx].status != ReviewStatus::Pending {
            return Err(ReviewError::AlreadyReviewed);
        }

        let (user_id, task_id, reward) = {
            let sub = &self.state.submissions[idx];
            (sub.user_id, sub.task_id, sub.reward)
        };
        {
            let sub = &mut self.state.submissions[idx];
            sub.status = verdict.into();
            sub.admin_note = note;
        }

        if verdict == ReviewVerdict::Approved {
            if let Some(user) = self.state.users.iter_mut().find(|u| u.id == user_id) {
                user.balance = user.balance.saturating_add(reward);
            }
            if let Some(task) = self.state.tasks.iter_mut().find(|t| t.id == task_id) {
                // Capacity was checked at submission time, but several
                // pending submissions can hold the same remaining slot; the
                // counter saturates at capacity.
                if task.completed_count < task.quantity {
                    task.completed_count += 1;
                }
            }
        }

        let outcome = match verdict {
            ReviewVerdict::Approved => "approved",
            ReviewVerdict::Rejected => "rejected",
        };
        self.audit(format!("Submission {id} {outcome}"), LogSeverity::Info);
        self.persist();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Withdrawals
    // ------------------------------------------------------------------

    /// Queue a payout, debiting the balance immediately.
    ///
    /// The debit at request time is the reservation-of-funds design: the
    /// stored balance always reflects spendable funds, and a later rejection
    /// refunds the exact amount. The floor check runs before the balance
    /// check so an undersized request is reported as undersized even when
    /// the balance also falls short.
    pub fn request_withdrawal(
        &mut self,
        amount: Amount,
        network: Network,
        address: String,
    ) -> Result<WithdrawalRequest, WithdrawError> {
        let user = self
            .state
            .session_user()
            .cloned()
            .ok_or(WithdrawError::InsufficientBalance)?;
        if amount < self.config.min_withdrawal {
            return Err(WithdrawError::BelowMinimum);
        }
        let Some(remaining) = user.balance.checked_sub(amount) else {
            return Err(WithdrawError::InsufficientBalance);
        };

        if let Some(stored) = self.state.users.iter_mut().find(|u| u.id == user.id) {
            stored.balance = remaining;
        }
        let request = WithdrawalRequest {
            id: Uuid::new_v4(),
            user_id: user.id,
            user_email: user.email,
            amount,
            network,
            address,
            status: ReviewStatus::Pending,
            requested_at: Utc::now(),
        };
        self.state.withdrawals.push(request.clone());
        self.audit(
            format!(
                "Withdrawal requested: {} {}",
                amount, self.state.currency.code
            ),
            LogSeverity::Info,
        );
        self.persist();
        Ok(request)
    }

    /// Review a pending withdrawal.
    ///
    /// Rejection refunds the reserved amount; approval changes no balance
    /// because the funds were already debited at request time. Unknown id is
    /// a silent no-op; re-review of a terminal item is rejected so a refund
    /// can never apply twice.
    pub fn review_withdrawal(&mut self, id: Uuid, verdict: ReviewVerdict) -> Result<(), ReviewError> {
        let Some(idx) = self.state.withdrawals.iter().position(|w| w.id == id) else {
            return Ok(());
        };
        if self.state.withdrawals[idx].status != ReviewStatus::Pending {
            return Err(ReviewError::AlreadyReviewed);
        }

        let (user_id, amount) = {
            let req = &self.state.withdrawals[idx];
            (req.user_id, req.amount)
        };
        self.state.withdrawals[idx].status = verdict.into();

        if verdict == ReviewVerdict::Rejected {
            if let Some(user) = self.state.users.iter_mut().find(|u| u.id == user_id) {
                user.balance = user.balance.saturating_add(amount);
            }
        }

        let outcome = match verdict {
            ReviewVerdict::Approved => "approved",
            ReviewVerdict::Rejected => "rejected",
        };
        self.audit(format!("Withdrawal {id} {outcome}"), LogSeverity::Info);
        self.persist();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Administration
    // ------------------------------------------------------------------

    /// Replace the display currency. Presentation only; no stored amount
    /// changes.
    pub fn update_currency(&mut self, symbol: &str, code: &str) {
        self.state.currency = CurrencySettings {
            symbol: symbol.to_string(),
            code: code.to_string(),
        };
        self.audit(format!("Currency updated to {code}"), LogSeverity::Info);
        self.persist();
    }

    /// Flip a user between Active and Blocked. Unknown id is a silent no-op.
    /// Nothing here stops an admin row from being toggled; hiding that
    /// action is the presentation layer's concern.
    pub fn toggle_user_status(&mut self, user_id: Uuid) {
        let Some(user) = self.state.users.iter_mut().find(|u| u.id == user_id) else {
            return;
        };
        user.status = user.status.toggled();
        self.audit(format!("User status toggled: {user_id}"), LogSeverity::Info);
        self.persist();
    }

    /// Append an audit entry attributed to the current session (or
    /// `"System"`), then persist.
    pub fn append_log(&mut self, action: &str, severity: LogSeverity) {
        self.audit(action.to_string(), severity);
        self.persist();
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Prepend an audit entry and evict beyond the retention cap.
    fn audit(&mut self, action: String, severity: LogSeverity) {
        let actor = self
            .state
            .session_user()
            .map(|u| u.email.clone())
            .unwrap_or_else(|| "System".to_string());
        let entry = SystemLog {
            id: Uuid::new_v4(),
            action,
            user: actor,
            timestamp: Utc::now(),
            severity,
        };
        self.state.logs.insert(0, entry);
        self.state.logs.truncate(self.config.log_capacity);
    }

    /// Best-effort save. The in-memory snapshot stays authoritative when the
    /// persistence port fails.
    fn persist(&self) {
        if let Err(err) = self.persistence.save(&self.state) {
            warn!(error = %err, "failed to persist snapshot");
        }
    }
}

/// SHA-256 digest of a password, stored only for strict-mode accounts.
fn password_digest(password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}
