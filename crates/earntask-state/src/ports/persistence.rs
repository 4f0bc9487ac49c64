use crate::domain::{AppState, PersistenceError};

/// Durable-store abstraction.
///
/// The store calls `load` once at startup and `save` after every mutation.
/// Both sides are non-fatal: a failed load falls back to the seed state and
/// a failed save leaves the in-memory snapshot authoritative.
pub trait StatePersistence: Send + Sync {
    /// Read the persisted snapshot, `None` when none exists yet.
    fn load(&self) -> Result<Option<AppState>, PersistenceError>;

    /// Write the full snapshot.
    fn save(&self, state: &AppState) -> Result<(), PersistenceError>;
}
