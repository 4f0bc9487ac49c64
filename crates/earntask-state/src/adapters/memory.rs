use crate::domain::{AppState, PersistenceError};
use crate::ports::StatePersistence;
use std::sync::RwLock;

/// In-memory implementation of StatePersistence for testing
pub struct InMemoryPersistence {
    slot: RwLock<Option<AppState>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Start pre-populated with a snapshot, as if a previous run saved it.
    pub fn with_snapshot(state: AppState) -> Self {
        Self {
            slot: RwLock::new(Some(state)),
        }
    }
}

impl Default for InMemoryPersistence {
    fn default() -> Self {
        Self::new()
    }
}

impl StatePersistence for InMemoryPersistence {
    fn load(&self) -> Result<Option<AppState>, PersistenceError> {
        let slot = self.slot.read().map_err(|_| PersistenceError::LockPoisoned)?;
        Ok(slot.clone())
    }

    fn save(&self, state: &AppState) -> Result<(), PersistenceError> {
        let mut slot = self
            .slot
            .write()
            .map_err(|_| PersistenceError::LockPoisoned)?;
        *slot = Some(state.clone());
        Ok(())
    }
}

/// Persistence double whose every call fails. Exercises the best-effort
/// contract: operations must still succeed when saving does not.
pub struct FailingPersistence;

impl StatePersistence for FailingPersistence {
    fn load(&self) -> Result<Option<AppState>, PersistenceError> {
        Err(PersistenceError::Unavailable("simulated outage".to_string()))
    }

    fn save(&self, _state: &AppState) -> Result<(), PersistenceError> {
        Err(PersistenceError::Unavailable("simulated outage".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StateStore, StoreConfig};

    #[test]
    fn test_round_trip_through_slot() {
        let persistence = InMemoryPersistence::new();
        assert!(persistence.load().unwrap().is_none());

        let state = AppState::seeded(&StoreConfig::default(), chrono::Utc::now());
        persistence.save(&state).unwrap();
        assert_eq!(persistence.load().unwrap(), Some(state));
    }

    #[test]
    fn test_store_restores_saved_snapshot() {
        let config = StoreConfig::default();
        let state = AppState::seeded(&config, chrono::Utc::now());
        let persistence = InMemoryPersistence::with_snapshot(state.clone());
        let store = StateStore::open(Box::new(persistence), config);
        assert_eq!(store.state(), &state);
    }

    #[test]
    fn test_store_survives_failing_persistence() {
        let mut store = StateStore::open(Box::new(FailingPersistence), StoreConfig::default());
        // Startup fell back to the seed state.
        assert_eq!(store.state().tasks.len(), 2);
        // Mutations still succeed even though every save fails.
        let user = store.register("u@example.com", "pw").unwrap();
        assert_eq!(store.current_user().unwrap().id, user.id);
    }
}
