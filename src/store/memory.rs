//! In-memory store
//!
//! Two levels of locking: the map sits behind an `RwLock` that is only
//! write-locked to insert a new OBU, and every state has its own `Mutex`.
//! Reports for different OBUs therefore proceed in parallel.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use crate::domain::{AggregateState, AggregatorError, ObuId, ValidReport};

use super::AggregateStore;

type StateMap = HashMap<ObuId, Mutex<AggregateState>>;

/// Process-local store. All state is lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    states: RwLock<StateMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of OBUs seen so far
    pub fn len(&self) -> Result<usize, AggregatorError> {
        self.states.read().map(|states| states.len()).map_err(poisoned)
    }

    pub fn is_empty(&self) -> Result<bool, AggregatorError> {
        self.len().map(|len| len == 0)
    }
}

fn poisoned<T>(_: PoisonError<T>) -> AggregatorError {
    AggregatorError::store("aggregate state lock poisoned")
}

fn lock_state(state: &Mutex<AggregateState>) -> Result<MutexGuard<'_, AggregateState>, AggregatorError> {
    state.lock().map_err(poisoned)
}

impl AggregateStore for MemoryStore {
    fn accumulate(&self, report: &ValidReport) -> Result<(), AggregatorError> {
        // Fast path: OBU already known, only its own mutex is taken
        {
            let states = self.states.read().map_err(poisoned)?;
            if let Some(state) = states.get(&report.obu_id) {
                return lock_state(state)?.accumulate(report);
            }
        }

        // Another writer may have inserted the OBU between the two locks
        let mut states = self.states.write().map_err(poisoned)?;
        match states.get_mut(&report.obu_id) {
            Some(state) => state.get_mut().map_err(poisoned)?.accumulate(report),
            None => {
                tracing::debug!(obu_id = %report.obu_id, "First report for OBU");
                states.insert(report.obu_id, Mutex::new(AggregateState::open(report)));
                Ok(())
            }
        }
    }

    fn snapshot(&self, obu_id: ObuId) -> Result<AggregateState, AggregatorError> {
        let states = self.states.read().map_err(poisoned)?;
        let state = states.get(&obu_id).ok_or(AggregatorError::NotFound(obu_id))?;
        let snapshot = (*lock_state(state)?).clone();
        Ok(snapshot)
    }

    fn snapshot_all(&self) -> Result<Vec<AggregateState>, AggregatorError> {
        let states = self.states.read().map_err(poisoned)?;
        let mut snapshots = states
            .values()
            .map(|state| lock_state(state).map(|guard| (*guard).clone()))
            .collect::<Result<Vec<_>, _>>()?;
        snapshots.sort_by_key(|state| state.obu_id);
        Ok(snapshots)
    }
}
