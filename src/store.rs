//! Shared relation store for the election ledger
//!
//! One [`ElectionStore`] is created at process init and injected into every
//! ledger component as an `Arc`; nothing opens ad hoc handles per call.
//! Each relation sits behind its own `RwLock`, and the RAII guards are the
//! scoped store handles: acquired at the top of an operation, released on
//! every exit path.
//!
//! Atomicity rule: any check-and-mutate sequence (credential consumption,
//! registration, vote casting) happens inside a single critical section
//! while the relevant write guards are held. There is no read-then-write
//! across a lock release anywhere in the crate.
//!
//! Lock order (acquire strictly in this order when nesting):
//!   phase -> voters -> commissioners -> constituencies -> parties
//!     -> candidates -> credentials
//!
//! A poisoned lock means a writer panicked mid-update; it is surfaced as
//! `StorageUnavailable`, the one transient error class.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use crate::types::{
    Candidate, CandidateId, Commissioner, Constituency, ConstituencyId, Credential, ElectionPhase,
    Party, PartyId, Voter,
};

/// The six persisted relations plus the election phase cell.
pub struct ElectionStore {
    pub(crate) phase: RwLock<ElectionPhase>,
    /// Keyed by voter identity
    pub(crate) voters: RwLock<HashMap<String, Voter>>,
    /// Keyed by commissioner identity
    pub(crate) commissioners: RwLock<HashMap<String, Commissioner>>,
    pub(crate) constituencies: RwLock<BTreeMap<ConstituencyId, Constituency>>,
    pub(crate) parties: RwLock<BTreeMap<PartyId, Party>>,
    /// Auto-numbered; ids are dense from 1 and rows are never deleted
    pub(crate) candidates: RwLock<BTreeMap<CandidateId, Candidate>>,
    /// Keyed by UVC code
    pub(crate) credentials: RwLock<HashMap<String, Credential>>,
}

impl ElectionStore {
    /// Create an empty store with the phase at its initial state.
    pub fn new() -> Self {
        Self {
            phase: RwLock::new(ElectionPhase::NotOpen),
            voters: RwLock::new(HashMap::new()),
            commissioners: RwLock::new(HashMap::new()),
            constituencies: RwLock::new(BTreeMap::new()),
            parties: RwLock::new(BTreeMap::new()),
            candidates: RwLock::new(BTreeMap::new()),
            credentials: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for ElectionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_starts_empty_and_not_open() {
        let store = ElectionStore::new();
        assert_eq!(*store.phase.read().unwrap(), ElectionPhase::NotOpen);
        assert!(store.voters.read().unwrap().is_empty());
        assert!(store.credentials.read().unwrap().is_empty());
        assert!(store.candidates.read().unwrap().is_empty());
    }
}
