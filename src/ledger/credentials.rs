//! Credential store: single-use voting code (UVC) lifecycle
//!
//! The store is the exclusive owner of credential state. A code moves
//! `Unused -> Used` exactly once; [`CredentialStore::consume`] performs the
//! check and the flip inside one critical section, so of any number of
//! concurrent consumers racing the same code, exactly one succeeds and the
//! rest observe `CredentialAlreadyUsed`.

use std::sync::Arc;

use chrono::Utc;

use crate::store::ElectionStore;
use crate::types::{Credential, CredentialState};
use crate::{Error, Result, storage_error};

/// Service handle over the credential relation.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<ElectionStore>,
}

impl CredentialStore {
    /// Create a handle over the given store.
    pub fn new(store: Arc<ElectionStore>) -> Self {
        Self { store }
    }

    /// Bulk-load a batch of codes, each starting unused.
    ///
    /// All-or-nothing: if any code already exists, or repeats within the
    /// batch, the whole load fails with `DuplicateCredential` and nothing
    /// is inserted.
    pub fn issue_batch<I, S>(&self, codes: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut credentials = self
            .store
            .credentials
            .write()
            .map_err(|_| storage_error!("credential relation unavailable"))?;

        let batch: Vec<String> = codes.into_iter().map(Into::into).collect();

        // Validate the entire batch before touching the relation
        let mut seen = std::collections::HashSet::with_capacity(batch.len());
        for code in &batch {
            if credentials.contains_key(code) || !seen.insert(code.clone()) {
                return Err(Error::DuplicateCredential { code: code.clone() });
            }
        }

        let issued = batch.len();
        for code in batch {
            credentials.insert(code.clone(), Credential::new(code));
        }

        tracing::info!("🎫 Issued credential batch: {} codes", issued);
        Ok(issued)
    }

    /// True iff the code exists and has not been consumed.
    pub fn is_valid_unused(&self, code: &str) -> Result<bool> {
        let credentials = self
            .store
            .credentials
            .read()
            .map_err(|_| storage_error!("credential relation unavailable"))?;

        Ok(credentials.get(code).is_some_and(Credential::is_unused))
    }

    /// Atomically check that the code is unused and mark it used.
    ///
    /// The check and the state flip share one write-locked critical
    /// section; a second consumer of the same code always observes
    /// `CredentialAlreadyUsed`, never a double success.
    pub fn consume(&self, code: &str) -> Result<()> {
        let mut credentials = self
            .store
            .credentials
            .write()
            .map_err(|_| storage_error!("credential relation unavailable"))?;

        let credential = credentials.get_mut(code).ok_or(Error::CredentialNotFound)?;

        match credential.state {
            CredentialState::Unused => {
                credential.state = CredentialState::Used {
                    consumed_at: Utc::now(),
                };
                tracing::debug!("🎫 Credential consumed");
                Ok(())
            }
            CredentialState::Used { .. } => Err(Error::CredentialAlreadyUsed),
        }
    }

    /// Total number of issued credentials.
    pub fn count(&self) -> Result<usize> {
        let credentials = self
            .store
            .credentials
            .read()
            .map_err(|_| storage_error!("credential relation unavailable"))?;

        Ok(credentials.len())
    }

    /// Number of credentials still available for registration.
    pub fn unused_count(&self) -> Result<usize> {
        let credentials = self
            .store
            .credentials
            .read()
            .map_err(|_| storage_error!("credential relation unavailable"))?;

        Ok(credentials.values().filter(|c| c.is_unused()).count())
    }
}
