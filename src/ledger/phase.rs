//! Election phase controller: the monotonic lifecycle state machine
//!
//! Sole writer of the phase cell. Transitions are commissioner-only and
//! strictly forward (`NotOpen -> Ongoing -> Concluded`); everything else
//! reads the phase to gate behavior.

use std::sync::Arc;
use std::sync::RwLockReadGuard;

use crate::store::ElectionStore;
use crate::types::{CommissionerAuth, ElectionPhase};
use crate::{Error, Result, storage_error};

/// Service handle over the election phase cell.
#[derive(Clone)]
pub struct PhaseController {
    store: Arc<ElectionStore>,
}

impl PhaseController {
    /// Create a handle over the given store.
    pub fn new(store: Arc<ElectionStore>) -> Self {
        Self { store }
    }

    /// The current phase.
    pub fn current(&self) -> Result<ElectionPhase> {
        let phase = self
            .store
            .phase
            .read()
            .map_err(|_| storage_error!("election phase unavailable"))?;
        Ok(*phase)
    }

    /// Read guard pinning the phase for the duration of an operation.
    ///
    /// The vote ledger holds this across its whole critical section so a
    /// concurrent conclusion cannot land between the phase check and the
    /// tally write.
    pub(crate) fn pin(&self) -> Result<RwLockReadGuard<'_, ElectionPhase>> {
        self.store
            .phase
            .read()
            .map_err(|_| storage_error!("election phase unavailable"))
    }

    /// Advance the phase one step forward.
    ///
    /// Requires commissioner authority; any request that is not the single
    /// allowed forward step from the current phase fails with
    /// `InvalidTransition`, leaving the phase untouched.
    pub fn transition(
        &self,
        requested_by: &CommissionerAuth,
        target: ElectionPhase,
    ) -> Result<ElectionPhase> {
        let mut phase = self
            .store
            .phase
            .write()
            .map_err(|_| storage_error!("election phase unavailable"))?;

        if !phase.can_transition_to(target) {
            return Err(Error::InvalidTransition {
                from: *phase,
                to: target,
            });
        }

        let from = *phase;
        *phase = target;

        tracing::info!(
            "🗳️  Election phase advanced: {} -> {} (by {})",
            from,
            target,
            requested_by.identity()
        );

        Ok(target)
    }
}
