//! Vote ledger: the atomic cast-vote operation
//!
//! The only component permitted to mutate a voter's selected-candidate ref
//! and a candidate's tally, and it mutates them as one unit. The phase is
//! pinned for the whole operation, and both relation write guards are held
//! across both writes, so no interleaving can produce a tally increment
//! without a recorded vote or vice versa.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::ledger::phase::PhaseController;
use crate::store::ElectionStore;
use crate::types::{CandidateId, CastReceipt, ElectionPhase};
use crate::{Error, Result, storage_error};

/// Service handle performing atomic vote casts.
#[derive(Clone)]
pub struct VoteLedger {
    store: Arc<ElectionStore>,
    phase: PhaseController,
}

impl VoteLedger {
    /// Create a handle over the given store.
    pub fn new(store: Arc<ElectionStore>, phase: PhaseController) -> Self {
        Self { store, phase }
    }

    /// Record one vote: set the voter's selected-candidate ref and bump the
    /// candidate's tally, atomically.
    ///
    /// Preconditions, checked in order inside the critical section: the
    /// election phase is `Ongoing`, the voter exists, the voter has not
    /// voted, the candidate exists. Concurrent casts for the same voter
    /// serialise on the voter write guard so at most one succeeds; the
    /// rest observe `AlreadyVoted`. Concurrent casts for different voters
    /// against one candidate serialise the tally increment on the
    /// candidate write guard.
    pub fn cast_vote(&self, identity: &str, candidate_id: CandidateId) -> Result<CastReceipt> {
        // Pinning the phase here means a conclusion requested mid-cast
        // waits until this ballot has fully landed or failed.
        let phase = self.phase.pin()?;
        if *phase != ElectionPhase::Ongoing {
            return Err(Error::ElectionNotOpen { phase: *phase });
        }

        let mut voters = self
            .store
            .voters
            .write()
            .map_err(|_| storage_error!("voter relation unavailable"))?;
        let mut candidates = self
            .store
            .candidates
            .write()
            .map_err(|_| storage_error!("candidate relation unavailable"))?;

        let voter = voters
            .get_mut(identity)
            .ok_or_else(|| Error::VoterNotFound {
                identity: identity.to_string(),
            })?;

        if voter.selected_candidate.is_some() {
            return Err(Error::AlreadyVoted {
                identity: identity.to_string(),
            });
        }

        let candidate = candidates
            .get_mut(&candidate_id)
            .ok_or(Error::CandidateNotFound { id: candidate_id })?;

        // The atomic unit: both writes land under both guards
        voter.selected_candidate = Some(candidate_id);
        candidate.tally += 1;

        let receipt = CastReceipt {
            receipt_id: Uuid::new_v4(),
            candidate_id,
            cast_at: Utc::now(),
        };

        tracing::info!(
            "🗳️  Vote cast: candidate=#{}, receipt={}",
            candidate_id,
            receipt.receipt_id
        );

        Ok(receipt)
    }
}
