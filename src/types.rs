//! # Core Types for the Election Ledger
//!
//! Entities and value types shared across the ledger components. The shape
//! follows the persisted relations: constituencies, parties, candidates,
//! single-use credentials (UVCs), voters, and commissioners, plus the
//! election phase cell that gates every mutating operation.
//!
//! ## Entity Categories
//!
//! ### Reference data
//! - [`Constituency`]: a seat-bearing electoral district
//! - [`Party`]: a party that candidates stand for
//! - [`Candidate`]: one (constituency, party) contender with a live tally
//!
//! ### Ledger rows
//! - [`Credential`]: a single-use voting code and its consumption state
//! - [`Voter`]: a registered voter and their (at most one) recorded vote
//! - [`Commissioner`]: an election-authority account
//!
//! ### Control and outcomes
//! - [`ElectionPhase`]: the monotonic lifecycle state machine
//! - [`AuthOutcome`] / [`CommissionerAuth`]: authentication results
//! - [`CastReceipt`], [`ConstituencyResult`], [`PartySeats`],
//!   [`ElectionOutcome`]: operation results surfaced to adapters

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::SecretHash;

/// Auto-numbered constituency identifier
pub type ConstituencyId = u32;

/// Auto-numbered party identifier
pub type PartyId = u32;

/// Auto-numbered candidate identifier
pub type CandidateId = u32;

/// A seat-bearing electoral district.
///
/// Both the id and the name are unique; tabulation looks constituencies up
/// by name because that is how the public results interface addresses them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constituency {
    pub id: ConstituencyId,
    pub name: String,
}

/// A party that candidates stand for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: PartyId,
    pub name: String,
}

/// One contender for a constituency seat.
///
/// The tally is the number of accepted ballots naming this candidate. It is
/// only ever mutated by the vote ledger, together with the voter row, as
/// one unit. The seed data supplies exactly one candidate per
/// (constituency, party) pair; that shape is assumed, not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub party_id: PartyId,
    pub constituency_id: ConstituencyId,
    pub tally: u64,
}

/// Consumption state of a voting credential.
///
/// A credential moves `Unused -> Used` exactly once and never reverts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CredentialState {
    /// Still available for one registration
    Unused,
    /// Consumed by a successful registration
    Used { consumed_at: DateTime<Utc> },
}

/// A single-use voting credential (UVC) proving eligibility to register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub code: String,
    pub state: CredentialState,
}

impl Credential {
    /// Create a fresh, unused credential for the given code.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            state: CredentialState::Unused,
        }
    }

    /// True iff this credential has not been consumed.
    pub fn is_unused(&self) -> bool {
        matches!(self.state, CredentialState::Unused)
    }
}

/// A registered voter.
///
/// `selected_candidate` is `None` until exactly one successful cast and is
/// immutable afterwards; the vote ledger is its sole writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voter {
    /// Unique identity the voter registers and signs in with (an email)
    pub identity: String,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    /// Peppered hash of the voter's sign-in secret
    pub secret_hash: SecretHash,
    pub constituency_id: ConstituencyId,
    pub selected_candidate: Option<CandidateId>,
    pub registered_at: DateTime<Utc>,
}

impl Voter {
    /// True iff this voter's ballot has been recorded.
    pub fn has_voted(&self) -> bool {
        self.selected_candidate.is_some()
    }
}

/// An election-authority account, identity-disjoint from voters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commissioner {
    pub identity: String,
    pub secret_hash: SecretHash,
}

/// The data a caller submits to register as a voter.
#[derive(Debug, Clone)]
pub struct Registration {
    pub identity: String,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    /// Plaintext sign-in secret; hashed immediately, never stored
    pub secret: String,
    /// The single-use credential code being redeemed
    pub credential_code: String,
    pub constituency_id: ConstituencyId,
}

/// Which account matched during authentication.
///
/// A failed verification is the normal `NoMatch` outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    /// The identity and secret matched a registered voter
    Voter { identity: String },
    /// The identity and secret matched a commissioner; carries the
    /// authority value phase transitions require
    Commissioner(CommissionerAuth),
    /// Neither account kind matched
    NoMatch,
}

/// Proof of commissioner authority.
///
/// Only the voter registry constructs this, and only after verifying a
/// commissioner secret. Holding one is the authorization context demanded
/// by [`ElectionPhase`] transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct CommissionerAuth {
    identity: String,
}

impl CommissionerAuth {
    pub(crate) fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
        }
    }

    /// Identity of the commissioner this authority was issued to.
    pub fn identity(&self) -> &str {
        &self.identity
    }
}

/// States in the election lifecycle.
///
/// Transitions are monotonic: `NotOpen -> Ongoing -> Concluded`, one step
/// at a time, never backward.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElectionPhase {
    /// Registration may proceed, no votes are accepted yet
    NotOpen,
    /// Votes are being accepted
    Ongoing,
    /// Terminal; tallies are frozen and tabulation is final
    Concluded,
}

impl ElectionPhase {
    /// True iff `target` is the single allowed forward step from `self`.
    pub fn can_transition_to(self, target: ElectionPhase) -> bool {
        matches!(
            (self, target),
            (ElectionPhase::NotOpen, ElectionPhase::Ongoing)
                | (ElectionPhase::Ongoing, ElectionPhase::Concluded)
        )
    }
}

impl std::fmt::Display for ElectionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ElectionPhase::NotOpen => "not open",
            ElectionPhase::Ongoing => "ongoing",
            ElectionPhase::Concluded => "concluded",
        };
        f.write_str(s)
    }
}

/// Record of an accepted ballot, returned by a successful cast.
///
/// This is an acknowledgement for the adapter, not a cryptographic
/// receipt; ballot verifiability is out of scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastReceipt {
    pub receipt_id: Uuid,
    pub candidate_id: CandidateId,
    pub cast_at: DateTime<Utc>,
}

/// A candidate row in a catalog listing, tagged with the names its
/// references resolve to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDetails {
    pub id: CandidateId,
    pub name: String,
    pub party: String,
    pub constituency: String,
    pub tally: u64,
}

/// One row of a per-constituency result table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstituencyResult {
    pub candidate: String,
    pub party: String,
    pub tally: u64,
}

/// Seats attributed to one party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySeats {
    pub party: String,
    pub seats: u32,
}

/// The winning party, or the tie sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    /// A single party holds the maximum seat count
    Party(String),
    /// Two or more parties tie for the maximum seat count
    HungParliament,
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winner::Party(name) => f.write_str(name),
            Winner::HungParliament => f.write_str("Hung Parliament"),
        }
    }
}

/// Final election outcome as reported to adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ElectionOutcome {
    /// The election has not concluded; no winner or seat data is computed
    Ongoing,
    /// The election concluded; seats cover every party with at least one
    Completed { winner: Winner, seats: Vec<PartySeats> },
}
