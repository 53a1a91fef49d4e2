//! The election ledger: components over one shared store
//!
//! [`ElectionLedger`] is the composition root the adapters talk to. It
//! builds the store once, injects it into every component, and exposes the
//! ledger's public operations. Components are individually `Clone` and
//! `Send + Sync`, so one ledger instance serves any number of concurrent
//! callers.

pub mod ballot;
pub mod catalog;
pub mod credentials;
pub mod phase;
pub mod registry;
pub mod tabulation;

use std::sync::Arc;

use crate::config::SecurityConfig;
use crate::crypto::{CredentialVerifier, UvcGenerator};
use crate::store::ElectionStore;
use crate::types::{
    AuthOutcome, CandidateDetails, CandidateId, CastReceipt, CommissionerAuth, Constituency,
    ConstituencyId, ConstituencyResult, ElectionOutcome, ElectionPhase, PartySeats, Registration,
    Voter,
};
use crate::Result;

pub use ballot::VoteLedger;
pub use catalog::Catalog;
pub use credentials::CredentialStore;
pub use phase::PhaseController;
pub use registry::VoterRegistry;
pub use tabulation::TabulationEngine;

/// The assembled election ledger.
pub struct ElectionLedger {
    credentials: CredentialStore,
    registry: VoterRegistry,
    catalog: Catalog,
    phase: PhaseController,
    ballots: VoteLedger,
    tabulation: TabulationEngine,
    uvc_generator: UvcGenerator,
}

impl ElectionLedger {
    /// Build a ledger from security configuration.
    pub fn new(config: &SecurityConfig) -> Result<Self> {
        let verifier = CredentialVerifier::from_base64(&config.credential_pepper)?;
        Ok(Self::with_verifier(verifier, config.uvc_length))
    }

    /// Build a ledger with a random pepper for testing.
    pub fn for_testing() -> Self {
        Self::with_verifier(
            CredentialVerifier::for_testing(),
            crate::crypto::DEFAULT_UVC_LENGTH,
        )
    }

    fn with_verifier(verifier: CredentialVerifier, uvc_length: usize) -> Self {
        let store = Arc::new(ElectionStore::new());
        let verifier = Arc::new(verifier);

        let credentials = CredentialStore::new(store.clone());
        let registry = VoterRegistry::new(store.clone(), credentials.clone(), verifier);
        let catalog = Catalog::new(store.clone());
        let phase = PhaseController::new(store.clone());
        let ballots = VoteLedger::new(store.clone(), phase.clone());
        let tabulation = TabulationEngine::new(store, phase.clone());

        Self {
            credentials,
            registry,
            catalog,
            phase,
            ballots,
            tabulation,
            uvc_generator: UvcGenerator::new(uvc_length),
        }
    }

    // --- component access ---

    /// The credential store component.
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// The voter registry component.
    pub fn registry(&self) -> &VoterRegistry {
        &self.registry
    }

    /// The candidate/constituency catalog component.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The phase controller component.
    pub fn phase(&self) -> &PhaseController {
        &self.phase
    }

    /// The vote ledger component.
    pub fn ballots(&self) -> &VoteLedger {
        &self.ballots
    }

    /// The tabulation engine component.
    pub fn tabulation(&self) -> &TabulationEngine {
        &self.tabulation
    }

    /// The UVC generator for minting fresh credential batches.
    pub fn uvc_generator(&self) -> &UvcGenerator {
        &self.uvc_generator
    }

    // --- the operations exposed to adapters ---

    /// Register a voter, consuming their single-use credential.
    pub fn register(&self, registration: Registration) -> Result<Voter> {
        self.registry.register(registration)
    }

    /// Authenticate an identity as voter or commissioner.
    pub fn authenticate(&self, identity: &str, presented_secret: &str) -> Result<AuthOutcome> {
        self.registry.authenticate(identity, presented_secret)
    }

    /// Record one vote for the identity, atomically.
    pub fn cast_vote(&self, identity: &str, candidate_id: CandidateId) -> Result<CastReceipt> {
        self.ballots.cast_vote(identity, candidate_id)
    }

    /// True iff the voter's ballot has been recorded.
    pub fn has_voted(&self, identity: &str) -> Result<bool> {
        self.registry.has_voted(identity)
    }

    /// The constituency the voter registered in.
    pub fn constituency_of(&self, identity: &str) -> Result<ConstituencyId> {
        self.registry.constituency_of(identity)
    }

    /// All constituencies.
    pub fn list_constituencies(&self) -> Result<Vec<Constituency>> {
        self.catalog.list_constituencies()
    }

    /// All candidates, tagged with party and constituency.
    pub fn list_candidates(&self) -> Result<Vec<CandidateDetails>> {
        self.catalog.list_candidates()
    }

    /// Result rows for one constituency, by name.
    pub fn results_by_constituency(&self, name: &str) -> Result<Vec<ConstituencyResult>> {
        self.tabulation.results_by_constituency(name)
    }

    /// Seats per party.
    pub fn seats_by_party(&self) -> Result<Vec<PartySeats>> {
        self.tabulation.seats_by_party()
    }

    /// The final outcome, gated on conclusion.
    pub fn outcome(&self) -> Result<ElectionOutcome> {
        self.tabulation.outcome()
    }

    /// Advance the election phase (commissioner-only).
    pub fn transition(
        &self,
        requested_by: &CommissionerAuth,
        target: ElectionPhase,
    ) -> Result<ElectionPhase> {
        self.phase.transition(requested_by, target)
    }
}
