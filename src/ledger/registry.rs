//! Voter registry: registration, authentication, and vote-state reads
//!
//! The registry owns the voter and commissioner relations and is the only
//! component that creates voter rows. Registration redeems a single-use
//! credential and inserts the voter as one atomic unit: the identity check,
//! the constituency check, the credential consumption, and the insert all
//! happen while the voter relation's write guard is held, so a failed
//! registration can never leave a consumed-but-unregistered credential
//! behind.

use std::sync::Arc;

use chrono::Utc;

use crate::crypto::CredentialVerifier;
use crate::ledger::credentials::CredentialStore;
use crate::store::ElectionStore;
use crate::types::{AuthOutcome, Commissioner, CommissionerAuth, ConstituencyId, Registration, Voter};
use crate::{Error, Result, storage_error};

/// Service handle over the voter and commissioner relations.
#[derive(Clone)]
pub struct VoterRegistry {
    store: Arc<ElectionStore>,
    credentials: CredentialStore,
    verifier: Arc<CredentialVerifier>,
}

impl VoterRegistry {
    /// Create a handle over the given store.
    pub fn new(
        store: Arc<ElectionStore>,
        credentials: CredentialStore,
        verifier: Arc<CredentialVerifier>,
    ) -> Self {
        Self {
            store,
            credentials,
            verifier,
        }
    }

    /// Register a voter, consuming their credential.
    ///
    /// Checks run in an order that guarantees atomicity: the identity and
    /// constituency are validated before the credential is touched, so no
    /// failure path burns a UVC, and the voter insert is infallible once
    /// the credential is consumed. The voter write guard is held across
    /// the whole sequence, serialising concurrent registrations for the
    /// same identity.
    pub fn register(&self, registration: Registration) -> Result<Voter> {
        let mut voters = self
            .store
            .voters
            .write()
            .map_err(|_| storage_error!("voter relation unavailable"))?;

        if voters.contains_key(&registration.identity) {
            return Err(Error::AlreadyRegistered {
                identity: registration.identity,
            });
        }

        // Commissioner identities share the namespace and stay disjoint
        {
            let commissioners = self
                .store
                .commissioners
                .read()
                .map_err(|_| storage_error!("commissioner relation unavailable"))?;
            if commissioners.contains_key(&registration.identity) {
                return Err(Error::AlreadyRegistered {
                    identity: registration.identity,
                });
            }
        }

        {
            let constituencies = self
                .store
                .constituencies
                .read()
                .map_err(|_| storage_error!("constituency relation unavailable"))?;
            if !constituencies.contains_key(&registration.constituency_id) {
                return Err(Error::ConstituencyNotFound {
                    name: format!("#{}", registration.constituency_id),
                });
            }
        }

        // Last fallible step: consume the credential. The store rejects
        // unknown and already-used codes; both surface as InvalidCredential
        // to the caller.
        self.credentials
            .consume(&registration.credential_code)
            .map_err(|err| match err {
                Error::CredentialNotFound => Error::invalid_credential("unknown code"),
                Error::CredentialAlreadyUsed => Error::invalid_credential("code already used"),
                other => other,
            })?;

        let voter = Voter {
            identity: registration.identity,
            full_name: registration.full_name,
            date_of_birth: registration.date_of_birth,
            secret_hash: self.verifier.hash_secret(&registration.secret),
            constituency_id: registration.constituency_id,
            selected_candidate: None,
            registered_at: Utc::now(),
        };

        voters.insert(voter.identity.clone(), voter.clone());

        tracing::info!(
            "🗳️  Voter registered: identity={}, constituency=#{}",
            voter.identity,
            voter.constituency_id
        );

        Ok(voter)
    }

    /// Add a commissioner account (seeding collaborator input).
    ///
    /// Enforces the disjoint identity space from both sides.
    pub fn add_commissioner(&self, identity: impl Into<String>, secret: &str) -> Result<Commissioner> {
        let identity = identity.into();

        // The voter guard stays held until the insert lands; a concurrent
        // registration for the same identity serialises behind it.
        let voters = self
            .store
            .voters
            .read()
            .map_err(|_| storage_error!("voter relation unavailable"))?;
        if voters.contains_key(&identity) {
            return Err(Error::AlreadyRegistered { identity });
        }

        let mut commissioners = self
            .store
            .commissioners
            .write()
            .map_err(|_| storage_error!("commissioner relation unavailable"))?;
        if commissioners.contains_key(&identity) {
            return Err(Error::AlreadyRegistered { identity });
        }

        let commissioner = Commissioner {
            identity: identity.clone(),
            secret_hash: self.verifier.hash_secret(secret),
        };
        commissioners.insert(identity, commissioner.clone());
        Ok(commissioner)
    }

    /// Check a presented secret against the voter relation first, then the
    /// commissioner relation. A mismatch is the normal `NoMatch` outcome.
    pub fn authenticate(&self, identity: &str, presented_secret: &str) -> Result<AuthOutcome> {
        {
            let voters = self
                .store
                .voters
                .read()
                .map_err(|_| storage_error!("voter relation unavailable"))?;

            if let Some(voter) = voters.get(identity) {
                if self.verifier.verify(&voter.secret_hash, presented_secret) {
                    return Ok(AuthOutcome::Voter {
                        identity: voter.identity.clone(),
                    });
                }
            }
        }

        let commissioners = self
            .store
            .commissioners
            .read()
            .map_err(|_| storage_error!("commissioner relation unavailable"))?;

        if let Some(commissioner) = commissioners.get(identity) {
            if self
                .verifier
                .verify(&commissioner.secret_hash, presented_secret)
            {
                return Ok(AuthOutcome::Commissioner(CommissionerAuth::new(
                    commissioner.identity.clone(),
                )));
            }
        }

        Ok(AuthOutcome::NoMatch)
    }

    /// True iff the voter's ballot has been recorded.
    pub fn has_voted(&self, identity: &str) -> Result<bool> {
        Ok(self.voter(identity)?.has_voted())
    }

    /// The constituency the voter registered in.
    pub fn constituency_of(&self, identity: &str) -> Result<ConstituencyId> {
        Ok(self.voter(identity)?.constituency_id)
    }

    /// Fetch a voter row by identity.
    pub fn voter(&self, identity: &str) -> Result<Voter> {
        let voters = self
            .store
            .voters
            .read()
            .map_err(|_| storage_error!("voter relation unavailable"))?;

        voters
            .get(identity)
            .cloned()
            .ok_or_else(|| Error::VoterNotFound {
                identity: identity.to_string(),
            })
    }
}
