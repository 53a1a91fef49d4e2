//! Seed-data ingestion for the bootstrap collaborator
//!
//! The administrative bootstrap hands the ledger its initial reference
//! data: constituencies, parties, candidates, one commissioner account,
//! and a batch of unused voting credentials. [`SeedData`] is the serde
//! shape of that hand-off; [`SeedData::apply`] loads it into a fresh
//! ledger in dependency order. Credential files use the original
//! one-code-per-line format, parsed by [`parse_uvc_lines`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ledger::ElectionLedger;
use crate::types::{ConstituencyId, PartyId};
use crate::{Error, Result};

/// One candidate row, referencing its party and constituency by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSeed {
    pub name: String,
    pub party: String,
    pub constituency: String,
}

/// The commissioner account to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionerSeed {
    pub identity: String,
    /// Plaintext secret; hashed on load, never stored
    pub secret: String,
}

/// Everything the seeding collaborator supplies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedData {
    pub constituencies: Vec<String>,
    pub parties: Vec<String>,
    pub candidates: Vec<CandidateSeed>,
    pub commissioner: CommissionerSeed,
    #[serde(default)]
    pub credentials: Vec<String>,
}

/// What a seed load created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReport {
    pub constituencies: usize,
    pub parties: usize,
    pub candidates: usize,
    pub credentials: usize,
}

impl SeedData {
    /// Parse seed data from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|err| Error::config(format!("invalid seed data: {err}")))
    }

    /// Load this seed into a fresh ledger.
    ///
    /// Rows load in dependency order (constituencies and parties before
    /// candidates) and fail fast with the underlying error; candidate
    /// rows referencing unknown names are rejected before anything is
    /// consumed on their behalf.
    pub fn apply(&self, ledger: &ElectionLedger) -> Result<SeedReport> {
        let mut constituency_ids: BTreeMap<&str, ConstituencyId> = BTreeMap::new();
        for name in &self.constituencies {
            let constituency = ledger.catalog().add_constituency(name.clone())?;
            constituency_ids.insert(name, constituency.id);
        }

        let mut party_ids: BTreeMap<&str, PartyId> = BTreeMap::new();
        for name in &self.parties {
            let party = ledger.catalog().add_party(name.clone())?;
            party_ids.insert(name, party.id);
        }

        for candidate in &self.candidates {
            let party_id = party_ids
                .get(candidate.party.as_str())
                .copied()
                .ok_or_else(|| Error::PartyNotFound {
                    name: candidate.party.clone(),
                })?;
            let constituency_id = constituency_ids
                .get(candidate.constituency.as_str())
                .copied()
                .ok_or_else(|| Error::ConstituencyNotFound {
                    name: candidate.constituency.clone(),
                })?;
            ledger
                .catalog()
                .add_candidate(candidate.name.clone(), party_id, constituency_id)?;
        }

        ledger
            .registry()
            .add_commissioner(self.commissioner.identity.clone(), &self.commissioner.secret)?;

        let credentials = if self.credentials.is_empty() {
            0
        } else {
            ledger.credentials().issue_batch(self.credentials.clone())?
        };

        let report = SeedReport {
            constituencies: self.constituencies.len(),
            parties: self.parties.len(),
            candidates: self.candidates.len(),
            credentials,
        };

        tracing::info!(
            "🗳️  Seed applied: {} constituencies, {} parties, {} candidates, {} credentials",
            report.constituencies,
            report.parties,
            report.candidates,
            report.credentials
        );

        Ok(report)
    }
}

/// Parse a one-code-per-line UVC file, skipping blank lines.
pub fn parse_uvc_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
