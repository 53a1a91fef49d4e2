//! Candidate/constituency catalog: read-mostly reference data
//!
//! Serves the seeded constituencies, parties, and candidates that votes are
//! cast against. Rows are created during seeding and never deleted; the
//! catalog itself never touches a tally.

use std::sync::Arc;

use crate::store::ElectionStore;
use crate::types::{
    Candidate, CandidateDetails, CandidateId, Constituency, ConstituencyId, Party, PartyId,
};
use crate::{Error, Result, storage_error};

/// Service handle over the reference-data relations.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<ElectionStore>,
}

impl Catalog {
    /// Create a handle over the given store.
    pub fn new(store: Arc<ElectionStore>) -> Self {
        Self { store }
    }

    /// Add a constituency. Names are unique; ids are auto-numbered from 1.
    pub fn add_constituency(&self, name: impl Into<String>) -> Result<Constituency> {
        let name = name.into();
        let mut constituencies = self
            .store
            .constituencies
            .write()
            .map_err(|_| storage_error!("constituency relation unavailable"))?;

        if constituencies.values().any(|c| c.name == name) {
            return Err(Error::DuplicateConstituency { name });
        }

        let id = constituencies.last_key_value().map_or(1, |(id, _)| id + 1);
        let constituency = Constituency { id, name };
        constituencies.insert(id, constituency.clone());
        Ok(constituency)
    }

    /// Add a party. Ids are auto-numbered from 1.
    pub fn add_party(&self, name: impl Into<String>) -> Result<Party> {
        let mut parties = self
            .store
            .parties
            .write()
            .map_err(|_| storage_error!("party relation unavailable"))?;

        let id = parties.last_key_value().map_or(1, |(id, _)| id + 1);
        let party = Party {
            id,
            name: name.into(),
        };
        parties.insert(id, party.clone());
        Ok(party)
    }

    /// Add a candidate standing for `party_id` in `constituency_id`.
    ///
    /// Both references are validated; the candidate id is auto-numbered
    /// from 1 and the tally starts at zero.
    pub fn add_candidate(
        &self,
        name: impl Into<String>,
        party_id: PartyId,
        constituency_id: ConstituencyId,
    ) -> Result<Candidate> {
        let constituencies = self
            .store
            .constituencies
            .read()
            .map_err(|_| storage_error!("constituency relation unavailable"))?;
        let parties = self
            .store
            .parties
            .read()
            .map_err(|_| storage_error!("party relation unavailable"))?;
        let mut candidates = self
            .store
            .candidates
            .write()
            .map_err(|_| storage_error!("candidate relation unavailable"))?;

        let constituency = constituencies
            .get(&constituency_id)
            .ok_or_else(|| Error::ConstituencyNotFound {
                name: format!("#{constituency_id}"),
            })?;
        if !parties.contains_key(&party_id) {
            return Err(Error::PartyNotFound {
                name: format!("#{party_id}"),
            });
        }

        let id = candidates.last_key_value().map_or(1, |(id, _)| id + 1);
        let candidate = Candidate {
            id,
            name: name.into(),
            party_id,
            constituency_id: constituency.id,
            tally: 0,
        };
        candidates.insert(id, candidate.clone());
        Ok(candidate)
    }

    /// All constituencies, ordered by id.
    pub fn list_constituencies(&self) -> Result<Vec<Constituency>> {
        let constituencies = self
            .store
            .constituencies
            .read()
            .map_err(|_| storage_error!("constituency relation unavailable"))?;

        Ok(constituencies.values().cloned().collect())
    }

    /// All parties, ordered by id.
    pub fn list_parties(&self) -> Result<Vec<Party>> {
        let parties = self
            .store
            .parties
            .read()
            .map_err(|_| storage_error!("party relation unavailable"))?;

        Ok(parties.values().cloned().collect())
    }

    /// All candidates ordered by id, each tagged with the party and
    /// constituency names its references resolve to, plus the live tally.
    pub fn list_candidates(&self) -> Result<Vec<CandidateDetails>> {
        let constituencies = self
            .store
            .constituencies
            .read()
            .map_err(|_| storage_error!("constituency relation unavailable"))?;
        let parties = self
            .store
            .parties
            .read()
            .map_err(|_| storage_error!("party relation unavailable"))?;
        let candidates = self
            .store
            .candidates
            .read()
            .map_err(|_| storage_error!("candidate relation unavailable"))?;

        candidates
            .values()
            .map(|candidate| {
                let party = parties
                    .get(&candidate.party_id)
                    .ok_or_else(|| Error::PartyNotFound {
                        name: format!("#{}", candidate.party_id),
                    })?;
                let constituency = constituencies
                    .get(&candidate.constituency_id)
                    .ok_or_else(|| Error::ConstituencyNotFound {
                        name: format!("#{}", candidate.constituency_id),
                    })?;
                Ok(CandidateDetails {
                    id: candidate.id,
                    name: candidate.name.clone(),
                    party: party.name.clone(),
                    constituency: constituency.name.clone(),
                    tally: candidate.tally,
                })
            })
            .collect()
    }

    /// Look up one candidate by id.
    pub fn candidate_by_id(&self, id: CandidateId) -> Result<Candidate> {
        let candidates = self
            .store
            .candidates
            .read()
            .map_err(|_| storage_error!("candidate relation unavailable"))?;

        candidates
            .get(&id)
            .cloned()
            .ok_or(Error::CandidateNotFound { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Catalog {
        Catalog::new(Arc::new(ElectionStore::new()))
    }

    #[test]
    fn test_seeding_and_listing() {
        let catalog = fresh();
        let shangri = catalog.add_constituency("Shangri-la-Town").unwrap();
        let northern = catalog.add_constituency("Northern-Kunlun-Mountain").unwrap();
        assert_eq!(shangri.id, 1);
        assert_eq!(northern.id, 2);

        let blue = catalog.add_party("Blue Party").unwrap();
        let red = catalog.add_party("Red Party").unwrap();

        let a = catalog.add_candidate("Alice", blue.id, shangri.id).unwrap();
        let b = catalog.add_candidate("Bob", red.id, northern.id).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.tally, 0);

        let listing = catalog.list_candidates().unwrap();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].party, "Blue Party");
        assert_eq!(listing[0].constituency, "Shangri-la-Town");
        assert_eq!(listing[1].name, "Bob");

        assert_eq!(catalog.list_constituencies().unwrap().len(), 2);
        assert_eq!(catalog.list_parties().unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_constituency_name_rejected() {
        let catalog = fresh();
        catalog.add_constituency("Shangri-la-Town").unwrap();
        assert!(catalog.add_constituency("Shangri-la-Town").is_err());
    }

    #[test]
    fn test_candidate_reference_validation() {
        let catalog = fresh();
        let constituency = catalog.add_constituency("Shangri-la-Town").unwrap();
        let party = catalog.add_party("Blue Party").unwrap();

        assert!(matches!(
            catalog.add_candidate("Alice", 99, constituency.id),
            Err(Error::PartyNotFound { .. })
        ));
        assert!(matches!(
            catalog.add_candidate("Alice", party.id, 99),
            Err(Error::ConstituencyNotFound { .. })
        ));
    }

    #[test]
    fn test_candidate_by_id() {
        let catalog = fresh();
        let constituency = catalog.add_constituency("Shangri-la-Town").unwrap();
        let party = catalog.add_party("Blue Party").unwrap();
        let candidate = catalog
            .add_candidate("Alice", party.id, constituency.id)
            .unwrap();

        assert_eq!(catalog.candidate_by_id(candidate.id).unwrap(), candidate);
        assert!(matches!(
            catalog.candidate_by_id(404),
            Err(Error::CandidateNotFound { id: 404 })
        ));
    }
}
