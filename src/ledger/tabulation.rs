//! Tabulation engine: constituency results, seats, and the final outcome
//!
//! Reads tallies the vote ledger wrote and aggregates them. Per-constituency
//! results are public at any phase; the overall outcome only materialises
//! once the election has concluded.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::ledger::phase::PhaseController;
use crate::store::ElectionStore;
use crate::types::{ConstituencyResult, ElectionOutcome, ElectionPhase, PartySeats, Winner};
use crate::{Error, Result, storage_error};

/// Service handle over the tally and seat aggregations.
#[derive(Clone)]
pub struct TabulationEngine {
    store: Arc<ElectionStore>,
    phase: PhaseController,
}

impl TabulationEngine {
    /// Create a handle over the given store.
    pub fn new(store: Arc<ElectionStore>, phase: PhaseController) -> Self {
        Self { store, phase }
    }

    /// Result rows for one constituency, addressed by name, ordered by
    /// tally descending then candidate name.
    ///
    /// Available regardless of phase. An unknown name is
    /// `ConstituencyNotFound`; a known constituency with no candidates is
    /// the distinct `NoData`.
    pub fn results_by_constituency(&self, name: &str) -> Result<Vec<ConstituencyResult>> {
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

        let constituency = constituencies
            .values()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::ConstituencyNotFound {
                name: name.to_string(),
            })?;

        let mut rows: Vec<ConstituencyResult> = candidates
            .values()
            .filter(|candidate| candidate.constituency_id == constituency.id)
            .map(|candidate| ConstituencyResult {
                candidate: candidate.name.clone(),
                party: parties
                    .get(&candidate.party_id)
                    .map(|party| party.name.clone())
                    .unwrap_or_default(),
                tally: candidate.tally,
            })
            .collect();

        if rows.is_empty() {
            return Err(Error::NoData {
                name: name.to_string(),
            });
        }

        rows.sort_by(|a, b| b.tally.cmp(&a.tally).then_with(|| a.candidate.cmp(&b.candidate)));
        Ok(rows)
    }

    /// Seats per party, for every party with at least one seat, ordered by
    /// seats descending then party name.
    ///
    /// In this model one candidate is one winnable seat, so a party's seat
    /// count is its candidate count; aggregation groups by party identity,
    /// not vote volume.
    pub fn seats_by_party(&self) -> Result<Vec<PartySeats>> {
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

        let mut counts: BTreeMap<u32, u32> = BTreeMap::new();
        for candidate in candidates.values() {
            *counts.entry(candidate.party_id).or_insert(0) += 1;
        }

        let mut seats: Vec<PartySeats> = counts
            .into_iter()
            .map(|(party_id, seat_count)| PartySeats {
                party: parties
                    .get(&party_id)
                    .map(|party| party.name.clone())
                    .unwrap_or_default(),
                seats: seat_count,
            })
            .collect();

        seats.sort_by(|a, b| b.seats.cmp(&a.seats).then_with(|| a.party.cmp(&b.party)));
        Ok(seats)
    }

    /// The final outcome.
    ///
    /// `Ongoing` with no seat data until the phase is `Concluded`. Once
    /// concluded: the party with the maximum seat count wins; two or more
    /// parties tying for the maximum is a hung parliament (an election
    /// concluded with no seated candidates reports the same, as no single
    /// winner exists).
    pub fn outcome(&self) -> Result<ElectionOutcome> {
        if self.phase.current()? != ElectionPhase::Concluded {
            return Ok(ElectionOutcome::Ongoing);
        }

        let seats = self.seats_by_party()?;

        let max_seats = seats.first().map_or(0, |top| top.seats);
        let at_max = seats.iter().filter(|entry| entry.seats == max_seats).count();

        let winner = match seats.first() {
            Some(top) if at_max == 1 => Winner::Party(top.party.clone()),
            _ => Winner::HungParliament,
        };

        Ok(ElectionOutcome::Completed { winner, seats })
    }
}
