//! Edge and race-condition tests for the election ledger

use std::sync::Arc;

use chrono::NaiveDate;
use gevs::{
    Error, ErrorClass, Result,
    ledger::ElectionLedger,
    seed::{CandidateSeed, CommissionerSeed, SeedData},
    types::{AuthOutcome, CommissionerAuth, ElectionPhase, Registration},
};

const COMMISSIONER: &str = "election@shangrila.gov.sr";
const COMMISSIONER_SECRET: &str = "W3lc0me2024";

fn seeded_ledger(credentials: Vec<String>) -> Result<Arc<ElectionLedger>> {
    let ledger = ElectionLedger::for_testing();
    SeedData {
        constituencies: vec!["Shangri-la-Town".into()],
        parties: vec!["Blue Party".into()],
        candidates: vec![CandidateSeed {
            name: "Alice Adams".into(),
            party: "Blue Party".into(),
            constituency: "Shangri-la-Town".into(),
        }],
        commissioner: CommissionerSeed {
            identity: COMMISSIONER.into(),
            secret: COMMISSIONER_SECRET.into(),
        },
        credentials,
    }
    .apply(&ledger)?;
    Ok(Arc::new(ledger))
}

fn commissioner_auth(ledger: &ElectionLedger) -> CommissionerAuth {
    match ledger
        .authenticate(COMMISSIONER, COMMISSIONER_SECRET)
        .unwrap()
    {
        AuthOutcome::Commissioner(auth) => auth,
        other => panic!("expected commissioner authority, got {other:?}"),
    }
}

fn registration(identity: &str, code: &str) -> Registration {
    Registration {
        identity: identity.into(),
        full_name: "Edge Voter".into(),
        date_of_birth: NaiveDate::from_ymd_opt(1979, 2, 14).unwrap(),
        secret: "v0ter-s3cret".into(),
        credential_code: code.into(),
        constituency_id: 1,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_credential_consumption_single_winner() -> Result<()> {
    println!("🎫 Racing 16 consumers over one credential...");

    let ledger = seeded_ledger(vec!["race0001".into()])?;

    let mut handles = Vec::new();
    for _ in 0..16 {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger.credentials().consume("race0001")
        }));
    }

    let mut winners = 0;
    let mut already_used = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => winners += 1,
            Err(Error::CredentialAlreadyUsed) => already_used += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(already_used, 15);
    println!("✅ Exactly one consumer won");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_voter_casts_single_success() -> Result<()> {
    println!("🚫 Racing 16 casts for one voter...");

    let ledger = seeded_ledger(vec!["uvc00001".into()])?;
    let auth = commissioner_auth(&ledger);
    ledger.register(registration("eve@example.com", "uvc00001"))?;
    ledger.transition(&auth, ElectionPhase::Ongoing)?;

    let candidate_id = ledger.list_candidates()?[0].id;

    let mut handles = Vec::new();
    for _ in 0..16 {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger.cast_vote("eve@example.com", candidate_id)
        }));
    }

    let mut accepted = 0;
    let mut already_voted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(Error::AlreadyVoted { .. }) => already_voted += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(already_voted, 15);

    // Exactly one increment landed on the tally
    assert_eq!(ledger.list_candidates()?[0].tally, 1);
    println!("✅ One ballot recorded, one tally increment");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_distinct_voters_tally_is_exact() -> Result<()> {
    let voters = 12usize;
    let codes: Vec<String> = (0..voters).map(|i| format!("uvc{i:05}")).collect();
    let ledger = seeded_ledger(codes.clone())?;
    let auth = commissioner_auth(&ledger);

    for (i, code) in codes.iter().enumerate() {
        ledger.register(registration(&format!("voter{i}@example.com"), code))?;
    }
    ledger.transition(&auth, ElectionPhase::Ongoing)?;

    let candidate_id = ledger.list_candidates()?[0].id;

    let mut handles = Vec::new();
    for i in 0..voters {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger.cast_vote(&format!("voter{i}@example.com"), candidate_id)
        }));
    }
    for handle in handles {
        handle.await.unwrap()?;
    }

    // No lost updates across concurrent increments
    assert_eq!(ledger.list_candidates()?[0].tally, voters as u64);
    Ok(())
}

#[test]
fn test_concurrent_registration_same_identity_single_success() {
    let ledger = seeded_ledger((0..8).map(|i| format!("uvc{i:05}")).collect()).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let ledger = ledger.clone();
            std::thread::spawn(move || {
                ledger.register(registration("mallory@example.com", &format!("uvc{i:05}")))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let accepted = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(Error::AlreadyRegistered { .. })))
        .count();

    assert_eq!(accepted, 1);
    assert_eq!(rejected, 7);

    // Exactly one credential was burned; the other seven stay redeemable
    assert_eq!(ledger.credentials().unused_count().unwrap(), 7);
}

#[test]
fn test_registration_failure_leaves_credential_unused() {
    let ledger = seeded_ledger(vec!["uvc00001".into()]).unwrap();

    // Unknown constituency fails before the credential is touched
    let bad = Registration {
        constituency_id: 99,
        ..registration("frank@example.com", "uvc00001")
    };
    assert!(matches!(
        ledger.register(bad),
        Err(Error::ConstituencyNotFound { .. })
    ));
    assert!(ledger.credentials().is_valid_unused("uvc00001").unwrap());

    // And the identity is free to register properly afterwards
    ledger
        .register(registration("frank@example.com", "uvc00001"))
        .unwrap();
    assert!(!ledger.credentials().is_valid_unused("uvc00001").unwrap());
}

#[test]
fn test_credential_reuse_across_voters_rejected() {
    let ledger = seeded_ledger(vec!["uvc00001".into()]).unwrap();

    ledger
        .register(registration("grace@example.com", "uvc00001"))
        .unwrap();

    let err = ledger
        .register(registration("heidi@example.com", "uvc00001"))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCredential { .. }));

    // The losing registration must not have produced a voter row
    assert!(matches!(
        ledger.has_voted("heidi@example.com"),
        Err(Error::VoterNotFound { .. })
    ));
}

#[test]
fn test_no_votes_accepted_after_conclusion() {
    let ledger = seeded_ledger(vec!["uvc00001".into(), "uvc00002".into()]).unwrap();
    let auth = commissioner_auth(&ledger);

    ledger
        .register(registration("ivan@example.com", "uvc00001"))
        .unwrap();
    ledger.transition(&auth, ElectionPhase::Ongoing).unwrap();
    let candidate_id = ledger.list_candidates().unwrap()[0].id;
    ledger.cast_vote("ivan@example.com", candidate_id).unwrap();

    ledger.transition(&auth, ElectionPhase::Concluded).unwrap();

    // Registration still works after conclusion, but casting never does
    ledger
        .register(registration("judy@example.com", "uvc00002"))
        .unwrap();
    let err = ledger.cast_vote("judy@example.com", candidate_id).unwrap_err();
    assert_eq!(
        err,
        Error::ElectionNotOpen {
            phase: ElectionPhase::Concluded
        }
    );
    assert_eq!(ledger.list_candidates().unwrap()[0].tally, 1);
}

#[test]
fn test_phase_race_with_conclusion_never_loses_a_ballot() {
    // Conclude concurrently with a stream of casts: every accepted ballot
    // must be reflected in the tally, and every ballot after the
    // transition must be rejected.
    let voters = 16usize;
    let codes: Vec<String> = (0..voters).map(|i| format!("uvc{i:05}")).collect();
    let ledger = seeded_ledger(codes.clone()).unwrap();
    let auth = commissioner_auth(&ledger);

    for (i, code) in codes.iter().enumerate() {
        ledger
            .register(registration(&format!("racer{i}@example.com"), code))
            .unwrap();
    }
    ledger.transition(&auth, ElectionPhase::Ongoing).unwrap();
    let candidate_id = ledger.list_candidates().unwrap()[0].id;

    let caster_handles: Vec<_> = (0..voters)
        .map(|i| {
            let ledger = ledger.clone();
            std::thread::spawn(move || {
                ledger.cast_vote(&format!("racer{i}@example.com"), candidate_id)
            })
        })
        .collect();

    let concluder = {
        let ledger = ledger.clone();
        std::thread::spawn(move || ledger.transition(&auth, ElectionPhase::Concluded))
    };

    let mut accepted = 0u64;
    for handle in caster_handles {
        match handle.join().unwrap() {
            Ok(_) => accepted += 1,
            Err(Error::ElectionNotOpen { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    concluder.join().unwrap().unwrap();

    assert_eq!(ledger.list_candidates().unwrap()[0].tally, accepted);
    assert_eq!(ledger.phase().current().unwrap(), ElectionPhase::Concluded);
}

#[test]
fn test_issue_batch_failure_is_all_or_nothing() {
    let ledger = seeded_ledger(vec!["uvc00001".into()]).unwrap();

    let err = ledger
        .credentials()
        .issue_batch(["fresh001", "uvc00001", "fresh002"])
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateCredential { .. }));

    // Neither fresh code from the failed batch exists
    assert!(!ledger.credentials().is_valid_unused("fresh001").unwrap());
    assert!(!ledger.credentials().is_valid_unused("fresh002").unwrap());
    assert_eq!(ledger.credentials().count().unwrap(), 1);
}

#[test]
fn test_error_taxonomy_guides_adapters() {
    let ledger = seeded_ledger(vec!["uvc00001".into()]).unwrap();

    // State conflicts and not-found errors are never retryable
    ledger
        .register(registration("kate@example.com", "uvc00001"))
        .unwrap();
    let conflict = ledger
        .register(registration("kate@example.com", "uvc00001"))
        .unwrap_err();
    assert_eq!(conflict.class(), ErrorClass::Validation);
    assert!(!conflict.is_transient());

    let not_found = ledger.has_voted("ghost@example.com").unwrap_err();
    assert_eq!(not_found.class(), ErrorClass::NotFound);
    assert!(!not_found.is_transient());

    let gate = ledger.cast_vote("kate@example.com", 1).unwrap_err();
    assert_eq!(gate.class(), ErrorClass::StateConflict);
    assert!(!gate.is_transient());
}
