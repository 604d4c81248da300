//! Integration tests for the PostgreSQL dispute store
//!
//! These start a PostgreSQL container and are ignored unless run with
//! `cargo test -p infra_db -- --ignored`.

use core_kernel::{Actor, ClaimId, ComplianceId, ErrorKind};
use domain_claims::{ClaimStatus, ClaimStore, ComplianceStore, DisputeStore, ResolutionType};
use domain_compliance::ComplianceStatus;
use test_utils::{
    assert_error_kind, db_test, ComplianceTermsBuilder, NewClaimBuilder, Parties,
    TemporalFixtures, TextFixtures,
};

fn staged_claim(p: &Parties) -> domain_claims::Claim {
    let mut claim = NewClaimBuilder::against(&p.respondent)
        .open(&p.claimant, TemporalFixtures::t0())
        .unwrap();
    claim.mark_in_review(&p.moderator, TemporalFixtures::t0()).unwrap();
    claim.take_events();
    claim
}

fn verdict(
    p: &Parties,
    claim: &mut domain_claims::Claim,
    party: &Actor,
    counterpart: &Actor,
) -> domain_compliance::Compliance {
    claim
        .resolve(
            &p.moderator,
            TextFixtures::resolution(),
            ResolutionType::ClientFavor,
            1,
            TemporalFixtures::t0(),
        )
        .unwrap();
    ComplianceTermsBuilder::for_party(party)
        .impose(claim.id(), counterpart, 3, TemporalFixtures::t0())
        .unwrap()
}

db_test!(test_claim_round_trip, |db| {
    let store = db.store();
    let p = Parties::new();
    let claim = NewClaimBuilder::against(&p.respondent)
        .open(&p.claimant, TemporalFixtures::t0())
        .unwrap();

    store.insert_claim(&claim).await.unwrap();
    let loaded = store.get_claim(claim.id()).await.unwrap();

    assert_eq!(loaded.id(), claim.id());
    assert_eq!(loaded.status(), ClaimStatus::Open);
    assert_eq!(loaded.description(), TextFixtures::description());
    assert_eq!(loaded.version(), 1);
});

db_test!(test_missing_claim_is_not_found, |db| {
    let store = db.store();
    assert_error_kind(store.get_claim(ClaimId::new()).await, ErrorKind::NotFound);
    assert_error_kind(store.get_compliance(ComplianceId::new()).await, ErrorKind::NotFound);
});

db_test!(test_stale_claim_update_is_refused, |db| {
    let store = db.store();
    let p = Parties::new();
    let mut claim = NewClaimBuilder::against(&p.respondent)
        .open(&p.claimant, TemporalFixtures::t0())
        .unwrap();
    store.insert_claim(&claim).await.unwrap();

    claim.mark_in_review(&p.moderator, TemporalFixtures::t0()).unwrap();
    store.update_claim(&claim, 1).await.unwrap();

    // Same expected version again: the row has moved on
    assert_error_kind(store.update_claim(&claim, 1).await, ErrorKind::ConcurrentModification);

    let loaded = store.get_claim(claim.id()).await.unwrap();
    assert_eq!(loaded.status(), ClaimStatus::InReview);
    assert_eq!(loaded.version(), 2);
});

db_test!(test_verdict_commits_claim_and_compliances_together, |db| {
    let store = db.store();
    let p = Parties::new();
    let mut claim = NewClaimBuilder::against(&p.respondent)
        .open(&p.claimant, TemporalFixtures::t0())
        .unwrap();
    store.insert_claim(&claim).await.unwrap();
    claim.mark_in_review(&p.moderator, TemporalFixtures::t0()).unwrap();
    store.update_claim(&claim, 1).await.unwrap();

    let compliance = verdict(&p, &mut claim, &p.respondent, &p.claimant);
    store.commit_verdict(&claim, 2, &[compliance.clone()]).await.unwrap();

    let listed = store.list_compliances(claim.id()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id(), compliance.id());
    assert_eq!(listed[0].status(), ComplianceStatus::Pending);

    let open = store.list_open_compliances().await.unwrap();
    assert!(open.iter().any(|c| c.id() == compliance.id()));
});

db_test!(test_stale_verdict_writes_nothing, |db| {
    let store = db.store();
    let p = Parties::new();
    let mut claim = staged_claim(&p);
    store.insert_claim(&claim).await.unwrap();

    let compliance = verdict(&p, &mut claim, &p.respondent, &p.claimant);
    assert_error_kind(
        store.commit_verdict(&claim, 7, &[compliance.clone()]).await,
        ErrorKind::ConcurrentModification,
    );

    assert!(store.list_compliances(claim.id()).await.unwrap().is_empty());
    assert_eq!(store.get_claim(claim.id()).await.unwrap().version(), 2);
});

db_test!(test_compliance_update_is_version_checked, |db| {
    let store = db.store();
    let p = Parties::new();
    let mut claim = staged_claim(&p);
    store.insert_claim(&claim).await.unwrap();
    let version = claim.version();

    let mut compliance = verdict(&p, &mut claim, &p.respondent, &p.claimant);
    store.commit_verdict(&claim, version, &[compliance.clone()]).await.unwrap();

    compliance
        .submit_evidence(
            &p.respondent,
            vec![test_utils::EvidenceFixtures::pdf()],
            TextFixtures::evidence_notes(),
            TemporalFixtures::t0(),
        )
        .unwrap();
    store.update_compliance(&compliance, 1).await.unwrap();
    assert_error_kind(
        store.update_compliance(&compliance, 1).await,
        ErrorKind::ConcurrentModification,
    );

    let loaded = store.get_compliance(compliance.id()).await.unwrap();
    assert_eq!(loaded.status(), ComplianceStatus::Submitted);
    assert_eq!(loaded.submissions().len(), 1);
});

db_test!(test_delete_claim_cascades, |db| {
    let store = db.store();
    let p = Parties::new();
    let mut claim = staged_claim(&p);
    store.insert_claim(&claim).await.unwrap();
    let version = claim.version();
    let compliance = verdict(&p, &mut claim, &p.respondent, &p.claimant);
    store.commit_verdict(&claim, version, &[compliance.clone()]).await.unwrap();

    store.delete_claim(claim.id()).await.unwrap();

    assert_error_kind(store.get_compliance(compliance.id()).await, ErrorKind::NotFound);
    assert_error_kind(store.delete_claim(claim.id()).await, ErrorKind::NotFound);
});
