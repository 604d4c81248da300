//! Tests for the claim state machine

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use core_kernel::{Action, Actor, ErrorKind, EvidenceFile, HiringId, UserId};

use domain_claims::{
    allowed_actions, Claim, ClaimError, ClaimStatus, ClaimType, ClaimViewer, NewClaim, PartySide,
    ResolutionType, ResolveOutcome,
};

const DESCRIPTION: &str =
    "The provider delivered a website without the checkout flow we agreed on in the brief.";
const OBSERVATIONS: &str = "Please share the original brief and the delivery message";
const REPLY: &str = "Attached is the brief signed by both parties in March";
const RESOLUTION: &str = "The checkout flow was part of the agreed scope of work";

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap()
}

struct Parties {
    claimant: Actor,
    respondent: Actor,
    moderator: Actor,
}

fn parties() -> Parties {
    Parties {
        claimant: Actor::user(UserId::new(), "client@example.com"),
        respondent: Actor::user(UserId::new(), "provider@example.com"),
        moderator: Actor::moderator(UserId::new(), "moderator@example.com"),
    }
}

fn new_claim(respondent: &Actor) -> NewClaim {
    NewClaim {
        hiring_id: HiringId::new(),
        claimant_side: PartySide::Client,
        respondent_id: respondent.user_id,
        claim_type: ClaimType::IncompleteWork,
        other_reason: None,
        description: DESCRIPTION.to_string(),
        evidence: vec![EvidenceFile::new(
            "https://files.example.com/brief.pdf",
            "brief.pdf",
            120_000,
        )],
    }
}

fn open_claim(p: &Parties) -> Claim {
    Claim::open(&p.claimant, new_claim(&p.respondent), t0()).unwrap()
}

fn in_review(p: &Parties) -> Claim {
    let mut claim = open_claim(p);
    claim.mark_in_review(&p.moderator, t0()).unwrap();
    claim
}

fn assert_kind(result: Result<(), ClaimError>, kind: ErrorKind) {
    match result {
        Err(e) => assert_eq!(e.kind(), kind, "unexpected error: {e}"),
        Ok(()) => panic!("expected {kind}, got success"),
    }
}

// ============================================================================
// Opening
// ============================================================================

mod open_tests {
    use super::*;

    #[test]
    fn test_open_claim() {
        let p = parties();
        let mut claim = open_claim(&p);

        assert_eq!(claim.status(), ClaimStatus::Open);
        assert_eq!(claim.claimant_id(), p.claimant.user_id);
        assert_eq!(claim.respondent_id(), p.respondent.user_id);
        assert_eq!(claim.version(), 1);
        assert!(claim.moderator_id().is_none());
        assert_eq!(claim.evidence().len(), 1);

        let events = claim.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "ClaimOpened");
        assert!(claim.take_events().is_empty());
    }

    #[test]
    fn test_description_bounds() {
        let p = parties();

        let mut short = new_claim(&p.respondent);
        short.description = "a".repeat(49);
        let err = Claim::open(&p.claimant, short, t0()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let mut exact = new_claim(&p.respondent);
        exact.description = "a".repeat(50);
        assert!(Claim::open(&p.claimant, exact, t0()).is_ok());

        let mut long = new_claim(&p.respondent);
        long.description = "a".repeat(2001);
        assert!(Claim::open(&p.claimant, long, t0()).is_err());
    }

    #[test]
    fn test_padding_does_not_count_toward_description() {
        let p = parties();
        let mut padded = new_claim(&p.respondent);
        padded.description = format!("   {}   ", "a".repeat(48));
        assert!(Claim::open(&p.claimant, padded, t0()).is_err());
    }

    #[test]
    fn test_other_reason_required_and_bounded() {
        let p = parties();

        let mut missing = new_claim(&p.respondent);
        missing.claim_type = ClaimType::Other;
        assert!(Claim::open(&p.claimant, missing, t0()).is_err());

        let mut too_long = new_claim(&p.respondent);
        too_long.claim_type = ClaimType::Other;
        too_long.other_reason = Some("x".repeat(31));
        assert!(Claim::open(&p.claimant, too_long, t0()).is_err());

        let mut ok = new_claim(&p.respondent);
        ok.claim_type = ClaimType::Other;
        ok.other_reason = Some("Copied portfolio".to_string());
        let claim = Claim::open(&p.claimant, ok, t0()).unwrap();
        assert_eq!(claim.other_reason(), Some("Copied portfolio"));
    }

    #[test]
    fn test_reason_must_match_side() {
        let p = parties();
        let mut wrong_side = new_claim(&p.respondent);
        wrong_side.claim_type = ClaimType::PaymentNotReceived;
        let err = Claim::open(&p.claimant, wrong_side, t0()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let mut provider = new_claim(&p.respondent);
        provider.claimant_side = PartySide::Provider;
        provider.claim_type = ClaimType::PaymentNotReceived;
        assert!(Claim::open(&p.claimant, provider, t0()).is_ok());
    }

    #[test]
    fn test_evidence_limit() {
        let p = parties();
        let mut many = new_claim(&p.respondent);
        many.evidence = (0..6)
            .map(|i| {
                EvidenceFile::new(format!("https://files.example.com/{i}.png"), "shot.png", 1_000)
            })
            .collect();
        assert!(Claim::open(&p.claimant, many, t0()).is_err());
    }

    #[test]
    fn test_staff_cannot_open() {
        let p = parties();
        let err = Claim::open(&p.moderator, new_claim(&p.respondent), t0()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_claimant_cannot_be_respondent() {
        let p = parties();
        let err = Claim::open(&p.claimant, new_claim(&p.claimant), t0()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}

// ============================================================================
// Transitions
// ============================================================================

mod transition_tests {
    use super::*;

    #[test]
    fn test_mark_in_review_assigns_moderator() {
        let p = parties();
        let claim = in_review(&p);
        assert_eq!(claim.status(), ClaimStatus::InReview);
        assert_eq!(claim.moderator_id(), Some(p.moderator.user_id));
        assert_eq!(claim.version(), 2);
    }

    #[test]
    fn test_mark_in_review_requires_staff() {
        let p = parties();
        let mut claim = open_claim(&p);
        assert_kind(claim.mark_in_review(&p.claimant, t0()), ErrorKind::Unauthorized);
        assert_eq!(claim.status(), ClaimStatus::Open);
    }

    #[test]
    fn test_mark_in_review_twice_fails() {
        let p = parties();
        let mut claim = in_review(&p);
        assert_kind(
            claim.mark_in_review(&p.moderator, t0()),
            ErrorKind::InvalidStateTransition,
        );
    }

    #[test]
    fn test_clarification_round() {
        let p = parties();
        let mut claim = in_review(&p);

        claim.add_observations(&p.moderator, OBSERVATIONS, t0()).unwrap();
        assert_eq!(claim.status(), ClaimStatus::PendingClarification);
        assert_eq!(claim.observations(), Some(OBSERVATIONS));

        claim
            .submit_clarification(&p.respondent, Some(REPLY), vec![], t0())
            .unwrap();
        assert_eq!(claim.status(), ClaimStatus::RequiresStaffResponse);
        assert_eq!(claim.clarification_response(), Some(REPLY));

        // A second round is allowed from requires_staff_response
        claim.add_observations(&p.moderator, OBSERVATIONS, t0()).unwrap();
        assert_eq!(claim.status(), ClaimStatus::PendingClarification);
    }

    #[test]
    fn test_clarification_with_files_only() {
        let p = parties();
        let mut claim = in_review(&p);
        claim.add_observations(&p.moderator, OBSERVATIONS, t0()).unwrap();

        let file = EvidenceFile::new("https://files.example.com/chat.png", "chat.png", 5_000);
        claim
            .submit_clarification(&p.claimant, None, vec![file], t0())
            .unwrap();
        assert_eq!(claim.clarification_evidence().len(), 1);
    }

    #[test]
    fn test_empty_clarification_rejected() {
        let p = parties();
        let mut claim = in_review(&p);
        claim.add_observations(&p.moderator, OBSERVATIONS, t0()).unwrap();

        assert_kind(
            claim.submit_clarification(&p.claimant, Some("   "), vec![], t0()),
            ErrorKind::Validation,
        );
        assert_eq!(claim.status(), ClaimStatus::PendingClarification);
    }

    #[test]
    fn test_outsider_cannot_reply() {
        let p = parties();
        let mut claim = in_review(&p);
        claim.add_observations(&p.moderator, OBSERVATIONS, t0()).unwrap();

        let outsider = Actor::user(UserId::new(), "someone@example.com");
        assert_kind(
            claim.submit_clarification(&outsider, Some(REPLY), vec![], t0()),
            ErrorKind::Unauthorized,
        );
    }

    #[test]
    fn test_reply_outside_clarification_fails() {
        let p = parties();
        let mut claim = in_review(&p);
        assert_kind(
            claim.submit_clarification(&p.claimant, Some(REPLY), vec![], t0()),
            ErrorKind::InvalidStateTransition,
        );
    }

    #[test]
    fn test_resolve_without_compliances() {
        let p = parties();
        let mut claim = in_review(&p);

        let outcome = claim
            .resolve(&p.moderator, RESOLUTION, ResolutionType::ClientFavor, 0, t0())
            .unwrap();
        assert_eq!(outcome, ResolveOutcome::Resolved);
        assert_eq!(claim.status(), ClaimStatus::Resolved);
        assert_eq!(claim.resolution_type(), Some(ResolutionType::ClientFavor));
        assert_eq!(claim.resolved_by_email(), Some("moderator@example.com"));
        assert_eq!(claim.resolved_at(), Some(t0()));
    }

    #[test]
    fn test_resolve_with_compliances_stays_in_review() {
        let p = parties();
        let mut claim = in_review(&p);
        claim.take_events();

        let outcome = claim
            .resolve(&p.moderator, RESOLUTION, ResolutionType::PartialAgreement, 2, t0())
            .unwrap();
        assert_eq!(outcome, ResolveOutcome::AwaitingCompliance);
        assert_eq!(claim.status(), ClaimStatus::InReview);
        assert!(claim.resolved_at().is_none());

        let events = claim.take_events();
        assert_eq!(events[0].event_type(), "VerdictRecorded");
    }

    #[test]
    fn test_resolve_from_open_fails() {
        let p = parties();
        let mut claim = open_claim(&p);
        let result = claim
            .resolve(&p.moderator, RESOLUTION, ResolutionType::ClientFavor, 0, t0())
            .map(|_| ());
        assert_kind(result, ErrorKind::InvalidStateTransition);
    }

    #[test]
    fn test_reject_from_any_active_state() {
        let p = parties();
        let mut claim = open_claim(&p);
        claim.reject(&p.moderator, RESOLUTION, t0()).unwrap();
        assert_eq!(claim.status(), ClaimStatus::Rejected);
    }

    #[test]
    fn test_respondent_cannot_cancel() {
        let p = parties();
        let mut claim = open_claim(&p);
        assert_kind(claim.cancel(&p.respondent, None, t0()), ErrorKind::Unauthorized);
        claim.cancel(&p.claimant, Some("Settled privately"), t0()).unwrap();
        assert_eq!(claim.status(), ClaimStatus::Cancelled);
        assert_eq!(claim.cancellation_reason(), Some("Settled privately"));
    }

    #[test]
    fn test_terminal_claim_refuses_every_action() {
        let p = parties();
        let mut claim = in_review(&p);
        claim
            .resolve(&p.moderator, RESOLUTION, ResolutionType::ClientFavor, 0, t0())
            .unwrap();
        let version = claim.version();

        assert_kind(
            claim.add_observations(&p.moderator, OBSERVATIONS, t0()),
            ErrorKind::InvalidStateTransition,
        );
        assert_kind(
            claim.reject(&p.moderator, RESOLUTION, t0()),
            ErrorKind::InvalidStateTransition,
        );
        assert_kind(claim.cancel(&p.claimant, None, t0()), ErrorKind::InvalidStateTransition);
        // The terminal guard runs before the role check
        assert_kind(claim.mark_in_review(&p.claimant, t0()), ErrorKind::InvalidStateTransition);
        assert_eq!(claim.version(), version);
    }

    #[test]
    fn test_validation_runs_before_state_check() {
        let p = parties();
        let mut claim = open_claim(&p);
        assert_kind(
            claim.add_observations(&p.moderator, "too short", t0()),
            ErrorKind::Validation,
        );
    }
}

// ============================================================================
// Allowed actions
// ============================================================================

mod allowed_action_tests {
    use super::*;

    #[test]
    fn test_viewer_relation() {
        let p = parties();
        let claim = open_claim(&p);
        let outsider = Actor::user(UserId::new(), "someone@example.com");

        assert_eq!(ClaimViewer::of(&claim, &p.claimant), ClaimViewer::Claimant);
        assert_eq!(ClaimViewer::of(&claim, &p.respondent), ClaimViewer::Respondent);
        assert_eq!(ClaimViewer::of(&claim, &p.moderator), ClaimViewer::Moderator);
        assert_eq!(ClaimViewer::of(&claim, &outsider), ClaimViewer::Outsider);
    }

    #[test]
    fn test_open_claim_actions() {
        let p = parties();
        let claim = open_claim(&p);

        let moderator = allowed_actions(&claim, ClaimViewer::Moderator);
        assert!(moderator.contains(&Action::MarkInReview));
        assert!(!moderator.contains(&Action::ResolveClaim));

        let claimant = allowed_actions(&claim, ClaimViewer::Claimant);
        assert!(claimant.contains(&Action::CancelClaim));
        assert!(!claimant.contains(&Action::SubmitObservations));

        assert!(allowed_actions(&claim, ClaimViewer::Respondent).is_empty());
    }

    #[test]
    fn test_pending_clarification_actions() {
        let p = parties();
        let mut claim = in_review(&p);
        claim.add_observations(&p.moderator, OBSERVATIONS, t0()).unwrap();

        assert!(allowed_actions(&claim, ClaimViewer::Respondent)
            .contains(&Action::SubmitObservations));
        assert!(allowed_actions(&claim, ClaimViewer::Claimant)
            .contains(&Action::SubmitObservations));
        assert!(!allowed_actions(&claim, ClaimViewer::Moderator).contains(&Action::ResolveClaim));
    }

    #[test]
    fn test_terminal_claim_has_no_actions() {
        let p = parties();
        let mut claim = open_claim(&p);
        claim.cancel(&p.claimant, None, t0()).unwrap();

        for viewer in [ClaimViewer::Moderator, ClaimViewer::Claimant, ClaimViewer::Respondent] {
            assert!(allowed_actions(&claim, viewer).is_empty());
        }
    }
}

// ============================================================================
// Properties
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Step {
    MarkInReview,
    Observe,
    Reply,
    Resolve(usize),
    Reject,
    Cancel,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::MarkInReview),
        Just(Step::Observe),
        Just(Step::Reply),
        (0usize..3).prop_map(Step::Resolve),
        Just(Step::Reject),
        Just(Step::Cancel),
    ]
}

proptest! {
    #[test]
    fn prop_terminal_states_absorb(steps in proptest::collection::vec(step(), 1..20)) {
        let p = parties();
        let mut claim = open_claim(&p);
        let mut terminal_version = None;

        for s in steps {
            let before = claim.version();
            let result = match s {
                Step::MarkInReview => claim.mark_in_review(&p.moderator, t0()),
                Step::Observe => claim.add_observations(&p.moderator, OBSERVATIONS, t0()),
                Step::Reply => claim.submit_clarification(&p.respondent, Some(REPLY), vec![], t0()),
                Step::Resolve(n) => claim
                    .resolve(&p.moderator, RESOLUTION, ResolutionType::ProviderFavor, n, t0())
                    .map(|_| ()),
                Step::Reject => claim.reject(&p.moderator, RESOLUTION, t0()),
                Step::Cancel => claim.cancel(&p.claimant, None, t0()),
            };

            match result {
                Ok(()) => prop_assert_eq!(claim.version(), before + 1),
                Err(_) => prop_assert_eq!(claim.version(), before),
            }
            if let Some(v) = terminal_version {
                prop_assert_eq!(claim.version(), v);
            }
            if claim.is_terminal() && terminal_version.is_none() {
                terminal_version = Some(claim.version());
            }
        }
    }
}
