//! Property-Based Test Generators
//!
//! Proptest strategies for dispute inputs. Strategies named `valid_*` only
//! produce values the validation rules accept.

use chrono::{DateTime, Duration, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use proptest::prelude::*;

use core_kernel::evidence::{ALLOWED_EXTENSIONS, MAX_FILES_PER_SUBMISSION, MAX_FILE_SIZE_BYTES};
use core_kernel::{Actor, EvidenceFile, TextRule, UserId};
use domain_claims::{ClaimType, ResolutionType};
use domain_compliance::{ComplianceType, ReviewDecision};

use crate::fixtures::TemporalFixtures;

/// Text whose character count lies within `min..=max`
///
/// Mixes in multi-byte characters so byte-length bugs surface.
pub fn text_strategy(min: usize, max: usize) -> impl Strategy<Value = String> {
    let chars = prop_oneof![Just('a'), Just('z'), Just(' '), Just('é'), Just('ñ')];
    proptest::collection::vec(chars, min..=max).prop_map(|chars| chars.into_iter().collect())
}

/// Text accepted by `rule`
pub fn valid_text_strategy(rule: TextRule) -> impl Strategy<Value = String> {
    text_strategy(rule.min, rule.max)
}

/// Text one character too long for `rule`
pub fn overlong_text_strategy(rule: TextRule) -> impl Strategy<Value = String> {
    text_strategy(rule.max + 1, rule.max + 1)
}

pub fn extension_strategy() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(ALLOWED_EXTENSIONS)
}

/// A file reference that passes the upload checks
pub fn valid_evidence_file_strategy() -> impl Strategy<Value = EvidenceFile> {
    ("[a-z]{1,12}", extension_strategy(), 1u64..=MAX_FILE_SIZE_BYTES).prop_map(
        |(stem, ext, size)| {
            EvidenceFile::new(
                format!("https://files.example.com/{stem}.{ext}"),
                format!("{stem}.{ext}"),
                size,
            )
        },
    )
}

/// Between `min` and the per-submission maximum of valid files
pub fn valid_evidence_batch_strategy(min: usize) -> impl Strategy<Value = Vec<EvidenceFile>> {
    proptest::collection::vec(valid_evidence_file_strategy(), min..=MAX_FILES_PER_SUBMISSION)
}

pub fn claim_type_strategy() -> impl Strategy<Value = ClaimType> {
    prop_oneof![
        Just(ClaimType::ServiceNotDelivered),
        Just(ClaimType::IncompleteWork),
        Just(ClaimType::PoorQuality),
        Just(ClaimType::MissedDeadline),
        Just(ClaimType::UnresponsiveProvider),
        Just(ClaimType::PaymentNotReceived),
        Just(ClaimType::ScopeChanged),
        Just(ClaimType::UnresponsiveClient),
        Just(ClaimType::AbusiveBehavior),
    ]
}

pub fn resolution_type_strategy() -> impl Strategy<Value = ResolutionType> {
    prop_oneof![
        Just(ResolutionType::ClientFavor),
        Just(ResolutionType::ProviderFavor),
        Just(ResolutionType::PartialAgreement),
    ]
}

pub fn compliance_type_strategy() -> impl Strategy<Value = ComplianceType> {
    prop_oneof![
        Just(ComplianceType::Refund),
        Just(ComplianceType::PartialRefund),
        Just(ComplianceType::DeliverWork),
        Just(ComplianceType::CorrectWork),
        Just(ComplianceType::Payment),
        Just(ComplianceType::Documentation),
        Just(ComplianceType::Other),
    ]
}

pub fn review_decision_strategy() -> impl Strategy<Value = ReviewDecision> {
    prop_oneof![Just(ReviewDecision::Approve), Just(ReviewDecision::Reject)]
}

/// A deadline between one hour and thirty days after the reference instant
pub fn future_deadline_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (1i64..=30 * 24).prop_map(|hours| TemporalFixtures::t0() + Duration::hours(hours))
}

/// A non-staff actor with a generated address
pub fn fake_user() -> Actor {
    Actor::user(UserId::new(), SafeEmail().fake::<String>())
}

/// A moderator with a generated address
pub fn fake_moderator() -> Actor {
    Actor::moderator(UserId::new(), SafeEmail().fake::<String>())
}

/// A sentence padded until `rule` accepts it
pub fn fake_text(rule: TextRule) -> String {
    let mut text: String = Sentence(3..12).fake();
    while core_kernel::char_len(&text) < rule.min {
        text.push_str(" more detail");
    }
    text.chars().take(rule.max).collect()
}
