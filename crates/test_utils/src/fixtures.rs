//! Pre-built Test Fixtures
//!
//! Ready-to-use actors, payload texts and evidence files. Every text fixture
//! satisfies the length rule of the field it is named after.

use chrono::{DateTime, Duration, TimeZone, Utc};

use core_kernel::{Actor, EvidenceFile, UserId};

/// Fixed points in time
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Reference instant used by most tests
    pub fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    /// A deadline `days` after [`TemporalFixtures::t0`]
    pub fn deadline_in(days: i64) -> DateTime<Utc> {
        Self::t0() + Duration::days(days)
    }
}

/// The four kinds of actor a dispute involves
#[derive(Debug, Clone)]
pub struct Parties {
    pub claimant: Actor,
    pub respondent: Actor,
    pub moderator: Actor,
    pub outsider: Actor,
}

impl Parties {
    pub fn new() -> Self {
        Self {
            claimant: Actor::user(UserId::new(), "client@example.com"),
            respondent: Actor::user(UserId::new(), "provider@example.com"),
            moderator: Actor::moderator(UserId::new(), "moderator@example.com"),
            outsider: Actor::user(UserId::new(), "outsider@example.com"),
        }
    }
}

impl Default for Parties {
    fn default() -> Self {
        Self::new()
    }
}

/// Payload texts
pub struct TextFixtures;

impl TextFixtures {
    /// 60 characters
    pub fn description() -> &'static str {
        "Delivered landing page lacks the contact form we agreed upon"
    }

    pub fn observations() -> &'static str {
        "Please attach the original brief and the final delivery"
    }

    pub fn reply() -> &'static str {
        "The brief signed in March lists the contact form explicitly"
    }

    pub fn resolution() -> &'static str {
        "The contact form was part of the agreed scope of work"
    }

    pub fn instructions() -> &'static str {
        "Deliver the missing contact form within the deadline"
    }

    /// 40 characters
    pub fn evidence_notes() -> &'static str {
        "Refund sent via bank transfer, see proof"
    }

    /// 30 characters
    pub fn review_notes() -> &'static str {
        "Receipt amount is not matching"
    }

    pub fn objection() -> &'static str {
        "The form submits but no email ever arrives"
    }
}

/// Evidence file references
pub struct EvidenceFixtures;

impl EvidenceFixtures {
    pub fn pdf() -> EvidenceFile {
        EvidenceFile::new("https://files.example.com/receipt.pdf", "receipt.pdf", 48_000)
    }

    pub fn png() -> EvidenceFile {
        EvidenceFile::new("https://files.example.com/screen.png", "screen.png", 220_000)
    }

    /// `n` valid files
    pub fn files(n: usize) -> Vec<EvidenceFile> {
        (0..n)
            .map(|i| {
                EvidenceFile::new(
                    format!("https://files.example.com/evidence-{i}.pdf"),
                    format!("evidence-{i}.pdf"),
                    10_000,
                )
            })
            .collect()
    }

    /// A file just over the 10MB limit
    pub fn oversized() -> EvidenceFile {
        EvidenceFile::new(
            "https://files.example.com/video.mp4",
            "video.mp4",
            10 * 1024 * 1024 + 1,
        )
    }

    /// A file with a rejected extension
    pub fn executable() -> EvidenceFile {
        EvidenceFile::new("https://files.example.com/setup.exe", "setup.exe", 1_000)
    }
}
