//! Rejection escalation policy
//!
//! Maps the number of rejections a compliance has already received onto the
//! consequence of the next rejection. The table is explicit configuration;
//! nothing else in the engine hard-codes attempt limits.
//!
//! | rejections before | consequence                          |
//! |-------------------|--------------------------------------|
//! | 0                 | warning, one more attempt            |
//! | 1                 | 15-day account suspension, terminal  |
//! | 2+                | permanent ban, terminal              |

use serde::{Deserialize, Serialize};

use core_kernel::UserId;

/// Consequence of a rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Consequence {
    /// Another attempt is granted
    Warning,
    /// Temporary account suspension; the compliance ends rejected
    Suspension { days: u32 },
    /// Permanent ban; the compliance ends rejected
    Ban,
}

impl Consequence {
    /// Returns true if no further attempts follow this consequence
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Consequence::Warning)
    }

    fn severity(&self) -> u8 {
        match self {
            Consequence::Warning => 0,
            Consequence::Suspension { .. } => 1,
            Consequence::Ban => 2,
        }
    }
}

/// One row of the escalation table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationRule {
    /// Applies when the pre-increment rejection count is at least this value
    pub min_rejections: u32,
    pub consequence: Consequence,
}

/// Outcome of evaluating the policy for one rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationOutcome {
    pub consequence: Consequence,
    /// True when the compliance has no attempts left after this rejection
    pub new_max_reached: bool,
}

/// Escalation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationPolicy {
    /// Attempts a responsible party gets per compliance
    pub max_attempts: u32,
    /// Days added to the deadline when a retry is granted
    pub retry_extension_days: u32,
    /// Escalation table, any order
    pub rules: Vec<EscalationRule>,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_extension_days: 3,
            rules: vec![
                EscalationRule {
                    min_rejections: 0,
                    consequence: Consequence::Warning,
                },
                EscalationRule {
                    min_rejections: 1,
                    consequence: Consequence::Suspension { days: 15 },
                },
                EscalationRule {
                    min_rejections: 2,
                    consequence: Consequence::Ban,
                },
            ],
        }
    }
}

impl EscalationPolicy {
    /// Evaluates the consequence of a rejection
    ///
    /// # Arguments
    ///
    /// * `rejection_count` - Rejections recorded before this one
    ///
    /// The highest matching row wins. A warning that would exceed
    /// `max_attempts` is upgraded to a ban, and consequences never drop below
    /// the severity of a lower row, so the table cannot de-escalate.
    pub fn evaluate(&self, rejection_count: u32) -> EscalationOutcome {
        let mut consequence = Consequence::Warning;
        for rule in self.rules.iter().filter(|r| r.min_rejections <= rejection_count) {
            if rule.consequence.severity() >= consequence.severity() {
                consequence = rule.consequence;
            }
        }

        let attempts_after = rejection_count.saturating_add(1);
        if !consequence.is_terminal() && attempts_after >= self.max_attempts {
            consequence = Consequence::Ban;
        }

        EscalationOutcome {
            consequence,
            new_max_reached: consequence.is_terminal(),
        }
    }
}

/// Source of an account-level escalation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationSource {
    /// Repeated moderator rejections
    Rejection,
    /// Missed deadline and exhausted grace windows
    Deadline,
}

/// Directive the account collaborator must honor platform-wide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountDirective {
    Suspend {
        user_id: UserId,
        days: u32,
        source: EscalationSource,
    },
    Ban {
        user_id: UserId,
        source: EscalationSource,
    },
}

impl AccountDirective {
    pub fn user_id(&self) -> UserId {
        match self {
            AccountDirective::Suspend { user_id, .. } => *user_id,
            AccountDirective::Ban { user_id, .. } => *user_id,
        }
    }
}
