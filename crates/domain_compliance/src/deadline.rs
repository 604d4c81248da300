//! Deadline evaluation
//!
//! A pending compliance that misses its deadline walks through fixed overdue
//! stages. Each evaluation advances at most one stage and never moves
//! backwards, so a stage (and the grace window it grants) is handed out once.
//!
//! ```text
//! NOT_OVERDUE --deadline--> FIRST_WARNING --+3d--> SUSPENDED --+2d--> BANNED
//! ```
//!
//! Grace windows are anchored at the original deadline.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::ceil_days;

/// Overdue stage of a compliance
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverdueStatus {
    #[default]
    NotOverdue,
    FirstWarning,
    Suspended,
    Banned,
}

impl OverdueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverdueStatus::NotOverdue => "NOT_OVERDUE",
            OverdueStatus::FirstWarning => "FIRST_WARNING",
            OverdueStatus::Suspended => "SUSPENDED",
            OverdueStatus::Banned => "BANNED",
        }
    }
}

impl fmt::Display for OverdueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grace windows applied after a missed deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeadlinePolicy {
    /// Extra days granted at the first warning
    pub first_warning_grace_days: u32,
    /// Further days granted once the account is suspended
    pub suspension_grace_days: u32,
    /// Length of the account suspension issued at the suspended stage
    pub account_suspension_days: u32,
}

impl Default for DeadlinePolicy {
    fn default() -> Self {
        Self {
            first_warning_grace_days: 3,
            suspension_grace_days: 2,
            account_suspension_days: 15,
        }
    }
}

/// Result of evaluating a deadline at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineEvaluation {
    pub overdue_status: OverdueStatus,
    pub days_overdue: u32,
    /// Deadline including any grace window granted so far
    pub effective_deadline: DateTime<Utc>,
    pub can_still_submit: bool,
}

impl DeadlineEvaluation {
    /// Returns true if this evaluation moved past the prior stage
    pub fn advanced_from(&self, prior: OverdueStatus) -> bool {
        self.overdue_status > prior
    }
}

impl DeadlinePolicy {
    /// End of the first-warning grace window
    pub fn warning_deadline(&self, deadline: DateTime<Utc>) -> DateTime<Utc> {
        deadline + Duration::days(i64::from(self.first_warning_grace_days))
    }

    /// End of the suspension grace window
    pub fn final_deadline(&self, deadline: DateTime<Utc>) -> DateTime<Utc> {
        self.warning_deadline(deadline) + Duration::days(i64::from(self.suspension_grace_days))
    }

    /// Evaluates the overdue stage of a deadline
    ///
    /// # Arguments
    ///
    /// * `deadline` - The original deadline
    /// * `now` - Current time
    /// * `prior` - Stage recorded by the previous evaluation
    pub fn evaluate(
        &self,
        deadline: DateTime<Utc>,
        now: DateTime<Utc>,
        prior: OverdueStatus,
    ) -> DeadlineEvaluation {
        let warning_deadline = self.warning_deadline(deadline);
        let final_deadline = self.final_deadline(deadline);

        let overdue_status = match prior {
            OverdueStatus::NotOverdue if now > deadline => OverdueStatus::FirstWarning,
            OverdueStatus::FirstWarning if now > warning_deadline => OverdueStatus::Suspended,
            OverdueStatus::Suspended if now > final_deadline => OverdueStatus::Banned,
            stage => stage,
        };

        let effective_deadline = match overdue_status {
            OverdueStatus::NotOverdue => deadline,
            OverdueStatus::FirstWarning => warning_deadline,
            OverdueStatus::Suspended | OverdueStatus::Banned => final_deadline,
        };

        DeadlineEvaluation {
            overdue_status,
            days_overdue: ceil_days(deadline, now),
            effective_deadline,
            can_still_submit: overdue_status != OverdueStatus::Banned,
        }
    }
}

/// Evaluates a deadline with the default grace windows
pub fn evaluate_deadline(
    deadline: DateTime<Utc>,
    now: DateTime<Utc>,
    prior: OverdueStatus,
) -> DeadlineEvaluation {
    DeadlinePolicy::default().evaluate(deadline, now, prior)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn deadline() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_not_overdue_at_deadline() {
        let eval = evaluate_deadline(deadline(), deadline(), OverdueStatus::NotOverdue);
        assert_eq!(eval.overdue_status, OverdueStatus::NotOverdue);
        assert_eq!(eval.days_overdue, 0);
        assert_eq!(eval.effective_deadline, deadline());
        assert!(eval.can_still_submit);
    }

    #[test]
    fn test_first_crossing_grants_three_days() {
        let now = deadline() + Duration::hours(1);
        let eval = evaluate_deadline(deadline(), now, OverdueStatus::NotOverdue);
        assert_eq!(eval.overdue_status, OverdueStatus::FirstWarning);
        assert_eq!(eval.effective_deadline, deadline() + Duration::days(3));
        assert_eq!(eval.days_overdue, 1);
    }

    #[test]
    fn test_one_stage_per_evaluation() {
        let now = deadline() + Duration::days(10);
        let eval = evaluate_deadline(deadline(), now, OverdueStatus::NotOverdue);
        assert_eq!(eval.overdue_status, OverdueStatus::FirstWarning);
        assert!(eval.can_still_submit);
    }

    #[test]
    fn test_warning_holds_inside_grace() {
        let now = deadline() + Duration::days(3);
        let eval = evaluate_deadline(deadline(), now, OverdueStatus::FirstWarning);
        assert_eq!(eval.overdue_status, OverdueStatus::FirstWarning);
    }

    #[test]
    fn test_suspended_grants_two_more_days() {
        let now = deadline() + Duration::days(3) + Duration::seconds(1);
        let eval = evaluate_deadline(deadline(), now, OverdueStatus::FirstWarning);
        assert_eq!(eval.overdue_status, OverdueStatus::Suspended);
        assert_eq!(eval.effective_deadline, deadline() + Duration::days(5));
        assert!(eval.can_still_submit);
    }

    #[test]
    fn test_banned_after_final_grace() {
        let now = deadline() + Duration::days(5) + Duration::seconds(1);
        let eval = evaluate_deadline(deadline(), now, OverdueStatus::Suspended);
        assert_eq!(eval.overdue_status, OverdueStatus::Banned);
        assert!(!eval.can_still_submit);
    }

    #[test]
    fn test_never_moves_backwards() {
        let now = deadline() - Duration::days(1);
        let eval = evaluate_deadline(deadline(), now, OverdueStatus::Suspended);
        assert_eq!(eval.overdue_status, OverdueStatus::Suspended);
        assert_eq!(eval.days_overdue, 0);
    }

    #[test]
    fn test_serialized_stage_names() {
        let json = serde_json::to_string(&OverdueStatus::FirstWarning).unwrap();
        assert_eq!(json, "\"FIRST_WARNING\"");
    }
}
