//! Payload text rules
//!
//! Length rules count Unicode scalar values of the trimmed text, so leading
//! and trailing whitespace never satisfies a minimum.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Inclusive character-length bounds for a free-text field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRule {
    pub field: &'static str,
    pub min: usize,
    pub max: usize,
}

impl TextRule {
    pub const fn new(field: &'static str, min: usize, max: usize) -> Self {
        Self { field, min, max }
    }

    /// Checks a required text value against the rule
    pub fn check(&self, text: &str) -> Result<(), ValidationError> {
        let len = char_len(text);
        if len < self.min {
            return Err(ValidationError::new(
                self.field,
                format!("must be at least {} characters (got {})", self.min, len),
            ));
        }
        if len > self.max {
            return Err(ValidationError::new(
                self.field,
                format!("must be at most {} characters (got {})", self.max, len),
            ));
        }
        Ok(())
    }

    /// Checks an optional value; absent or blank text passes only when `min` is zero
    pub fn check_optional(&self, text: Option<&str>) -> Result<(), ValidationError> {
        match text {
            Some(t) if !t.trim().is_empty() => self.check(t),
            _ if self.min == 0 => Ok(()),
            _ => Err(ValidationError::new(self.field, "is required")),
        }
    }

    /// Returns true if the text satisfies the rule
    pub fn accepts(&self, text: &str) -> bool {
        self.check(text).is_ok()
    }
}

/// Character length of the trimmed text
pub fn char_len(text: &str) -> usize {
    text.trim().chars().count()
}

/// Rules shared by the claim and compliance workflows
pub mod rules {
    use super::TextRule;

    pub const CLAIM_DESCRIPTION: TextRule = TextRule::new("description", 50, 2000);
    pub const OTHER_REASON: TextRule = TextRule::new("other_reason", 1, 30);
    pub const OBSERVATIONS: TextRule = TextRule::new("observations", 20, 2000);
    pub const CLARIFICATION: TextRule = TextRule::new("clarification_response", 20, 2000);
    pub const RESOLUTION: TextRule = TextRule::new("resolution", 20, 2000);
    pub const CANCELLATION_REASON: TextRule = TextRule::new("reason", 0, 500);
    pub const MODERATOR_INSTRUCTIONS: TextRule = TextRule::new("moderator_instructions", 20, 2000);
    pub const EVIDENCE_NOTES: TextRule = TextRule::new("user_notes", 20, 1000);
    pub const REVIEW_NOTES: TextRule = TextRule::new("moderator_notes", 20, 1000);
    pub const PEER_OBJECTION: TextRule = TextRule::new("reason", 20, 500);
    pub const PEER_APPROVAL: TextRule = TextRule::new("reason", 0, 500);
}
