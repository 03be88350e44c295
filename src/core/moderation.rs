//! Quote lifecycle rules.
//!
//! `draft → published` is the publish action. Admin edits may set any status under the
//! permissive policy; the strict policy only accepts the forward cycle
//! `draft → published → archived → draft`.

use crate::domain::model::QuoteStatus;
use crate::utils::error::{DeskError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    #[default]
    Permissive,
    Strict,
}

impl TransitionPolicy {
    pub fn allows(&self, from: QuoteStatus, to: QuoteStatus) -> bool {
        use crate::domain::model::QuoteStatus::{Archived, Draft, Published};

        if from == to {
            return true;
        }
        match self {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::Strict => matches!(
                (from, to),
                (Draft, Published) | (Published, Archived) | (Archived, Draft)
            ),
        }
    }

    /// 編輯路徑的狀態檢查
    pub fn check_edit(&self, from: QuoteStatus, to: QuoteStatus) -> Result<()> {
        if self.allows(from, to) {
            Ok(())
        } else {
            Err(invalid(from, to))
        }
    }
}

/// The publish action only applies to drafts, whatever the edit policy.
pub fn check_publish(current: QuoteStatus) -> Result<()> {
    match current {
        QuoteStatus::Draft => Ok(()),
        other => Err(invalid(other, QuoteStatus::Published)),
    }
}

/// Status a brand-new quote starts in when the author did not choose one.
pub fn initial_status(requested: Option<QuoteStatus>) -> QuoteStatus {
    requested.unwrap_or_default()
}

fn invalid(from: QuoteStatus, to: QuoteStatus) -> DeskError {
    DeskError::InvalidTransition {
        from: from.to_string(),
        to: to.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::QuoteStatus::{Archived, Draft, Published};

    #[test]
    fn test_permissive_allows_everything() {
        for from in QuoteStatus::ALL {
            for to in QuoteStatus::ALL {
                assert!(TransitionPolicy::Permissive.allows(from, to));
            }
        }
    }

    #[test]
    fn test_strict_table() {
        let strict = TransitionPolicy::Strict;
        assert!(strict.allows(Draft, Published));
        assert!(strict.allows(Published, Archived));
        assert!(strict.allows(Archived, Draft));
        assert!(strict.allows(Published, Published));

        assert!(!strict.allows(Draft, Archived));
        assert!(!strict.allows(Published, Draft));
        assert!(!strict.allows(Archived, Published));
        assert!(strict.check_edit(Published, Draft).is_err());
    }

    #[test]
    fn test_publish_requires_draft() {
        assert!(check_publish(Draft).is_ok());
        let err = check_publish(Archived).unwrap_err();
        assert!(matches!(
            err,
            DeskError::InvalidTransition { ref from, ref to } if from == "archived" && to == "published"
        ));
        assert!(check_publish(Published).is_err());
    }

    #[test]
    fn test_initial_status_defaults_to_draft() {
        assert_eq!(initial_status(None), Draft);
        assert_eq!(initial_status(Some(Published)), Published);
    }
}
