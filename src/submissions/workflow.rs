use serde::{Deserialize, Serialize};

/// Review state of a submission. `Pending` is the only state with outgoing
/// transitions; approved and rejected are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Approved,
    Rejected,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Approved => "approved",
            Status::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Status::Pending),
            "approved" => Some(Status::Approved),
            "rejected" => Some(Status::Rejected),
            _ => None,
        }
    }
}

/// Admin decision on a pending submission.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Approved,
    Rejected,
}

impl Verdict {
    pub fn into_status(self) -> Status {
        match self {
            Verdict::Approved => Status::Approved,
            Verdict::Rejected => Status::Rejected,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("submission already reviewed")]
    AlreadyReviewed,
    #[error("submission not found")]
    NotFound,
}

/// Transition function: pending may move to approved or rejected, nothing
/// else moves anywhere.
pub fn apply_review(current: Status, verdict: Verdict) -> Result<Status, ReviewError> {
    match current {
        Status::Pending => Ok(verdict.into_status()),
        Status::Approved | Status::Rejected => Err(ReviewError::AlreadyReviewed),
    }
}

/// A submission needs at least one of link, text, or image. Empty strings
/// count as absent.
pub fn has_answer(
    answer_url: Option<&str>,
    answer_text: Option<&str>,
    answer_image_url: Option<&str>,
) -> bool {
    let present = |v: Option<&str>| v.is_some_and(|s| !s.trim().is_empty());
    present(answer_url) || present(answer_text) || present(answer_image_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_accepts_both_verdicts() {
        assert_eq!(
            apply_review(Status::Pending, Verdict::Approved),
            Ok(Status::Approved)
        );
        assert_eq!(
            apply_review(Status::Pending, Verdict::Rejected),
            Ok(Status::Rejected)
        );
    }

    #[test]
    fn terminal_states_reject_further_review() {
        for current in [Status::Approved, Status::Rejected] {
            for verdict in [Verdict::Approved, Verdict::Rejected] {
                assert_eq!(
                    apply_review(current, verdict),
                    Err(ReviewError::AlreadyReviewed)
                );
            }
        }
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [Status::Pending, Status::Approved, Status::Rejected] {
            assert_eq!(Status::parse(status.as_str()), Some(status));
        }
        assert_eq!(Status::parse("archived"), None);
    }

    #[test]
    fn answer_required_iff_all_fields_absent() {
        assert!(!has_answer(None, None, None));
        assert!(!has_answer(Some(""), Some("  "), Some("")));
        assert!(has_answer(Some("https://repo/pr/1"), None, None));
        assert!(has_answer(None, Some("solved with two pointers"), None));
        assert!(has_answer(None, None, Some("https://cdn/img.png")));
        assert!(has_answer(Some("https://x"), Some("text"), None));
    }
}
