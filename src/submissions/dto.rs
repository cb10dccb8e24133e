use serde::Deserialize;
use uuid::Uuid;

use super::workflow::Verdict;

/// JSON submission body; `task_id` absent means a general answer.
#[derive(Debug, Deserialize)]
pub struct CreateSubmissionRequest {
    #[serde(default)]
    pub task_id: Option<Uuid>,
    #[serde(default)]
    pub answer_url: Option<String>,
    #[serde(default)]
    pub answer_text: Option<String>,
    #[serde(default)]
    pub answer_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub status: Verdict,
    #[serde(default)]
    pub remark: Option<String>,
}

/// Empty strings are stored as NULL, never as "".
pub fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_drops_empty_and_blank() {
        assert_eq!(normalize(None), None);
        assert_eq!(normalize(Some("".into())), None);
        assert_eq!(normalize(Some("   ".into())), None);
        assert_eq!(normalize(Some("keep".into())), Some("keep".into()));
    }

    #[test]
    fn review_request_parses_verdicts() {
        let req: ReviewRequest =
            serde_json::from_str(r#"{"status":"approved","remark":"nice work"}"#).unwrap();
        assert_eq!(req.status, Verdict::Approved);
        assert_eq!(req.remark.as_deref(), Some("nice work"));

        let req: ReviewRequest = serde_json::from_str(r#"{"status":"rejected"}"#).unwrap();
        assert_eq!(req.status, Verdict::Rejected);
        assert!(req.remark.is_none());

        assert!(serde_json::from_str::<ReviewRequest>(r#"{"status":"pending"}"#).is_err());
    }
}
