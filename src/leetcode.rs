use axum::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const STATS_QUERY: &str = r#"
query userProfile($username: String!) {
  matchedUser(username: $username) {
    submitStatsGlobal {
      acSubmissionNum {
        difficulty
        count
      }
    }
  }
  recentAcSubmissionList(username: $username, limit: 5) {
    title
    titleSlug
    timestamp
  }
}
"#;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecentAccepted {
    pub title: String,
    #[serde(rename = "titleSlug")]
    pub title_slug: String,
    pub timestamp: String,
}

/// Solved-problem counts and recent accepted submissions for one handle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeetCodeStats {
    pub total_solved: u64,
    pub easy_solved: u64,
    pub medium_solved: u64,
    pub hard_solved: u64,
    pub recent_accepted: Vec<RecentAccepted>,
}

/// Best-effort external stats source; every caller treats failure as
/// "no stats", never as a request error.
#[async_trait]
pub trait StatsClient: Send + Sync {
    async fn fetch_stats(&self, username: &str) -> anyhow::Result<LeetCodeStats>;
}

pub struct LeetCode {
    http: reqwest::Client,
    graphql_url: String,
}

impl LeetCode {
    pub fn new(graphql_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            graphql_url,
        }
    }
}

#[derive(Serialize)]
struct RequestBody<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Deserialize)]
struct QueryResponse {
    data: Option<StatsData>,
}

#[derive(Deserialize)]
struct StatsData {
    #[serde(rename = "matchedUser")]
    matched_user: Option<MatchedUser>,
    #[serde(rename = "recentAcSubmissionList", default)]
    recent_ac_submission_list: Vec<RecentAccepted>,
}

#[derive(Deserialize)]
struct MatchedUser {
    #[serde(rename = "submitStatsGlobal")]
    submit_stats_global: Option<SubmitStats>,
}

#[derive(Deserialize)]
struct SubmitStats {
    #[serde(rename = "acSubmissionNum", default)]
    ac_submission_num: Vec<DifficultyCount>,
}

#[derive(Deserialize)]
struct DifficultyCount {
    difficulty: String,
    count: u64,
}

fn stats_from_data(data: StatsData) -> LeetCodeStats {
    let counts = data
        .matched_user
        .and_then(|u| u.submit_stats_global)
        .map(|s| s.ac_submission_num)
        .unwrap_or_default();

    let by_difficulty = |name: &str| {
        counts
            .iter()
            .find(|c| c.difficulty == name)
            .map(|c| c.count)
            .unwrap_or(0)
    };

    LeetCodeStats {
        total_solved: by_difficulty("All"),
        easy_solved: by_difficulty("Easy"),
        medium_solved: by_difficulty("Medium"),
        hard_solved: by_difficulty("Hard"),
        recent_accepted: data.recent_ac_submission_list,
    }
}

#[async_trait]
impl StatsClient for LeetCode {
    async fn fetch_stats(&self, username: &str) -> anyhow::Result<LeetCodeStats> {
        let body = RequestBody {
            query: STATS_QUERY,
            variables: serde_json::json!({ "username": username }),
        };

        let response = self
            .http
            .post(&self.graphql_url)
            .header(reqwest::header::REFERER, "https://leetcode.com")
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<QueryResponse>()
            .await?;

        let data = response
            .data
            .ok_or_else(|| anyhow::anyhow!("no data in stats response"))?;
        Ok(stats_from_data(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_counts_by_difficulty() {
        let raw = r#"{
            "data": {
                "matchedUser": {
                    "submitStatsGlobal": {
                        "acSubmissionNum": [
                            {"difficulty": "All", "count": 120},
                            {"difficulty": "Easy", "count": 60},
                            {"difficulty": "Medium", "count": 45},
                            {"difficulty": "Hard", "count": 15}
                        ]
                    }
                },
                "recentAcSubmissionList": [
                    {"title": "Two Sum", "titleSlug": "two-sum", "timestamp": "1724900000"}
                ]
            }
        }"#;
        let parsed: QueryResponse = serde_json::from_str(raw).unwrap();
        let stats = stats_from_data(parsed.data.unwrap());
        assert_eq!(stats.total_solved, 120);
        assert_eq!(stats.easy_solved, 60);
        assert_eq!(stats.medium_solved, 45);
        assert_eq!(stats.hard_solved, 15);
        assert_eq!(stats.recent_accepted.len(), 1);
        assert_eq!(stats.recent_accepted[0].title_slug, "two-sum");
    }

    #[test]
    fn unknown_user_yields_zeroes() {
        let raw = r#"{"data": {"matchedUser": null, "recentAcSubmissionList": []}}"#;
        let parsed: QueryResponse = serde_json::from_str(raw).unwrap();
        let stats = stats_from_data(parsed.data.unwrap());
        assert_eq!(stats.total_solved, 0);
        assert!(stats.recent_accepted.is_empty());
    }
}
