//! HTTP client for the directory API.
//!
//! Response handling is split into pure classification functions over
//! (status, body) so the rate-limited / rejected / failed distinctions are
//! testable without a socket.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

pub struct ApiClient {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
pub struct ScoreData {
    pub score: Option<i64>,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub source: String,
}

/// Outcome of a vote submission. A 429 is a distinguished state carrying the
/// server's own message, never folded into `Failed`.
#[derive(Debug, PartialEq)]
pub enum VoteOutcome {
    Accepted { vote_count: Option<i64> },
    RateLimited { message: String },
    Failed,
}

#[derive(Debug, PartialEq)]
pub enum SubmitOutcome {
    Accepted { message: String },
    RateLimited { message: String },
    Rejected { error: String },
    Failed,
}

#[derive(Clone, Debug, Serialize)]
pub struct VibeSubmission {
    pub vibe_text: String,
    pub persona_demographic: String,
    pub persona_activity: String,
    pub persona_style: String,
    pub category: String,
}

pub const DEFAULT_DEMOGRAPHIC: &str = "Local Explorer";
pub const DEFAULT_ACTIVITY: &str = "Solo Adventure";
pub const DEFAULT_STYLE: &str = "Casual & Relaxed";

impl VibeSubmission {
    /// Empty persona fields fall back to the stock persona.
    pub fn with_defaults(
        vibe_text: &str,
        demographic: &str,
        activity: &str,
        style: &str,
        category: &str,
    ) -> Self {
        let or_default = |value: &str, default: &str| {
            if value.trim().is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };

        Self {
            vibe_text: vibe_text.to_string(),
            persona_demographic: or_default(demographic, DEFAULT_DEMOGRAPHIC),
            persona_activity: or_default(activity, DEFAULT_ACTIVITY),
            persona_style: or_default(style, DEFAULT_STYLE),
            category: category.to_string(),
        }
    }
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Live score read. Any network error or non-success status is a soft
    /// failure reported as `None`; callers fall through to their next tier.
    pub async fn fetch_score(&self, business_id: &str) -> Option<ScoreData> {
        let url = format!("{}/api/vibe-score", self.base_url);

        let response = match self
            .client
            .get(&url)
            .query(&[("businessId", business_id)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Vibe score fetch failed: {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("Vibe score response not ok: {}", response.status());
            return None;
        }

        match response.json::<ScoreData>().await {
            Ok(data) => Some(data),
            Err(e) => {
                warn!("Vibe score decode failed: {e}");
                None
            }
        }
    }

    pub async fn submit_vote(&self, business_id: &str, location: &str) -> VoteOutcome {
        let url = format!("{}/api/vote", self.base_url);
        let body = json!({ "businessId": business_id, "location": location });

        let response = match self.client.post(&url).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Vote submission failed: {e}");
                return VoteOutcome::Failed;
            }
        };

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        classify_vote_response(status, &body)
    }

    pub async fn submit_vibe(&self, submission: &VibeSubmission) -> SubmitOutcome {
        let url = format!("{}/api/vibes", self.base_url);

        let response = match self.client.post(&url).json(submission).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Vibe submission failed: {e}");
                return SubmitOutcome::Failed;
            }
        };

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        classify_vibe_response(status, &body)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    error: Option<String>,
    vote_count: Option<i64>,
}

fn decode_body(body: &str) -> ResponseBody {
    serde_json::from_str(body).unwrap_or_default()
}

pub fn classify_vote_response(status: u16, body: &str) -> VoteOutcome {
    let decoded = decode_body(body);

    match status {
        200..=299 => VoteOutcome::Accepted {
            vote_count: decoded.vote_count,
        },
        429 => VoteOutcome::RateLimited {
            message: decoded
                .message
                .unwrap_or_else(|| "Rate limited".to_string()),
        },
        _ => VoteOutcome::Failed,
    }
}

pub fn classify_vibe_response(status: u16, body: &str) -> SubmitOutcome {
    let decoded = decode_body(body);

    match status {
        200..=299 if decoded.success => SubmitOutcome::Accepted {
            message: decoded.message.unwrap_or_default(),
        },
        429 => SubmitOutcome::RateLimited {
            message: decoded
                .message
                .unwrap_or_else(|| "Rate limited".to_string()),
        },
        400..=499 => SubmitOutcome::Rejected {
            error: decoded
                .error
                .unwrap_or_else(|| "Submission rejected".to_string()),
        },
        _ => SubmitOutcome::Failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_accepted() {
        let outcome =
            classify_vote_response(200, r#"{"success":true,"message":"ok","vote_count":7}"#);

        assert_eq!(
            outcome,
            VoteOutcome::Accepted {
                vote_count: Some(7)
            }
        );
    }

    #[test]
    fn test_vote_rate_limited_carries_server_message() {
        let outcome = classify_vote_response(
            429,
            r#"{"message":"You can only vote once per business per day."}"#,
        );

        assert_eq!(
            outcome,
            VoteOutcome::RateLimited {
                message: "You can only vote once per business per day.".to_string()
            }
        );
    }

    #[test]
    fn test_vote_server_error_is_generic_failure() {
        let outcome = classify_vote_response(500, r#"{"error":"boom"}"#);

        assert_eq!(outcome, VoteOutcome::Failed);
    }

    #[test]
    fn test_vote_rate_limited_without_body_still_distinct() {
        let outcome = classify_vote_response(429, "");

        assert!(matches!(outcome, VoteOutcome::RateLimited { .. }));
    }

    #[test]
    fn test_vibe_outcomes() {
        assert_eq!(
            classify_vibe_response(200, r#"{"success":true,"message":"thanks"}"#),
            SubmitOutcome::Accepted {
                message: "thanks".to_string()
            }
        );
        assert_eq!(
            classify_vibe_response(429, r#"{"message":"One per hour"}"#),
            SubmitOutcome::RateLimited {
                message: "One per hour".to_string()
            }
        );
        assert_eq!(
            classify_vibe_response(400, r#"{"error":"Please describe your vibe"}"#),
            SubmitOutcome::Rejected {
                error: "Please describe your vibe".to_string()
            }
        );
        assert_eq!(classify_vibe_response(502, ""), SubmitOutcome::Failed);
    }

    #[test]
    fn test_persona_defaults() {
        let submission = VibeSubmission::with_defaults("I love vibing at the pier", "", "  ", "Dressed Up", "party-vibe");

        assert_eq!(submission.persona_demographic, DEFAULT_DEMOGRAPHIC);
        assert_eq!(submission.persona_activity, DEFAULT_ACTIVITY);
        assert_eq!(submission.persona_style, "Dressed Up");
        assert_eq!(submission.category, "party-vibe");
    }
}
