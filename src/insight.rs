//! Coaching remark from an external text-generation API.
//!
//! Strictly best effort: every failure collapses into [`FALLBACK_INSIGHT`].

use crate::config::InsightConfig;
use crate::models::DailyEntry;
use crate::stats::date_key;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

pub const FALLBACK_INSIGHT: &str = "External reinforcement offline. Rely on internal discipline.";
pub const PENDING_INSIGHT: &str = "Loading strategic review...";
const HISTORY_DAYS: usize = 7;

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("response contained no text")]
    Empty,
}

/// One day of history as sent in the prompt.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DaySummary {
    pub date: String,
    pub xp: u32,
    pub workout: bool,
    pub fuel: usize,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// The last seven entries reduced to what the coach needs.
pub fn recent_history(entries: &[DailyEntry]) -> Vec<DaySummary> {
    let start = entries.len().saturating_sub(HISTORY_DAYS);
    entries[start..]
        .iter()
        .map(|entry| DaySummary {
            date: date_key(entry.date),
            xp: entry.daily_xp,
            workout: entry.workout_done,
            fuel: entry.meal_count(),
        })
        .collect()
}

pub fn build_prompt(history: &[DaySummary]) -> String {
    let log = serde_json::to_string(history).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Act as an elite performance coach for the Obsidian System. Analyze this training log \
         and provide a short, stoic, high-impact insight (max 2 sentences).\n\n\
         Log History: {log}\n\n\
         Requirements:\n\
         - Use an analytical, slightly cold, but deeply encouraging tone.\n\
         - Focus on momentum, recovery debt, or friction.\n\
         - If progress is good, acknowledge the infrastructure.\n\
         - If progress is stalled, highlight the cost of negotiation."
    )
}

#[derive(Clone)]
pub struct InsightClient {
    http_client: reqwest::Client,
    config: InsightConfig,
}

impl InsightClient {
    pub fn new(config: InsightConfig) -> Result<Self, InsightError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InsightError::Network(e.to_string()))?;

        Ok(Self { http_client, config })
    }

    /// Always yields a remark; failures are logged and replaced by the fallback.
    pub async fn fetch(&self, entries: &[DailyEntry]) -> String {
        match self.request(entries).await {
            Ok(text) => text,
            Err(err) => {
                warn!("insight request failed: {err}");
                FALLBACK_INSIGHT.to_string()
            }
        }
    }

    async fn request(&self, entries: &[DailyEntry]) -> Result<String, InsightError> {
        let api_key = self.config.api_key.as_deref().ok_or(InsightError::MissingApiKey)?;
        let history = recent_history(entries);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let body = json!({ "contents": [{ "parts": [{ "text": build_prompt(&history) }] }] });

        debug!(days = history.len(), model = %self.config.model, "requesting insight");

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| InsightError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(InsightError::Api(status.as_u16(), error_text));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| InsightError::Parse(e.to_string()))?;

        extract_text(parsed)
    }
}

fn extract_text(response: GenerateResponse) -> Result<String, InsightError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InsightError::Empty);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use std::time::Duration as StdDuration;

    fn history(days: i64) -> Vec<DailyEntry> {
        let first = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        (0..days)
            .map(|offset| {
                let mut entry = DailyEntry::placeholder(first + Duration::days(offset));
                entry.workout_done = offset % 2 == 0;
                entry.daily_xp = if entry.workout_done { 5 } else { 0 };
                entry.meals.insert("bf".into(), true);
                entry.meals.insert("ln".into(), offset % 3 == 0);
                entry
            })
            .collect()
    }

    #[test]
    fn history_keeps_last_seven_days() {
        let summary = recent_history(&history(10));
        assert_eq!(summary.len(), 7);
        assert_eq!(summary[0].date, "2026-03-04");
        assert_eq!(
            summary[6],
            DaySummary {
                date: "2026-03-10".into(),
                xp: 0,
                workout: false,
                fuel: 2,
            }
        );
        assert_eq!(recent_history(&history(3)).len(), 3);
    }

    #[test]
    fn prompt_embeds_history_json() {
        let prompt = build_prompt(&recent_history(&history(1)));
        assert!(prompt.contains(r#"[{"date":"2026-03-01","xp":5,"workout":true,"fuel":2}]"#));
        assert!(prompt.contains("max 2 sentences"));
    }

    #[test]
    fn text_parts_are_joined() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": " Momentum holds. " }, { "text": "Keep it." }] } }]
        }))
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "Momentum holds. Keep it.");

        let empty: GenerateResponse = serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert!(matches!(extract_text(empty), Err(InsightError::Empty)));
    }

    #[tokio::test]
    async fn missing_key_falls_back() {
        let client = InsightClient::new(InsightConfig::default()).unwrap();
        assert_eq!(client.fetch(&history(2)).await, FALLBACK_INSIGHT);
    }

    #[tokio::test]
    async fn unreachable_endpoint_falls_back() {
        let client = InsightClient::new(InsightConfig {
            api_key: Some("test-key".into()),
            base_url: "http://127.0.0.1:1".into(),
            timeout: StdDuration::from_secs(2),
            ..InsightConfig::default()
        })
        .unwrap();
        assert_eq!(client.fetch(&history(2)).await, FALLBACK_INSIGHT);
    }
}
