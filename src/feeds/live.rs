use crate::config::LiveConfig;
use crate::engine::tracker::MatchTracker;
use crate::models::match_state::MatchState;
use crate::models::signal::SignalEvent;
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("GEMINI_API_KEY not configured")]
    MissingApiKey,
    #[error("scoreboard request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed scoreboard payload: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scoreboard response contained no rows")]
    Empty,
}

/// One game row as returned by the search-grounded model.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRow {
    pub home_team: String,
    pub away_team: String,
    pub home_score: i32,
    pub away_score: i32,
    #[serde(default)]
    pub quarter: Option<u8>,
}

/// Fetches live NBA scores through the Gemini REST API with search grounding.
///
/// This is thin I/O glue: it turns whatever the model found into signed score
/// deltas against tracked state and lets the engine do the rest. Freshness
/// and trustworthiness of the rows are not validated here. The caller owns
/// retry policy and must not overlap polls for the same match.
pub struct LiveScoreFeed {
    http: reqwest::Client,
    config: LiveConfig,
}

impl LiveScoreFeed {
    pub fn new(config: LiveConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Ask the model for today's scoreboard as structured JSON.
    pub async fn fetch_scoreboard(&self) -> Result<Vec<ScoreRow>, FeedError> {
        let api_key = self.config.api_key.as_ref().ok_or(FeedError::MissingApiKey)?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.api_host, self.config.model, api_key
        );

        let prompt = "Search for the latest NBA scores for today's games \
                      (e.g. from ESPN or NBA.com). Return at least 3 active or \
                      upcoming games as a JSON array of objects with: homeTeam \
                      (string), awayTeam (string), homeScore (number), \
                      awayScore (number), quarter (number).";

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "tools": [{ "google_search": {} }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "homeTeam": { "type": "STRING" },
                            "awayTeam": { "type": "STRING" },
                            "homeScore": { "type": "NUMBER" },
                            "awayScore": { "type": "NUMBER" },
                            "quarter": { "type": "NUMBER" }
                        },
                        "required": ["homeTeam", "awayTeam", "homeScore", "awayScore"]
                    }
                }
            }
        });

        let response: serde_json::Value = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text = response["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or(FeedError::Empty)?;

        let rows: Vec<ScoreRow> = serde_json::from_str(text)?;
        if rows.is_empty() {
            return Err(FeedError::Empty);
        }
        Ok(rows)
    }

    /// Fetch the scoreboard and replay every matched row through the tracker
    /// as a signed delta. Returns the signals the updates produced.
    pub async fn sync(&self, tracker: &MatchTracker) -> Result<Vec<SignalEvent>, FeedError> {
        let rows = self.fetch_scoreboard().await?;
        let mut events = Vec::new();
        let mut synced = 0usize;

        for state in tracker.snapshot() {
            let Some(row) = Self::match_row(&rows, &state) else {
                debug!("No scoreboard row matched {}", state.label());
                continue;
            };
            if let Some(q) = row.quarter {
                tracker.set_quarter(&state.id, q);
            }
            events.extend(tracker.apply_update(
                &state.id,
                row.home_score - state.home_score,
                row.away_score - state.away_score,
            ));
            synced += 1;
        }

        info!("Live sync: {synced} of {} matches updated", tracker.len());
        Ok(events)
    }

    /// Fuzzy-match a scoreboard row to tracked state by team short name.
    /// The model returns free-text team names, so containment is the best
    /// discipline available.
    fn match_row<'a>(rows: &'a [ScoreRow], state: &MatchState) -> Option<&'a ScoreRow> {
        let home = state.home_team.short_name.to_lowercase();
        let away = state.away_team.short_name.to_lowercase();
        let home_name = state.home_team.name.to_lowercase();
        let away_name = state.away_team.name.to_lowercase();

        rows.iter().find(|row| {
            let row_home = row.home_team.to_lowercase();
            let row_away = row.away_team.to_lowercase();
            (row_home.contains(&home) || home_name.contains(&row_home))
                && (row_away.contains(&away) || away_name.contains(&row_away))
        })
    }
}
