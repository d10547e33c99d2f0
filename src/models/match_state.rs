use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::signal::{DeficitBucket, RecoveryStep};

/// Most recent score differentials kept per match (older entries dropped).
pub const SCORE_HISTORY_CAP: usize = 40;

/// Matchup classification, supplied by an upstream classifier (not computed here).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchScenario {
    SimilarStrength,
    BigDifference,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Finished,
}

/// P&L status of the strategy position: `Pending` from entry until the first
/// recovery stage fires, `Win` afterwards. Unset until an entry happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlStatus {
    Pending,
    Win,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub record: Option<String>,
}

impl Team {
    pub fn new(id: &str, name: &str, short_name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            short_name: short_name.to_string(),
            record: None,
        }
    }
}

/// Full per-match tracking state.
///
/// Owned exclusively by the deficit engine: created when a match enters
/// tracking and only ever replaced wholesale by the engine's output. Scores
/// are signed so corrections (negative deltas, even negative totals) stay
/// representable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub id: String,
    pub home_team: Team,
    pub away_team: Team,
    pub home_score: i32,
    pub away_score: i32,
    pub status: MatchStatus,
    pub home_odds: String,
    pub away_odds: String,
    pub scenario: MatchScenario,
    pub stronger_team_id: Option<String>,
    pub quarter: u8,
    pub notified_buckets: Vec<DeficitBucket>,
    pub max_deficit_recorded: i32,
    pub recovery_steps: Vec<RecoveryStep>,
    pub bought_team_id: Option<String>,
    pub pl_status: Option<PlStatus>,
    pub score_history: VecDeque<i32>,
    pub start_time: DateTime<Utc>,
}

impl MatchState {
    pub fn new(id: String, home_team: Team, away_team: Team) -> Self {
        Self {
            id,
            home_team,
            away_team,
            home_score: 0,
            away_score: 0,
            status: MatchStatus::Scheduled,
            home_odds: String::new(),
            away_odds: String::new(),
            scenario: MatchScenario::None,
            stronger_team_id: None,
            quarter: 1,
            notified_buckets: Vec::new(),
            max_deficit_recorded: 0,
            recovery_steps: Vec::new(),
            bought_team_id: None,
            pl_status: None,
            score_history: VecDeque::with_capacity(SCORE_HISTORY_CAP),
            start_time: Utc::now(),
        }
    }

    /// Absolute score gap between the two sides.
    pub fn deficit(&self) -> i32 {
        (self.home_score - self.away_score).abs()
    }

    /// The side currently behind. Ties nominally report the away side, which
    /// never matters for signalling since a zero deficit maps to no bucket.
    pub fn losing_team(&self) -> &Team {
        if self.home_score < self.away_score {
            &self.home_team
        } else {
            &self.away_team
        }
    }

    /// Entry signals are only considered during the first half.
    pub fn entry_window_open(&self) -> bool {
        self.quarter <= 2
    }

    /// "HOME vs AWAY" label used in alert messages.
    pub fn label(&self) -> String {
        format!("{} vs {}", self.home_team.short_name, self.away_team.short_name)
    }

    /// True once the entry signal has fired for this match.
    pub fn entered(&self) -> bool {
        !self.notified_buckets.is_empty()
    }
}
