use crate::models::match_state::{MatchState, PlStatus};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Session-level strategy tally, derived from live match state.
///
/// A match counts as entered once its first deficit bucket is recorded, and
/// as won once any recovery stage has fired (`pl_status == Win`).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TradeStats {
    pub total_buy_matches: usize,
    pub total_win_matches: usize,
    pub win_rate: f64,
}

impl TradeStats {
    pub fn from_matches(matches: &[MatchState]) -> Self {
        let total_buy_matches = matches.iter().filter(|m| m.entered()).count();
        let total_win_matches = matches
            .iter()
            .filter(|m| m.pl_status == Some(PlStatus::Win))
            .count();
        let win_rate = if total_buy_matches > 0 {
            total_win_matches as f64 / total_buy_matches as f64 * 100.0
        } else {
            0.0
        };
        Self {
            total_buy_matches,
            total_win_matches,
            win_rate,
        }
    }

    pub fn log_summary(&self) {
        info!(
            "Stats: entries={} wins={} win_rate={:.1}%",
            self.total_buy_matches, self.total_win_matches, self.win_rate
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::match_state::{MatchScenario, Team};
    use crate::models::signal::DeficitBucket;

    fn entered(won: bool) -> MatchState {
        let mut m = MatchState::new(
            "m".to_string(),
            Team::new("a", "A", "A"),
            Team::new("b", "B", "B"),
        );
        m.scenario = MatchScenario::SimilarStrength;
        m.notified_buckets.push(DeficitBucket::TenToFourteen);
        m.pl_status = Some(if won { PlStatus::Win } else { PlStatus::Pending });
        m
    }

    #[test]
    fn test_tally() {
        let idle = MatchState::new(
            "idle".to_string(),
            Team::new("c", "C", "C"),
            Team::new("d", "D", "D"),
        );
        let stats = TradeStats::from_matches(&[entered(true), entered(false), idle]);
        assert_eq!(stats.total_buy_matches, 2);
        assert_eq!(stats.total_win_matches, 1);
        assert!((stats.win_rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_session() {
        let stats = TradeStats::from_matches(&[]);
        assert_eq!(stats.total_buy_matches, 0);
        assert_eq!(stats.win_rate, 0.0);
    }
}
