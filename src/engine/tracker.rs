use crate::engine::deficit::DeficitEngine;
use crate::models::match_state::MatchState;
use crate::models::signal::SignalEvent;
use dashmap::DashMap;
use tracing::debug;

/// Registry of tracked matches.
///
/// Updates for the same match serialize on the map's entry lock, so the
/// engine's one-shot invariants hold even when the simulator and the live
/// sync loop race on the same match id. The engine's returned state is
/// installed atomically under that lock.
pub struct MatchTracker {
    matches: DashMap<String, MatchState>,
}

impl MatchTracker {
    pub fn new() -> Self {
        Self {
            matches: DashMap::new(),
        }
    }

    pub fn insert(&self, state: MatchState) {
        self.matches.insert(state.id.clone(), state);
    }

    /// Apply a signed score delta to a tracked match and return the signals
    /// it produced. Unknown ids are ignored (the upstream mapping layer is
    /// responsible for filtering those out).
    pub fn apply_update(
        &self,
        match_id: &str,
        home_delta: i32,
        away_delta: i32,
    ) -> Vec<SignalEvent> {
        let Some(mut entry) = self.matches.get_mut(match_id) else {
            debug!("Score update for untracked match {match_id} dropped");
            return Vec::new();
        };
        let (next, events) = DeficitEngine::apply(&entry, home_delta, away_delta);
        *entry = next;
        events
    }

    /// Period updates come from the score source, not from the engine.
    pub fn set_quarter(&self, match_id: &str, quarter: u8) {
        if let Some(mut entry) = self.matches.get_mut(match_id) {
            entry.quarter = quarter;
        }
    }

    pub fn get(&self, match_id: &str) -> Option<MatchState> {
        self.matches.get(match_id).map(|e| e.value().clone())
    }

    pub fn snapshot(&self) -> Vec<MatchState> {
        self.matches.iter().map(|e| e.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

impl Default for MatchTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::match_state::{MatchScenario, Team};
    use crate::models::signal::SignalKind;

    fn tracked() -> (MatchTracker, String) {
        let mut m = MatchState::new(
            "mia-den".to_string(),
            Team::new("mia", "Miami Heat", "MIA"),
            Team::new("den", "Denver Nuggets", "DEN"),
        );
        m.scenario = MatchScenario::SimilarStrength;
        let tracker = MatchTracker::new();
        tracker.insert(m);
        (tracker, "mia-den".to_string())
    }

    #[test]
    fn test_unknown_match_yields_no_events() {
        let (tracker, _) = tracked();
        assert!(tracker.apply_update("nope", 3, 0).is_empty());
    }

    #[test]
    fn test_state_installed_after_update() {
        let (tracker, id) = tracked();
        let events = tracker.apply_update(&id, 2, 14);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, SignalKind::BuyAlert);

        let state = tracker.get(&id).unwrap();
        assert_eq!((state.home_score, state.away_score), (2, 14));
        assert_eq!(state.bought_team_id.as_deref(), Some("mia"));

        // Second identical-deficit update: nothing new fires.
        assert!(tracker.apply_update(&id, 0, 0).is_empty());
    }

    #[test]
    fn test_set_quarter_closes_entry_window() {
        let (tracker, id) = tracked();
        tracker.set_quarter(&id, 3);
        assert!(tracker.apply_update(&id, 0, 20).is_empty());
        assert!(tracker.get(&id).unwrap().notified_buckets.is_empty());
    }
}
