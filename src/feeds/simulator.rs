use crate::config::SimulationConfig;
use crate::models::match_state::{MatchScenario, MatchState, Team};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// One simulated score update for a tracked match.
#[derive(Debug, Clone)]
pub struct ScoreTick {
    pub match_id: String,
    pub home_delta: i32,
    pub away_delta: i32,
    /// Set when the period advances on this tick.
    pub quarter: Option<u8>,
}

const TEAMS: &[(&str, &str, &str, &str)] = &[
    ("lal", "Los Angeles Lakers", "LAL", "34-22"),
    ("bos", "Boston Celtics", "BOS", "41-15"),
    ("gsw", "Golden State Warriors", "GSW", "30-26"),
    ("den", "Denver Nuggets", "DEN", "38-18"),
    ("mia", "Miami Heat", "MIA", "28-28"),
    ("mil", "Milwaukee Bucks", "MIL", "36-20"),
    ("phx", "Phoenix Suns", "PHX", "32-24"),
    ("nyk", "New York Knicks", "NYK", "35-21"),
    ("okc", "Oklahoma City Thunder", "OKC", "40-16"),
    ("dal", "Dallas Mavericks", "DAL", "31-25"),
];

/// Generates mock matchups and random per-tick scoring.
///
/// Scoring is mildly rubber-banded: a side trailing by double digits gets an
/// extra possession's worth of chances, so simulated games actually walk the
/// entry → flip → profit path instead of running away forever.
pub struct Simulator {
    rng: StdRng,
    config: SimulationConfig,
    tick_counts: HashMap<String, u32>,
}

impl Simulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_seed(config, rand::random())
    }

    pub fn with_seed(config: SimulationConfig, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            config,
            tick_counts: HashMap::new(),
        }
    }

    /// Build the configured number of mock matchups from the team table.
    pub fn generate_matches(&mut self) -> Vec<MatchState> {
        let mut pool: Vec<usize> = (0..TEAMS.len()).collect();
        pool.shuffle(&mut self.rng);

        let count = self.config.match_count.min(TEAMS.len() / 2);
        let mut matches = Vec::with_capacity(count);

        for pair in pool.chunks_exact(2).take(count) {
            let home = Self::team(pair[0]);
            let away = Self::team(pair[1]);
            let id = format!("{}-{}", home.id, away.id);
            let mut m = MatchState::new(id, home, away);

            m.scenario = match self.rng.gen_range(0..10) {
                0..=5 => MatchScenario::SimilarStrength,
                6..=8 => MatchScenario::BigDifference,
                _ => MatchScenario::None,
            };
            if m.scenario == MatchScenario::BigDifference {
                let stronger = if self.rng.gen_bool(0.5) {
                    &m.home_team
                } else {
                    &m.away_team
                };
                m.stronger_team_id = Some(stronger.id.clone());
            }

            let spread = self.rng.gen_range(1..=12) as f64 / 2.0 + 1.0;
            let home_favored = m
                .stronger_team_id
                .as_deref()
                .map(|id| id == m.home_team.id)
                .unwrap_or_else(|| self.rng.gen_bool(0.5));
            if home_favored {
                m.home_odds = format!("-{spread:.1}");
                m.away_odds = format!("+{spread:.1}");
            } else {
                m.home_odds = format!("+{spread:.1}");
                m.away_odds = format!("-{spread:.1}");
            }

            matches.push(m);
        }

        matches
    }

    /// Produce the next random score tick for a match.
    pub fn next_tick(&mut self, state: &MatchState) -> ScoreTick {
        let mut home_delta = self.possession_points();
        let mut away_delta = self.possession_points();

        // Rubber band once the gap hits the alert floor.
        if state.deficit() >= 10 && self.rng.gen_bool(0.5) {
            let bonus = self.possession_points();
            if state.home_score < state.away_score {
                home_delta += bonus;
            } else {
                away_delta += bonus;
            }
        }

        let ticks = self.tick_counts.entry(state.id.clone()).or_insert(0);
        *ticks += 1;
        let quarter = if *ticks % self.config.ticks_per_quarter == 0 && state.quarter < 4 {
            Some(state.quarter + 1)
        } else {
            None
        };

        ScoreTick {
            match_id: state.id.clone(),
            home_delta,
            away_delta,
            quarter,
        }
    }

    /// Points scored by one side over a tick: empty possession, a two, or a
    /// three. Weighted roughly like real possession outcomes.
    fn possession_points(&mut self) -> i32 {
        match self.rng.gen_range(0..100) {
            0..=39 => 0,
            40..=79 => 2,
            _ => 3,
        }
    }

    fn team(index: usize) -> Team {
        let (id, name, short, record) = TEAMS[index];
        let mut team = Team::new(id, name, short);
        team.record = Some(record.to_string());
        team
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim() -> Simulator {
        Simulator::with_seed(SimulationConfig::default(), 7)
    }

    #[test]
    fn test_generates_distinct_matchups() {
        let mut sim = sim();
        let matches = sim.generate_matches();
        assert_eq!(matches.len(), 3);

        let mut ids: Vec<&str> = matches
            .iter()
            .flat_map(|m| [m.home_team.id.as_str(), m.away_team.id.as_str()])
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 6, "No team plays twice");
    }

    #[test]
    fn test_big_difference_has_stronger_team() {
        let mut sim = Simulator::with_seed(
            SimulationConfig {
                match_count: 5,
                ..SimulationConfig::default()
            },
            42,
        );
        for m in sim.generate_matches() {
            match m.scenario {
                MatchScenario::BigDifference => {
                    let stronger = m.stronger_team_id.as_deref().unwrap();
                    assert!(stronger == m.home_team.id || stronger == m.away_team.id);
                }
                _ => assert!(m.stronger_team_id.is_none()),
            }
        }
    }

    #[test]
    fn test_tick_deltas_bounded() {
        let mut sim = sim();
        let matches = sim.generate_matches();
        let mut state = matches[0].clone();
        state.away_score = 20; // force the rubber band path sometimes

        for _ in 0..200 {
            let tick = sim.next_tick(&state);
            assert!((0..=6).contains(&tick.home_delta));
            assert!((0..=6).contains(&tick.away_delta));
        }
    }

    #[test]
    fn test_quarter_advances_on_schedule() {
        let config = SimulationConfig {
            ticks_per_quarter: 4,
            ..SimulationConfig::default()
        };
        let mut sim = Simulator::with_seed(config, 1);
        let state = sim.generate_matches().remove(0);

        let mut advanced = Vec::new();
        for _ in 0..4 {
            if let Some(q) = sim.next_tick(&state).quarter {
                advanced.push(q);
            }
        }
        assert_eq!(advanced, vec![2]);
    }
}
