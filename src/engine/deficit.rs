use crate::models::match_state::{
    MatchScenario, MatchState, MatchStatus, PlStatus, SCORE_HISTORY_CAP,
};
use crate::models::signal::{DeficitBucket, RecoveryStep, SignalEvent, SignalKind};

/// The deficit-hedge state machine.
///
/// `apply` is a pure transition function: it never mutates the input state,
/// performs no I/O, and is total over integer deltas (corrections producing
/// negative scores are accepted). The caller installs the returned state and
/// dispatches the returned events, in order.
pub struct DeficitEngine;

impl DeficitEngine {
    pub fn apply(
        state: &MatchState,
        home_delta: i32,
        away_delta: i32,
    ) -> (MatchState, Vec<SignalEvent>) {
        let mut next = state.clone();
        let mut events = Vec::new();

        next.home_score += home_delta;
        next.away_score += away_delta;
        next.status = MatchStatus::Live;

        let diff = next.home_score - next.away_score;
        next.score_history.push_back(diff);
        while next.score_history.len() > SCORE_HISTORY_CAP {
            next.score_history.pop_front();
        }

        let deficit = diff.abs();
        let losing = next.losing_team().clone();

        // Entry: one shot per match, first half only. A recorded bucket or a
        // fired recovery stage both mean the position exists, so no re-entry
        // even when the deficit later escalates into a higher tier.
        if next.recovery_steps.is_empty() && !next.entered() && next.entry_window_open() {
            if let Some(bucket) = DeficitBucket::classify(deficit) {
                // Tier-ordering gate; redundant with the one-shot entry gate
                // above (see DESIGN.md).
                let already_notified = next
                    .notified_buckets
                    .iter()
                    .any(|b| b.level() >= bucket.level());
                let eligible = match next.scenario {
                    MatchScenario::SimilarStrength => true,
                    MatchScenario::BigDifference => {
                        next.stronger_team_id.as_deref() == Some(losing.id.as_str())
                    }
                    MatchScenario::None => false,
                };
                if !already_notified && eligible {
                    events.push(SignalEvent {
                        kind: SignalKind::BuyAlert,
                        match_id: next.id.clone(),
                        message: format!(
                            "BUY: {} down {deficit} ({} tier). Open hedge position.",
                            losing.name,
                            bucket.label(),
                        ),
                    });
                    next.notified_buckets.push(bucket);
                    next.bought_team_id = Some(losing.id.clone());
                    next.pl_status = Some(PlStatus::Pending);
                }
            }
        }

        // Recovery: staged exits against the worst deficit seen since entry.
        if let Some(bought_id) = next.bought_team_id.clone() {
            if deficit > next.max_deficit_recorded {
                next.max_deficit_recorded = deficit;
            }
            if next.max_deficit_recorded >= 10 {
                let my_deficit = if bought_id == next.home_team.id {
                    next.away_score - next.home_score
                } else {
                    next.home_score - next.away_score
                };
                let max = f64::from(next.max_deficit_recorded);
                let my = f64::from(my_deficit);
                let label = next.label();

                if my <= max * 0.5
                    && my > max * 0.25
                    && !next.recovery_steps.contains(&RecoveryStep::Half)
                {
                    events.push(SignalEvent {
                        kind: SignalKind::FlipAlert,
                        match_id: next.id.clone(),
                        message: format!(
                            "FLIP: {label} recovered 50% (down {my_deficit}). Execute first hedge."
                        ),
                    });
                    next.recovery_steps.push(RecoveryStep::Half);
                    next.pl_status = Some(PlStatus::Win);
                }
                if my <= max * 0.25
                    && my_deficit > 2
                    && !next.recovery_steps.contains(&RecoveryStep::ThreeQuarters)
                {
                    events.push(SignalEvent {
                        kind: SignalKind::FlipAlert,
                        match_id: next.id.clone(),
                        message: format!(
                            "FLIP: {label} recovered 75% (down {my_deficit}). Execute second hedge."
                        ),
                    });
                    next.recovery_steps.push(RecoveryStep::ThreeQuarters);
                    next.pl_status = Some(PlStatus::Win);
                }
                if my_deficit <= 2 && !next.recovery_steps.contains(&RecoveryStep::Full) {
                    events.push(SignalEvent {
                        kind: SignalKind::ProfitPull,
                        match_id: next.id.clone(),
                        message: format!(
                            "PROFIT: {label} deficit closed (down {my_deficit}). Full exit."
                        ),
                    });
                    next.recovery_steps.push(RecoveryStep::Full);
                    next.pl_status = Some(PlStatus::Win);
                }
            }
        }

        (next, events)
    }
}
