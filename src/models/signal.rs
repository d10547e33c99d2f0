use serde::{Deserialize, Serialize};

/// Deficit tier used to gate entry alerts.
///
/// Tiers are ordered by level; an entry alert is blocked when a tier of the
/// same or higher level has already been recorded for the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeficitBucket {
    TenToFourteen,
    FifteenToNineteen,
    TwentyPlus,
}

impl DeficitBucket {
    /// Map an absolute deficit to its tier. Below 10 there is no tier.
    pub fn classify(deficit: i32) -> Option<Self> {
        match deficit {
            d if d >= 20 => Some(DeficitBucket::TwentyPlus),
            d if d >= 15 => Some(DeficitBucket::FifteenToNineteen),
            d if d >= 10 => Some(DeficitBucket::TenToFourteen),
            _ => None,
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            DeficitBucket::TenToFourteen => 1,
            DeficitBucket::FifteenToNineteen => 2,
            DeficitBucket::TwentyPlus => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeficitBucket::TenToFourteen => "10-14",
            DeficitBucket::FifteenToNineteen => "15-19",
            DeficitBucket::TwentyPlus => "20+",
        }
    }
}

/// Staged exit thresholds, in the fixed order they are evaluated each update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryStep {
    Half,
    ThreeQuarters,
    Full,
}

impl RecoveryStep {
    pub fn label(&self) -> &'static str {
        match self {
            RecoveryStep::Half => "50%",
            RecoveryStep::ThreeQuarters => "75%",
            RecoveryStep::Full => "100%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalKind {
    BuyAlert,
    FlipAlert,
    ProfitPull,
}

/// One strategy signal produced by the deficit engine, handed to the notifier
/// for display and outbound delivery. The engine guarantees it never emits the
/// same (match, threshold) pair twice; message text is not stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalEvent {
    pub kind: SignalKind,
    pub match_id: String,
    pub message: String,
}
