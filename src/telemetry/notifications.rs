use crate::models::signal::{SignalEvent, SignalKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Notifications kept in the in-session feed.
pub const NOTIFICATION_CAP: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub match_id: String,
    pub kind: SignalKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Bounded in-session notification feed.
///
/// The engine never emits the same (match, threshold) pair twice, but
/// repeated deliveries from upstream (e.g. a live poll replaying a row) are
/// the notifier's problem, so identical (match, message) pairs are dropped
/// here before display or push.
pub struct NotificationLog {
    entries: VecDeque<Notification>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(NOTIFICATION_CAP),
        }
    }

    /// Record an event. Returns the stored notification, or `None` when an
    /// identical one for the same match is already in the feed.
    pub fn record(&mut self, event: &SignalEvent) -> Option<Notification> {
        let duplicate = self
            .entries
            .iter()
            .any(|n| n.match_id == event.match_id && n.message == event.message);
        if duplicate {
            return None;
        }

        let notification = Notification {
            id: Uuid::new_v4(),
            match_id: event.match_id.clone(),
            kind: event.kind,
            message: event.message.clone(),
            timestamp: Utc::now(),
        };
        self.entries.push_front(notification.clone());
        self.entries.truncate(NOTIFICATION_CAP);
        Some(notification)
    }

    /// Most recent first.
    pub fn entries(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::new()
    }
}
