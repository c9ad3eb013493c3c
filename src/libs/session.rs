//! The session aggregate: activity classification, accumulated durations and
//! the reminder texts already shown.
//!
//! A [`Session`] is created `Fresh` at start-up and is either replaced by a
//! reconciled snapshot (see [`crate::libs::persistence`]) or kept as is. The
//! [`Snapshot`] type is the serialized form exchanged with the persistence
//! capability; its field names are part of the storage contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Number of reminder texts remembered to keep new reminders from repeating.
pub const MESSAGE_HISTORY_CAPACITY: usize = 10;

/// Whole seconds from `earlier` to `later`, floored at zero when the clock
/// went backwards.
pub fn elapsed_seconds(earlier: DateTime<Utc>, later: DateTime<Utc>) -> u64 {
    (later - earlier).num_seconds().max(0) as u64
}

/// Presence classification. Exactly one holds at any time.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivityState {
    /// No session is active, either never started or reset after a long absence.
    #[default]
    Fresh,
    /// Recent input is below the idle threshold.
    Working,
    /// Input lapsed between the idle and reset thresholds.
    Idle,
}

impl fmt::Display for ActivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActivityState::Fresh => "Fresh",
            ActivityState::Working => "Working",
            ActivityState::Idle => "Idle",
        };
        f.write_str(label)
    }
}

/// Bounded, insertion-ordered list of reminder texts. Oldest entries are
/// evicted first once [`MESSAGE_HISTORY_CAPACITY`] is reached.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct MessageHistory {
    entries: VecDeque<String>,
}

impl MessageHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `message`, returning the entry evicted to make room.
    pub fn push(&mut self, message: impl Into<String>) -> Option<String> {
        let evicted = if self.entries.len() == MESSAGE_HISTORY_CAPACITY {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(message.into());
        evicted
    }

    /// Puts an evicted entry back at the oldest position if there is room.
    pub fn restore_oldest(&mut self, message: String) {
        if self.entries.len() < MESSAGE_HISTORY_CAPACITY {
            self.entries.push_front(message);
        }
    }

    /// Drops the most recent entry, used when an alert could not be shown.
    pub fn pop_latest(&mut self) -> Option<String> {
        self.entries.pop_back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }
}

impl From<Vec<String>> for MessageHistory {
    fn from(messages: Vec<String>) -> Self {
        let mut history = MessageHistory::new();
        for message in messages {
            history.push(message);
        }
        history
    }
}

impl From<MessageHistory> for Vec<String> {
    fn from(history: MessageHistory) -> Self {
        history.entries.into_iter().collect()
    }
}

/// The single mutable aggregate driven by the tick loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub state: ActivityState,
    /// Accumulated work time. Reset on a new session, kept when resuming from idle.
    pub work_seconds: u64,
    /// Mirrors the raw idle sample while idle.
    pub idle_seconds: u64,
    /// Timestamp of the last processed tick or restore.
    pub last_update: DateTime<Utc>,
    /// Whether an unacknowledged alert is outstanding.
    pub ack_pending: bool,
    pub message_history: MessageHistory,
}

impl Session {
    pub fn new(now: DateTime<Utc>) -> Self {
        Session {
            state: ActivityState::Fresh,
            work_seconds: 0,
            idle_seconds: 0,
            last_update: now,
            ack_pending: false,
            message_history: MessageHistory::new(),
        }
    }

    /// Collapses to `Fresh`, dropping counters and the reminder history.
    pub fn reset(&mut self) {
        self.state = ActivityState::Fresh;
        self.work_seconds = 0;
        self.idle_seconds = 0;
        self.ack_pending = false;
        self.message_history.clear();
    }

    pub fn is_working(&self) -> bool {
        self.state == ActivityState::Working
    }

    pub fn snapshot(&self, escalation_count: u32) -> Snapshot {
        Snapshot {
            state: self.state,
            work_seconds: self.work_seconds,
            idle_seconds: self.idle_seconds,
            last_update: self.last_update,
            ack_pending: self.ack_pending,
            message_history: self.message_history.to_vec(),
            escalation_count,
        }
    }

    /// Restores the session verbatim. Time reconciliation is the caller's job.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Session {
            state: snapshot.state,
            work_seconds: snapshot.work_seconds,
            idle_seconds: snapshot.idle_seconds,
            last_update: snapshot.last_update,
            ack_pending: snapshot.ack_pending,
            message_history: MessageHistory::from(snapshot.message_history.clone()),
        }
    }
}

/// Serialized session state as handed to the persistence capability.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub state: ActivityState,
    pub work_seconds: u64,
    pub idle_seconds: u64,
    pub last_update: DateTime<Utc>,
    pub ack_pending: bool,
    #[serde(default)]
    pub message_history: Vec<String>,
    #[serde(default)]
    pub escalation_count: u32,
}
