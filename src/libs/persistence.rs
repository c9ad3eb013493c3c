//! Snapshot save policy and start-up reconciliation.
//!
//! Snapshots are written when the activity state changes or when the work
//! counter crosses a whole minute, not on every tick. On start-up the last
//! snapshot is reconciled against the time that passed while the process
//! was not running.

use crate::libs::config::MonitorConfig;
use crate::libs::session::{elapsed_seconds, ActivityState, Session, Snapshot};
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Key under which the session snapshot is stored.
pub const SNAPSHOT_KEY: &str = "session";

/// Persistence capability.
pub trait SnapshotStore: Send {
    fn save(&mut self, key: &str, snapshot: &Snapshot) -> Result<()>;
    /// `Ok(None)` when nothing usable is stored, including undecodable data.
    fn load(&mut self, key: &str) -> Result<Option<Snapshot>>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Decides whether the tick that produced `session` must be persisted.
pub fn should_persist(previous_state: ActivityState, previous_work_seconds: u64, session: &Session) -> bool {
    if previous_state != session.state {
        return true;
    }
    session.is_working() && previous_work_seconds / 60 != session.work_seconds / 60
}

/// Rebuilds the session from the last snapshot.
///
/// - no snapshot: fresh session
/// - gap longer than the reset threshold: fresh session
/// - working: the gap counts as work if it is shorter than the idle threshold
/// - idle: the gap counts as idle time and may push the session to fresh
///
/// The returned session has `last_update = now`.
pub fn reconcile(snapshot: Option<Snapshot>, now: DateTime<Utc>, config: &MonitorConfig) -> Session {
    let Some(snapshot) = snapshot else {
        return Session::new(now);
    };

    let dt = elapsed_seconds(snapshot.last_update, now);
    if dt > config.reset_threshold {
        return Session::new(now);
    }

    let mut session = Session::from_snapshot(&snapshot);
    match session.state {
        ActivityState::Working => {
            if dt < config.idle_threshold {
                session.work_seconds = session.work_seconds.saturating_add(dt);
            }
        }
        ActivityState::Idle => {
            session.idle_seconds = session.idle_seconds.saturating_add(dt);
            if session.idle_seconds >= config.reset_threshold {
                session.reset();
            }
        }
        ActivityState::Fresh => {}
    }
    session.last_update = now;
    session
}
