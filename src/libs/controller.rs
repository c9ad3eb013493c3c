//! Combined session and escalation aggregate.
//!
//! The controller is the only writer of both. Every entry point is a pure
//! transition that returns [`Intent`]s; the monitor performs the I/O.

use crate::libs::activity::{ActivityTracker, Sample};
use crate::libs::config::{MonitorConfig, ReminderConfig};
use crate::libs::escalation::{Escalation, EscalationMode, EscalationPolicy, Intent, Tier};
use crate::libs::persistence::{reconcile, should_persist};
use crate::libs::session::{elapsed_seconds, ActivityState, Session, Snapshot};
use chrono::{DateTime, Duration, Utc};

/// Corruption of the aggregate. These are bugs, not environmental faults.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("alert tier {mode:?} is active while the session is {state}")]
    AlertOutsideWorking { mode: EscalationMode, state: ActivityState },
    #[error("alert tier {0:?} has no entry time")]
    MissingEntryTime(EscalationMode),
    #[error("acknowledgment pending while no alert is active")]
    AckWithoutAlert,
}

/// Outcome of a tick, for logging and display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub sample: Sample,
    pub elapsed: u64,
    pub intents: Vec<Intent>,
}

#[derive(Debug, Clone)]
pub struct Controller {
    session: Session,
    escalation: Escalation,
    tracker: ActivityTracker,
    policy: EscalationPolicy,
}

impl Controller {
    pub fn new(now: DateTime<Utc>, monitor: MonitorConfig, reminder: ReminderConfig) -> Self {
        Self {
            session: Session::new(now),
            escalation: Escalation::default(),
            tracker: ActivityTracker::new(monitor),
            policy: EscalationPolicy::new(reminder),
        }
    }

    /// Builds the controller from a stored snapshot, reconciled against `now`.
    /// Escalation always starts at `None`: alert handles and pending
    /// generation requests do not survive a restart, and neither does the
    /// outstanding acknowledgment.
    pub fn restore(snapshot: Option<Snapshot>, now: DateTime<Utc>, monitor: MonitorConfig, reminder: ReminderConfig) -> Self {
        let count = snapshot
            .as_ref()
            .filter(|s| s.state == ActivityState::Working)
            .map(|s| s.escalation_count)
            .unwrap_or(0);
        let mut session = reconcile(snapshot, now, &monitor);
        session.ack_pending = false;
        let escalation = Escalation {
            count: if session.is_working() { count } else { 0 },
            ..Escalation::default()
        };
        Self {
            session,
            escalation,
            tracker: ActivityTracker::new(monitor),
            policy: EscalationPolicy::new(reminder),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn escalation(&self) -> &Escalation {
        &self.escalation
    }

    pub fn monitor_config(&self) -> &MonitorConfig {
        self.tracker.config()
    }

    pub fn reminder_config(&self) -> &ReminderConfig {
        self.policy.config()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot(self.escalation.count)
    }

    /// Processes one sample taken at `now`.
    pub fn tick(&mut self, now: DateTime<Utc>, idle_sample: u64) -> TickReport {
        let elapsed = elapsed_seconds(self.session.last_update, now);
        let previous_state = self.session.state;
        let previous_work = self.session.work_seconds;

        let sample = self.tracker.advance(&mut self.session, idle_sample, elapsed);
        // Carry the sub-second remainder into the next tick.
        self.session.last_update = if now < self.session.last_update {
            now
        } else {
            self.session.last_update + Duration::seconds(elapsed as i64)
        };
        let mut intents = self.policy.advance(&mut self.escalation, &mut self.session, sample.transition, now);

        if should_persist(previous_state, previous_work, &self.session) {
            intents.push(Intent::Persist);
        }

        TickReport { sample, elapsed, intents }
    }

    pub fn acknowledge(&mut self, now: DateTime<Utc>) -> bool {
        self.policy.acknowledge(&mut self.escalation, &mut self.session, now)
    }

    pub fn deliver_message(&mut self, request_id: u64, text: String) -> bool {
        self.policy.deliver(&mut self.escalation, request_id, text)
    }

    pub fn abandon_alert(&mut self, tier: Tier, now: DateTime<Utc>) {
        self.policy.abandon(&mut self.escalation, &mut self.session, tier, now);
    }

    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mode = self.escalation.mode;
        if mode != EscalationMode::None {
            if !self.session.is_working() {
                return Err(InvariantViolation::AlertOutsideWorking {
                    mode,
                    state: self.session.state,
                });
            }
            if self.escalation.entered_at.is_none() {
                return Err(InvariantViolation::MissingEntryTime(mode));
            }
        } else if self.session.ack_pending {
            return Err(InvariantViolation::AckWithoutAlert);
        }
        Ok(())
    }
}
