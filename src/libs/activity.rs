//! Activity classification from raw idle samples.
//!
//! Each tick feeds the number of seconds since the last input event and the
//! wall-clock seconds since the previous tick. The tracker moves the session
//! between `Fresh`, `Working` and `Idle` and keeps the work/idle counters.
//!
//! A tick whose wall-clock delta exceeds the idle sample by more than three
//! tick intervals means the process itself was stalled (sleep, hibernation).
//! For the reset decision the whole stall counts as inactivity, because the
//! idle sample reported right after wake-up may be misleadingly small.

use crate::libs::config::MonitorConfig;
use crate::libs::session::{ActivityState, Session};

/// What a tick did to the activity state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    /// `Fresh` to `Working`, new session.
    Started,
    /// `Idle` to `Working`, work time preserved.
    Resumed,
    /// `Working` to `Idle`.
    WentIdle,
    /// Any state collapsed to `Fresh`.
    Reset,
}

impl Transition {
    /// True when the tick entered or left `Working`.
    pub fn interrupts_escalation(&self) -> bool {
        !matches!(self, Transition::Unchanged)
    }
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub transition: Transition,
    /// The tick detected a process suspension gap.
    pub suspended: bool,
}

#[derive(Debug, Clone)]
pub struct ActivityTracker {
    config: MonitorConfig,
}

impl ActivityTracker {
    pub fn new(config: MonitorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Advances `session` by one tick.
    ///
    /// `elapsed` is the raw wall-clock delta and may be far larger than the
    /// tick interval after a suspension.
    pub fn advance(&self, session: &mut Session, idle_sample: u64, elapsed: u64) -> Sample {
        let sleep_gap = elapsed.saturating_sub(idle_sample);
        let suspended = sleep_gap > 3 * self.config.tick_interval;
        let idle_for_reset = if suspended { elapsed } else { idle_sample };

        let transition = if idle_for_reset >= self.config.reset_threshold {
            let was_fresh = session.state == ActivityState::Fresh;
            session.reset();
            if was_fresh {
                Transition::Unchanged
            } else {
                Transition::Reset
            }
        } else if idle_sample >= self.config.idle_threshold {
            match session.state {
                ActivityState::Working => {
                    session.state = ActivityState::Idle;
                    session.idle_seconds = idle_sample;
                    Transition::WentIdle
                }
                ActivityState::Idle => {
                    session.idle_seconds = idle_sample;
                    Transition::Unchanged
                }
                ActivityState::Fresh => Transition::Unchanged,
            }
        } else {
            match session.state {
                ActivityState::Fresh => {
                    session.state = ActivityState::Working;
                    session.work_seconds = 0;
                    session.idle_seconds = 0;
                    Transition::Started
                }
                ActivityState::Idle => {
                    session.state = ActivityState::Working;
                    session.idle_seconds = 0;
                    Transition::Resumed
                }
                ActivityState::Working => {
                    session.work_seconds = session.work_seconds.saturating_add(elapsed);
                    Transition::Unchanged
                }
            }
        };

        Sample { transition, suspended }
    }
}
