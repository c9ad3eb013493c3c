//! Reminder escalation on top of the working state.
//!
//! ```text
//!   None ──work ≥ threshold, cooldown over──▶ Banner ──grace elapsed──▶ Overlay
//!    ▲                                          │                         │
//!    └──────────────── acknowledged (cooldown = repeat interval) ─────────┘
//! ```
//!
//! Leaving `Working` drops any tier back to `None` without a cooldown.
//! The policy is pure: it mutates the state it is given and returns the
//! side effects as [`Intent`]s for the monitor to carry out.

use crate::libs::activity::Transition;
use crate::libs::config::ReminderConfig;
use crate::libs::reminder::{fallback_message, MessageRequest};
use crate::libs::session::{elapsed_seconds, Session};
use chrono::{DateTime, Duration, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscalationMode {
    #[default]
    None,
    Banner,
    Overlay,
}

/// Alert tiers a raise can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Banner,
    Overlay,
}

impl Tier {
    fn mode(&self) -> EscalationMode {
        match self {
            Tier::Banner => EscalationMode::Banner,
            Tier::Overlay => EscalationMode::Overlay,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Banner => f.write_str("banner"),
            Tier::Overlay => f.write_str("overlay"),
        }
    }
}

/// Bookkeeping for the background reminder text request. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pregeneration {
    /// Id of the latest request issued.
    pub request_id: u64,
    pub in_flight: bool,
    /// A generated text waiting for the next alert.
    pub pending: Option<String>,
}

impl Pregeneration {
    /// Forgets the outstanding request and any unused text. A late result
    /// for the forgotten request is discarded on delivery.
    pub fn cancel(&mut self) {
        self.in_flight = false;
        self.pending = None;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Escalation {
    pub mode: EscalationMode,
    pub entered_at: Option<DateTime<Utc>>,
    /// Earliest time a banner may be raised again after an acknowledgment.
    pub next_allowed_at: Option<DateTime<Utc>>,
    /// Alerts raised in the current working session.
    pub count: u32,
    pub pregen: Pregeneration,
    /// History entry pushed out by the latest raise, kept so the raise can be undone.
    pub evicted: Option<String>,
}

impl Escalation {
    pub fn is_active(&self) -> bool {
        self.mode != EscalationMode::None
    }

    pub fn clear(&mut self) {
        self.mode = EscalationMode::None;
        self.entered_at = None;
        self.next_allowed_at = None;
        self.count = 0;
        self.evicted = None;
        self.pregen.cancel();
    }
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Show an alert. An overlay replaces the banner currently shown.
    Raise { tier: Tier, message: String },
    /// Take down whatever alert is active.
    DismissActive,
    /// Start a background text request, answered with `request_id`.
    RequestMessage { request_id: u64, request: MessageRequest },
    /// Write a snapshot.
    Persist,
}

#[derive(Debug, Clone)]
pub struct EscalationPolicy {
    config: ReminderConfig,
}

impl EscalationPolicy {
    pub fn new(config: ReminderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReminderConfig {
        &self.config
    }

    /// Reacts to one tick of the activity tracker.
    pub fn advance(&self, escalation: &mut Escalation, session: &mut Session, transition: Transition, now: DateTime<Utc>) -> Vec<Intent> {
        let mut intents = Vec::new();

        if transition.interrupts_escalation() {
            if escalation.is_active() {
                intents.push(Intent::DismissActive);
            }
            escalation.clear();
            session.ack_pending = false;
        }

        if !session.is_working() {
            return intents;
        }

        match escalation.mode {
            EscalationMode::None => {
                if session.work_seconds >= self.config.work_threshold_seconds() && self.cooldown_over(escalation, now) {
                    intents.push(self.raise(escalation, session, Tier::Banner, now));
                }
            }
            EscalationMode::Banner => {
                if self.banner_age(escalation, now) >= self.config.banner_grace {
                    intents.push(self.raise(escalation, session, Tier::Overlay, now));
                }
            }
            EscalationMode::Overlay => {}
        }

        if let Some(intent) = self.pregenerate(escalation, session, now) {
            intents.push(intent);
        }

        intents
    }

    /// Applies a user acknowledgment. Returns false when no alert was active.
    pub fn acknowledge(&self, escalation: &mut Escalation, session: &mut Session, now: DateTime<Utc>) -> bool {
        if !escalation.is_active() {
            return false;
        }
        escalation.mode = EscalationMode::None;
        escalation.entered_at = None;
        escalation.next_allowed_at = Some(now + Duration::seconds(self.config.repeat_interval as i64));
        session.ack_pending = false;
        true
    }

    /// Accepts the result of the outstanding request; anything else is stale.
    pub fn deliver(&self, escalation: &mut Escalation, request_id: u64, text: String) -> bool {
        let pregen = &mut escalation.pregen;
        if !pregen.in_flight || pregen.request_id != request_id {
            return false;
        }
        pregen.in_flight = false;
        let text = text.trim().to_string();
        if !text.is_empty() {
            pregen.pending = Some(text);
        }
        true
    }

    /// Rolls back a raise the alerting capability could not display so the
    /// next eligible tick tries again. The history is restored, including an
    /// entry the raise evicted.
    pub fn abandon(&self, escalation: &mut Escalation, session: &mut Session, tier: Tier, now: DateTime<Utc>) {
        escalation.count = escalation.count.saturating_sub(1);
        session.message_history.pop_latest();
        if let Some(evicted) = escalation.evicted.take() {
            session.message_history.restore_oldest(evicted);
        }
        match tier {
            Tier::Banner => {
                escalation.mode = EscalationMode::None;
                escalation.entered_at = None;
                session.ack_pending = false;
            }
            Tier::Overlay => {
                // The banner is still up and its grace is already spent.
                escalation.mode = EscalationMode::Banner;
                escalation.entered_at = Some(now - Duration::seconds(self.config.banner_grace as i64));
            }
        }
    }

    fn raise(&self, escalation: &mut Escalation, session: &mut Session, tier: Tier, now: DateTime<Utc>) -> Intent {
        escalation.count += 1;
        let message = escalation
            .pregen
            .pending
            .take()
            .unwrap_or_else(|| fallback_message(session.work_seconds / 60));
        escalation.evicted = session.message_history.push(message.clone());
        session.ack_pending = true;
        escalation.mode = tier.mode();
        escalation.entered_at = Some(now);
        Intent::Raise { tier, message }
    }

    fn banner_age(&self, escalation: &Escalation, now: DateTime<Utc>) -> u64 {
        escalation.entered_at.map(|at| elapsed_seconds(at, now)).unwrap_or(0)
    }

    fn cooldown_over(&self, escalation: &Escalation, now: DateTime<Utc>) -> bool {
        escalation.next_allowed_at.map_or(true, |at| now >= at)
    }

    /// Whole seconds left in the cooldown, rounded up.
    fn cooldown_remaining(&self, escalation: &Escalation, now: DateTime<Utc>) -> u64 {
        escalation
            .next_allowed_at
            .map(|at| {
                let millis = (at - now).num_milliseconds().max(0) as u64;
                millis.div_ceil(1000)
            })
            .unwrap_or(0)
    }

    /// Seconds until the next alert would fire, if another tier is ahead.
    fn seconds_to_next_alert(&self, escalation: &Escalation, session: &Session, now: DateTime<Utc>) -> Option<u64> {
        match escalation.mode {
            EscalationMode::None => {
                let to_threshold = self.config.work_threshold_seconds().saturating_sub(session.work_seconds);
                Some(to_threshold.max(self.cooldown_remaining(escalation, now)))
            }
            EscalationMode::Banner => Some(self.config.banner_grace.saturating_sub(self.banner_age(escalation, now))),
            EscalationMode::Overlay => None,
        }
    }

    fn pregenerate(&self, escalation: &mut Escalation, session: &Session, now: DateTime<Utc>) -> Option<Intent> {
        if escalation.pregen.in_flight || escalation.pregen.pending.is_some() {
            return None;
        }
        let remaining = self.seconds_to_next_alert(escalation, session, now)?;
        if remaining > self.config.pregenerate_lead {
            return None;
        }

        escalation.pregen.request_id += 1;
        escalation.pregen.in_flight = true;
        Some(Intent::RequestMessage {
            request_id: escalation.pregen.request_id,
            request: MessageRequest {
                work_minutes: (session.work_seconds + remaining) / 60,
                reminder_index: escalation.count,
                history: session.message_history.to_vec(),
            },
        })
    }
}
