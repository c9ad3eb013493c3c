//! The tick loop.
//!
//! Each tick drains the acknowledgment and message mailboxes, samples the
//! idle time, advances the [`Controller`] and carries out the intents it
//! returns. Failures of the alerting, generation or persistence
//! capabilities are logged and degraded; only a broken invariant stops the
//! loop.

use crate::libs::activity::Transition;
use crate::libs::alert::{AckSlot, AlertHandle, Alerter};
use crate::libs::config::{MonitorConfig, ReminderConfig};
use crate::libs::controller::{Controller, TickReport};
use crate::libs::escalation::{Intent, Tier};
use crate::libs::formatter::status_label;
use crate::libs::idle::{Clock, IdleSource};
use crate::libs::messages::Message;
use crate::libs::persistence::{SnapshotStore, SNAPSHOT_KEY};
use crate::libs::reminder::{MessageGenerator, MessageSlot};
use crate::{msg_debug, msg_error, msg_info, msg_warning};
use anyhow::Result;
use tokio::sync::oneshot;
use tokio::time::{self, Duration, MissedTickBehavior};

/// External collaborators driven by the monitor.
pub struct Capabilities {
    pub alerter: Box<dyn Alerter>,
    pub generator: Box<dyn MessageGenerator>,
    pub store: Box<dyn SnapshotStore>,
    pub idle: Box<dyn IdleSource>,
    pub clock: Box<dyn Clock>,
}

#[derive(Debug, Clone, Copy)]
struct ActiveAlert {
    token: u64,
    handle: AlertHandle,
    tier: Tier,
}

pub struct Monitor {
    controller: Controller,
    capabilities: Capabilities,
    acks: AckSlot,
    messages: MessageSlot,
    active: Option<ActiveAlert>,
    next_token: u64,
}

impl Monitor {
    pub fn new(controller: Controller, capabilities: Capabilities) -> Self {
        Self {
            controller,
            capabilities,
            acks: AckSlot::new(),
            messages: MessageSlot::new(),
            active: None,
            next_token: 0,
        }
    }

    /// Restores the last snapshot from the store, falling back to a fresh
    /// session when it is missing or unreadable.
    pub fn load(monitor: MonitorConfig, reminder: ReminderConfig, mut capabilities: Capabilities) -> Self {
        let snapshot = match capabilities.store.load(SNAPSHOT_KEY) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                msg_warning!(Message::SnapshotLoadFailed(e.to_string()));
                None
            }
        };
        let now = capabilities.clock.now();
        let controller = Controller::restore(snapshot, now, monitor, reminder);
        msg_info!(Message::SessionRestored(status_label(controller.session())));
        Self::new(controller, capabilities)
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Handle of the alert currently displayed, if any.
    pub fn active_alert(&self) -> Option<AlertHandle> {
        self.active.map(|a| a.handle)
    }

    /// Runs one tick.
    ///
    /// # Errors
    ///
    /// Returns an error only when the aggregate breaks an invariant.
    pub fn tick_once(&mut self) -> Result<TickReport> {
        let now = self.capabilities.clock.now();

        if let Some(token) = self.acks.take() {
            if self.active.map(|a| a.token) == Some(token) {
                self.active = None;
                if self.controller.acknowledge(now) {
                    msg_debug!(Message::AlertAcknowledged);
                }
            }
        }

        if let Some((request_id, text)) = self.messages.take() {
            if !self.controller.deliver_message(request_id, text) {
                msg_debug!(Message::StaleMessageDiscarded(request_id));
            }
        }

        let idle_sample = self.capabilities.idle.seconds_since_last_input();
        let previous_minutes = self.controller.session().work_seconds / 60;
        let report = self.controller.tick(now, idle_sample);
        self.log_tick(&report, previous_minutes);

        for intent in report.intents.iter().cloned() {
            self.execute(intent, now);
        }

        self.controller.check_invariants()?;
        Ok(report)
    }

    /// Ticks every `tick_interval` seconds until `shutdown` fires, then
    /// flushes the session.
    pub async fn run(&mut self, mut shutdown: oneshot::Receiver<()>) -> Result<()> {
        let config = self.controller.monitor_config().clone();
        msg_info!(Message::MonitorStarted {
            idle_threshold: config.idle_threshold,
            reset_threshold: config.reset_threshold,
            work_threshold: self.controller.reminder_config().work_threshold,
        });

        let mut interval = time::interval(Duration::from_secs(config.tick_interval.max(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.tick_once() {
                        self.flush();
                        return Err(e);
                    }
                }
                _ = &mut shutdown => break,
            }
        }

        self.flush();
        msg_info!(Message::MonitorStopped);
        Ok(())
    }

    /// Takes down the active alert and writes a final snapshot.
    pub fn flush(&mut self) {
        self.dismiss_active();
        self.persist();
    }

    fn execute(&mut self, intent: Intent, now: chrono::DateTime<chrono::Utc>) {
        match intent {
            Intent::Raise { tier, message } => self.raise(tier, &message, now),
            Intent::DismissActive => self.dismiss_active(),
            Intent::RequestMessage { request_id, request } => {
                msg_debug!(Message::MessageRequested(request_id));
                self.capabilities.generator.generate(request, self.messages.callback(request_id));
            }
            Intent::Persist => self.persist(),
        }
    }

    fn raise(&mut self, tier: Tier, message: &str, now: chrono::DateTime<chrono::Utc>) {
        self.next_token += 1;
        let token = self.next_token;
        let on_acknowledge = self.acks.callback(token);
        let raised = match tier {
            Tier::Banner => self.capabilities.alerter.raise_banner(message, on_acknowledge),
            Tier::Overlay => self.capabilities.alerter.raise_overlay(message, on_acknowledge),
        };

        match raised {
            Ok(handle) => {
                // An overlay replaces the banner it escalates from.
                self.dismiss_active();
                self.active = Some(ActiveAlert { token, handle, tier });
                msg_debug!(Message::AlertRaised(tier.to_string()));
            }
            Err(e) => {
                msg_error!(Message::AlertFailed(tier.to_string(), e.to_string()));
                self.controller.abandon_alert(tier, now);
            }
        }
    }

    fn dismiss_active(&mut self) {
        if let Some(active) = self.active.take() {
            if let Err(e) = self.capabilities.alerter.dismiss(active.handle) {
                msg_warning!(Message::AlertDismissFailed(active.tier.to_string(), e.to_string()));
            }
        }
    }

    fn persist(&mut self) {
        let snapshot = self.controller.snapshot();
        if let Err(e) = self.capabilities.store.save(SNAPSHOT_KEY, &snapshot) {
            msg_warning!(Message::SnapshotSaveFailed(e.to_string()));
        }
    }

    fn log_tick(&self, report: &TickReport, previous_minutes: u64) {
        if report.sample.suspended {
            msg_warning!(Message::SuspensionDetected(report.elapsed));
        }
        let session = self.controller.session();
        match report.sample.transition {
            Transition::Started => msg_info!(Message::SessionStarted),
            Transition::Resumed => msg_info!(Message::SessionResumed(session.work_seconds / 60)),
            Transition::WentIdle => msg_info!(Message::SessionIdle(session.idle_seconds)),
            Transition::Reset => msg_info!(Message::SessionReset),
            Transition::Unchanged => {
                if session.is_working() && session.work_seconds / 60 != previous_minutes {
                    msg_debug!(status_label(session));
                }
            }
        }
    }
}
