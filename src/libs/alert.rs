//! Alerting capability and the acknowledgment mailbox.
//!
//! Acknowledgments arrive on whatever thread the alerting surface uses. They
//! are parked in an [`AckSlot`] and applied by the monitor at the start of
//! the next tick, so a tick never sees a half-applied acknowledgment.

use crate::libs::messages::Message;
use crate::{msg_info, msg_print, msg_warning};
use anyhow::Result;
use parking_lot::Mutex;
use std::io::BufRead;
use std::sync::Arc;

/// Opaque identifier of a displayed alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlertHandle(pub u64);

/// Fires at most once, when the user dismisses the alert.
pub type AckCallback = Box<dyn FnOnce() + Send + 'static>;

pub trait Alerter: Send {
    fn raise_banner(&mut self, message: &str, on_acknowledge: AckCallback) -> Result<AlertHandle>;
    fn raise_overlay(&mut self, message: &str, on_acknowledge: AckCallback) -> Result<AlertHandle>;
    fn dismiss(&mut self, handle: AlertHandle) -> Result<()>;
}

/// Single-slot queue of acknowledgments, keyed by the monitor's alert token.
#[derive(Debug, Clone, Default)]
pub struct AckSlot {
    inner: Arc<Mutex<Option<u64>>>,
}

impl AckSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback recording an acknowledgment of alert `token`.
    pub fn callback(&self, token: u64) -> AckCallback {
        let inner = self.inner.clone();
        Box::new(move || {
            *inner.lock() = Some(token);
        })
    }

    pub fn take(&self) -> Option<u64> {
        self.inner.lock().take()
    }
}

type Outstanding = Arc<Mutex<Option<(AlertHandle, AckCallback)>>>;

/// Prints alerts to the terminal. With an interactive stdin, pressing Enter
/// acknowledges the alert currently shown.
pub struct TerminalAlerter {
    next_handle: u64,
    outstanding: Outstanding,
}

impl TerminalAlerter {
    pub fn interactive() -> Self {
        let alerter = Self::headless();
        let outstanding = alerter.outstanding.clone();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                if line.is_err() {
                    break;
                }
                let taken = outstanding.lock().take();
                if let Some((_, on_acknowledge)) = taken {
                    msg_info!(Message::AlertAcknowledged);
                    on_acknowledge();
                }
            }
        });
        alerter
    }

    /// No acknowledgment input; alerts stay until the session leaves working.
    pub fn headless() -> Self {
        Self {
            next_handle: 0,
            outstanding: Arc::new(Mutex::new(None)),
        }
    }

    fn register(&mut self, on_acknowledge: AckCallback) -> AlertHandle {
        self.next_handle += 1;
        let handle = AlertHandle(self.next_handle);
        *self.outstanding.lock() = Some((handle, on_acknowledge));
        handle
    }
}

impl Alerter for TerminalAlerter {
    fn raise_banner(&mut self, message: &str, on_acknowledge: AckCallback) -> Result<AlertHandle> {
        msg_warning!(Message::BannerRaised(message.to_string()));
        Ok(self.register(on_acknowledge))
    }

    fn raise_overlay(&mut self, message: &str, on_acknowledge: AckCallback) -> Result<AlertHandle> {
        msg_print!(Message::OverlayRaised(message.to_string()), true);
        Ok(self.register(on_acknowledge))
    }

    fn dismiss(&mut self, handle: AlertHandle) -> Result<()> {
        let mut outstanding = self.outstanding.lock();
        if matches!(outstanding.as_ref(), Some((current, _)) if *current == handle) {
            outstanding.take();
        }
        Ok(())
    }
}
