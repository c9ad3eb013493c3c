//! Clock and idle-time sources.

use crate::libs::messages::Message;
use crate::msg_error;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rdev::{listen, Event, EventType};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub trait Clock: Send {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub trait IdleSource: Send {
    /// Whole seconds since the last keyboard or pointer input.
    fn seconds_since_last_input(&self) -> u64;
}

/// Tracks the last input event with a global `rdev` hook.
pub struct InputListener {
    last_activity: Arc<Mutex<Instant>>,
}

impl InputListener {
    /// Spawns the listener thread. The hook is restarted after a failure.
    pub fn spawn() -> Self {
        let last_activity = Arc::new(Mutex::new(Instant::now()));
        let shared_last_activity = last_activity.clone();

        std::thread::spawn(move || loop {
            let last_activity_for_listener = shared_last_activity.clone();
            if let Err(e) = listen(move |event: Event| match event.event_type {
                EventType::KeyPress(_) | EventType::ButtonPress(_) | EventType::MouseMove { .. } | EventType::Wheel { .. } => {
                    *last_activity_for_listener.lock() = Instant::now();
                }
                _ => {}
            }) {
                msg_error!(Message::ErrorInRdevListener(format!("{:?}", e)));
                std::thread::sleep(Duration::from_secs(1));
            } else {
                break;
            }
        });

        Self { last_activity }
    }
}

impl IdleSource for InputListener {
    fn seconds_since_last_input(&self) -> u64 {
        self.last_activity.lock().elapsed().as_secs()
    }
}
