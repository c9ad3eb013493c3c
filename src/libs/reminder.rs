//! Reminder text generation.
//!
//! The controller never waits for a text. It asks a [`MessageGenerator`]
//! ahead of time and the generator answers through a one-shot callback that
//! lands in a [`MessageSlot`]; the next tick picks the result up. Whatever
//! goes wrong inside a generator, the callback still fires with
//! [`fallback_message`].

use crate::libs::config::ServerConfig;
use crate::libs::messages::Message;
use crate::msg_warning;
use parking_lot::Mutex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Upper bound for a single HTTP generation attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Input handed to a generator.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageRequest {
    /// Work minutes at the moment the alert is expected to fire.
    pub work_minutes: u64,
    /// Number of reminders already shown in this working session.
    pub reminder_index: u32,
    /// Recently shown texts, oldest first.
    pub history: Vec<String>,
}

/// Invoked exactly once with the generated text.
pub type MessageCallback = Box<dyn FnOnce(String) + Send + 'static>;

/// Message generation capability.
pub trait MessageGenerator: Send {
    fn generate(&self, request: MessageRequest, callback: MessageCallback);
}

/// Deterministic reminder text embedding the elapsed work minutes.
pub fn fallback_message(work_minutes: u64) -> String {
    format!("You've been working for {} minutes. Time to step away for a moment.", work_minutes)
}

const TEMPLATES: [&str; 5] = [
    "{m} minutes of focus. Stand up, stretch and look at something far away.",
    "{m} minutes in. Refill your water and give your eyes a rest.",
    "You've been at it for {m} minutes. A short walk will help more than the next tab.",
    "{m} minutes straight. Roll your shoulders and take a few slow breaths.",
    "Still going after {m} minutes? Step away for five, the work will keep.",
];

/// Generator backed by built-in templates. Rotates by reminder index and
/// skips texts that are still in the history.
#[derive(Debug, Clone, Default)]
pub struct FallbackGenerator;

impl FallbackGenerator {
    pub fn compose(request: &MessageRequest) -> String {
        let start = request.reminder_index as usize % TEMPLATES.len();
        (0..TEMPLATES.len())
            .map(|offset| TEMPLATES[(start + offset) % TEMPLATES.len()].replace("{m}", &request.work_minutes.to_string()))
            .find(|text| !request.history.contains(text))
            .unwrap_or_else(|| fallback_message(request.work_minutes))
    }
}

impl MessageGenerator for FallbackGenerator {
    fn generate(&self, request: MessageRequest, callback: MessageCallback) {
        callback(Self::compose(&request));
    }
}

#[derive(Deserialize, Debug)]
struct GeneratedMessage {
    message: String,
}

/// Generator that asks a remote endpoint for the reminder text.
///
/// The request is POSTed as JSON. A response of `{"message": "..."}` with a
/// non-empty text is used as is; anything else falls back to the template.
pub struct HttpGenerator {
    client: Client,
    config: ServerConfig,
    runtime: tokio::runtime::Handle,
}

impl HttpGenerator {
    /// Must be called from within a tokio runtime.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            runtime: tokio::runtime::Handle::current(),
        }
    }

    async fn fetch(client: &Client, config: &ServerConfig, request: &MessageRequest) -> anyhow::Result<String> {
        let mut builder = client.post(&config.api_url).json(request).timeout(REQUEST_TIMEOUT);
        if !config.auth_token.is_empty() {
            builder = builder.bearer_auth(&config.auth_token);
        }
        let response = builder.send().await?.error_for_status()?;
        let generated: GeneratedMessage = response.json().await?;
        let text = generated.message.trim().to_string();
        if text.is_empty() {
            anyhow::bail!("{}", Message::GeneratorEmptyResponse);
        }
        Ok(text)
    }
}

impl MessageGenerator for HttpGenerator {
    fn generate(&self, request: MessageRequest, callback: MessageCallback) {
        let client = self.client.clone();
        let config = self.config.clone();
        self.runtime.spawn(async move {
            let text = match Self::fetch(&client, &config, &request).await {
                Ok(text) => text,
                Err(e) => {
                    msg_warning!(Message::GeneratorFailed(e.to_string()));
                    fallback_message(request.work_minutes)
                }
            };
            callback(text);
        });
    }
}

/// Single-slot mailbox for generation results, tagged with the request id.
#[derive(Debug, Clone, Default)]
pub struct MessageSlot {
    inner: Arc<Mutex<Option<(u64, String)>>>,
}

impl MessageSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback storing the result of request `request_id`.
    pub fn callback(&self, request_id: u64) -> MessageCallback {
        let inner = self.inner.clone();
        Box::new(move |text| {
            *inner.lock() = Some((request_id, text));
        })
    }

    pub fn take(&self) -> Option<(u64, String)> {
        self.inner.lock().take()
    }
}
