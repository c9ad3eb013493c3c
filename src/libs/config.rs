//! Configuration management for stepaway.
//!
//! Settings are kept in a pretty-printed `config.json` in the platform data
//! directory (see [`DataStorage`]). Every section is optional so a missing or
//! partial file still yields a working setup with the defaults below.
//!
//! ## Sections
//!
//! - **Monitor**: idle and reset thresholds plus the tick interval
//! - **Reminder**: work threshold, banner grace, repeat interval and the
//!   pre-generation lead time
//! - **Server**: optional endpoint that writes reminder texts
//!
//! ```rust,no_run
//! use stepaway::libs::config::Config;
//!
//! let config = Config::read()?;
//! let monitor = config.monitor.unwrap_or_default();
//! println!("idle after {}s", monitor.idle_threshold);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

/// Configuration file name inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Work thresholds offered by the timer selector, in minutes.
pub const WORK_THRESHOLD_CHOICES: [u64; 3] = [25, 35, 45];

/// Validation failures for a loaded or entered configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tick interval must be at least one second")]
    TickIntervalTooShort,
    #[error("reset threshold ({reset}s) must be greater than idle threshold ({idle}s)")]
    ResetNotAfterIdle { idle: u64, reset: u64 },
    #[error("work threshold must be one of {choices:?} minutes, got {value}")]
    UnsupportedWorkThreshold { value: u64, choices: [u64; 3] },
}

/// Activity detection settings, all in seconds.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MonitorConfig {
    /// Input inactivity before a working session turns idle.
    pub idle_threshold: u64,
    /// Input inactivity before the session collapses to fresh.
    pub reset_threshold: u64,
    /// Period of the sampling tick.
    pub tick_interval: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            idle_threshold: 120,
            reset_threshold: 300,
            tick_interval: 1,
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval == 0 {
            return Err(ConfigError::TickIntervalTooShort);
        }
        if self.reset_threshold <= self.idle_threshold {
            return Err(ConfigError::ResetNotAfterIdle {
                idle: self.idle_threshold,
                reset: self.reset_threshold,
            });
        }
        Ok(())
    }
}

/// Reminder escalation settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ReminderConfig {
    /// Continuous work in minutes before the first banner. One of [`WORK_THRESHOLD_CHOICES`].
    pub work_threshold: u64,
    /// Seconds an unacknowledged banner stays up before the overlay replaces it.
    pub banner_grace: u64,
    /// Cooldown in seconds after an acknowledgment before a new banner may appear.
    pub repeat_interval: u64,
    /// Seconds ahead of the next alert at which a reminder text is requested.
    #[serde(default = "default_pregenerate_lead")]
    pub pregenerate_lead: u64,
}

fn default_pregenerate_lead() -> u64 {
    120
}

impl Default for ReminderConfig {
    fn default() -> Self {
        ReminderConfig {
            work_threshold: 25,
            banner_grace: 60,
            repeat_interval: 120,
            pregenerate_lead: default_pregenerate_lead(),
        }
    }
}

impl ReminderConfig {
    pub fn work_threshold_seconds(&self) -> u64 {
        self.work_threshold * 60
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !WORK_THRESHOLD_CHOICES.contains(&self.work_threshold) {
            return Err(ConfigError::UnsupportedWorkThreshold {
                value: self.work_threshold,
                choices: WORK_THRESHOLD_CHOICES,
            });
        }
        Ok(())
    }
}

/// Endpoint used by the HTTP reminder generator.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// URL receiving a JSON reminder request and answering with `{"message": "..."}`.
    pub api_url: String,
    /// Sent as a bearer token. Empty means no `Authorization` header.
    pub auth_token: String,
}

/// Root configuration object.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor: Option<MonitorConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder: Option<ReminderConfig>,

    /// When absent, reminder texts come from the built-in templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,
}

impl Config {
    /// Reads the configuration file, returning the default configuration when
    /// it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the configuration file if present.
    pub fn delete() -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if config_file_path.exists() {
            fs::remove_file(config_file_path)?;
        }
        Ok(())
    }

    /// Resolves the effective monitor and reminder sections and validates both.
    pub fn resolved(&self) -> Result<(MonitorConfig, ReminderConfig), ConfigError> {
        let monitor = self.monitor.clone().unwrap_or_default();
        let reminder = self.reminder.clone().unwrap_or_default();
        monitor.validate()?;
        reminder.validate()?;
        Ok((monitor, reminder))
    }

    /// Interactive setup wizard. Current values are offered as defaults.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();
        let theme = ColorfulTheme::default();

        let monitor_default = config.monitor.clone().unwrap_or_default();
        msg_print!(Message::ConfigModuleMonitor);
        let monitor = MonitorConfig {
            idle_threshold: Input::with_theme(&theme)
                .with_prompt(Message::PromptIdleThreshold.to_string())
                .default(monitor_default.idle_threshold)
                .interact_text()?,
            reset_threshold: Input::with_theme(&theme)
                .with_prompt(Message::PromptResetThreshold.to_string())
                .default(monitor_default.reset_threshold)
                .interact_text()?,
            tick_interval: Input::with_theme(&theme)
                .with_prompt(Message::PromptTickInterval.to_string())
                .default(monitor_default.tick_interval)
                .interact_text()?,
        };
        monitor.validate()?;
        config.monitor = Some(monitor);

        let reminder_default = config.reminder.clone().unwrap_or_default();
        msg_print!(Message::ConfigModuleReminder);
        let labels: Vec<String> = WORK_THRESHOLD_CHOICES.iter().map(|m| format!("{} min", m)).collect();
        let current = WORK_THRESHOLD_CHOICES
            .iter()
            .position(|m| *m == reminder_default.work_threshold)
            .unwrap_or(0);
        let selected = Select::with_theme(&theme)
            .with_prompt(Message::PromptWorkThreshold.to_string())
            .items(&labels)
            .default(current)
            .interact()?;
        config.reminder = Some(ReminderConfig {
            work_threshold: WORK_THRESHOLD_CHOICES[selected],
            banner_grace: Input::with_theme(&theme)
                .with_prompt(Message::PromptBannerGrace.to_string())
                .default(reminder_default.banner_grace)
                .interact_text()?,
            repeat_interval: Input::with_theme(&theme)
                .with_prompt(Message::PromptRepeatInterval.to_string())
                .default(reminder_default.repeat_interval)
                .interact_text()?,
            pregenerate_lead: reminder_default.pregenerate_lead,
        });

        let server_default = config.server.clone().unwrap_or(ServerConfig {
            api_url: String::new(),
            auth_token: String::new(),
        });
        msg_print!(Message::ConfigModuleServer);
        let api_url: String = Input::with_theme(&theme)
            .with_prompt(Message::PromptServerApiUrl.to_string())
            .default(server_default.api_url)
            .allow_empty(true)
            .interact_text()?;
        config.server = if api_url.trim().is_empty() {
            None
        } else {
            Some(ServerConfig {
                api_url,
                auth_token: Input::with_theme(&theme)
                    .with_prompt(Message::PromptServerAuthToken.to_string())
                    .default(server_default.auth_token)
                    .allow_empty(true)
                    .interact_text()?,
            })
        };

        Ok(config)
    }
}
