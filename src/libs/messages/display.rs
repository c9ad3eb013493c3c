//! Human-readable text for every [`Message`].
//!
//! All user-facing wording lives here so the rest of the code refers to
//! messages by variant only.

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigInvalid(error) => format!("Invalid configuration: {}", error),
            Message::ConfigModuleMonitor => "Activity settings".to_string(),
            Message::ConfigModuleReminder => "Reminder settings".to_string(),
            Message::ConfigModuleServer => "Reminder text server (leave the URL empty to use built-in texts)".to_string(),
            Message::PromptIdleThreshold => "Seconds without input before you count as idle".to_string(),
            Message::PromptResetThreshold => "Seconds without input before the session resets".to_string(),
            Message::PromptTickInterval => "Sampling interval (seconds)".to_string(),
            Message::PromptWorkThreshold => "Remind me after working for".to_string(),
            Message::PromptBannerGrace => "Seconds before an ignored banner becomes an overlay".to_string(),
            Message::PromptRepeatInterval => "Seconds before reminding again after a dismissal".to_string(),
            Message::PromptServerApiUrl => "Enter reminder server URL".to_string(),
            Message::PromptServerAuthToken => "Enter reminder server token".to_string(),

            // === SESSION MESSAGES ===
            Message::SessionStarted => "Work session started".to_string(),
            Message::SessionResumed(minutes) => format!("Work session resumed after a pause ({} min worked so far)", minutes),
            Message::SessionIdle(seconds) => format!("No input for {}s, session is idle", seconds),
            Message::SessionReset => "Away long enough, session reset".to_string(),
            Message::SessionRestored(label) => format!("Session restored: {}", label),
            Message::SessionCleared => "Stored session cleared".to_string(),
            Message::SuspensionDetected(seconds) => format!("Process was suspended for about {}s", seconds),
            Message::NoSessionStored => "No session stored yet".to_string(),

            // === SNAPSHOT MESSAGES ===
            Message::SnapshotLoadFailed(error) => format!("Failed to load the stored session, starting fresh: {}", error),
            Message::SnapshotSaveFailed(error) => format!("Failed to store the session, will retry on the next change: {}", error),
            Message::SnapshotMalformed(error) => format!("Stored session is unreadable and was ignored: {}", error),

            // === ALERT MESSAGES ===
            Message::BannerRaised(text) => format!("Break reminder: {} (press Enter to dismiss)", text),
            Message::OverlayRaised(text) => format!(
                "\x07==================== TAKE A BREAK ====================\n{}\n(press Enter to dismiss)\n======================================================",
                text
            ),
            Message::AlertRaised(tier) => format!("Raised {}", tier),
            Message::AlertAcknowledged => "Reminder dismissed".to_string(),
            Message::AlertFailed(tier, error) => format!("Failed to show {}: {}", tier, error),
            Message::AlertDismissFailed(tier, error) => format!("Failed to dismiss {}: {}", tier, error),

            // === REMINDER TEXT MESSAGES ===
            Message::MessageRequested(id) => format!("Requested reminder text #{}", id),
            Message::StaleMessageDiscarded(id) => format!("Discarded outdated reminder text #{}", id),
            Message::GeneratorFailed(error) => format!("Reminder text generation failed, using the default text: {}", error),
            Message::GeneratorEmptyResponse => "Reminder server returned an empty text".to_string(),

            // === MONITOR MESSAGES ===
            Message::MonitorStarted {
                idle_threshold,
                reset_threshold,
                work_threshold,
            } => format!(
                "Monitor is running with idle threshold {}s, reset threshold {}s, reminders after {} min",
                idle_threshold, reset_threshold, work_threshold
            ),
            Message::MonitorStopped => "Monitor stopped".to_string(),
            Message::MonitorExitedNormally => "Monitor exited normally".to_string(),
            Message::MonitorError(error) => format!("Monitor error: {}", error),
            Message::MonitorTaskPanicked(error) => format!("Monitor task panicked: {}", error),
            Message::ErrorInRdevListener(error) => format!("Error in rdev listener: {}. Retrying in 1 second...", error),

            // === WATCHER MESSAGES ===
            Message::WatcherStarted(pid) => format!("Watcher started in the background (PID: {}).", pid),
            Message::WatcherStopped(pid) => format!("Watcher process (PID: {}) stopped successfully.", pid),
            Message::WatcherNotRunning => "Watcher is not running.".to_string(),
            Message::WatcherNotRunningPidNotFound => "Watcher does not appear to be running (PID file not found).".to_string(),
            Message::WatcherStartingForeground => "Starting watcher in foreground... Press Ctrl+C to exit.".to_string(),
            Message::WatcherStoppingExisting(pid) => format!("Stopping existing watcher (PID: {})...", pid),
            Message::WatcherFailedToStopExisting(error) => format!("Failed to stop existing watcher: {}", error),
            Message::WatcherReceivedSigterm => "Received SIGTERM, shutting down gracefully...".to_string(),
            Message::WatcherReceivedSigint => "Received SIGINT, shutting down gracefully...".to_string(),
            Message::WatcherReceivedCtrlC => "Received Ctrl+C, shutting down gracefully...".to_string(),
            Message::WatcherCtrlCListenFailed(error) => format!("Failed to listen for Ctrl+C: {}", error),
            Message::WatcherSignalHandlingNotSupported => "Signal handling not supported on this platform".to_string(),
            Message::FailedToCreateSignalHandler(signal, error) => format!("Failed to create {} handler: {}", signal, error),
            Message::FailedToGetCurrentExecutable(error) => format!("Failed to get current executable: {}", error),
            Message::InvalidPidFileContent => "Invalid PID file content".to_string(),
            Message::DaemonModeNotSupported => "Daemon mode is not supported on this platform".to_string(),
            Message::ProcessTerminationNotSupported => "Process termination is not supported on this platform".to_string(),
            Message::FailedToOpenProcess(code) => format!("Failed to open process (error code {})", code),
            Message::FailedToTerminateProcess(code) => format!("Failed to terminate process (error code {})", code),
        };
        write!(f, "{}", s)
    }
}
