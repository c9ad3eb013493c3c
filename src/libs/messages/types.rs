#[derive(Debug, Clone)]
pub enum Message {
    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigInvalid(String),
    ConfigModuleMonitor,
    ConfigModuleReminder,
    ConfigModuleServer,
    PromptIdleThreshold,
    PromptResetThreshold,
    PromptTickInterval,
    PromptWorkThreshold,
    PromptBannerGrace,
    PromptRepeatInterval,
    PromptServerApiUrl,
    PromptServerAuthToken,

    // === SESSION MESSAGES ===
    SessionStarted,
    SessionResumed(u64), // work minutes so far
    SessionIdle(u64),    // idle seconds
    SessionReset,
    SessionRestored(String),
    SessionCleared,
    SuspensionDetected(u64), // elapsed seconds
    NoSessionStored,

    // === SNAPSHOT MESSAGES ===
    SnapshotLoadFailed(String),
    SnapshotSaveFailed(String),
    SnapshotMalformed(String),

    // === ALERT MESSAGES ===
    BannerRaised(String),
    OverlayRaised(String),
    AlertRaised(String), // tier
    AlertAcknowledged,
    AlertFailed(String, String),        // tier, error
    AlertDismissFailed(String, String), // tier, error

    // === REMINDER TEXT MESSAGES ===
    MessageRequested(u64),
    StaleMessageDiscarded(u64),
    GeneratorFailed(String),
    GeneratorEmptyResponse,

    // === MONITOR MESSAGES ===
    MonitorStarted {
        idle_threshold: u64,
        reset_threshold: u64,
        work_threshold: u64,
    },
    MonitorStopped,
    MonitorExitedNormally,
    MonitorError(String),
    MonitorTaskPanicked(String),
    ErrorInRdevListener(String),

    // === WATCHER MESSAGES ===
    WatcherStarted(u32),
    WatcherStopped(u32),
    WatcherNotRunning,
    WatcherNotRunningPidNotFound,
    WatcherStartingForeground,
    WatcherStoppingExisting(String),
    WatcherFailedToStopExisting(String),
    WatcherReceivedSigterm,
    WatcherReceivedSigint,
    WatcherReceivedCtrlC,
    WatcherCtrlCListenFailed(String),
    WatcherSignalHandlingNotSupported,
    FailedToCreateSignalHandler(String, String), // signal, error
    FailedToGetCurrentExecutable(String),
    InvalidPidFileContent,
    DaemonModeNotSupported,
    ProcessTerminationNotSupported,
    FailedToOpenProcess(u32),
    FailedToTerminateProcess(u32),
}
