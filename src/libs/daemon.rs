//! Lifecycle of the background watcher: start, stop and signal handling.

use crate::db::snapshots::Snapshots;
use crate::libs::alert::{Alerter, TerminalAlerter};
use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use crate::libs::idle::{InputListener, SystemClock};
use crate::libs::messages::Message;
use crate::libs::monitor::{Capabilities, Monitor};
use crate::libs::reminder::{FallbackGenerator, HttpGenerator, MessageGenerator};
use crate::{msg_bail_anyhow, msg_error, msg_error_anyhow, msg_info, msg_warning};
use anyhow::Result;
use std::time::Duration;
use tokio::sync::oneshot;

const PID_FILE: &str = "stepaway-watch.pid";

/// Argument the detached child is started with.
pub const DAEMON_RUN_ARG: &str = "--daemon-run";

/// Runs the monitor until SIGTERM/SIGINT (Ctrl+C on Windows), then lets it
/// flush the session before returning.
///
/// `interactive` enables acknowledging alerts with Enter on stdin.
pub async fn run_with_signal_handling(interactive: bool) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    #[cfg(unix)]
    {
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    msg_error!(Message::FailedToCreateSignalHandler("SIGTERM".to_string(), e.to_string()));
                    return;
                }
            };
            let mut sigint = match signal(SignalKind::interrupt()) {
                Ok(s) => s,
                Err(e) => {
                    msg_error!(Message::FailedToCreateSignalHandler("SIGINT".to_string(), e.to_string()));
                    return;
                }
            };

            tokio::select! {
                _ = sigterm.recv() => {
                    msg_info!(Message::WatcherReceivedSigterm);
                }
                _ = sigint.recv() => {
                    msg_info!(Message::WatcherReceivedSigint);
                }
            }

            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(windows)]
    {
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    msg_info!(Message::WatcherReceivedCtrlC);
                    let _ = shutdown_tx.send(());
                }
                Err(e) => {
                    msg_error!(Message::WatcherCtrlCListenFailed(e.to_string()));
                    std::future::pending::<()>().await;
                    drop(shutdown_tx);
                }
            }
        });
    }

    #[cfg(not(any(unix, windows)))]
    {
        msg_warning!(Message::WatcherSignalHandlingNotSupported);
        tokio::spawn(async move {
            let _keep_alive = shutdown_tx;
            std::future::pending::<()>().await;
        });
    }

    let monitor_handle = tokio::spawn(async move { run_monitor(interactive, shutdown_rx).await });

    let result = match monitor_handle.await {
        Ok(Ok(())) => {
            msg_info!(Message::MonitorExitedNormally);
            Ok(())
        }
        Ok(Err(e)) => {
            msg_error!(Message::MonitorError(e.to_string()));
            Err(e)
        }
        Err(e) => {
            msg_error!(Message::MonitorTaskPanicked(e.to_string()));
            Err(msg_error_anyhow!(Message::MonitorTaskPanicked(e.to_string())))
        }
    };

    if !interactive {
        let pid_path = DataStorage::new().get_path(PID_FILE)?;
        if pid_path.exists() {
            let _ = std::fs::remove_file(&pid_path);
        }
    }

    result
}

/// Wires the capabilities from the configuration and runs the monitor.
async fn run_monitor(interactive: bool, shutdown: oneshot::Receiver<()>) -> Result<()> {
    let config = Config::read()?;
    let (monitor_config, reminder_config) = config
        .resolved()
        .map_err(|e| msg_error_anyhow!(Message::ConfigInvalid(e.to_string())))?;

    let generator: Box<dyn MessageGenerator> = match config.server {
        Some(server) if !server.api_url.trim().is_empty() => Box::new(HttpGenerator::new(server)),
        _ => Box::new(FallbackGenerator),
    };
    let alerter: Box<dyn Alerter> = if interactive {
        Box::new(TerminalAlerter::interactive())
    } else {
        Box::new(TerminalAlerter::headless())
    };

    let capabilities = Capabilities {
        alerter,
        generator,
        store: Box::new(Snapshots::new()?),
        idle: Box::new(InputListener::spawn()),
        clock: Box::new(SystemClock),
    };

    let mut monitor = Monitor::load(monitor_config, reminder_config, capabilities);
    monitor.run(shutdown).await
}

/// Spawns the application as a detached background process.
/// A watcher that is already running is stopped first.
pub fn spawn() -> Result<()> {
    let pid_path = DataStorage::new().get_path(PID_FILE)?;

    if pid_path.exists() {
        if let Ok(pid_str) = std::fs::read_to_string(&pid_path) {
            msg_info!(Message::WatcherStoppingExisting(pid_str.trim().to_string()));
            if let Err(e) = stop_internal() {
                msg_warning!(Message::WatcherFailedToStopExisting(e.to_string()));
                let _ = std::fs::remove_file(&pid_path);
            }
            // Give the old process time to flush its session.
            std::thread::sleep(Duration::from_millis(1000));
        }
    }

    let current_exe = std::env::current_exe().map_err(|e| msg_error_anyhow!(Message::FailedToGetCurrentExecutable(e.to_string())))?;

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        let mut command = std::process::Command::new(current_exe);
        command.arg(DAEMON_RUN_ARG).stdin(std::process::Stdio::null());
        // SAFETY: setsid is async-signal-safe and touches no parent state.
        unsafe {
            command.pre_exec(|| {
                nix::unistd::setsid()?;
                Ok(())
            });
        }
        let child = command.spawn()?;
        let pid = child.id();
        std::fs::write(pid_path, pid.to_string())?;
        msg_info!(Message::WatcherStarted(pid));
    }

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x08000000;
        let child = std::process::Command::new(current_exe)
            .arg(DAEMON_RUN_ARG)
            .stdin(std::process::Stdio::null())
            .creation_flags(CREATE_NO_WINDOW)
            .spawn()?;
        let pid = child.id();
        std::fs::write(pid_path, pid.to_string())?;
        msg_info!(Message::WatcherStarted(pid));
    }

    #[cfg(not(any(unix, windows)))]
    {
        let _ = current_exe;
        msg_bail_anyhow!(Message::DaemonModeNotSupported);
    }

    Ok(())
}

/// Stops the background watcher. Not running is not an error.
pub fn stop() -> Result<()> {
    let pid_path = DataStorage::new().get_path(PID_FILE)?;
    if !pid_path.exists() {
        msg_info!(Message::WatcherNotRunning);
        return Ok(());
    }
    stop_internal()
}

fn stop_internal() -> Result<()> {
    let pid_path = DataStorage::new().get_path(PID_FILE)?;
    if !pid_path.exists() {
        msg_bail_anyhow!(Message::WatcherNotRunningPidNotFound);
    }

    let pid_str = std::fs::read_to_string(&pid_path)?;
    let pid: u32 = pid_str.trim().parse().map_err(|_| msg_error_anyhow!(Message::InvalidPidFileContent))?;

    let killed = kill_process(pid)?;

    // The PID file is stale either way.
    std::fs::remove_file(pid_path)?;

    if killed {
        msg_info!(Message::WatcherStopped(pid));
    } else {
        msg_info!(Message::WatcherNotRunning);
    }
    Ok(())
}

#[cfg(windows)]
fn kill_process(pid: u32) -> Result<bool> {
    use winapi::um::errhandlingapi::GetLastError;
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::processthreadsapi::{OpenProcess, TerminateProcess};
    use winapi::um::winnt::PROCESS_TERMINATE;

    unsafe {
        let handle = OpenProcess(PROCESS_TERMINATE, 0, pid);
        if handle.is_null() {
            let error = GetLastError();
            if error == 87 {
                // ERROR_INVALID_PARAMETER: no such process
                return Ok(false);
            }
            msg_bail_anyhow!(Message::FailedToOpenProcess(error));
        }

        let result = TerminateProcess(handle, 0);
        CloseHandle(handle);

        if result == 0 {
            let error = GetLastError();
            msg_bail_anyhow!(Message::FailedToTerminateProcess(error));
        }
        std::thread::sleep(Duration::from_millis(100));
        Ok(true)
    }
}

#[cfg(unix)]
fn kill_process(pid: u32) -> Result<bool> {
    use std::process::Command;

    let output = Command::new("ps").arg("-p").arg(pid.to_string()).output()?;
    if !output.status.success() {
        return Ok(false);
    }

    // SIGTERM lets the watcher write its final snapshot.
    Command::new("kill").arg("-TERM").arg(pid.to_string()).output()?;

    for _ in 0..20 {
        std::thread::sleep(Duration::from_millis(100));
        let check = Command::new("ps").arg("-p").arg(pid.to_string()).output()?;
        if !check.status.success() {
            return Ok(true);
        }
    }

    Command::new("kill").arg("-9").arg(pid.to_string()).output()?;
    std::thread::sleep(Duration::from_millis(100));
    Ok(true)
}

#[cfg(not(any(unix, windows)))]
fn kill_process(_pid: u32) -> Result<bool> {
    msg_bail_anyhow!(Message::ProcessTerminationNotSupported);
}
