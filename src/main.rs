use stepaway::commands::Cli;
use stepaway::libs::daemon::{self, DAEMON_RUN_ARG};
use stepaway::libs::messages::macros::is_debug_mode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if is_debug_mode() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stepaway=debug"));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // The detached watcher re-executes the binary with this marker argument.
    if std::env::args().any(|arg| arg == DAEMON_RUN_ARG) {
        return daemon::run_with_signal_handling(false).await;
    }

    Cli::menu().await
}
