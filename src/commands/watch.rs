use crate::libs::daemon;
use crate::libs::messages::Message;
use crate::msg_info;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Run in the foreground; press Enter to dismiss a reminder
    #[arg(short, long)]
    foreground: bool,
    /// Stop the background watcher
    #[arg(long, conflicts_with = "foreground")]
    stop: bool,
}

pub async fn cmd(args: WatchArgs) -> Result<()> {
    if args.stop {
        return daemon::stop();
    }
    if args.foreground {
        msg_info!(Message::WatcherStartingForeground);
        return daemon::run_with_signal_handling(true).await;
    }
    daemon::spawn()
}
