//! Prints the stored session as the watcher would see it right now.

use crate::db::snapshots::Snapshots;
use crate::libs::config::Config;
use crate::libs::controller::Controller;
use crate::libs::messages::Message;
use crate::libs::persistence::{SnapshotStore, SNAPSHOT_KEY};
use crate::libs::view::View;
use crate::msg_info;
use anyhow::Result;
use chrono::Utc;

pub fn cmd() -> Result<()> {
    let config = Config::read()?;

    let Some(snapshot) = Snapshots::new()?.load(SNAPSHOT_KEY)? else {
        msg_info!(Message::NoSessionStored);
        return Ok(());
    };

    let controller = Controller::restore(
        Some(snapshot),
        Utc::now(),
        config.monitor.unwrap_or_default(),
        config.reminder.unwrap_or_default(),
    );
    View::session(controller.session(), controller.escalation().count);
    Ok(())
}
