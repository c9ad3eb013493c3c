use crate::db::snapshots::Snapshots;
use crate::libs::messages::Message;
use crate::libs::persistence::{SnapshotStore, SNAPSHOT_KEY};
use crate::msg_success;
use anyhow::Result;

pub fn cmd() -> Result<()> {
    Snapshots::new()?.remove(SNAPSHOT_KEY)?;
    msg_success!(Message::SessionCleared);
    Ok(())
}
