//! SQLite persistence for stepaway.
//!
//! The database lives next to the configuration file in the platform data
//! directory. It currently holds one table of keyed session snapshots.
//!
//! ```rust,no_run
//! use stepaway::db::snapshots::Snapshots;
//! use stepaway::libs::persistence::{SnapshotStore, SNAPSHOT_KEY};
//!
//! let mut snapshots = Snapshots::new()?;
//! let last = snapshots.load(SNAPSHOT_KEY)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod db;
pub mod snapshots;
