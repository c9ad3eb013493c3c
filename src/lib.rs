//! # Stepaway - presence-driven break reminders
//!
//! Watches keyboard and mouse activity, classifies it as working, idle or
//! away, and escalates break reminders when a work stretch runs long.
//!
//! ## Features
//!
//! - **Activity Tracking**: Fresh/Working/Idle classification from idle samples,
//!   robust to sleep and hibernation gaps
//! - **Escalating Reminders**: banner, then overlay, with a cooldown after dismissal
//! - **Reminder Texts**: optional remote generation with a built-in fallback
//! - **Session Persistence**: snapshots in SQLite, reconciled on restart
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stepaway::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
