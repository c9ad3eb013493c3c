//! Core library modules for stepaway.
//!
//! - **State machines**: [`activity`], [`escalation`], combined in [`controller`]
//! - **Persistence**: [`session`] snapshots and the [`persistence`] bridge
//! - **Capabilities**: [`alert`], [`reminder`], [`idle`]
//! - **Runtime**: the [`monitor`] tick loop and the [`daemon`] lifecycle
//! - **Infrastructure**: [`config`], [`data_storage`], [`messages`], [`formatter`], [`view`]

pub mod activity;
pub mod alert;
pub mod config;
pub mod controller;
pub mod daemon;
pub mod data_storage;
pub mod escalation;
pub mod formatter;
pub mod idle;
pub mod messages;
pub mod monitor;
pub mod persistence;
pub mod reminder;
pub mod session;
pub mod view;
