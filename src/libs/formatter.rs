//! Duration and status formatting for logs and the status table.
//!
//! ```rust
//! use stepaway::libs::formatter::format_seconds;
//!
//! assert_eq!(format_seconds(1500), "00:25:00");
//! ```

use crate::libs::session::{ActivityState, Session};
use chrono::{DateTime, Local, Utc};

/// Formats a second count as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_seconds(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Short one-line description such as `Working 00:25:00`.
pub fn status_label(session: &Session) -> String {
    match session.state {
        ActivityState::Fresh => session.state.to_string(),
        ActivityState::Working => format!("{} {}", session.state, format_seconds(session.work_seconds)),
        ActivityState::Idle => format!(
            "{} {} (worked {})",
            session.state,
            format_seconds(session.idle_seconds),
            format_seconds(session.work_seconds)
        ),
    }
}

/// Local wall-clock rendering of a stored timestamp.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}
