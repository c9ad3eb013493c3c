use super::formatter::{format_seconds, format_timestamp};
use super::session::Session;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn session(session: &Session, escalation_count: u32) {
        let ack_pending = if session.ack_pending { "yes" } else { "no" };
        let mut table = Table::new();

        table.add_row(row!["STATE", "WORK", "IDLE", "LAST UPDATE", "ACK PENDING", "REMINDERS"]);
        table.add_row(row![
            session.state,
            format_seconds(session.work_seconds),
            format_seconds(session.idle_seconds),
            format_timestamp(session.last_update),
            ack_pending,
            escalation_count
        ]);
        table.printstd();

        if !session.message_history.is_empty() {
            let mut history = Table::new();
            history.add_row(row!["#", "RECENT REMINDERS"]);
            for (index, message) in session.message_history.iter().enumerate() {
                history.add_row(row![index + 1, message]);
            }
            history.printstd();
        }
    }
}
