#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use stepaway::libs::formatter::{format_seconds, status_label};
    use stepaway::libs::session::{ActivityState, Session};

    fn session(state: ActivityState, work_seconds: u64, idle_seconds: u64) -> Session {
        let mut session = Session::new(Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap());
        session.state = state;
        session.work_seconds = work_seconds;
        session.idle_seconds = idle_seconds;
        session
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0), "00:00:00");
        assert_eq!(format_seconds(59), "00:00:59");
        assert_eq!(format_seconds(61), "00:01:01");
        assert_eq!(format_seconds(1500), "00:25:00");
        assert_eq!(format_seconds(3600), "01:00:00");
        assert_eq!(format_seconds(90061), "25:01:01");
    }

    #[test]
    fn test_status_label_fresh() {
        assert_eq!(status_label(&session(ActivityState::Fresh, 0, 0)), "Fresh");
    }

    #[test]
    fn test_status_label_working() {
        assert_eq!(status_label(&session(ActivityState::Working, 1500, 0)), "Working 00:25:00");
    }

    #[test]
    fn test_status_label_idle() {
        assert_eq!(
            status_label(&session(ActivityState::Idle, 1820, 135)),
            "Idle 00:02:15 (worked 00:30:20)"
        );
    }
}
