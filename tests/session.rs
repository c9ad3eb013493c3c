#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use stepaway::libs::session::{elapsed_seconds, ActivityState, MessageHistory, Session, MESSAGE_HISTORY_CAPACITY};

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = MessageHistory::new();
        for i in 0..MESSAGE_HISTORY_CAPACITY + 2 {
            history.push(format!("reminder {}", i));
        }
        assert_eq!(history.len(), MESSAGE_HISTORY_CAPACITY);
        assert_eq!(history.iter().next().map(String::as_str), Some("reminder 2"));
        assert_eq!(history.pop_latest().as_deref(), Some("reminder 11"));
    }

    #[test]
    fn test_history_push_reports_eviction() {
        let mut history = MessageHistory::new();
        for i in 0..MESSAGE_HISTORY_CAPACITY {
            assert_eq!(history.push(format!("reminder {}", i)), None);
        }
        assert_eq!(history.push("reminder 10"), Some("reminder 0".to_string()));

        history.restore_oldest("ignored while full".to_string());
        assert_eq!(history.len(), MESSAGE_HISTORY_CAPACITY);

        history.pop_latest();
        history.restore_oldest("reminder 0".to_string());
        assert_eq!(history.iter().next().map(String::as_str), Some("reminder 0"));
        assert_eq!(history.len(), MESSAGE_HISTORY_CAPACITY);
    }

    #[test]
    fn test_history_serializes_as_list() {
        let history = MessageHistory::from(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(serde_json::to_string(&history).unwrap(), r#"["a","b"]"#);
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(ActivityState::default(), ActivityState::Fresh);
        assert_eq!(ActivityState::Idle.to_string(), "Idle");
    }

    #[test]
    fn test_elapsed_seconds_never_negative() {
        let now = Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap();
        assert_eq!(elapsed_seconds(now, now + Duration::seconds(90)), 90);
        assert_eq!(elapsed_seconds(now + Duration::seconds(90), now), 0);
    }

    #[test]
    fn test_snapshot_round_trip_through_session() {
        let now = Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap();
        let mut session = Session::new(now);
        session.state = ActivityState::Working;
        session.work_seconds = 1500;
        session.ack_pending = true;
        session.message_history.push("Stand up");

        let snapshot = session.snapshot(1);
        assert_eq!(snapshot.escalation_count, 1);
        assert_eq!(Session::from_snapshot(&snapshot), session);

        session.reset();
        assert_eq!(session, Session::new(now));
    }
}
