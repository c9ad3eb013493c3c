#[cfg(test)]
mod tests {
    use stepaway::libs::alert::{AckSlot, Alerter, TerminalAlerter};
    use stepaway::libs::reminder::{fallback_message, FallbackGenerator, MessageGenerator, MessageRequest, MessageSlot};

    fn request(work_minutes: u64, reminder_index: u32, history: Vec<String>) -> MessageRequest {
        MessageRequest {
            work_minutes,
            reminder_index,
            history,
        }
    }

    #[test]
    fn test_fallback_message_mentions_minutes() {
        assert_eq!(
            fallback_message(25),
            "You've been working for 25 minutes. Time to step away for a moment."
        );
    }

    #[test]
    fn test_compose_rotates_with_index() {
        let first = FallbackGenerator::compose(&request(25, 0, vec![]));
        let second = FallbackGenerator::compose(&request(25, 1, vec![]));
        assert_ne!(first, second);
        assert!(first.contains("25"));
        assert_eq!(FallbackGenerator::compose(&request(25, 5, vec![])), first);
    }

    #[test]
    fn test_compose_skips_history() {
        let first = FallbackGenerator::compose(&request(30, 0, vec![]));
        let next = FallbackGenerator::compose(&request(30, 0, vec![first.clone()]));
        assert_ne!(next, first);
        assert_eq!(next, FallbackGenerator::compose(&request(30, 1, vec![])));
    }

    #[test]
    fn test_compose_exhausted_history_falls_back() {
        let history: Vec<String> = (0..5).map(|i| FallbackGenerator::compose(&request(40, i, vec![]))).collect();
        assert_eq!(FallbackGenerator::compose(&request(40, 0, history)), fallback_message(40));
    }

    #[test]
    fn test_fallback_generator_answers_through_slot() {
        let slot = MessageSlot::new();
        FallbackGenerator.generate(request(25, 0, vec![]), slot.callback(3));

        let (request_id, text) = slot.take().unwrap();
        assert_eq!(request_id, 3);
        assert!(text.contains("25"));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_message_slot_keeps_latest() {
        let slot = MessageSlot::new();
        slot.callback(1)("old".to_string());
        slot.callback(2)("new".to_string());
        assert_eq!(slot.take(), Some((2, "new".to_string())));
    }

    #[test]
    fn test_request_serializes_for_server() {
        let json = serde_json::to_value(request(35, 2, vec!["Stand up".to_string()])).unwrap();
        assert_eq!(json["work_minutes"], 35);
        assert_eq!(json["reminder_index"], 2);
        assert_eq!(json["history"][0], "Stand up");
    }

    #[test]
    fn test_ack_slot() {
        let slot = AckSlot::new();
        assert_eq!(slot.take(), None);
        let callback = slot.callback(9);
        callback();
        assert_eq!(slot.take(), Some(9));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_headless_terminal_alerter() {
        let slot = AckSlot::new();
        let mut alerter = TerminalAlerter::headless();
        let banner = alerter.raise_banner("Stand up", slot.callback(1)).unwrap();
        let overlay = alerter.raise_overlay("Stand up now", slot.callback(2)).unwrap();
        assert_ne!(banner, overlay);

        alerter.dismiss(banner).unwrap();
        alerter.dismiss(overlay).unwrap();
        assert_eq!(slot.take(), None);
    }
}
