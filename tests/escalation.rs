#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use stepaway::libs::activity::Transition;
    use stepaway::libs::config::{MonitorConfig, ReminderConfig};
    use stepaway::libs::controller::Controller;
    use stepaway::libs::escalation::{Escalation, EscalationMode, EscalationPolicy, Intent, Tier};
    use stepaway::libs::reminder::fallback_message;
    use stepaway::libs::session::{ActivityState, Session, MESSAGE_HISTORY_CAPACITY};

    struct Run {
        controller: Controller,
        now: DateTime<Utc>,
    }

    impl Run {
        /// Controller with default settings whose first tick started a session.
        fn started() -> Self {
            let start = Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap();
            let mut controller = Controller::new(start, MonitorConfig::default(), ReminderConfig::default());
            let now = start + Duration::seconds(1);
            let report = controller.tick(now, 0);
            assert_eq!(report.sample.transition, Transition::Started);
            Run { controller, now }
        }

        fn tick(&mut self, idle_sample: u64) -> Vec<Intent> {
            self.now += Duration::seconds(1);
            self.controller.tick(self.now, idle_sample).intents
        }

        /// Ticks with continuous input, returning every intent produced.
        fn work(&mut self, seconds: u64) -> Vec<Intent> {
            (0..seconds).flat_map(|_| self.tick(0)).collect()
        }

        fn work_until_banner(&mut self) {
            let intents = self.work(1500);
            assert_eq!(raises(&intents), vec![Tier::Banner]);
        }
    }

    fn raises(intents: &[Intent]) -> Vec<Tier> {
        intents
            .iter()
            .filter_map(|intent| match intent {
                Intent::Raise { tier, .. } => Some(*tier),
                _ => None,
            })
            .collect()
    }

    fn requests(intents: &[Intent]) -> Vec<u64> {
        intents
            .iter()
            .filter_map(|intent| match intent {
                Intent::RequestMessage { request_id, .. } => Some(*request_id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_no_banner_below_threshold() {
        let mut run = Run::started();
        let intents = run.work(1499);

        assert!(raises(&intents).is_empty());
        assert_eq!(run.controller.session().work_seconds, 1499);
        assert_eq!(run.controller.escalation().mode, EscalationMode::None);
    }

    #[test]
    fn test_single_banner_at_threshold() {
        let mut run = Run::started();
        let mut raised_at = Vec::new();
        for _ in 0..1500 {
            if !raises(&run.tick(0)).is_empty() {
                raised_at.push(run.controller.session().work_seconds);
            }
        }

        assert_eq!(raised_at, vec![1500]);
        let session = run.controller.session();
        assert!(session.ack_pending);
        assert_eq!(session.message_history.to_vec(), vec![fallback_message(25)]);
        assert_eq!(run.controller.escalation().mode, EscalationMode::Banner);
        assert_eq!(run.controller.escalation().count, 1);
        assert_eq!(run.controller.escalation().entered_at, Some(run.now));
    }

    #[test]
    fn test_overlay_after_grace() {
        let mut run = Run::started();
        run.work_until_banner();

        let intents = run.work(59);
        assert!(raises(&intents).is_empty());
        assert_eq!(run.controller.escalation().mode, EscalationMode::Banner);

        let intents = run.tick(0);
        assert_eq!(raises(&intents), vec![Tier::Overlay]);
        assert_eq!(run.controller.escalation().mode, EscalationMode::Overlay);
        assert_eq!(run.controller.escalation().count, 2);

        // Overlay is the top tier.
        assert!(raises(&run.work(600)).is_empty());
    }

    #[test]
    fn test_acknowledge_starts_cooldown() {
        let mut run = Run::started();
        run.work_until_banner();
        run.work(5);

        assert!(run.controller.acknowledge(run.now));
        assert_eq!(run.controller.escalation().mode, EscalationMode::None);
        assert!(!run.controller.session().ack_pending);
        assert_eq!(run.controller.escalation().next_allowed_at, Some(run.now + Duration::seconds(120)));

        assert!(raises(&run.work(119)).is_empty());
        assert_eq!(raises(&run.tick(0)), vec![Tier::Banner]);
        assert_eq!(run.controller.escalation().count, 2);
    }

    #[test]
    fn test_acknowledge_without_alert_is_ignored() {
        let mut run = Run::started();
        run.work(10);
        assert!(!run.controller.acknowledge(run.now));
        assert_eq!(run.controller.escalation().next_allowed_at, None);
    }

    #[test]
    fn test_acknowledge_overlay_returns_to_none() {
        let mut run = Run::started();
        run.work_until_banner();
        run.work(60);
        assert_eq!(run.controller.escalation().mode, EscalationMode::Overlay);

        assert!(run.controller.acknowledge(run.now));
        assert_eq!(run.controller.escalation().mode, EscalationMode::None);
        assert_eq!(run.controller.escalation().entered_at, None);
    }

    #[test]
    fn test_pregeneration_requested_ahead_of_banner() {
        let mut run = Run::started();
        assert!(requests(&run.work(1379)).is_empty());

        let intents = run.tick(0);
        let request = intents.iter().find_map(|intent| match intent {
            Intent::RequestMessage { request_id, request } => Some((*request_id, request.clone())),
            _ => None,
        });
        let (request_id, request) = request.expect("request issued 120s ahead");
        assert_eq!(request_id, 1);
        assert_eq!(request.work_minutes, 25);
        assert_eq!(request.reminder_index, 0);
        assert!(request.history.is_empty());

        // Only one request in flight at a time.
        assert!(requests(&run.work(60)).is_empty());

        assert!(run.controller.deliver_message(1, "  Stretch your legs.  ".to_string()));
        assert!(!run.controller.deliver_message(1, "duplicate".to_string()));

        let intents = run.work(60);
        let messages: Vec<String> = intents
            .iter()
            .filter_map(|intent| match intent {
                Intent::Raise { message, .. } => Some(message.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(messages, vec!["Stretch your legs.".to_string()]);
    }

    #[test]
    fn test_banner_pregenerates_overlay_text() {
        let mut run = Run::started();
        run.work(1380);
        run.controller.deliver_message(1, "first".to_string());
        run.work(120);
        assert_eq!(run.controller.escalation().mode, EscalationMode::Banner);

        // The banner consumed the pending text, so the overlay text is requested at once.
        let pregen = &run.controller.escalation().pregen;
        assert_eq!(pregen.request_id, 2);
        assert!(pregen.in_flight);
    }

    #[test]
    fn test_empty_generated_text_falls_back() {
        let mut run = Run::started();
        run.work(1380);
        assert!(run.controller.deliver_message(1, "   ".to_string()));

        let intents = run.work(120);
        let message = intents.iter().find_map(|intent| match intent {
            Intent::Raise { message, .. } => Some(message.clone()),
            _ => None,
        });
        assert_eq!(message, Some(fallback_message(25)));
    }

    #[test]
    fn test_stale_message_discarded() {
        let mut run = Run::started();
        run.work(1380);
        assert!(run.controller.escalation().pregen.in_flight);

        assert!(!run.controller.deliver_message(7, "wrong id".to_string()));

        // Leaving working cancels the outstanding request.
        run.tick(120);
        assert!(!run.controller.deliver_message(1, "too late".to_string()));
        assert_eq!(run.controller.escalation().pregen.pending, None);
    }

    #[test]
    fn test_going_idle_dismisses_alert() {
        let mut run = Run::started();
        run.work_until_banner();

        let intents = run.tick(120);
        assert!(intents.contains(&Intent::DismissActive));
        assert_eq!(run.controller.session().state, ActivityState::Idle);
        assert_eq!(run.controller.escalation().mode, EscalationMode::None);
        assert!(!run.controller.session().ack_pending);
        run.controller.check_invariants().unwrap();
    }

    #[test]
    fn test_resume_keeps_work_and_rearms_banner() {
        let mut run = Run::started();
        run.work_until_banner();
        run.tick(130);

        let report = {
            run.now += Duration::seconds(1);
            run.controller.tick(run.now, 0)
        };
        assert_eq!(report.sample.transition, Transition::Resumed);
        assert_eq!(run.controller.session().work_seconds, 1500);
        // Still past the threshold with no cooldown, so the banner is back at once.
        assert_eq!(raises(&report.intents), vec![Tier::Banner]);
        assert_eq!(run.controller.escalation().count, 1);
    }

    #[test]
    fn test_reset_clears_session() {
        let mut run = Run::started();
        run.work_until_banner();

        let intents = run.tick(300);
        assert!(intents.contains(&Intent::DismissActive));
        assert!(intents.contains(&Intent::Persist));
        let session = run.controller.session();
        assert_eq!(session.state, ActivityState::Fresh);
        assert_eq!(session.work_seconds, 0);
        assert!(session.message_history.is_empty());
        assert_eq!(run.controller.escalation().count, 0);

        // New session starts from zero.
        run.tick(0);
        assert_eq!(run.controller.session().work_seconds, 0);
        assert!(raises(&run.work(1499)).is_empty());
    }

    #[test]
    fn test_suspension_resets_session() {
        let mut run = Run::started();
        run.work(1000);

        run.now += Duration::seconds(3600);
        let report = run.controller.tick(run.now, 1);
        assert!(report.sample.suspended);
        assert_eq!(report.elapsed, 3600);
        assert_eq!(report.sample.transition, Transition::Reset);
        assert_eq!(run.controller.session().state, ActivityState::Fresh);
    }

    #[test]
    fn test_persist_on_state_change_and_minute() {
        let start = Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap();
        let mut controller = Controller::new(start, MonitorConfig::default(), ReminderConfig::default());

        let report = controller.tick(start + Duration::seconds(1), 0);
        assert!(report.intents.contains(&Intent::Persist));

        let mut persisted = Vec::new();
        for second in 2..=121 {
            let report = controller.tick(start + Duration::seconds(second), 0);
            if report.intents.contains(&Intent::Persist) {
                persisted.push(controller.session().work_seconds);
            }
        }
        assert_eq!(persisted, vec![60, 120]);
    }

    #[test]
    fn test_abandoned_banner_retries() {
        let mut run = Run::started();
        run.work_until_banner();
        run.controller.abandon_alert(Tier::Banner, run.now);

        assert_eq!(run.controller.escalation().mode, EscalationMode::None);
        assert_eq!(run.controller.escalation().count, 0);
        assert!(run.controller.session().message_history.is_empty());
        assert!(!run.controller.session().ack_pending);

        assert_eq!(raises(&run.tick(0)), vec![Tier::Banner]);
    }

    #[test]
    fn test_abandoned_overlay_keeps_banner() {
        let mut run = Run::started();
        run.work_until_banner();
        run.work(60);
        run.controller.abandon_alert(Tier::Overlay, run.now);

        assert_eq!(run.controller.escalation().mode, EscalationMode::Banner);
        assert_eq!(run.controller.escalation().count, 1);
        assert_eq!(run.controller.session().message_history.len(), 1);
        assert_eq!(raises(&run.tick(0)), vec![Tier::Overlay]);
    }
    #[test]
    fn test_jittered_ticks_count_full_wall_time() {
        let mut run = Run::started();
        for i in 0..600 {
            run.now += Duration::milliseconds(if i % 2 == 0 { 1001 } else { 999 });
            run.controller.tick(run.now, 0);
        }
        assert_eq!(run.controller.session().work_seconds, 600);
    }

    #[test]
    fn test_sub_second_ticks_accumulate() {
        let mut run = Run::started();
        for _ in 0..10 {
            run.now += Duration::milliseconds(300);
            run.controller.tick(run.now, 0);
        }
        assert_eq!(run.controller.session().work_seconds, 3);
    }

    #[test]
    fn test_jittered_banner_fires_at_threshold() {
        let mut run = Run::started();
        let mut raised_at = Vec::new();
        for i in 0..1550 {
            run.now += Duration::milliseconds(if i % 2 == 0 { 999 } else { 1001 });
            let intents = run.controller.tick(run.now, 0).intents;
            if !raises(&intents).is_empty() {
                raised_at.push(i + 1);
            }
        }
        assert_eq!(raised_at, vec![1500]);
    }

    #[test]
    fn test_cooldown_holds_until_next_allowed_at() {
        let mut run = Run::started();
        run.work_until_banner();
        assert!(run.controller.acknowledge(run.now));
        let next_allowed_at = run.now + Duration::seconds(120);

        let almost = next_allowed_at - Duration::milliseconds(500);
        let intents = run.controller.tick(almost, 0).intents;
        assert!(raises(&intents).is_empty());
        assert_eq!(run.controller.escalation().mode, EscalationMode::None);

        let intents = run.controller.tick(next_allowed_at, 0).intents;
        assert_eq!(raises(&intents), vec![Tier::Banner]);
    }

    #[test]
    fn test_abandon_restores_full_history() {
        let now = Utc.with_ymd_and_hms(2025, 3, 3, 9, 30, 0).unwrap();
        let policy = EscalationPolicy::new(ReminderConfig::default());
        let mut escalation = Escalation::default();
        let mut session = Session::new(now);
        session.state = ActivityState::Working;
        session.work_seconds = 1500;
        for i in 0..MESSAGE_HISTORY_CAPACITY {
            session.message_history.push(format!("reminder {}", i));
        }
        let before = session.message_history.to_vec();

        let intents = policy.advance(&mut escalation, &mut session, Transition::Unchanged, now);
        assert_eq!(raises(&intents), vec![Tier::Banner]);
        assert_ne!(session.message_history.to_vec(), before);

        policy.abandon(&mut escalation, &mut session, Tier::Banner, now);
        assert_eq!(session.message_history.to_vec(), before);
        assert_eq!(escalation.count, 0);
    }

    #[test]
    fn test_ack_pending_requires_active_alert() {
        let mut run = Run::started();
        run.work_until_banner();
        run.controller.check_invariants().unwrap();
        run.controller.acknowledge(run.now);
        run.controller.check_invariants().unwrap();
        assert!(!run.controller.session().ack_pending);
    }
}
