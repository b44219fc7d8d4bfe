//! Reminder scheduling: turns calendar events with a lead time into deferred
//! local notifications.
//!
//! The scheduler only operates while the application is running. It is not a
//! substitute for push notifications or a backend-scheduled reminder system;
//! reminders that pass while the app is closed are simply gone, and reminders
//! beyond the look-ahead horizon are picked up by a later re-arm.

use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::backend::domain::models::event::ParsedEvent;

/// Maximum look-ahead window within which a reminder will be armed
pub const REMINDER_HORIZON_DAYS: i64 = 7;

/// Time source for the scheduler, injectable so tests never wait on the wall
/// clock
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Delivery seam for reminders.
///
/// Permission is checked at fire time, not at scheduling time; a denied or
/// unsupported permission turns the firing into a no-op.
pub trait Notifier: Send + Sync {
    fn permission_granted(&self) -> bool;
    fn notify(&self, title: &str, body: &str);
}

/// Notifier that writes reminders to the log
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn permission_granted(&self) -> bool {
        true
    }

    fn notify(&self, title: &str, body: &str) {
        info!("🔔 REMINDER: {} - {}", title, body);
    }
}

/// A reminder that qualified for arming
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedReminder {
    pub event_id: String,
    pub title: String,
    /// Event start, shown in the notification body
    pub start: DateTime<Utc>,
    /// When the notification should be raised: start minus the lead time
    pub fire_at: DateTime<Utc>,
    /// fire_at - now at planning time; always positive
    pub delay: Duration,
}

/// Compute which reminders qualify right now.
///
/// Pure: all arming side effects live in [`ReminderScheduler::rearm`]. An
/// event is skipped when it has no lead time, when its fire time has passed
/// (no catch-up firing), or when it lies beyond the look-ahead horizon.
pub fn plan_reminders(events: &[ParsedEvent], now: DateTime<Utc>) -> Vec<PlannedReminder> {
    let horizon = Duration::days(REMINDER_HORIZON_DAYS);

    events
        .iter()
        .filter_map(|event| {
            let minutes = event.remind_minutes?;
            let fire_at = event.start - Duration::minutes(minutes);
            let delay = fire_at - now;

            if delay <= Duration::zero() {
                debug!("Reminder for '{}' is already due; skipping", event.title);
                return None;
            }
            if delay > horizon {
                debug!(
                    "Reminder for '{}' is beyond the {}-day horizon; skipping",
                    event.title, REMINDER_HORIZON_DAYS
                );
                return None;
            }

            Some(PlannedReminder {
                event_id: event.id.clone(),
                title: event.title.clone(),
                start: event.start,
                fire_at,
                delay,
            })
        })
        .collect()
}

/// One armed timer: a cancellable sleeper thread plus its bookkeeping
struct ArmedReminder {
    event_id: String,
    cancel: Arc<(Mutex<bool>, Condvar)>,
    handle: Option<JoinHandle<()>>,
}

/// Owns the armed timers for the current event list.
///
/// The only entry point is [`rearm`](Self::rearm), which replaces the whole
/// timer set: cancel everything, then schedule everything that qualifies.
/// There is no diffing, so re-arming is idempotent and duplicates can never
/// accumulate.
pub struct ReminderScheduler {
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    armed: Vec<ArmedReminder>,
}

impl ReminderScheduler {
    pub fn new(clock: Arc<dyn Clock>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            clock,
            notifier,
            armed: Vec::new(),
        }
    }

    pub fn with_system_clock(notifier: Arc<dyn Notifier>) -> Self {
        Self::new(Arc::new(SystemClock), notifier)
    }

    /// Cancel every armed reminder, then arm one timer per qualifying event.
    /// Returns the number of armed timers.
    pub fn rearm(&mut self, events: &[ParsedEvent]) -> usize {
        self.cancel_all();

        let now = self.clock.now();
        let planned = plan_reminders(events, now);
        info!(
            "🔔 REMINDER: Arming {} reminder(s) from {} event(s)",
            planned.len(),
            events.len()
        );

        for reminder in planned {
            self.arm(reminder);
        }
        self.armed.len()
    }

    pub fn armed_count(&self) -> usize {
        self.armed.len()
    }

    pub fn armed_event_ids(&self) -> Vec<String> {
        self.armed.iter().map(|r| r.event_id.clone()).collect()
    }

    fn arm(&mut self, reminder: PlannedReminder) {
        // plan_reminders guarantees a positive delay
        let delay = match reminder.delay.to_std() {
            Ok(delay) => delay,
            Err(_) => return,
        };

        let cancel = Arc::new((Mutex::new(false), Condvar::new()));
        let thread_cancel = Arc::clone(&cancel);
        let notifier = Arc::clone(&self.notifier);
        let title = reminder.title.clone();
        let body = format!("Starts {}", reminder.start.to_rfc3339());

        let handle = thread::spawn(move || {
            let (lock, condvar) = &*thread_cancel;
            let mut cancelled = lock.lock().unwrap();
            let deadline = Instant::now() + delay;

            while !*cancelled {
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                let (guard, _timed_out) = condvar.wait_timeout(cancelled, deadline - now).unwrap();
                cancelled = guard;
            }

            if *cancelled {
                return;
            }
            drop(cancelled);

            // Permission is checked at fire time, not at scheduling time
            if !notifier.permission_granted() {
                debug!(
                    "Notification permission not granted; dropping reminder '{}'",
                    title
                );
                return;
            }
            notifier.notify(&title, &body);
        });

        debug!(
            "Armed reminder for event {} firing at {}",
            reminder.event_id,
            reminder.fire_at.to_rfc3339()
        );
        self.armed.push(ArmedReminder {
            event_id: reminder.event_id,
            cancel,
            handle: Some(handle),
        });
    }

    /// Cancel and reap every armed timer
    pub fn cancel_all(&mut self) {
        for mut reminder in self.armed.drain(..) {
            {
                let (lock, condvar) = &*reminder.cancel;
                let mut cancelled = lock.lock().unwrap();
                *cancelled = true;
                condvar.notify_all();
            }
            if let Some(handle) = reminder.handle.take() {
                if handle.join().is_err() {
                    warn!("Reminder timer for event {} panicked", reminder.event_id);
                }
            }
        }
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration as StdDuration;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    struct RecordingNotifier {
        granted: bool,
        fired: StdMutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn new(granted: bool) -> Arc<Self> {
            Arc::new(Self {
                granted,
                fired: StdMutex::new(Vec::new()),
            })
        }

        fn fired_titles(&self) -> Vec<String> {
            self.fired.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn permission_granted(&self) -> bool {
            self.granted
        }

        fn notify(&self, title: &str, _body: &str) {
            self.fired.lock().unwrap().push(title.to_string());
        }
    }

    fn now() -> DateTime<Utc> {
        "2026-03-01T12:00:00Z".parse().unwrap()
    }

    fn event(id: &str, start: DateTime<Utc>, remind_minutes: Option<i64>) -> ParsedEvent {
        ParsedEvent {
            id: id.to_string(),
            category_id: "category::1".to_string(),
            title: format!("Event {}", id),
            start,
            end: None,
            remind_minutes,
            notes: String::new(),
        }
    }

    #[test]
    fn plans_a_reminder_with_the_lead_time_subtracted() {
        let t = now();
        let events = vec![event("a", t + Duration::minutes(10), Some(5))];

        let planned = plan_reminders(&events, t);
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].delay, Duration::minutes(5));
        assert_eq!(planned[0].fire_at, t + Duration::minutes(5));
    }

    #[test]
    fn past_events_are_never_armed() {
        let t = now();
        let events = vec![event("a", t - Duration::minutes(1), Some(30))];
        assert!(plan_reminders(&events, t).is_empty());
    }

    #[test]
    fn a_fire_time_of_exactly_now_is_already_due() {
        let t = now();
        let events = vec![event("a", t + Duration::minutes(5), Some(5))];
        assert!(plan_reminders(&events, t).is_empty());
    }

    #[test]
    fn events_beyond_the_horizon_are_never_armed() {
        let t = now();
        let events = vec![event("a", t + Duration::days(10), Some(60))];
        assert!(plan_reminders(&events, t).is_empty());

        // Exactly on the horizon still qualifies
        let events = vec![event("a", t + Duration::days(7), Some(0))];
        assert_eq!(plan_reminders(&events, t).len(), 1);
    }

    #[test]
    fn events_without_a_lead_time_are_skipped() {
        let t = now();
        let events = vec![event("a", t + Duration::minutes(10), None)];
        assert!(plan_reminders(&events, t).is_empty());
    }

    #[test]
    fn rearming_replaces_instead_of_accumulating() {
        let clock = Arc::new(FixedClock(now()));
        let notifier = RecordingNotifier::new(true);
        let mut scheduler = ReminderScheduler::new(clock, notifier);

        let events = vec![
            event("a", now() + Duration::hours(1), Some(5)),
            event("b", now() + Duration::hours(2), Some(5)),
            event("c", now() - Duration::hours(1), Some(5)),
        ];

        assert_eq!(scheduler.rearm(&events), 2);
        assert_eq!(scheduler.rearm(&events), 2);
        assert_eq!(scheduler.armed_count(), 2);

        let mut armed = scheduler.armed_event_ids();
        armed.sort();
        assert_eq!(armed, vec!["a".to_string(), "b".to_string()]);

        assert_eq!(scheduler.rearm(&[]), 0);
        assert_eq!(scheduler.armed_count(), 0);
    }

    #[test]
    fn fires_through_the_notifier_once_the_delay_elapses() {
        // A start just over the lead time leaves a few milliseconds of delay
        let clock = Arc::new(FixedClock(now()));
        let notifier = RecordingNotifier::new(true);
        let mut scheduler = ReminderScheduler::new(clock, notifier.clone());

        let start = now() + Duration::minutes(5) + Duration::milliseconds(30);
        let events = vec![event("a", start, Some(5))];
        assert_eq!(scheduler.rearm(&events), 1);

        let waited = Instant::now();
        while notifier.fired_titles().is_empty() {
            assert!(
                waited.elapsed() < StdDuration::from_secs(2),
                "reminder never fired"
            );
            thread::sleep(StdDuration::from_millis(5));
        }
        assert_eq!(notifier.fired_titles(), vec!["Event a".to_string()]);
    }

    #[test]
    fn denied_permission_makes_firing_a_no_op() {
        let clock = Arc::new(FixedClock(now()));
        let notifier = RecordingNotifier::new(false);
        let mut scheduler = ReminderScheduler::new(clock, notifier.clone());

        let start = now() + Duration::minutes(5) + Duration::milliseconds(20);
        scheduler.rearm(&[event("a", start, Some(5))]);

        thread::sleep(StdDuration::from_millis(200));
        assert!(notifier.fired_titles().is_empty());
    }

    #[test]
    fn cancel_all_stops_pending_timers() {
        let clock = Arc::new(FixedClock(now()));
        let notifier = RecordingNotifier::new(true);
        let mut scheduler = ReminderScheduler::new(clock, notifier.clone());

        scheduler.rearm(&[event("a", now() + Duration::hours(1), Some(5))]);
        assert_eq!(scheduler.armed_count(), 1);

        scheduler.cancel_all();
        assert_eq!(scheduler.armed_count(), 0);
        assert!(notifier.fired_titles().is_empty());
    }
}
