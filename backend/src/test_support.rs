//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for tests and with the `test-support` feature.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::order::UserId;
use crate::domain::ports::{Notification, Notifier, NotifierError};

/// Clock whose time only moves when told to.
///
/// # Examples
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use mockable::Clock;
/// use shipping::test_support::MutableClock;
///
/// let start = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).single().expect("valid time");
/// let clock = MutableClock::new(start);
/// clock.advance(TimeDelta::hours(2));
/// assert_eq!(clock.utc(), start + TimeDelta::hours(2));
/// ```
#[derive(Debug)]
pub struct MutableClock {
    now: Mutex<DateTime<Utc>>,
}

impl MutableClock {
    /// Clock frozen at `now`.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    fn now(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move the clock to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now() = now;
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now();
        *now += delta;
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now()
    }
}

/// Who a recorded notification was addressed to.
#[derive(Debug, Clone, PartialEq)]
pub enum Recipient {
    /// Sent to one customer.
    Customer(UserId),
    /// Sent to the admin group.
    Admins,
}

/// Notifier that keeps every notification for later assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(Recipient, Notification)>>,
}

impl RecordingNotifier {
    /// Notifier with nothing recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn sent(&self) -> MutexGuard<'_, Vec<(Recipient, Notification)>> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Everything delivered so far, in order.
    #[must_use]
    pub fn notifications(&self) -> Vec<(Recipient, Notification)> {
        self.sent().clone()
    }

    /// Notifications addressed to operators.
    #[must_use]
    pub fn admin_notifications(&self) -> Vec<Notification> {
        self.sent()
            .iter()
            .filter(|(recipient, _)| *recipient == Recipient::Admins)
            .map(|(_, notification)| notification.clone())
            .collect()
    }

    /// Notifications addressed to `user_id`.
    #[must_use]
    pub fn customer_notifications(&self, user_id: &UserId) -> Vec<Notification> {
        self.sent()
            .iter()
            .filter(|(recipient, _)| matches!(recipient, Recipient::Customer(id) if id == user_id))
            .map(|(_, notification)| notification.clone())
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        user_id: &UserId,
        notification: &Notification,
    ) -> Result<(), NotifierError> {
        self.sent()
            .push((Recipient::Customer(user_id.clone()), notification.clone()));
        Ok(())
    }

    async fn notify_admins(&self, notification: &Notification) -> Result<(), NotifierError> {
        self.sent()
            .push((Recipient::Admins, notification.clone()));
        Ok(())
    }
}
