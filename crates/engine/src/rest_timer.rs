use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Countdown between two phases.
///
/// While running, the remaining time is derived from a wall-clock target, so missed ticks do not
/// skew the countdown.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "TimerView")]
pub struct RestTimer {
    total_seconds: u32,
    remaining_milliseconds: i64,
    target_time: Option<DateTime<Utc>>,
}

impl RestTimer {
    #[must_use]
    pub fn new(total_seconds: u32) -> Self {
        Self {
            total_seconds,
            remaining_milliseconds: i64::from(total_seconds) * 1000,
            target_time: None,
        }
    }

    #[must_use]
    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    /// Remaining time rounded up to whole seconds.
    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        u32::try_from((self.remaining_milliseconds + 999) / 1000).unwrap_or(0)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.target_time.is_some()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.remaining_milliseconds <= 0
    }

    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.is_finished() || self.is_running() {
            return;
        }
        self.target_time = Some(now + Duration::milliseconds(self.remaining_milliseconds));
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        self.update(now);
        self.target_time = None;
    }

    pub fn resume(&mut self, now: DateTime<Utc>) {
        self.start(now);
    }

    /// Recomputes the remaining time and returns it in whole seconds.
    pub fn update(&mut self, now: DateTime<Utc>) -> u32 {
        if let Some(target_time) = self.target_time {
            self.remaining_milliseconds = target_time
                .signed_duration_since(now)
                .num_milliseconds()
                .max(0);
            if self.is_finished() {
                self.target_time = None;
            }
        }
        self.remaining_seconds()
    }

    pub fn stop(&mut self) {
        self.remaining_milliseconds = 0;
        self.target_time = None;
    }
}

/// Serialized form of a [`RestTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerView {
    pub total_seconds: u32,
    pub remaining_seconds: u32,
    pub is_running: bool,
}

impl From<RestTimer> for TimerView {
    fn from(timer: RestTimer) -> Self {
        Self {
            total_seconds: timer.total_seconds(),
            remaining_seconds: timer.remaining_seconds(),
            is_running: timer.is_running(),
        }
    }
}
