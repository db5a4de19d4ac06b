//! The ephemeral "all tasks done" banner

use chrono::{DateTime, Duration, Utc};

use crate::config;
use crate::view::Summary;


#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CelebrationState {
    Idle,
    Showing { since: DateTime<Utc> },
}

/// Shows a banner when the last remaining task gets completed, and hides it after a while
#[derive(Clone, Debug)]
pub struct Celebration {
    state: CelebrationState,
    duration: Duration,
    /// Whether every task was completed at the previous observation
    was_all_done: bool,
}

impl Celebration {
    /// Use the duration set in [`config::CELEBRATION_DURATION`]
    pub fn new() -> Self {
        let duration = Duration::from_std(config::get(&config::CELEBRATION_DURATION))
            .unwrap_or_else(|_| Duration::seconds(3));
        Self::with_duration(duration)
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self {
            state: CelebrationState::Idle,
            duration,
            was_all_done: false,
        }
    }

    pub fn state(&self) -> CelebrationState {
        self.state
    }

    /// Record the current counters without celebrating, e.g. at startup
    pub fn prime(&mut self, summary: &Summary) {
        self.was_all_done = summary.all_done();
    }

    /// Feed the latest counters. Returns whether the banner has just been triggered
    pub fn observe(&mut self, summary: &Summary, now: DateTime<Utc>) -> bool {
        self.expire(now);

        let all_done = summary.all_done();
        let triggered = all_done && self.was_all_done == false;
        self.was_all_done = all_done;

        if triggered {
            log::info!("All {} tasks are done!", summary.total);
            self.state = CelebrationState::Showing { since: now };
        }
        triggered
    }

    /// Whether the banner should be displayed at `now`
    pub fn is_visible(&mut self, now: DateTime<Utc>) -> bool {
        self.expire(now);
        matches!(self.state, CelebrationState::Showing { .. })
    }

    fn expire(&mut self, now: DateTime<Utc>) {
        if let CelebrationState::Showing { since } = self.state {
            if now - since >= self.duration {
                self.state = CelebrationState::Idle;
            }
        }
    }
}

impl Default for Celebration {
    fn default() -> Self {
        Self::new()
    }
}
