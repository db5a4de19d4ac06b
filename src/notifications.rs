//! Reminders about tasks that are due
//!
//! A [`poll`] runs in the background, and periodically looks for tasks that are due today or overdue.

use std::collections::HashSet;
use std::fmt::{Display, Error, Formatter};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{Local, NaiveDateTime};

use crate::app::App;
use crate::storage::KeyValueStore;
use crate::task::{Task, TaskId};
use crate::view::is_overdue;


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Urgency {
    DueToday,
    Overdue,
}

/// A reminder about a single task
#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub task_id: TaskId,
    pub text: String,
    pub urgency: Urgency,
}

impl Display for Notification {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self.urgency {
            Urgency::DueToday => write!(f, "Due today: {}", self.text),
            Urgency::Overdue => write!(f, "Overdue: {}", self.text),
        }
    }
}


/// See [`notification_channel`]
pub type NotificationSender = tokio::sync::mpsc::UnboundedSender<Notification>;
/// See [`notification_channel`]
pub type NotificationReceiver = tokio::sync::mpsc::UnboundedReceiver<Notification>;

/// Create a channel, that [`poll`] uses to deliver its notifications
pub fn notification_channel() -> (NotificationSender, NotificationReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}


/// Remembers which tasks have already been notified during this session
#[derive(Clone, Debug, Default)]
pub struct NotificationChecker {
    already_notified: HashSet<TaskId>,
}

impl NotificationChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The notifications for the uncompleted tasks that are due today or overdue, and that have not been notified yet
    pub fn check(&mut self, tasks: &[Task], now: NaiveDateTime) -> Vec<Notification> {
        let mut notifications = Vec::new();
        for task in tasks.iter().filter(|t| t.completed() == false) {
            // Tasks due today are overdue too, but "due today" is the more useful reminder
            let urgency = if task.is_due_on(now.date()) {
                Urgency::DueToday
            } else if is_overdue(task, now) {
                Urgency::Overdue
            } else {
                continue;
            };

            if self.already_notified.insert(task.id().clone()) {
                notifications.push(Notification {
                    task_id: task.id().clone(),
                    text: task.text().to_string(),
                    urgency,
                });
            }
        }
        notifications
    }
}


/// Look for due tasks every `interval`, and send a notification for each of them.
///
/// Nothing is sent while notifications are disabled in the settings. This returns once the receiving end of the channel is closed.
pub async fn poll<S>(app: Arc<Mutex<App<S>>>, sender: NotificationSender, interval: Duration)
where
    S: KeyValueStore,
{
    let mut checker = NotificationChecker::new();
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;
        if sender.is_closed() {
            log::debug!("Nobody listens to notifications anymore. Stopping the poll");
            return;
        }

        let notifications = {
            let app = match app.lock() {
                Ok(app) => app,
                Err(poisoned) => poisoned.into_inner(),
            };
            if app.store().settings().notifications == false {
                continue;
            }
            checker.check(app.store().tasks(), Local::now().naive_local())
        };

        for notification in notifications {
            log::info!("{}", notification);
            if sender.send(notification).is_err() {
                return;
            }
        }
    }
}
