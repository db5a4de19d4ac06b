//! To-do tasks

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;
use chrono::{DateTime, Duration, Months, NaiveDate, Utc};

use crate::category::CategoryId;


/// How important a task is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl FromStr for Priority {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("Unknown priority {:?} (expected low, medium or high)", other)),
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}


/// Whether completing a task spawns a successor, and how far its due date is pushed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    None,
    Daily,
    Weekly,
    Monthly,
}

impl Default for Recurrence {
    fn default() -> Self {
        Recurrence::None
    }
}

impl Recurrence {
    pub fn is_recurring(&self) -> bool {
        *self != Recurrence::None
    }

    /// Push a date by one period of this recurrence.
    ///
    /// Monthly recurrences keep the day of month, clamped to the last day of shorter months (Jan 31 becomes Feb 28 or 29).
    /// Returns `None` for [`Recurrence::None`], or if the result does not fit in a `NaiveDate`.
    pub fn advance(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Recurrence::None => None,
            Recurrence::Daily => date.checked_add_signed(Duration::days(1)),
            Recurrence::Weekly => date.checked_add_signed(Duration::weeks(1)),
            Recurrence::Monthly => date.checked_add_months(Months::new(1)),
        }
    }
}

impl FromStr for Recurrence {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Recurrence::None),
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            "monthly" => Ok(Recurrence::Monthly),
            other => Err(format!("Unknown recurrence {:?} (expected none, daily, weekly or monthly)", other)),
        }
    }
}


/// The identity of a task.
///
/// It is only required to be unique among the tasks of a store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TaskId {
    content: String,
}

impl TaskId {
    /// Generate a random TaskId.
    pub fn random() -> Self {
        let random = Uuid::new_v4().to_hyphenated().to_string();
        Self { content: random }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self { content: s.to_string() }
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}

/// Used to support serde
impl Serialize for TaskId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.content)
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<TaskId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let content = String::deserialize(deserializer)?;
        Ok(TaskId{ content })
    }
}


/// The user-supplied fields of a task, used both to create and to edit one
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskDraft {
    pub text: String,
    pub priority: Option<Priority>,
    pub category: Option<CategoryId>,
    pub due_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub estimated_time: Option<String>,
    pub recurrence: Recurrence,
}

impl TaskDraft {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    /// The text, as it will be stored
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }
}


/// A to-do task
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Older data files only identified tasks by their text. Such tasks get a fresh id when loaded.
    #[serde(default = "TaskId::random")]
    id: TaskId,

    /// The display text of the task
    text: String,
    #[serde(default)]
    completed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<CategoryId>,
    /// Calendar day this task is due
    #[serde(default, skip_serializing_if = "Option::is_none")]
    due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    estimated_time: Option<String>,
    #[serde(default)]
    recurrence: Recurrence,

    /// The time this task was created. This is informational only
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
}


impl Task {
    /// Create a brand new, uncompleted Task.
    /// This will pick a new (random) task ID.
    ///
    /// The text is trimmed, but not validated: see [`TaskStore::add`](crate::store::TaskStore::add) for this.
    pub fn new(draft: TaskDraft) -> Self {
        Self {
            id: TaskId::random(),
            text: draft.trimmed_text().to_string(),
            completed: false,
            priority: draft.priority,
            category: draft.category,
            due_date: draft.due_date,
            description: draft.description,
            estimated_time: draft.estimated_time,
            recurrence: draft.recurrence,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &TaskId     { &self.id          }
    pub fn text(&self) -> &str      { &self.text        }
    pub fn completed(&self) -> bool { self.completed    }
    pub fn priority(&self) -> Option<Priority>        { self.priority }
    pub fn category(&self) -> Option<&CategoryId>     { self.category.as_ref() }
    pub fn due_date(&self) -> Option<NaiveDate>       { self.due_date }
    pub fn description(&self) -> Option<&str>         { self.description.as_deref() }
    pub fn estimated_time(&self) -> Option<&str>      { self.estimated_time.as_deref() }
    pub fn recurrence(&self) -> Recurrence            { self.recurrence }
    pub fn created_at(&self) -> &DateTime<Utc>        { &self.created_at }

    pub fn is_due_on(&self, day: NaiveDate) -> bool {
        self.due_date == Some(day)
    }

    /// Flip the completion status. Toggling twice is a no-op.
    pub fn toggle_completion(&mut self) {
        self.completed = !self.completed;
    }

    pub fn set_category(&mut self, category: CategoryId) {
        self.category = Some(category);
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = Some(priority);
    }

    /// Overwrite every mutable field with the content of a draft.
    /// Identity, completion status and creation date are kept.
    pub fn apply(&mut self, draft: TaskDraft) {
        self.text = draft.trimmed_text().to_string();
        self.priority = draft.priority;
        self.category = draft.category;
        self.due_date = draft.due_date;
        self.description = draft.description;
        self.estimated_time = draft.estimated_time;
        self.recurrence = draft.recurrence;
    }

    /// The task that replaces this one once it is completed, if it recurs.
    ///
    /// Every field is copied, except the id, the creation date, the completion status (reset) and the due date (advanced).
    pub fn next_occurrence(&self) -> Option<Task> {
        if self.recurrence.is_recurring() == false {
            return None;
        }

        let due_date = match self.due_date {
            None => None,
            Some(date) => match self.recurrence.advance(date) {
                Some(next) => Some(next),
                None => {
                    log::warn!("Unable to compute the next due date of {:?} after {}", self.text, date);
                    return None;
                }
            },
        };

        Some(Task {
            id: TaskId::random(),
            completed: false,
            due_date,
            created_at: Utc::now(),
            ..self.clone()
        })
    }

    #[cfg(test)]
    pub(crate) fn has_same_observable_content_as(&self, other: &Task) -> bool {
           self.text == other.text
        && self.completed == other.completed
        && self.priority == other.priority
        && self.category == other.category
        && self.due_date == other.due_date
        && self.description == other.description
        && self.estimated_time == other.estimated_time
        && self.recurrence == other.recurrence
    }
}
