//! The view projector: derives what should be displayed from the store and the transient filters
//!
//! Nothing in here has side effects. The whole view is re-derived after every mutation.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};

use crate::category::CategoryId;
use crate::settings::Theme;
use crate::storage::KeyValueStore;
use crate::store::TaskStore;
use crate::task::{Priority, Task, TaskId};


#[derive(Clone, Debug, PartialEq)]
pub enum PriorityFilter {
    All,
    Only(Priority),
}

impl Default for PriorityFilter {
    fn default() -> Self {
        PriorityFilter::All
    }
}

impl FromStr for PriorityFilter {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(PriorityFilter::All),
            other => Ok(PriorityFilter::Only(other.parse()?)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CategoryFilter {
    All,
    Only(CategoryId),
}

impl Default for CategoryFilter {
    fn default() -> Self {
        CategoryFilter::All
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        match s {
            "all" => CategoryFilter::All,
            id => CategoryFilter::Only(CategoryId::from(id)),
        }
    }
}

/// A display dimension, independent from the priority and category filters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    /// Every task
    List,
    /// Only the tasks due today
    Today,
}

impl Default for ViewMode {
    fn default() -> Self {
        ViewMode::List
    }
}


/// The transient UI state. This is never persisted
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    pub search: String,
    pub priority: PriorityFilter,
    pub category: CategoryFilter,
    pub mode: ViewMode,
}

impl ViewState {
    fn accepts(&self, task: &Task, today: NaiveDate, lowercase_search: &str) -> bool {
        if lowercase_search.is_empty() == false && task.text().to_lowercase().contains(lowercase_search) == false {
            return false;
        }
        if let PriorityFilter::Only(priority) = &self.priority {
            if task.priority() != Some(*priority) {
                return false;
            }
        }
        if let CategoryFilter::Only(category) = &self.category {
            if task.category() != Some(category) {
                return false;
            }
        }
        match self.mode {
            ViewMode::List => true,
            ViewMode::Today => task.is_due_on(today),
        }
    }
}


/// The tasks that pass every filter of `state`, in list order
pub fn project<'t>(tasks: &'t [Task], state: &ViewState, today: NaiveDate) -> Vec<&'t Task> {
    let search = state.search.to_lowercase();
    tasks.iter()
        .filter(|task| state.accepts(task, today, &search))
        .collect()
}

/// Whether an uncompleted task is due strictly before `now`.
///
/// A due date stands for the very start of its day, so a task due today is overdue as soon as the day has begun.
pub fn is_overdue(task: &Task, now: NaiveDateTime) -> bool {
    match task.due_date().and_then(|due| due.and_hms_opt(0, 0, 0)) {
        None => false,
        Some(due) => task.completed() == false && due < now,
    }
}


/// Counters computed over the whole (unfiltered) list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub due_today: usize,
    pub overdue: usize,
}

impl Summary {
    pub fn of(tasks: &[Task], now: NaiveDateTime) -> Self {
        let today = now.date();
        let mut summary = Summary { total: tasks.len(), ..Summary::default() };
        for task in tasks {
            if task.completed() { summary.completed += 1; }
            if task.is_due_on(today) { summary.due_today += 1; }
            if is_overdue(task, now) { summary.overdue += 1; }
        }
        summary
    }

    /// There is at least a task, and every task is completed
    pub fn all_done(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}


/// Pick an emoji that illustrates a task, based on keywords of its text
pub fn task_icon(text: &str) -> &'static str {
    const RULES: &[(&[&str], &str)] = &[
        (&["coder", "code", "dev"], "💻"),
        (&["sport", "exercice", "courir", "run", "gym"], "🏃"),
        (&["manger", "courses", "cuisine", "cook", "grocer"], "🍔"),
        (&["dormir", "sleep"], "😴"),
        (&["livre", "lire", "book", "read"], "📚"),
        (&["réunion", "email", "meeting"], "📧"),
    ];

    let text = text.to_lowercase();
    RULES.iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, icon)| *icon)
        .unwrap_or("📌")
}


/// One line of the task list, as it should be displayed
#[derive(Clone, Debug, PartialEq)]
pub struct TaskRow {
    pub id: TaskId,
    pub icon: &'static str,
    pub text: String,
    pub completed: bool,
    pub overdue: bool,
    pub priority: Option<Priority>,
    pub category_icon: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// A description of the whole screen
#[derive(Clone, Debug, PartialEq)]
pub struct View {
    pub rows: Vec<TaskRow>,
    pub summary: Summary,
    pub theme: Theme,
    /// Whether the "all done" banner is displayed. This is driven by a [`Celebration`](crate::celebration::Celebration), `render` never sets it
    pub celebrating: bool,
}

impl View {
    pub fn all_done(&self) -> bool {
        self.summary.all_done()
    }
}

/// Describe what should be displayed for `store`, given the transient `state`
pub fn render<S: KeyValueStore>(store: &TaskStore<S>, state: &ViewState, now: NaiveDateTime) -> View {
    let today = now.date();
    let rows = project(store.tasks(), state, today)
        .into_iter()
        .map(|task| TaskRow {
            id: task.id().clone(),
            icon: task_icon(task.text()),
            text: task.text().to_string(),
            completed: task.completed(),
            overdue: is_overdue(task, now),
            priority: task.priority(),
            category_icon: task.category()
                .and_then(|id| store.category(id))
                .map(|c| c.icon().to_string()),
            due_date: task.due_date(),
        })
        .collect();

    View {
        rows,
        summary: Summary::of(store.tasks(), now),
        theme: store.settings().theme,
        celebrating: false,
    }
}
