//! The controller, that owns the whole application state
//!
//! Every UI event is expressed as a [`Command`]. Handling a command mutates the store (which persists itself), then re-renders the whole view.

use chrono::{DateTime, Local, Utc};

use crate::category::CategoryId;
use crate::celebration::Celebration;
use crate::confirm::Confirm;
use crate::settings::Theme;
use crate::storage::KeyValueStore;
use crate::store::{Rejection, TaskKey, TaskStore};
use crate::task::{TaskDraft, TaskId};
use crate::view::{self, CategoryFilter, PriorityFilter, View, ViewMode, ViewState};


/// An owned designation of a task, see [`TaskKey`]
#[derive(Clone, Debug, PartialEq)]
pub enum Target {
    Id(TaskId),
    Text(String),
}

impl Target {
    pub fn as_key(&self) -> TaskKey<'_> {
        match self {
            Target::Id(id) => TaskKey::Id(id),
            Target::Text(text) => TaskKey::Text(text),
        }
    }
}


/// Everything the user can do
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Add(TaskDraft),
    Toggle(Target),
    Delete(Target),
    Edit(TaskId, TaskDraft),
    /// The order that results from a drag and drop
    Reorder(Vec<TaskId>),
    ClearAll,
    AddCategory { name: String, icon: String },
    DeleteCategory(CategoryId),

    Search(String),
    FilterPriority(PriorityFilter),
    FilterCategory(CategoryFilter),
    SetViewMode(ViewMode),

    SetTheme(Theme),
    SetNotifications(bool),
}


/// The application state: a task store, the transient filters, and the celebration banner
#[derive(Debug)]
pub struct App<S: KeyValueStore> {
    store: TaskStore<S>,
    view_state: ViewState,
    celebration: Celebration,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(store: TaskStore<S>) -> Self {
        Self::with_celebration(store, Celebration::new())
    }

    pub fn with_celebration(store: TaskStore<S>, mut celebration: Celebration) -> Self {
        // A list that is already complete at startup is no reason to celebrate
        let summary = view::Summary::of(store.tasks(), Local::now().naive_local());
        celebration.prime(&summary);
        Self {
            store,
            view_state: ViewState::default(),
            celebration,
        }
    }

    pub fn store(&self) -> &TaskStore<S>          { &self.store }
    pub fn store_mut(&mut self) -> &mut TaskStore<S> { &mut self.store }
    pub fn view_state(&self) -> &ViewState         { &self.view_state }

    /// Apply a command, and return the new view
    pub fn handle<C: Confirm + ?Sized>(&mut self, command: Command, confirm: &mut C) -> Result<View, Rejection> {
        self.handle_at(command, confirm, Local::now())
    }

    /// Same as [`Self::handle`], for a given point in time
    pub fn handle_at<C: Confirm + ?Sized>(&mut self, command: Command, confirm: &mut C, now: DateTime<Local>) -> Result<View, Rejection> {
        match command {
            Command::Add(draft) => { self.store.add(draft)?; },
            Command::Toggle(target) => { self.store.toggle_completion(target.as_key())?; },
            Command::Delete(target) => { self.store.delete(target.as_key(), confirm)?; },
            Command::Edit(id, draft) => self.store.edit(&id, draft)?,
            Command::Reorder(order) => self.store.reorder(&order),
            Command::ClearAll => { self.store.clear_all(confirm)?; },
            Command::AddCategory { name, icon } => { self.store.add_category(&name, &icon)?; },
            Command::DeleteCategory(id) => {
                self.store.delete_category(&id, confirm)?;
                if self.view_state.category == CategoryFilter::Only(id) {
                    self.view_state.category = CategoryFilter::All;
                }
            },

            Command::Search(query) => self.view_state.search = query,
            Command::FilterPriority(filter) => self.view_state.priority = filter,
            Command::FilterCategory(filter) => self.view_state.category = filter,
            Command::SetViewMode(mode) => self.view_state.mode = mode,

            Command::SetTheme(theme) => {
                let mut settings = self.store.settings().clone();
                settings.theme = theme;
                self.store.set_settings(settings);
            },
            Command::SetNotifications(enabled) => {
                let mut settings = self.store.settings().clone();
                settings.notifications = enabled;
                self.store.set_settings(settings);
            },
        }

        Ok(self.render_at(now))
    }

    /// Describe the current screen
    pub fn render(&mut self) -> View {
        self.render_at(Local::now())
    }

    pub fn render_at(&mut self, now: DateTime<Local>) -> View {
        let mut view = view::render(&self.store, &self.view_state, now.naive_local());
        let now = now.with_timezone(&Utc);
        self.celebration.observe(&view.summary, now);
        view.celebrating = self.celebration.is_visible(now);
        view
    }
}
