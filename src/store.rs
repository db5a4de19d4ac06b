//! The task store: the single owner of the tasks, the categories and the settings
//!
//! Every mutating operation writes the whole collection back to its [`KeyValueStore`] right away.
//! Write failures are logged, but the in-memory state is not rolled back: memory and storage may diverge until the next successful write.

use std::error::Error;
use std::fmt::{Display, Formatter};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::category::{Category, CategoryId};
use crate::config;
use crate::confirm::Confirm;
use crate::settings::Settings;
use crate::storage::KeyValueStore;
use crate::task::{Priority, Recurrence, Task, TaskDraft, TaskId};


/// The two flavours of to-do lists this store can manage
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// A plain checklist. Tasks are identified by their text (that must be unique), are appended at the end of the list,
    /// and have neither priority, category nor recurrence. Deletions are not confirmed.
    Simple,
    /// Tasks are identified by their id (duplicate texts are allowed), are inserted at the top of the list,
    /// and have a priority and a category. Deletions must be confirmed.
    Rich,
}


/// How an operation designates a task
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TaskKey<'a> {
    Id(&'a TaskId),
    /// The first task with exactly this text
    Text(&'a str),
}

impl<'a> From<&'a TaskId> for TaskKey<'a> {
    fn from(id: &'a TaskId) -> Self {
        TaskKey::Id(id)
    }
}

impl<'a> From<&'a str> for TaskKey<'a> {
    fn from(text: &'a str) -> Self {
        TaskKey::Text(text)
    }
}

impl<'a> TaskKey<'a> {
    fn matches(&self, task: &Task) -> bool {
        match self {
            TaskKey::Id(id) => task.id() == *id,
            TaskKey::Text(text) => task.text() == *text,
        }
    }
}


/// Why an operation has been refused.
///
/// A refused operation never changes anything. These are meant to be shown to the user.
#[derive(Clone, Debug, PartialEq)]
pub enum Rejection {
    EmptyText,
    DuplicateText(String),
    EmptyCategoryName,
    NoSuchTask,
    NoSuchCategory(CategoryId),
    CategoryNotRemovable(CategoryId),
    /// This store variant has no categories
    CategoriesUnsupported,
    /// The user did not confirm a destructive operation
    NotConfirmed,
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::EmptyText => write!(f, "Please enter a task"),
            Rejection::DuplicateText(text) => write!(f, "The task {:?} already exists", text),
            Rejection::EmptyCategoryName => write!(f, "Please enter a category name"),
            Rejection::NoSuchTask => write!(f, "No such task"),
            Rejection::NoSuchCategory(id) => write!(f, "No such category: {}", id),
            Rejection::CategoryNotRemovable(id) => write!(f, "The built-in category {} cannot be deleted", id),
            Rejection::CategoriesUnsupported => write!(f, "This list has no categories"),
            Rejection::NotConfirmed => write!(f, "Operation cancelled"),
        }
    }
}

impl Error for Rejection {}


/// The canonical list of tasks (and categories and settings), mirrored to a [`KeyValueStore`]
#[derive(Debug)]
pub struct TaskStore<S: KeyValueStore> {
    storage: S,
    variant: Variant,

    tasks: Vec<Task>,
    categories: Vec<Category>,
    settings: Settings,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Create an empty store, with the default categories. Nothing is written yet.
    pub fn new(storage: S, variant: Variant) -> Self {
        let categories = match variant {
            Variant::Simple => Vec::new(),
            Variant::Rich => Category::defaults(),
        };
        Self {
            storage,
            variant,
            tasks: Vec::new(),
            categories,
            settings: Settings::default(),
        }
    }

    /// Initialize a store from the content of its storage.
    ///
    /// This never fails: missing or invalid data is logged, and replaced by an empty list and the default categories.
    pub fn load(storage: S, variant: Variant) -> Self {
        let mut store = Self::new(storage, variant);

        if let Some(tasks) = store.read_blob::<Vec<Task>>(&config::get(&config::TASKS_KEY)) {
            store.tasks = tasks;
        }
        if let Some(settings) = store.read_blob::<Settings>(&config::get(&config::SETTINGS_KEY)) {
            store.settings = settings;
        }
        if variant == Variant::Rich {
            if let Some(categories) = store.read_blob::<Vec<Category>>(&config::get(&config::CATEGORIES_KEY)) {
                store.categories = categories;
            }
            store.restore_built_in_categories();
            store.fix_task_categories();
        }

        log::info!("Loaded {} tasks and {} categories", store.tasks.len(), store.categories.len());
        store
    }

    pub fn variant(&self) -> Variant             { self.variant }
    pub fn tasks(&self) -> &[Task]                { &self.tasks }
    pub fn categories(&self) -> &[Category]       { &self.categories }
    pub fn settings(&self) -> &Settings           { &self.settings }
    pub fn storage(&self) -> &S                   { &self.storage }
    pub fn storage_mut(&mut self) -> &mut S       { &mut self.storage }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn task<'a, K: Into<TaskKey<'a>>>(&self, key: K) -> Option<&Task> {
        let key = key.into();
        self.tasks.iter().find(|t| key.matches(t))
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id() == id)
    }

    /// Add a task built from a draft, and return its id.
    pub fn add(&mut self, draft: TaskDraft) -> Result<TaskId, Rejection> {
        let draft = self.validate_draft(draft, None)?;
        let task = Task::new(draft);
        let id = task.id().clone();
        log::debug!("Adding task {:?} ({})", task.text(), id);
        self.insert(task);
        self.save_tasks();
        Ok(id)
    }

    /// Flip the completion status of a task.
    ///
    /// Completing a recurring task of the rich variant spawns its next occurrence, whose id is returned.
    /// Checklists identify tasks by their text, so they never spawn a copy.
    pub fn toggle_completion<'a, K: Into<TaskKey<'a>>>(&mut self, key: K) -> Result<Option<TaskId>, Rejection> {
        let index = self.find_index(key.into())?;

        let task = &mut self.tasks[index];
        task.toggle_completion();
        let successor = match (self.variant, task.completed()) {
            (Variant::Rich, true) => task.next_occurrence(),
            _ => None,
        };

        let spawned = successor.map(|next| {
            let id = next.id().clone();
            log::debug!("Spawning the next occurrence of {:?} ({})", next.text(), id);
            self.insert(next);
            id
        });
        self.save_tasks();
        Ok(spawned)
    }

    /// Remove a task, and return it.
    ///
    /// The rich variant asks for a confirmation first.
    pub fn delete<'a, K, C>(&mut self, key: K, confirm: &mut C) -> Result<Task, Rejection>
    where
        K: Into<TaskKey<'a>>,
        C: Confirm + ?Sized,
    {
        let index = self.find_index(key.into())?;
        if self.variant == Variant::Rich {
            let question = format!("Delete the task {:?}?", self.tasks[index].text());
            if confirm.confirm(&question) == false {
                return Err(Rejection::NotConfirmed);
            }
        }

        let removed = self.tasks.remove(index);
        self.save_tasks();
        Ok(removed)
    }

    /// Overwrite the mutable fields of a task
    pub fn edit(&mut self, id: &TaskId, draft: TaskDraft) -> Result<(), Rejection> {
        let index = self.find_index(TaskKey::Id(id))?;
        let draft = self.validate_draft(draft, Some(index))?;
        self.tasks[index].apply(draft);
        self.save_tasks();
        Ok(())
    }

    /// Resequence the list so that it follows `order`.
    ///
    /// Unknown ids are ignored. Tasks that `order` does not mention keep their relative order, after the mentioned ones.
    pub fn reorder(&mut self, order: &[TaskId]) {
        let mut remaining: Vec<Option<Task>> = self.tasks.drain(..).map(Some).collect();
        let mut reordered = Vec::with_capacity(remaining.len());

        for id in order {
            let slot = remaining.iter_mut()
                .find(|slot| matches!(slot, Some(task) if task.id() == id));
            match slot.and_then(|slot| slot.take()) {
                Some(task) => reordered.push(task),
                None => log::debug!("Ignoring unknown task {} while reordering", id),
            }
        }
        reordered.extend(remaining.into_iter().flatten());

        self.tasks = reordered;
        self.save_tasks();
    }

    /// Remove every task, after a confirmation. Returns how many tasks have been removed
    pub fn clear_all<C: Confirm + ?Sized>(&mut self, confirm: &mut C) -> Result<usize, Rejection> {
        if self.tasks.is_empty() {
            return Ok(0);
        }
        let question = format!("Delete all {} tasks?", self.tasks.len());
        if confirm.confirm(&question) == false {
            return Err(Rejection::NotConfirmed);
        }

        let n_removed = self.tasks.len();
        self.tasks.clear();
        self.save_tasks();
        Ok(n_removed)
    }

    /// Create a user-defined category. A default icon is used if `icon` is empty
    pub fn add_category(&mut self, name: &str, icon: &str) -> Result<CategoryId, Rejection> {
        if self.variant == Variant::Simple {
            return Err(Rejection::CategoriesUnsupported);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(Rejection::EmptyCategoryName);
        }
        let icon = match icon.trim() {
            "" => "📁",
            icon => icon,
        };

        let category = Category::new(name.to_string(), icon.to_string());
        let id = category.id().clone();
        self.categories.push(category);
        self.save_categories();
        Ok(id)
    }

    /// Delete a user-defined category, after a confirmation.
    ///
    /// Its tasks are moved to the "personal" category. Returns how many tasks have been moved.
    pub fn delete_category<C: Confirm + ?Sized>(&mut self, id: &CategoryId, confirm: &mut C) -> Result<usize, Rejection> {
        let index = match self.categories.iter().position(|c| c.id() == id) {
            None => return Err(Rejection::NoSuchCategory(id.clone())),
            Some(index) => index,
        };
        if self.categories[index].removable() == false {
            return Err(Rejection::CategoryNotRemovable(id.clone()));
        }
        let question = format!("Delete the category {:?}? Its tasks will be moved to the personal category.", self.categories[index].name());
        if confirm.confirm(&question) == false {
            return Err(Rejection::NotConfirmed);
        }

        let mut n_moved = 0;
        for task in self.tasks.iter_mut().filter(|t| t.category() == Some(id)) {
            task.set_category(CategoryId::personal());
            n_moved += 1;
        }
        self.categories.remove(index);

        self.save_tasks();
        self.save_categories();
        Ok(n_moved)
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.save_settings();
    }


    fn find_index(&self, key: TaskKey) -> Result<usize, Rejection> {
        self.tasks.iter()
            .position(|t| key.matches(t))
            .ok_or(Rejection::NoSuchTask)
    }

    fn insert(&mut self, task: Task) {
        match self.variant {
            Variant::Simple => self.tasks.push(task),
            Variant::Rich => self.tasks.insert(0, task),
        }
    }

    /// Check a draft for a new task (or for the task at `editing`), and fill in the variant's defaults
    fn validate_draft(&self, mut draft: TaskDraft, editing: Option<usize>) -> Result<TaskDraft, Rejection> {
        let text = draft.trimmed_text();
        if text.is_empty() {
            return Err(Rejection::EmptyText);
        }

        match self.variant {
            Variant::Simple => {
                let duplicate = self.tasks.iter()
                    .enumerate()
                    .any(|(i, t)| Some(i) != editing && t.text() == text);
                if duplicate {
                    return Err(Rejection::DuplicateText(text.to_string()));
                }
                draft.priority = None;
                draft.category = None;
                draft.recurrence = Recurrence::None;
            },
            Variant::Rich => {
                let category = draft.category.take().unwrap_or_else(CategoryId::personal);
                if self.category(&category).is_none() {
                    return Err(Rejection::NoSuchCategory(category));
                }
                draft.category = Some(category);
                draft.priority = Some(draft.priority.unwrap_or_default());
            },
        }
        Ok(draft)
    }

    /// Built-in categories may have been lost from a hand-edited data file
    fn restore_built_in_categories(&mut self) {
        for (position, built_in) in Category::defaults().into_iter().enumerate() {
            if self.category(built_in.id()).is_none() {
                log::warn!("Restoring the missing built-in category {}", built_in.id());
                let position = position.min(self.categories.len());
                self.categories.insert(position, built_in);
            }
        }
    }

    /// Make sure every task has a priority and references an existing category
    fn fix_task_categories(&mut self) {
        let known: Vec<CategoryId> = self.categories.iter().map(|c| c.id().clone()).collect();
        for task in self.tasks.iter_mut() {
            let dangling = match task.category() {
                None => true,
                Some(id) => known.contains(id) == false,
            };
            if dangling {
                log::warn!("Task {:?} has no valid category. Moving it to the personal category", task.text());
                task.set_category(CategoryId::personal());
            }
            if task.priority().is_none() {
                task.set_priority(Priority::default());
            }
        }
    }

    fn read_blob<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let content = match self.storage.get(key) {
            Err(err) => {
                log::warn!("Unable to read {:?}: {}. Using default values", key, err);
                return None;
            },
            Ok(None) => return None,
            Ok(Some(content)) => content,
        };

        match serde_json::from_str(&content) {
            Err(err) => {
                log::warn!("Invalid content for {:?}: {}. Using default values", key, err);
                None
            },
            Ok(value) => Some(value),
        }
    }

    fn write_blob<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let content = match serde_json::to_string(value) {
            Err(err) => {
                log::warn!("Unable to serialize {:?}: {}", key, err);
                return;
            },
            Ok(content) => content,
        };

        if let Err(err) = self.storage.set(key, &content) {
            log::warn!("Unable to save {:?}: {}", key, err);
        }
    }

    fn save_tasks(&mut self) {
        let tasks = std::mem::take(&mut self.tasks);
        self.write_blob(&config::get(&config::TASKS_KEY), &tasks);
        self.tasks = tasks;
    }

    fn save_categories(&mut self) {
        let categories = std::mem::take(&mut self.categories);
        self.write_blob(&config::get(&config::CATEGORIES_KEY), &categories);
        self.categories = categories;
    }

    fn save_settings(&mut self) {
        let settings = self.settings.clone();
        self.write_blob(&config::get(&config::SETTINGS_KEY), &settings);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use crate::confirm::{AlwaysConfirm, NeverConfirm};
    use crate::mock_behaviour::MockBehaviour;
    use crate::storage::MemoryStore;

    fn texts<S: KeyValueStore>(store: &TaskStore<S>) -> Vec<&str> {
        store.tasks().iter().map(|t| t.text()).collect()
    }

    #[test]
    fn simple_variant_appends_and_rejects_duplicates() {
        let mut store = TaskStore::new(MemoryStore::new(), Variant::Simple);
        store.add(TaskDraft::new("coder")).unwrap();
        store.add(TaskDraft::new("lire")).unwrap();
        assert_eq!(store.add(TaskDraft::new("coder")), Err(Rejection::DuplicateText("coder".to_string())));
        assert_eq!(store.add(TaskDraft::new("  coder ")), Err(Rejection::DuplicateText("coder".to_string())));
        assert_eq!(store.add(TaskDraft::new("   ")), Err(Rejection::EmptyText));
        assert_eq!(texts(&store), vec!["coder", "lire"]);
        assert!(store.categories().is_empty());
        assert_eq!(store.tasks()[0].priority(), None);
        assert_eq!(store.tasks()[0].category(), None);
    }

    #[test]
    fn rich_variant_prepends_and_allows_duplicates() {
        let mut store = TaskStore::new(MemoryStore::new(), Variant::Rich);
        let first = store.add(TaskDraft::new("Report")).unwrap();
        let second = store.add(TaskDraft::new("Report")).unwrap();
        assert_ne!(first, second);
        assert_eq!(store.tasks()[0].id(), &second);
        assert_eq!(store.tasks()[1].id(), &first);
        assert_eq!(store.tasks()[0].priority(), Some(Priority::Medium));
        assert_eq!(store.tasks()[0].category(), Some(&CategoryId::personal()));

        let unknown = CategoryId::from("nope");
        assert_eq!(store.add(TaskDraft::new("x").with_category(unknown.clone())), Err(Rejection::NoSuchCategory(unknown)));
        assert_eq!(store.tasks().len(), 2);
    }

    #[test]
    fn add_persists_immediately() {
        let mut store = TaskStore::new(MemoryStore::new(), Variant::Simple);
        store.add(TaskDraft::new("sport")).unwrap();
        let raw = store.storage().peek("todoListTasks").unwrap();
        let persisted: Vec<Task> = serde_json::from_str(raw).unwrap();
        assert_eq!(persisted, store.tasks());
    }

    #[test]
    fn toggle_by_text() {
        let mut store = TaskStore::new(MemoryStore::new(), Variant::Simple);
        store.add(TaskDraft::new("dormir")).unwrap();
        assert_eq!(store.toggle_completion("dormir"), Ok(None));
        assert!(store.task("dormir").unwrap().completed());
        assert_eq!(store.toggle_completion("manger"), Err(Rejection::NoSuchTask));
    }

    #[test]
    fn completing_a_recurring_task() {
        let mut store = TaskStore::new(MemoryStore::new(), Variant::Rich);
        let draft = TaskDraft::new("Weekly review")
            .with_due_date("2024-01-01".parse().unwrap())
            .with_recurrence(Recurrence::Weekly);
        let id = store.add(draft).unwrap();

        let spawned = store.toggle_completion(&id).unwrap().unwrap();
        assert_eq!(store.tasks().len(), 2);
        assert_eq!(store.tasks()[0].id(), &spawned);
        assert_eq!(store.tasks()[0].due_date(), Some("2024-01-08".parse().unwrap()));
        assert_eq!(store.tasks()[0].completed(), false);

        // Un-completing does not spawn anything, and neither does completing again a second time
        assert_eq!(store.toggle_completion(&id), Ok(None));
        assert_eq!(store.tasks().len(), 2);
    }

    #[test]
    fn recurring_task_in_a_checklist_does_not_spawn() {
        let mut storage = MemoryStore::new();
        storage.set("todoListTasks", r#"[{"id":"1","text":"Water the plants","dueDate":"2024-01-01","recurrence":"weekly"}]"#).unwrap();
        let mut store = TaskStore::load(storage, Variant::Simple);

        assert_eq!(store.toggle_completion("Water the plants"), Ok(None));
        assert_eq!(texts(&store), vec!["Water the plants"]);
        assert!(store.task("Water the plants").unwrap().completed());
    }

    #[test]
    fn delete_by_id_keeps_the_relative_order() {
        let mut store = TaskStore::new(MemoryStore::new(), Variant::Rich);
        store.add(TaskDraft::new("a")).unwrap();
        let b = store.add(TaskDraft::new("b")).unwrap();
        store.add(TaskDraft::new("c")).unwrap();
        store.add(TaskDraft::new("d")).unwrap();
        assert_eq!(texts(&store), vec!["d", "c", "b", "a"]);

        let removed = store.delete(&b, &mut AlwaysConfirm).unwrap();
        assert_eq!(removed.text(), "b");
        assert_eq!(texts(&store), vec!["d", "c", "a"]);

        let reloaded = TaskStore::load(store.into_storage(), Variant::Rich);
        assert_eq!(texts(&reloaded), vec!["d", "c", "a"]);
    }

    #[test]
    fn delete_requires_confirmation_in_rich_variant() {
        let mut store = TaskStore::new(MemoryStore::new(), Variant::Rich);
        let id = store.add(TaskDraft::new("a")).unwrap();
        assert_eq!(store.delete(&id, &mut NeverConfirm), Err(Rejection::NotConfirmed));
        assert_eq!(store.tasks().len(), 1);
        let removed = store.delete(&id, &mut AlwaysConfirm).unwrap();
        assert_eq!(removed.id(), &id);
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn delete_without_confirmation_in_simple_variant() {
        let mut store = TaskStore::new(MemoryStore::new(), Variant::Simple);
        store.add(TaskDraft::new("a")).unwrap();
        store.add(TaskDraft::new("b")).unwrap();
        store.add(TaskDraft::new("c")).unwrap();
        store.delete("b", &mut NeverConfirm).unwrap();
        assert_eq!(texts(&store), vec!["a", "c"]);
    }

    #[test]
    fn edit_in_place() {
        let mut store = TaskStore::new(MemoryStore::new(), Variant::Rich);
        let id = store.add(TaskDraft::new("draft")).unwrap();
        store.toggle_completion(&id).unwrap();

        let draft = TaskDraft::new("Final report")
            .with_priority(Priority::High)
            .with_category(CategoryId::from("work"));
        store.edit(&id, draft).unwrap();
        let task = store.task(&id).unwrap();
        assert_eq!(task.text(), "Final report");
        assert_eq!(task.priority(), Some(Priority::High));
        assert_eq!(task.category(), Some(&CategoryId::from("work")));
        assert!(task.completed());

        assert_eq!(store.edit(&id, TaskDraft::new("")), Err(Rejection::EmptyText));
        assert_eq!(store.edit(&TaskId::random(), TaskDraft::new("x")), Err(Rejection::NoSuchTask));
    }

    #[test]
    fn edit_keeps_its_own_text_in_simple_variant() {
        let mut store = TaskStore::new(MemoryStore::new(), Variant::Simple);
        let a = store.add(TaskDraft::new("a")).unwrap();
        store.add(TaskDraft::new("b")).unwrap();
        assert!(store.edit(&a, TaskDraft::new("a")).is_ok());
        assert_eq!(store.edit(&a, TaskDraft::new("b")), Err(Rejection::DuplicateText("b".to_string())));
    }

    #[test]
    fn reorder() {
        let mut store = TaskStore::new(MemoryStore::new(), Variant::Simple);
        let a = store.add(TaskDraft::new("a")).unwrap();
        let b = store.add(TaskDraft::new("b")).unwrap();
        let c = store.add(TaskDraft::new("c")).unwrap();
        let d = store.add(TaskDraft::new("d")).unwrap();

        store.reorder(&[c.clone(), TaskId::random(), a.clone(), c]);
        assert_eq!(texts(&store), vec!["c", "a", "b", "d"]);

        store.reorder(&[d, b]);
        assert_eq!(texts(&store), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn clear_all() {
        let mut store = TaskStore::new(MemoryStore::new(), Variant::Rich);
        assert_eq!(store.clear_all(&mut NeverConfirm), Ok(0));
        store.add(TaskDraft::new("a")).unwrap();
        store.add(TaskDraft::new("b")).unwrap();
        assert_eq!(store.clear_all(&mut NeverConfirm), Err(Rejection::NotConfirmed));
        assert_eq!(store.tasks().len(), 2);
        let mut asked = 0;
        let mut confirm = |_: &str| { asked += 1; true };
        assert_eq!(store.clear_all(&mut confirm), Ok(2));
        assert!(store.tasks().is_empty());
        assert_eq!(asked, 1);
    }

    #[test]
    fn categories() {
        let mut store = TaskStore::new(MemoryStore::new(), Variant::Rich);
        assert_eq!(store.add_category("  ", "x"), Err(Rejection::EmptyCategoryName));
        let home = store.add_category("Home", "").unwrap();
        assert_eq!(store.category(&home).unwrap().icon(), "📁");

        let kept = store.add(TaskDraft::new("Work task").with_category(CategoryId::from("work"))).unwrap();
        let moved = store.add(TaskDraft::new("Clean").with_category(home.clone())).unwrap();

        assert_eq!(store.delete_category(&CategoryId::from("work"), &mut AlwaysConfirm),
                   Err(Rejection::CategoryNotRemovable(CategoryId::from("work"))));
        assert_eq!(store.delete_category(&home, &mut NeverConfirm), Err(Rejection::NotConfirmed));
        assert!(store.category(&home).is_some());

        assert_eq!(store.delete_category(&home, &mut AlwaysConfirm), Ok(1));
        assert!(store.category(&home).is_none());
        assert_eq!(store.task(&moved).unwrap().category(), Some(&CategoryId::personal()));
        assert_eq!(store.task(&kept).unwrap().category(), Some(&CategoryId::from("work")));
        assert_eq!(store.delete_category(&home, &mut AlwaysConfirm), Err(Rejection::NoSuchCategory(home)));
    }

    #[test]
    fn simple_variant_has_no_categories() {
        let mut store = TaskStore::new(MemoryStore::new(), Variant::Simple);
        assert_eq!(store.add_category("Home", "🏠"), Err(Rejection::CategoriesUnsupported));
    }

    #[test]
    fn load_from_garbage() {
        let mut storage = MemoryStore::new();
        storage.set("todoListTasks", "{not json").unwrap();
        storage.set("todoListCategories", "42").unwrap();
        let store = TaskStore::load(storage, Variant::Rich);
        assert!(store.tasks().is_empty());
        assert_eq!(store.categories(), Category::defaults().as_slice());
        assert_eq!(store.settings(), &Settings::default());
    }

    #[test]
    fn load_with_unreadable_storage() {
        let storage = MemoryStore::with_mock_behaviour(MockBehaviour::fail_now(10));
        let store = TaskStore::load(storage, Variant::Rich);
        assert!(store.tasks().is_empty());
        assert_eq!(store.categories().len(), 3);
    }

    #[test]
    fn load_fixes_dangling_categories() {
        let mut storage = MemoryStore::new();
        storage.set("todoListTasks", r#"[{"id":"1","text":"orphan","category":"gone"},{"id":"2","text":"legacy"}]"#).unwrap();
        storage.set("todoListCategories", r#"[{"id":"work","name":"Work","icon":"💼","removable":false}]"#).unwrap();
        let store = TaskStore::load(storage, Variant::Rich);

        assert_eq!(store.categories().len(), 3);
        for task in store.tasks() {
            assert_eq!(task.category(), Some(&CategoryId::personal()));
            assert_eq!(task.priority(), Some(Priority::Medium));
        }
    }

    #[test]
    fn write_failures_are_not_rolled_back() {
        let storage = MemoryStore::with_mock_behaviour(MockBehaviour::fail_writes_after(1, 1));
        let mut store = TaskStore::new(storage, Variant::Simple);
        store.add(TaskDraft::new("a")).unwrap();
        store.add(TaskDraft::new("b")).unwrap();

        assert_eq!(store.tasks().len(), 2);
        let persisted: Vec<Task> = serde_json::from_str(store.storage().peek("todoListTasks").unwrap()).unwrap();
        assert_eq!(persisted.len(), 1);

        // The next successful write catches up
        store.add(TaskDraft::new("c")).unwrap();
        let persisted: Vec<Task> = serde_json::from_str(store.storage().peek("todoListTasks").unwrap()).unwrap();
        assert_eq!(persisted, store.tasks());
    }

    #[test]
    fn storage_failures_can_be_injected_later() {
        let mut store = TaskStore::new(MemoryStore::with_mock_behaviour(MockBehaviour::new()), Variant::Simple);
        store.add(TaskDraft::new("a")).unwrap();

        if let Some(behaviour) = store.storage_mut().mock_behaviour_mut() {
            behaviour.set_behaviour = (0, 1);
        }
        store.add(TaskDraft::new("b")).unwrap();
        assert_eq!(store.tasks().len(), 2);
        let persisted: Vec<Task> = serde_json::from_str(store.storage().peek("todoListTasks").unwrap()).unwrap();
        assert_eq!(persisted.len(), 1);
    }
}
