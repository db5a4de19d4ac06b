//! Support for library configuration options

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use once_cell::sync::Lazy;

/// The storage key that holds the JSON list of tasks.
/// Feel free to override it when initing this library.
pub static TASKS_KEY: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("todoListTasks".to_string())));

/// The storage key that holds the JSON list of categories
pub static CATEGORIES_KEY: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("todoListCategories".to_string())));

/// The storage key that holds the JSON settings object (theme, etc.)
pub static SETTINGS_KEY: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("todoListSettings".to_string())));

/// Where [`FolderStore`](crate::storage::FolderStore) keeps its files when no other folder is given
pub static DATA_FOLDER: Lazy<Arc<Mutex<PathBuf>>> = Lazy::new(|| Arc::new(Mutex::new(PathBuf::from("todo_data"))));

/// How often the notification poll looks for due tasks
pub static NOTIFICATION_INTERVAL: Lazy<Arc<Mutex<Duration>>> = Lazy::new(|| Arc::new(Mutex::new(Duration::from_secs(60))));

/// How long the "all tasks done" banner stays visible
pub static CELEBRATION_DURATION: Lazy<Arc<Mutex<Duration>>> = Lazy::new(|| Arc::new(Mutex::new(Duration::from_secs(3))));


/// Read a configuration value.
///
/// A poisoned lock still holds a usable value, so this never fails.
pub fn get<T: Clone>(value: &Lazy<Arc<Mutex<T>>>) -> T {
    match value.lock() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Override a configuration value
pub fn set<T>(value: &Lazy<Arc<Mutex<T>>>, new_value: T) {
    match value.lock() {
        Ok(mut guard) => *guard = new_value,
        Err(poisoned) => *poisoned.into_inner() = new_value,
    }
}
