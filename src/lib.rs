//! This crate provides a local to-do list.
//!
//! Tasks (and, in the [`Rich`](store::Variant::Rich) variant, categories) live in a [`TaskStore`], that mirrors its content
//! to a string-keyed [`KeyValueStore`](storage::KeyValueStore) after every change.
//!
//! What should be displayed is derived from the store by the [`view`] module, that applies the transient filters (search, priority, category, "today" mode). \
//! An [`App`] ties both together: it turns user commands into store mutations, and re-renders the whole view after each of them.

pub mod config;
pub mod settings;

mod task;
pub use task::{Priority, Recurrence, Task, TaskDraft, TaskId};
mod category;
pub use category::{Category, CategoryId};

pub mod storage;
pub mod mock_behaviour;
pub mod confirm;
pub mod store;
pub use store::TaskStore;

pub mod view;
pub mod celebration;
pub mod notifications;
pub mod app;
pub use app::App;

pub mod utils;
