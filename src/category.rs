//! Categories that partition tasks

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;


/// The identity of a category
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId {
    content: String,
}

impl CategoryId {
    /// Generate a random CategoryId.
    pub fn random() -> Self {
        let random = Uuid::new_v4().to_hyphenated().to_string();
        Self { content: random }
    }

    /// The category that tasks fall back to
    pub fn personal() -> Self {
        Self::from("personal")
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<&str> for CategoryId {
    fn from(s: &str) -> Self {
        Self { content: s.to_string() }
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}


/// A label that partitions tasks
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    name: String,
    /// A display glyph
    icon: String,
    /// Built-in categories cannot be deleted
    removable: bool,
}

impl Category {
    /// Create a new, user-defined (hence removable) category
    pub fn new(name: String, icon: String) -> Self {
        Self {
            id: CategoryId::random(),
            name,
            icon,
            removable: true,
        }
    }

    fn built_in(id: &str, name: &str, icon: &str) -> Self {
        Self {
            id: CategoryId::from(id),
            name: name.to_string(),
            icon: icon.to_string(),
            removable: false,
        }
    }

    /// The categories every store starts with
    pub fn defaults() -> Vec<Category> {
        vec![
            Self::built_in("personal", "Personal", "👤"),
            Self::built_in("work", "Work", "💼"),
            Self::built_in("urgent", "Urgent", "🔥"),
        ]
    }

    pub fn id(&self) -> &CategoryId { &self.id      }
    pub fn name(&self) -> &str      { &self.name    }
    pub fn icon(&self) -> &str      { &self.icon    }
    pub fn removable(&self) -> bool { self.removable }
}
