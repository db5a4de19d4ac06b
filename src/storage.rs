//! This module provides the string-keyed persistent storages the task store writes to

use std::collections::HashMap;
use std::error::Error;
use std::path::{Path, PathBuf};

use crate::mock_behaviour::MockBehaviour;


/// A persistent, string-keyed service that holds serialized blobs
pub trait KeyValueStore {
    /// Returns the value stored at `key`, or `None` if there is none
    fn get(&mut self, key: &str) -> Result<Option<String>, Box<dyn Error>>;
    /// Stores `value` at `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>>;
}


/// A storage that only lives in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    mock_behaviour: Option<MockBehaviour>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage whose reads and writes may fail, as described by `behaviour`
    pub fn with_mock_behaviour(behaviour: MockBehaviour) -> Self {
        Self {
            values: HashMap::new(),
            mock_behaviour: Some(behaviour),
        }
    }

    pub fn mock_behaviour_mut(&mut self) -> Option<&mut MockBehaviour> {
        self.mock_behaviour.as_mut()
    }

    /// Read a value without going through the mock behaviour
    pub fn peek(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&mut self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        if let Some(behaviour) = &mut self.mock_behaviour {
            behaviour.can_get()?;
        }
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        if let Some(behaviour) = &mut self.mock_behaviour {
            behaviour.can_set()?;
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}


/// A storage that keeps every key in its own file of a local folder
#[derive(Debug, Clone, PartialEq)]
pub struct FolderStore {
    backing_folder: PathBuf,
}

impl FolderStore {
    /// Use the given folder. It will be created at the first write if needed
    pub fn new(folder: &Path) -> Self {
        Self {
            backing_folder: PathBuf::from(folder),
        }
    }

    /// Use the folder set in [`config::DATA_FOLDER`](crate::config::DATA_FOLDER)
    pub fn default_folder() -> Self {
        Self::new(&crate::config::get(&crate::config::DATA_FOLDER))
    }

    pub fn folder(&self) -> &Path {
        &self.backing_folder
    }

    fn file_for(&self, key: &str) -> PathBuf {
        let file_name = sanitize_filename::sanitize(key) + ".json";
        self.backing_folder.join(file_name)
    }
}

impl KeyValueStore for FolderStore {
    fn get(&mut self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let path = self.file_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(format!("Unable to read file {:?}: {}", path, err).into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        if let Err(err) = std::fs::create_dir_all(&self.backing_folder) {
            return Err(format!("Unable to create folder {:?}: {}", self.backing_folder, err).into());
        }
        let path = self.file_for(key);
        if let Err(err) = std::fs::write(&path, value) {
            return Err(format!("Unable to save file {:?}: {}", path, err).into());
        }
        Ok(())
    }
}
