//! Sled-based storage for tasks.

use crate::task::{NewTask, Task};
use chrono::Utc;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    DbError(#[from] sled::Error),
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("task not found: {0}")]
    NotFound(u64),
    #[error("task title must not be empty")]
    EmptyTitle,
}

/// Sled-based task store.
///
/// Tasks are keyed by big-endian id, so iteration follows creation order.
#[derive(Clone)]
pub struct TaskStore {
    db: sled::Db,
}

impl TaskStore {
    /// Open or create storage at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Create a task and return it with its assigned id
    pub fn create(&self, new: NewTask) -> Result<Task, StorageError> {
        let new = normalize(new)?;
        let task = Task {
            id: self.db.generate_id()?,
            title: new.title,
            description: new.description,
            is_done: new.is_done,
            created_at: Utc::now(),
        };
        self.put(&task)?;
        Ok(task)
    }

    /// Retrieve a task by id
    pub fn get(&self, id: u64) -> Result<Option<Task>, StorageError> {
        match self.db.get(id.to_be_bytes())? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    /// List all tasks in creation order
    pub fn list(&self) -> Result<Vec<Task>, StorageError> {
        let mut results = Vec::new();
        for item in self.db.iter() {
            let (_key, value) = item?;
            results.push(serde_json::from_slice(&value)?);
        }
        Ok(results)
    }

    /// Replace the fields of an existing task
    pub fn update(&self, id: u64, new: NewTask) -> Result<Task, StorageError> {
        let new = normalize(new)?;
        let mut task = self.get(id)?.ok_or(StorageError::NotFound(id))?;
        task.title = new.title;
        task.description = new.description;
        task.is_done = new.is_done;
        self.put(&task)?;
        Ok(task)
    }

    /// Delete a task by id
    pub fn delete(&self, id: u64) -> Result<bool, StorageError> {
        let existed = self.db.remove(id.to_be_bytes())?.is_some();
        self.db.flush()?;
        Ok(existed)
    }

    /// Get the number of stored tasks
    pub fn count(&self) -> usize {
        self.db.len()
    }

    fn put(&self, task: &Task) -> Result<(), StorageError> {
        let value = serde_json::to_vec(task)?;
        self.db.insert(task.id.to_be_bytes(), value)?;
        self.db.flush()?;
        Ok(())
    }
}

fn normalize(mut new: NewTask) -> Result<NewTask, StorageError> {
    new.title = new.title.trim().to_string();
    if new.title.is_empty() {
        return Err(StorageError::EmptyTitle);
    }
    Ok(new)
}
