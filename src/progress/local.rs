//! Key-value progress backend.
//!
//! The catalog is one JSON array stored under the `lessons` key, the same
//! layout a browser client keeps in local storage.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use super::{LessonBackend, LessonRecord, NewLesson, ProgressError};

/// Storage key holding the serialized catalog
pub const LESSONS_KEY: &str = "lessons";

/// Last catalog document that failed to decode
pub const CORRUPT_LESSONS_KEY: &str = "lessons.corrupt";

/// String key-value storage, local-storage style.
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, ProgressError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), ProgressError>;
}

// ==================== Memory ====================

/// In-process storage; contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, ProgressError> {
        let items = self.items.lock().map_err(|_| ProgressError::Unavailable)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), ProgressError> {
        let mut items = self.items.lock().map_err(|_| ProgressError::Unavailable)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ==================== File ====================

/// All items in a single JSON object file.
///
/// Writes replace the file through a rename, so a reader sees either the
/// old or the new document. Separate processes sharing one file are
/// last-write-wins.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_items(&self) -> Result<HashMap<String, String>, ProgressError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(HashMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_items(&self, items: &HashMap<String, String>) -> Result<(), ProgressError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(items)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, ProgressError> {
        Ok(self.read_items()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), ProgressError> {
        let mut items = match self.read_items() {
            Err(ProgressError::Serialization(e)) => {
                tracing::warn!("Replacing unreadable storage file {}: {}", self.path.display(), e);
                HashMap::new()
            }
            other => other?,
        };
        items.insert(key.to_string(), value.to_string());
        self.write_items(&items)
    }
}

// ==================== Backend ====================

/// Lesson catalog kept as a JSON document in a [`KeyValueStorage`].
pub struct LocalStorageBackend<S> {
    storage: S,
    /// Reported in logs and health output
    name: &'static str,
    /// Serializes read-modify-write cycles on the catalog document
    write_lock: Mutex<()>,
}

impl<S: KeyValueStorage> LocalStorageBackend<S> {
    pub fn new(storage: S, name: &'static str) -> Self {
        Self {
            storage,
            name,
            write_lock: Mutex::new(()),
        }
    }

    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>, ProgressError> {
        self.write_lock.lock().map_err(|_| ProgressError::Unavailable)
    }

    fn read_lessons(&self) -> Result<Vec<LessonRecord>, ProgressError> {
        match self.storage.get_item(LESSONS_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Catalog for a read-modify-write. An undecodable document is set aside
    /// under [`CORRUPT_LESSONS_KEY`] and replaced by the write that follows.
    fn read_lessons_for_update(&self) -> Result<Vec<LessonRecord>, ProgressError> {
        match self.read_lessons() {
            Err(ProgressError::Serialization(e)) => {
                tracing::warn!("Discarding unreadable lesson catalog: {}", e);
                if let Ok(Some(raw)) = self.storage.get_item(LESSONS_KEY) {
                    self.storage.set_item(CORRUPT_LESSONS_KEY, &raw)?;
                }
                Ok(Vec::new())
            }
            other => other,
        }
    }

    fn save_lessons(&self, lessons: &[LessonRecord]) -> Result<(), ProgressError> {
        let json = serde_json::to_string(lessons)?;
        self.storage.set_item(LESSONS_KEY, &json)
    }
}

impl<S: KeyValueStorage> LessonBackend for LocalStorageBackend<S> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn load_all(&self) -> Result<Vec<LessonRecord>, ProgressError> {
        self.read_lessons()
    }

    fn find(&self, path: &str) -> Result<Option<LessonRecord>, ProgressError> {
        Ok(self.read_lessons()?.into_iter().find(|l| l.path == path))
    }

    fn insert_missing(&self, lessons: &[NewLesson]) -> Result<usize, ProgressError> {
        let _guard = self.lock_writes()?;
        let mut stored = self.read_lessons_for_update()?;

        let mut created = 0;
        for lesson in lessons {
            if !stored.iter().any(|l| l.path == lesson.path) {
                stored.push(lesson.clone().into_record(None));
                created += 1;
            }
        }

        if created > 0 {
            self.save_lessons(&stored)?;
        }
        Ok(created)
    }

    fn set_completion(
        &self,
        lesson: &NewLesson,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<LessonRecord, ProgressError> {
        let _guard = self.lock_writes()?;
        let mut stored = self.read_lessons_for_update()?;

        let record = match stored.iter_mut().find(|l| l.path == lesson.path) {
            Some(existing) => {
                existing.is_completed = completed_at.is_some();
                existing.completed_at = completed_at;
                existing.clone()
            }
            None => {
                let record = lesson.clone().into_record(completed_at);
                stored.push(record.clone());
                record
            }
        };

        self.save_lessons(&stored)?;
        Ok(record)
    }
}
