//! Lesson completion tracking.
//!
//! [`ProgressStore`] implements every catalog operation once and delegates
//! persistence to a [`LessonBackend`]:
//!
//! - [`SqliteBackend`]: `lessons` table in a SQLite database
//! - [`LocalStorageBackend`]: the whole catalog as one JSON document in a
//!   key-value storage, the way a browser keeps it in local storage
//!
//! The backend is picked once at startup from configuration. Backends are
//! never kept in sync with each other.

pub mod local;
pub mod manifest;
pub mod placement;
pub mod sqlite;

pub use local::{FileStorage, KeyValueStorage, LocalStorageBackend, MemoryStorage};
pub use manifest::{ManifestEntry, COURSE_GROUPS, LESSON_MANIFEST};
pub use placement::{LessonPlacement, PlacementSource};
pub use sqlite::SqliteBackend;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::BackendKind;
use crate::db::{self, DbLockError};

// ==================== Records ====================

/// One trackable lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRecord {
    pub id: String,
    pub path: String,
    pub name: String,
    pub group: String,
    pub order: i64,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Catalog fields of a lesson that doesn't have an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLesson {
    pub path: String,
    pub name: String,
    pub group: String,
    pub order: i64,
}

impl NewLesson {
    /// Catalog entry for `path`, from the manifest or inferred from the path.
    pub fn for_path(path: &str) -> Self {
        LessonPlacement::from_path(path).into_new_lesson(path)
    }

    /// Give the lesson a fresh id with the given completion state.
    pub fn into_record(self, completed_at: Option<DateTime<Utc>>) -> LessonRecord {
        LessonRecord {
            id: new_lesson_id(),
            path: self.path,
            name: self.name,
            group: self.group,
            order: self.order,
            is_completed: completed_at.is_some(),
            completed_at,
        }
    }
}

/// Random opaque lesson id (16 hex chars).
pub fn new_lesson_id() -> String {
    hex::encode(rand::random::<[u8; 8]>())
}

/// Completion summary for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupProgress {
    pub group: String,
    pub total_lessons: usize,
    pub completed_lessons: usize,
    /// Percentage rounded to two decimals; 0 for an empty group
    pub progress_percent: f64,
}

impl GroupProgress {
    /// Summarize the lessons of `group` among `lessons`.
    pub fn from_lessons(group: &str, lessons: &[LessonRecord]) -> Self {
        let in_group = lessons.iter().filter(|l| l.group == group);
        let (total_lessons, completed_lessons) =
            in_group.fold((0, 0), |(total, done), l| (total + 1, done + l.is_completed as usize));

        Self {
            group: group.to_string(),
            total_lessons,
            completed_lessons,
            progress_percent: Self::calculate_percentage(completed_lessons, total_lessons),
        }
    }

    pub fn calculate_percentage(completed: usize, total: usize) -> f64 {
        if total > 0 {
            let percent = completed as f64 / total as f64 * 100.0;
            (percent * 100.0).round() / 100.0
        } else {
            0.0
        }
    }

    /// Zeroed progress for a group, used when the catalog can't be read.
    pub fn empty(group: &str) -> Self {
        Self::from_lessons(group, &[])
    }
}

// ==================== Errors ====================

/// Progress store failures.
#[derive(Debug)]
pub enum ProgressError {
    /// Backing store rejected or failed the operation
    Storage(String),
    /// Stored data couldn't be encoded or decoded
    Serialization(String),
    /// Backing store can't be reached (e.g. poisoned lock)
    Unavailable,
}

impl std::fmt::Display for ProgressError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgressError::Storage(err) => write!(f, "Progress storage error: {}", err),
            ProgressError::Serialization(err) => {
                write!(f, "Progress data serialization error: {}", err)
            }
            ProgressError::Unavailable => write!(f, "Progress storage unavailable"),
        }
    }
}

impl std::error::Error for ProgressError {}

impl From<rusqlite::Error> for ProgressError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::FromSqlConversionFailure(_, _, err) => {
                ProgressError::Serialization(err.to_string())
            }
            other => ProgressError::Storage(other.to_string()),
        }
    }
}

impl From<DbLockError> for ProgressError {
    fn from(_: DbLockError) -> Self {
        ProgressError::Unavailable
    }
}

impl From<serde_json::Error> for ProgressError {
    fn from(e: serde_json::Error) -> Self {
        ProgressError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for ProgressError {
    fn from(e: std::io::Error) -> Self {
        ProgressError::Storage(e.to_string())
    }
}

// ==================== Backend Contract ====================

/// Persistence for the lesson catalog.
///
/// Implementations must keep `path` unique and make each write atomic with
/// respect to other callers of the same backend.
pub trait LessonBackend: Send + Sync {
    /// Short name for logs and health output
    fn name(&self) -> &'static str;

    /// Every stored lesson, in any order
    fn load_all(&self) -> Result<Vec<LessonRecord>, ProgressError>;

    fn find(&self, path: &str) -> Result<Option<LessonRecord>, ProgressError>;

    /// Store each lesson whose path is absent as incomplete; existing
    /// records are left untouched. Returns the number created.
    fn insert_missing(&self, lessons: &[NewLesson]) -> Result<usize, ProgressError>;

    /// Set completion on the lesson at `lesson.path`, creating it from
    /// `lesson` if absent. `completed_at` is None to mark incomplete.
    fn set_completion(
        &self,
        lesson: &NewLesson,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<LessonRecord, ProgressError>;

    /// Existing record for `lesson.path`, or a newly stored incomplete one.
    fn get_or_insert(&self, lesson: &NewLesson) -> Result<LessonRecord, ProgressError> {
        self.insert_missing(std::slice::from_ref(lesson))?;
        self.find(&lesson.path)?.ok_or_else(|| {
            ProgressError::Storage(format!("lesson '{}' missing after insert", lesson.path))
        })
    }
}

// ==================== Store ====================

/// Handle to the lesson catalog. Cheap to clone.
#[derive(Clone)]
pub struct ProgressStore {
    backend: Arc<dyn LessonBackend>,
}

impl ProgressStore {
    pub fn new(backend: impl LessonBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Open the configured backend.
    pub fn open(kind: &BackendKind) -> Result<Self, ProgressError> {
        let store = match kind {
            BackendKind::Sqlite(path) => Self::new(SqliteBackend::new(db::init_db(path)?)),
            BackendKind::Local(path) => Self::new(LocalStorageBackend::new(
                FileStorage::new(path),
                kind.as_str(),
            )),
            BackendKind::Memory => {
                Self::new(LocalStorageBackend::new(MemoryStorage::default(), kind.as_str()))
            }
        };
        tracing::info!("Progress backend: {}", store.backend_name());
        Ok(store)
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Seed the lesson manifest. Existing lessons, including their
    /// completion state, are left as they are. Returns how many were created.
    pub fn initialize(&self) -> Result<usize, ProgressError> {
        let lessons: Vec<NewLesson> = LESSON_MANIFEST.iter().map(|e| e.to_new_lesson()).collect();
        let created = self.backend.insert_missing(&lessons)?;
        if created > 0 {
            tracing::info!("Seeded {} lessons into the catalog", created);
        } else {
            tracing::debug!("Lesson catalog already seeded");
        }
        Ok(created)
    }

    /// Every lesson ordered by group, then order. Seeds the manifest first
    /// if the catalog is empty.
    pub fn list_all(&self) -> Result<Vec<LessonRecord>, ProgressError> {
        let mut lessons = self.backend.load_all()?;
        if lessons.is_empty() {
            tracing::info!("No lessons found, initializing catalog");
            self.initialize()?;
            lessons = self.backend.load_all()?;
        }

        lessons.sort_by(|a, b| {
            a.group
                .cmp(&b.group)
                .then(a.order.cmp(&b.order))
                .then_with(|| a.path.cmp(&b.path))
        });
        Ok(lessons)
    }

    pub fn list_by_group(&self, group: &str) -> Result<Vec<LessonRecord>, ProgressError> {
        let mut lessons = self.list_all()?;
        lessons.retain(|l| l.group == group);
        Ok(lessons)
    }

    pub fn get(&self, path: &str) -> Result<Option<LessonRecord>, ProgressError> {
        self.backend.find(path)
    }

    /// Completion flag for `path`; unknown paths are not completed.
    pub fn is_completed(&self, path: &str) -> Result<bool, ProgressError> {
        Ok(self.backend.find(path)?.is_some_and(|l| l.is_completed))
    }

    pub fn set_completed(&self, path: &str) -> Result<LessonRecord, ProgressError> {
        self.backend
            .set_completion(&NewLesson::for_path(path), Some(Utc::now()))
    }

    pub fn set_incomplete(&self, path: &str) -> Result<LessonRecord, ProgressError> {
        self.backend.set_completion(&NewLesson::for_path(path), None)
    }

    pub fn group_progress(&self, group: &str) -> Result<GroupProgress, ProgressError> {
        let lessons = self.list_by_group(group)?;
        Ok(GroupProgress::from_lessons(group, &lessons))
    }

    /// Progress for every manifest group, in manifest order.
    pub fn overall_progress(&self) -> Result<Vec<GroupProgress>, ProgressError> {
        let lessons = self.list_all()?;
        Ok(COURSE_GROUPS
            .iter()
            .map(|group| GroupProgress::from_lessons(group, &lessons))
            .collect())
    }

    pub fn get_or_create(&self, path: &str) -> Result<LessonRecord, ProgressError> {
        self.backend.get_or_insert(&NewLesson::for_path(path))
    }
}
