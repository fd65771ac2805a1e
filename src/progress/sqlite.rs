//! Relational progress backend.

use chrono::{DateTime, Utc};

use super::{new_lesson_id, LessonBackend, LessonRecord, NewLesson, ProgressError};
use crate::db::{self, try_lock, DbPool};

/// Lessons stored in the `lessons` table of a SQLite database.
///
/// The shared connection mutex serializes writers within the process; the
/// UNIQUE path column plus `ON CONFLICT` upserts keep concurrent first
/// writes for the same path from creating duplicates.
pub struct SqliteBackend {
    pool: DbPool,
}

impl SqliteBackend {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl LessonBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn load_all(&self) -> Result<Vec<LessonRecord>, ProgressError> {
        let conn = try_lock(&self.pool)?;
        Ok(db::get_all_lessons(&conn)?)
    }

    fn find(&self, path: &str) -> Result<Option<LessonRecord>, ProgressError> {
        let conn = try_lock(&self.pool)?;
        Ok(db::get_lesson_by_path(&conn, path)?)
    }

    fn insert_missing(&self, lessons: &[NewLesson]) -> Result<usize, ProgressError> {
        let batch: Vec<(String, NewLesson)> = lessons
            .iter()
            .map(|l| (new_lesson_id(), l.clone()))
            .collect();

        let conn = try_lock(&self.pool)?;
        Ok(db::insert_lessons_if_absent(&conn, &batch)?)
    }

    fn set_completion(
        &self,
        lesson: &NewLesson,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<LessonRecord, ProgressError> {
        let conn = try_lock(&self.pool)?;
        db::upsert_lesson_completion(&conn, &new_lesson_id(), lesson, completed_at)?;
        db::get_lesson_by_path(&conn, &lesson.path)?.ok_or_else(|| {
            ProgressError::Storage(format!("lesson '{}' missing after update", lesson.path))
        })
    }
}
