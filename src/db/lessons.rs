//! Lesson catalog queries

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::progress::{LessonRecord, NewLesson};

const LESSON_COLUMNS: &str = "id, path, name, week, sort_order, is_completed, completed_at";

fn row_to_lesson(row: &rusqlite::Row) -> Result<LessonRecord> {
  let is_completed: i64 = row.get(5)?;
  let completed_at_str: Option<String> = row.get(6)?;

  let completed_at = match completed_at_str {
    Some(s) if is_completed != 0 => Some(
      DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?,
    ),
    _ => None,
  };

  Ok(LessonRecord {
    id: row.get(0)?,
    path: row.get(1)?,
    name: row.get(2)?,
    group: row.get(3)?,
    order: row.get(4)?,
    // A completed row without a timestamp is read back as incomplete
    is_completed: completed_at.is_some(),
    completed_at,
  })
}

/// All lessons ordered by week, then position
pub fn get_all_lessons(conn: &Connection) -> Result<Vec<LessonRecord>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {} FROM lessons ORDER BY week ASC, sort_order ASC, path ASC",
    LESSON_COLUMNS
  ))?;
  let lessons = stmt
    .query_map([], row_to_lesson)?
    .collect::<Result<Vec<_>>>()?;
  Ok(lessons)
}

pub fn get_lesson_by_path(conn: &Connection, path: &str) -> Result<Option<LessonRecord>> {
  conn
    .query_row(
      &format!("SELECT {} FROM lessons WHERE path = ?1", LESSON_COLUMNS),
      params![path],
      row_to_lesson,
    )
    .optional()
}

pub fn count_lessons(conn: &Connection) -> Result<i64> {
  conn.query_row("SELECT COUNT(*) FROM lessons", [], |row| row.get(0))
}

/// Insert an incomplete lesson unless one with the same path exists.
/// Returns true if a row was created.
pub fn insert_lesson_if_absent(conn: &Connection, id: &str, lesson: &NewLesson) -> Result<bool> {
  let now = Utc::now().to_rfc3339();
  let inserted = conn.execute(
    r#"INSERT INTO lessons (id, path, name, week, sort_order, is_completed, completed_at, created_at, updated_at)
       VALUES (?1, ?2, ?3, ?4, ?5, 0, NULL, ?6, ?6)
       ON CONFLICT(path) DO NOTHING"#,
    params![id, lesson.path, lesson.name, lesson.group, lesson.order, now],
  )?;
  Ok(inserted == 1)
}

/// Insert every lesson that doesn't exist yet, in one transaction.
/// Returns the number of rows created.
pub fn insert_lessons_if_absent(conn: &Connection, lessons: &[(String, NewLesson)]) -> Result<usize> {
  let tx = conn.unchecked_transaction()?;
  let mut created = 0;
  for (id, lesson) in lessons {
    if insert_lesson_if_absent(&tx, id, lesson)? {
      created += 1;
    }
  }
  tx.commit()?;
  Ok(created)
}

/// Set completion on the lesson at `lesson.path`, creating it if missing.
///
/// Atomic per statement: concurrent first writes for the same path can't
/// produce two rows, the UNIQUE path turns the loser into an update.
pub fn upsert_lesson_completion(
  conn: &Connection,
  id: &str,
  lesson: &NewLesson,
  completed_at: Option<DateTime<Utc>>,
) -> Result<()> {
  let now = Utc::now().to_rfc3339();
  let completed_at = completed_at.map(|dt| dt.to_rfc3339());
  let is_completed = completed_at.is_some();

  conn.execute(
    r#"INSERT INTO lessons (id, path, name, week, sort_order, is_completed, completed_at, created_at, updated_at)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
       ON CONFLICT(path) DO UPDATE SET
         is_completed = excluded.is_completed,
         completed_at = excluded.completed_at,
         updated_at = excluded.updated_at"#,
    params![
      id,
      lesson.path,
      lesson.name,
      lesson.group,
      lesson.order,
      is_completed,
      completed_at,
      now,
    ],
  )?;
  Ok(())
}
