use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS lessons (
      id TEXT PRIMARY KEY,
      path TEXT NOT NULL UNIQUE,
      name TEXT NOT NULL,
      week TEXT NOT NULL,
      sort_order INTEGER NOT NULL DEFAULT 0,
      is_completed INTEGER NOT NULL DEFAULT 0,
      completed_at TEXT,
      created_at TEXT NOT NULL,
      updated_at TEXT NOT NULL
    );

    -- Indexes
    CREATE INDEX IF NOT EXISTS idx_lessons_week_order ON lessons(week, sort_order);
    "#,
  )?;

  // Completion timestamps must not outlive the flag
  conn.execute(
    "UPDATE lessons SET completed_at = NULL WHERE is_completed = 0 AND completed_at IS NOT NULL",
    [],
  )?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_migrations_are_idempotent() {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    run_migrations(&conn).unwrap();

    let index_count: i64 = conn
      .query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'idx_lessons_week_order'",
        [],
        |row| row.get(0),
      )
      .unwrap();
    assert_eq!(index_count, 1);
  }

  #[test]
  fn test_migration_clears_stale_completion() {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    conn
      .execute(
        r#"INSERT INTO lessons (id, path, name, week, sort_order, is_completed, completed_at, created_at, updated_at)
           VALUES ('a1', 'x.md', 'X', 'week-1', 1, 0, '2024-01-01T00:00:00Z', '', '')"#,
        [],
      )
      .unwrap();

    run_migrations(&conn).unwrap();

    let completed_at: Option<String> = conn
      .query_row("SELECT completed_at FROM lessons WHERE id = 'a1'", [], |row| row.get(0))
      .unwrap();
    assert_eq!(completed_at, None);
  }
}
