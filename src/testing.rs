//! Test utilities.
//!
//! Builds a throwaway content tree and progress stores using the same
//! initialization paths the server uses.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::{BackendKind, DEFAULT_EXCLUDED_DIRS};
use crate::content::ScanOptions;
use crate::progress::{ProgressError, ProgressStore};
use crate::state::{AppState, ContentSettings};

/// Course directory created under the content root
pub const TEST_COURSE: &str = "frontend-course";

/// Markdown files written by [`TestEnv::new`], relative to the content root
pub const TEST_LESSONS: [&str; 5] = [
    "frontend-course/README.md",
    "frontend-course/week-1-html-css-basics/01-html-fundamentals.md",
    "frontend-course/week-1-html-css-basics/02-css-fundamentals.md",
    "frontend-course/week-2-css-layout-responsive/01-flexbox-layout.md",
    "frontend-course/node_modules/pkg/README.md",
];

/// Temporary content root plus files for each progress backend.
///
/// Everything is removed when dropped.
pub struct TestEnv {
    /// Temporary directory (kept alive for file persistence)
    pub temp: TempDir,
}

impl TestEnv {
    /// Create the environment with [`TEST_LESSONS`] on disk.
    pub fn new() -> Result<Self, ProgressError> {
        let temp = TempDir::new()?;
        let env = Self { temp };

        for lesson in TEST_LESSONS {
            env.write_lesson(lesson, &format!("# {}\n\nLesson body.\n", lesson))?;
        }
        fs::create_dir_all(env.content_root().join(TEST_COURSE).join("empty-folder"))?;

        Ok(env)
    }

    /// Get the temporary directory path for creating test files.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn content_root(&self) -> PathBuf {
        self.path().join("md-files")
    }

    /// Write a file under the content root, creating parent directories.
    pub fn write_lesson(&self, relative: &str, contents: &str) -> std::io::Result<()> {
        let path = self.content_root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)
    }

    pub fn content_settings(&self) -> ContentSettings {
        ContentSettings {
            content_root: self.content_root(),
            course_dir: TEST_COURSE.to_string(),
            scan_options: ScanOptions::new(
                DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
            ),
        }
    }

    pub fn sqlite_kind(&self) -> BackendKind {
        BackendKind::Sqlite(self.path().join("data/course.db"))
    }

    pub fn local_kind(&self) -> BackendKind {
        BackendKind::Local(self.path().join("data/local-storage.json"))
    }

    /// One store per backend implementation: SQLite file, JSON file, memory.
    pub fn stores(&self) -> Vec<ProgressStore> {
        [self.sqlite_kind(), self.local_kind(), BackendKind::Memory]
            .iter()
            .map(|kind| ProgressStore::open(kind).unwrap())
            .collect()
    }

    /// Application state over this content root and the given backend.
    pub fn app_state(&self, kind: &BackendKind) -> AppState {
        AppState::new(ProgressStore::open(kind).unwrap(), self.content_settings())
    }
}
