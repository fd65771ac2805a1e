//! Application state shared by all handlers.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::content::ScanOptions;
use crate::progress::ProgressStore;

/// Where lesson content lives on disk.
#[derive(Debug, Clone)]
pub struct ContentSettings {
    /// Markdown API root; every served file must resolve inside it
    pub content_root: PathBuf,
    /// Course directory under the root, also the tree's path prefix
    pub course_dir: String,
    pub scan_options: ScanOptions,
}

impl ContentSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            content_root: config.content_root.clone(),
            course_dir: config.course_dir.clone(),
            scan_options: ScanOptions::new(config.excluded_dirs.clone()),
        }
    }

    /// Directory the lesson tree is scanned from
    pub fn course_root(&self) -> PathBuf {
        self.content_root.join(&self.course_dir)
    }

    /// Progress key for a lesson path. Tree paths carry the course directory
    /// prefix; catalog keys are relative to the course directory.
    pub fn lesson_key<'a>(&self, path: &'a str) -> &'a str {
        path.strip_prefix(self.course_dir.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| !rest.is_empty())
            .unwrap_or(path)
    }
}

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub progress: ProgressStore,
    pub content: Arc<ContentSettings>,
}

impl AppState {
    pub fn new(progress: ProgressStore, content: ContentSettings) -> Self {
        Self {
            progress,
            content: Arc::new(content),
        }
    }
}
