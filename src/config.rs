//! Application configuration.
//!
//! Every setting is resolved with the same priority:
//! `config.toml` > environment (`.env` is loaded first) > default.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::paths;

// ==================== File Format ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    server: Option<ServerSection>,
    content: Option<ContentSection>,
    progress: Option<ProgressSection>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    addr: Option<String>,
    port: Option<u16>,
    static_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ContentSection {
    root: Option<String>,
    course: Option<String>,
    project_dir: Option<String>,
    #[serde(default)]
    exclude: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ProgressSection {
    backend: Option<String>,
    database: Option<String>,
    local_storage: Option<String>,
}

// ==================== Defaults ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const SERVER_PORT: u16 = 3000;

/// Directory holding all markdown content served by the markdown API
pub const CONTENT_ROOT: &str = "md-files";

/// Course directory under the content root that the lesson tree is built from
pub const COURSE_DIR: &str = "frontend-course";

/// Name of the hosting web project's own directory
pub const PROJECT_DIR: &str = "web";

/// Directory served for requests that don't hit the API
pub const STATIC_DIR: &str = "static";

/// Directory names never descended into by the scanner
pub const DEFAULT_EXCLUDED_DIRS: [&str; 3] = ["node_modules", ".git", "target"];

// ==================== Progress Backend ====================

/// Which storage the progress store persists to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendKind {
    /// Relational table in a SQLite database file
    Sqlite(PathBuf),
    /// Key-value document in a JSON file (local-storage style)
    Local(PathBuf),
    /// Key-value document held in memory; lost on restart
    Memory,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Sqlite(_) => "sqlite",
            BackendKind::Local(_) => "local",
            BackendKind::Memory => "memory",
        }
    }
}

/// Error for an unrecognized backend name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBackend(pub String);

impl std::fmt::Display for UnknownBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unknown progress backend '{}' (expected sqlite, local or memory)",
            self.0
        )
    }
}

impl std::error::Error for UnknownBackend {}

// ==================== Resolved Configuration ====================

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_addr: String,
    pub server_port: u16,
    pub static_dir: PathBuf,
    /// Root of the markdown API; requested paths must stay inside it
    pub content_root: PathBuf,
    /// Course directory name under `content_root`, also the tree path prefix
    pub course_dir: String,
    pub excluded_dirs: Vec<String>,
    pub backend: BackendKind,
}

impl AppConfig {
    /// Load configuration from `config.toml` in the working directory,
    /// falling back to the environment and defaults.
    pub fn load() -> Result<Self, UnknownBackend> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let file = read_config_file(Path::new("config.toml"));
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    fn resolve(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, UnknownBackend> {
        let server = file.server.unwrap_or_default();
        let content = file.content.unwrap_or_default();
        let progress = file.progress.unwrap_or_default();

        let server_addr = server
            .addr
            .or_else(|| env("SERVER_ADDR"))
            .unwrap_or_else(|| SERVER_ADDR.to_string());
        let server_port = server
            .port
            .or_else(|| env("PORT").and_then(|p| p.parse().ok()))
            .unwrap_or(SERVER_PORT);
        let static_dir = server
            .static_dir
            .or_else(|| env("STATIC_DIR"))
            .unwrap_or_else(|| STATIC_DIR.to_string());

        let content_root = content
            .root
            .or_else(|| env("CONTENT_DIR"))
            .unwrap_or_else(|| CONTENT_ROOT.to_string());
        let course_dir = content
            .course
            .or_else(|| env("COURSE_DIR"))
            .unwrap_or_else(|| COURSE_DIR.to_string());

        let mut excluded_dirs: Vec<String> =
            DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect();
        excluded_dirs.push(content.project_dir.unwrap_or_else(|| PROJECT_DIR.to_string()));
        for dir in content.exclude {
            if !excluded_dirs.contains(&dir) {
                excluded_dirs.push(dir);
            }
        }

        let backend_name = progress
            .backend
            .or_else(|| env("PROGRESS_BACKEND"))
            .unwrap_or_else(|| "sqlite".to_string());
        let backend = match backend_name.trim().to_lowercase().as_str() {
            "sqlite" => BackendKind::Sqlite(PathBuf::from(
                progress
                    .database
                    .or_else(|| env("DATABASE_PATH"))
                    .unwrap_or_else(paths::db_path),
            )),
            "local" => BackendKind::Local(PathBuf::from(
                progress
                    .local_storage
                    .or_else(|| env("LOCAL_STORAGE_PATH"))
                    .unwrap_or_else(paths::local_storage_path),
            )),
            "memory" => BackendKind::Memory,
            _ => return Err(UnknownBackend(backend_name)),
        };

        Ok(Self {
            server_addr,
            server_port,
            static_dir: PathBuf::from(static_dir),
            content_root: PathBuf::from(content_root),
            course_dir,
            excluded_dirs,
            backend,
        })
    }

    /// Get the full server bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_addr, self.server_port)
    }

    /// Directory the lesson tree is scanned from
    pub fn course_root(&self) -> PathBuf {
        self.content_root.join(&self.course_dir)
    }
}

fn read_config_file(path: &Path) -> FileConfig {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => return FileConfig::default(),
    };

    match toml::from_str::<FileConfig>(&contents) {
        Ok(config) => {
            tracing::info!("Using configuration from {}", path.display());
            config
        }
        Err(e) => {
            tracing::warn!("Ignoring invalid {}: {}", path.display(), e);
            FileConfig::default()
        }
    }
}
