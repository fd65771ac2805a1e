//! Raw lesson text, confined to the content root.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use super::is_markdown_name;

/// Why a lesson's text couldn't be returned.
#[derive(Debug)]
pub enum LessonTextError {
    /// No path was given
    MissingPath,
    /// Path doesn't name a markdown file
    NotMarkdown(String),
    /// Path would resolve outside the content root
    OutsideRoot(String),
    /// Path resolves to something other than a regular file
    NotAFile(String),
    /// Nothing exists at the path
    NotFound(String),
    /// Reading failed for another reason
    Io(String, String),
}

impl std::fmt::Display for LessonTextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LessonTextError::MissingPath => write!(f, "Path parameter is required"),
            LessonTextError::NotMarkdown(path) => {
                write!(f, "Only markdown files (.md) are allowed: {}", path)
            }
            LessonTextError::OutsideRoot(path) => {
                write!(f, "Path escapes the content directory: {}", path)
            }
            LessonTextError::NotAFile(path) => write!(f, "Path is not a file: {}", path),
            LessonTextError::NotFound(path) => write!(f, "File not found: {}", path),
            LessonTextError::Io(path, err) => write!(f, "IO error reading {}: {}", path, err),
        }
    }
}

impl std::error::Error for LessonTextError {}

impl LessonTextError {
    /// True for errors caused by the request itself rather than the filesystem.
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            LessonTextError::MissingPath
                | LessonTextError::NotMarkdown(_)
                | LessonTextError::OutsideRoot(_)
                | LessonTextError::NotAFile(_)
        )
    }

    /// Returns a user-facing error message without exposing filesystem paths.
    pub fn user_message(&self) -> &str {
        match self {
            LessonTextError::MissingPath => "Path parameter is required",
            LessonTextError::NotMarkdown(_) => "Only markdown files (.md) are allowed",
            LessonTextError::OutsideRoot(_) => "Path must stay inside the content directory",
            LessonTextError::NotAFile(_) => "Path is not a file",
            LessonTextError::NotFound(_) => "File not found",
            LessonTextError::Io(_, _) => "Failed to read lesson file",
        }
    }
}

/// Resolve a requested lesson path to a file under `root`.
///
/// The path must be relative, end in `.md`, contain no `..` components and,
/// after following symlinks, still land inside `root`.
pub fn resolve_lesson_path(root: &Path, requested: &str) -> Result<PathBuf, LessonTextError> {
    let requested = requested.trim();
    if requested.is_empty() {
        return Err(LessonTextError::MissingPath);
    }
    if !is_markdown_name(requested) {
        return Err(LessonTextError::NotMarkdown(requested.to_string()));
    }

    let relative = Path::new(requested);
    let lexically_safe = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !lexically_safe {
        return Err(LessonTextError::OutsideRoot(requested.to_string()));
    }

    let canonical_root = root
        .canonicalize()
        .map_err(|e| classify_io(requested, e))?;
    let canonical = root
        .join(relative)
        .canonicalize()
        .map_err(|e| classify_io(requested, e))?;

    // A symlink inside the root may still point elsewhere
    if !canonical.starts_with(&canonical_root) {
        return Err(LessonTextError::OutsideRoot(requested.to_string()));
    }

    let metadata = fs::metadata(&canonical).map_err(|e| classify_io(requested, e))?;
    if !metadata.is_file() {
        return Err(LessonTextError::NotAFile(requested.to_string()));
    }

    Ok(canonical)
}

/// Read the markdown text of the lesson at `requested`, relative to `root`.
pub fn read_lesson_markdown(root: &Path, requested: Option<&str>) -> Result<String, LessonTextError> {
    let requested = requested.ok_or(LessonTextError::MissingPath)?;
    let full_path = resolve_lesson_path(root, requested)?;

    tracing::debug!("Reading lesson file: {}", full_path.display());
    let bytes = fs::read(&full_path).map_err(|e| classify_io(requested, e))?;

    // Invalid UTF-8 is served with replacement characters rather than refused
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            tracing::warn!("Lesson {} is not valid UTF-8, decoding lossily", requested);
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

fn classify_io(requested: &str, e: std::io::Error) -> LessonTextError {
    match e.kind() {
        // A file used as a directory component means the lesson doesn't exist
        ErrorKind::NotFound | ErrorKind::NotADirectory => {
            LessonTextError::NotFound(requested.to_string())
        }
        ErrorKind::IsADirectory => LessonTextError::NotAFile(requested.to_string()),
        _ => LessonTextError::Io(requested.to_string(), e.to_string()),
    }
}
