//! Lesson content on disk.
//!
//! - **Scanner**: builds the sorted lesson tree from a course directory
//! - **Fallback**: hard-coded tree used when the course directory can't be read
//! - **Markdown**: reads a single lesson's raw text, confined to the content root

pub mod fallback;
pub mod markdown;
pub mod scanner;

pub use fallback::static_course_tree;
pub use markdown::{read_lesson_markdown, LessonTextError};
pub use scanner::{scan_directory, scan_or_empty, ScanError, ScanOptions};

use serde::{Deserialize, Serialize};

/// File extension of lesson files (without the dot).
pub const MARKDOWN_EXTENSION: &str = "md";

/// Returns true if `name` ends with the markdown extension.
pub fn is_markdown_name(name: &str) -> bool {
    strip_markdown_extension(name).is_some()
}

/// Strip a trailing `.md`, returning None if the name doesn't carry it.
pub fn strip_markdown_extension(name: &str) -> Option<&str> {
    name.strip_suffix(MARKDOWN_EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))
}

/// One entry in the lesson tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    /// Display label: file name without extension, or directory name
    pub name: String,
    /// Slash-joined path relative to the content root
    pub path: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// File or folder; only folders carry children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder { children: Vec<FileNode> },
}

impl FileNode {
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::File,
        }
    }

    pub fn folder(name: impl Into<String>, path: impl Into<String>, children: Vec<FileNode>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Folder { children },
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }

    /// Children of a folder; empty for files.
    pub fn children(&self) -> &[FileNode] {
        match &self.kind {
            NodeKind::File => &[],
            NodeKind::Folder { children } => children,
        }
    }

    /// Paths of every file node under (and including) this node, depth-first.
    pub fn file_paths(&self) -> Vec<&str> {
        match &self.kind {
            NodeKind::File => vec![self.path.as_str()],
            NodeKind::Folder { children } => children.iter().flat_map(|c| c.file_paths()).collect(),
        }
    }
}
