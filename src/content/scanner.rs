//! Lesson tree scanning - walking a course directory for markdown files.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use super::{strip_markdown_extension, FileNode};

/// Scanner settings.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Directory names that are never descended into
    pub excluded_dirs: Vec<String>,
}

impl ScanOptions {
    pub fn new(excluded_dirs: Vec<String>) -> Self {
        Self { excluded_dirs }
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.excluded_dirs.iter().any(|d| d == name)
    }
}

/// I/O failure while scanning, with the path that failed.
#[derive(Debug)]
pub struct ScanError {
    pub path: PathBuf,
    pub source: std::io::Error,
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to scan {}: {}", self.path.display(), self.source)
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ScanError {
    move |source| ScanError {
        path: path.to_path_buf(),
        source,
    }
}

/// Build the lesson tree under `dir`.
///
/// Node paths are `base` joined with the entry names by `/`; pass an empty
/// `base` to get paths relative to `dir` itself. Folders without any
/// markdown descendants are dropped. Any I/O error aborts the whole scan.
pub fn scan_directory(dir: &Path, base: &str, options: &ScanOptions) -> Result<Vec<FileNode>, ScanError> {
    let mut nodes = Vec::new();

    for entry in fs::read_dir(dir).map_err(io_err(dir))? {
        let entry = entry.map_err(io_err(dir))?;
        let full_path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        // Follows symlinks, like a plain stat
        let metadata = fs::metadata(&full_path).map_err(io_err(&full_path))?;
        let node_path = join_logical(base, &name);

        if metadata.is_dir() {
            if options.is_excluded(&name) {
                continue;
            }
            let children = scan_directory(&full_path, &node_path, options)?;
            if !children.is_empty() {
                nodes.push(FileNode::folder(name, node_path, children));
            }
        } else if let Some(stem) = strip_markdown_extension(&name) {
            nodes.push(FileNode::file(stem, node_path));
        }
    }

    nodes.sort_by(compare_nodes);
    Ok(nodes)
}

/// Scan, logging and discarding any error.
///
/// An unreadable tree comes back empty, indistinguishable from a course
/// with no lessons. Callers that need to tell the two apart (e.g. to show
/// a fallback tree) should use [`scan_directory`].
pub fn scan_or_empty(dir: &Path, base: &str, options: &ScanOptions) -> Vec<FileNode> {
    match scan_directory(dir, base, options) {
        Ok(nodes) => nodes,
        Err(e) => {
            tracing::error!("Error scanning directory: {}", e);
            Vec::new()
        }
    }
}

/// Folders before files, then ordinal by name.
fn compare_nodes(a: &FileNode, b: &FileNode) -> Ordering {
    b.is_folder()
        .cmp(&a.is_folder())
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.path.cmp(&b.path))
}

fn join_logical(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::NodeKind;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "# lesson\n").unwrap();
    }

    fn default_options() -> ScanOptions {
        ScanOptions::new(vec![
            "node_modules".to_string(),
            ".git".to_string(),
            "web".to_string(),
        ])
    }

    /// Every sibling group: folders first, names non-decreasing within a kind,
    /// and no empty folders anywhere.
    fn assert_tree_invariants(nodes: &[FileNode]) {
        let first_file = nodes.iter().position(|n| !n.is_folder()).unwrap_or(nodes.len());
        assert!(nodes[first_file..].iter().all(|n| !n.is_folder()), "folder after file");

        for pair in nodes[..first_file].windows(2) {
            assert!(pair[0].name <= pair[1].name);
        }
        for pair in nodes[first_file..].windows(2) {
            assert!(pair[0].name <= pair[1].name);
        }

        for node in nodes {
            if let NodeKind::Folder { children } = &node.kind {
                assert!(!children.is_empty(), "empty folder {}", node.path);
                assert_tree_invariants(children);
            }
        }
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp = TempDir::new().unwrap();
        let nodes = scan_directory(temp.path(), "", &default_options()).unwrap();
        assert!(nodes.is_empty());
    }

    #[test]
    fn test_scan_builds_sorted_tree() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "README.md");
        touch(temp.path(), "week-2/01-flexbox.md");
        touch(temp.path(), "week-1/02-css.md");
        touch(temp.path(), "week-1/01-html.md");
        touch(temp.path(), "Appendix.md");

        let nodes = scan_directory(temp.path(), "course", &default_options()).unwrap();
        let names: Vec<_> = nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["week-1", "week-2", "Appendix", "README"]);

        let week1 = &nodes[0];
        assert_eq!(week1.path, "course/week-1");
        let lessons: Vec<_> = week1.children().iter().map(|n| n.path.as_str()).collect();
        assert_eq!(
            lessons,
            vec!["course/week-1/01-html.md", "course/week-1/02-css.md"]
        );
        assert_eq!(week1.children()[0].name, "01-html");

        assert_tree_invariants(&nodes);
    }

    #[test]
    fn test_scan_prunes_folders_without_markdown() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "lesson.md");
        fs::create_dir_all(temp.path().join("empty/nested/deeper")).unwrap();
        fs::create_dir_all(temp.path().join("assets-only")).unwrap();
        fs::write(temp.path().join("assets-only/logo.png"), "png").unwrap();

        let nodes = scan_directory(temp.path(), "", &default_options()).unwrap();
        assert_eq!(nodes, vec![FileNode::file("lesson", "lesson.md")]);
    }

    #[test]
    fn test_scan_ignores_non_markdown_files() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "notes.md");
        fs::write(temp.path().join("notes.txt"), "x").unwrap();
        fs::write(temp.path().join("md"), "x").unwrap();

        let nodes = scan_directory(temp.path(), "", &default_options()).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].path, "notes.md");
    }

    #[test]
    fn test_scan_skips_excluded_directories() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "node_modules/pkg/README.md");
        touch(temp.path(), ".git/info.md");
        touch(temp.path(), "web/page.md");
        touch(temp.path(), "docs/guide.md");

        let nodes = scan_directory(temp.path(), "", &default_options()).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].path, "docs");
    }

    #[test]
    fn test_scan_missing_directory_is_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");

        let err = scan_directory(&missing, "", &default_options()).unwrap_err();
        assert_eq!(err.path, missing);
        assert!(scan_or_empty(&missing, "", &default_options()).is_empty());
    }

    #[test]
    fn test_scan_deep_tree_invariants() {
        let temp = TempDir::new().unwrap();
        for rel in [
            "b/z.md",
            "b/a.md",
            "b/c/d/e.md",
            "b/c/empty/.keep",
            "a/B.md",
            "a/a.md",
            "a/sub/x.md",
            "root.md",
            "Zeta/q.md",
        ] {
            touch(temp.path(), rel);
        }

        let nodes = scan_directory(temp.path(), "", &default_options()).unwrap();
        assert_tree_invariants(&nodes);

        let all: Vec<&str> = nodes.iter().flat_map(|n| n.file_paths()).collect();
        assert_eq!(all.len(), 8);
        assert!(!all.iter().any(|p| p.contains("empty")));
    }
}
