//! Inferring a lesson's name, group and position from its path.
//!
//! Used when progress is recorded for a path the catalog doesn't know yet.

use super::manifest::{find_manifest_entry, COURSE_GROUPS};
use super::NewLesson;
use crate::content::strip_markdown_extension;

/// Where a placement's group came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementSource {
    /// Path is listed in the lesson manifest
    Manifest,
    /// Path contains a known group marker
    Marker,
    /// Nothing matched; placed in the first group
    Defaulted,
}

/// Name, group and order for a lesson path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonPlacement {
    pub name: String,
    pub group: String,
    pub order: i64,
    pub source: PlacementSource,
}

impl LessonPlacement {
    /// Place a lesson, preferring the manifest over path heuristics.
    pub fn from_path(path: &str) -> Self {
        if let Some(entry) = find_manifest_entry(path) {
            return Self {
                name: entry.name.to_string(),
                group: entry.group.to_string(),
                order: entry.order,
                source: PlacementSource::Manifest,
            };
        }

        let (group, source) = match group_from_path(path) {
            Some(group) => (group, PlacementSource::Marker),
            None => {
                tracing::warn!(
                    "No group marker in lesson path '{}', defaulting to {}",
                    path,
                    COURSE_GROUPS[0]
                );
                (COURSE_GROUPS[0], PlacementSource::Defaulted)
            }
        };

        Self {
            name: name_from_path(path),
            group: group.to_string(),
            order: order_from_path(path).unwrap_or(0),
            source,
        }
    }

    pub fn into_new_lesson(self, path: &str) -> NewLesson {
        NewLesson {
            path: path.to_string(),
            name: self.name,
            group: self.group,
            order: self.order,
        }
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Title from the file name: `.md` dropped, hyphens to spaces, each word capitalized.
pub fn name_from_path(path: &str) -> String {
    let file = file_name(path);
    let stem = strip_markdown_extension(file).unwrap_or(file);

    stem.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// First group marker contained in the path, tested in group order.
pub fn group_from_path(path: &str) -> Option<&'static str> {
    COURSE_GROUPS.iter().copied().find(|group| path.contains(group))
}

/// Leading `<digits>-` of the file name.
pub fn order_from_path(path: &str) -> Option<i64> {
    let file = file_name(path);
    let digits_end = file
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)?;

    if digits_end == 0 || !file[digits_end..].starts_with('-') {
        return None;
    }
    file[..digits_end].parse().ok()
}
