//! The fixed lesson manifest the catalog is seeded from.

use super::NewLesson;

/// One seeded lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestEntry {
    pub path: &'static str,
    pub name: &'static str,
    pub group: &'static str,
    pub order: i64,
}

impl ManifestEntry {
    pub fn to_new_lesson(&self) -> NewLesson {
        NewLesson {
            path: self.path.to_string(),
            name: self.name.to_string(),
            group: self.group.to_string(),
            order: self.order,
        }
    }
}

/// Groups in display order. Overall progress reports them in this order.
pub const COURSE_GROUPS: [&str; 4] = ["week-1", "week-2", "week-3", "week-4"];

const fn entry(path: &'static str, name: &'static str, group: &'static str, order: i64) -> ManifestEntry {
    ManifestEntry {
        path,
        name,
        group,
        order,
    }
}

pub const LESSON_MANIFEST: [ManifestEntry; 16] = [
    // Week 1: HTML & CSS Basics
    entry("README.md", "Course Overview", "week-1", 0),
    entry("week-1-html-css-basics/01-html-fundamentals.md", "HTML Fundamentals", "week-1", 1),
    entry("week-1-html-css-basics/02-css-basics.md", "CSS Basics", "week-1", 2),
    entry("week-1-html-css-basics/03-week-1-project.md", "Week 1 Project", "week-1", 3),
    // Week 2: CSS Layout & Responsive
    entry("week-2-css-layout-responsive/01-flexbox-layout.md", "Flexbox Layout", "week-2", 1),
    entry("week-2-css-layout-responsive/02-css-grid-layout.md", "CSS Grid Layout", "week-2", 2),
    entry(
        "week-2-css-layout-responsive/03-responsive-design-media-queries.md",
        "Responsive Design",
        "week-2",
        3,
    ),
    entry("week-2-css-layout-responsive/04-week-2-project.md", "Week 2 Project", "week-2", 4),
    // Week 3: React Basics
    entry("week-3-react-basics/01-react-introduction.md", "React Introduction", "week-3", 1),
    entry("week-3-react-basics/02-react-components.md", "React Components", "week-3", 2),
    entry("week-3-react-basics/03-react-state.md", "React State", "week-3", 3),
    entry("week-3-react-basics/04-react-todo-app.md", "React Todo App", "week-3", 4),
    // Week 4: React Advanced
    entry("week-4-react-advanced/01-react-hooks-basics.md", "React Hooks Basics", "week-4", 1),
    entry("week-4-react-advanced/02-react-advanced-hooks.md", "Advanced React Hooks", "week-4", 2),
    entry("week-4-react-advanced/03-react-patterns.md", "React Patterns", "week-4", 3),
    entry("week-4-react-advanced/04-react-portfolio.md", "React Portfolio", "week-4", 4),
];

/// Get the manifest entry for a lesson path
pub fn find_manifest_entry(path: &str) -> Option<&'static ManifestEntry> {
    LESSON_MANIFEST.iter().find(|e| e.path == path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_manifest_paths_unique() {
        let paths: HashSet<_> = LESSON_MANIFEST.iter().map(|e| e.path).collect();
        assert_eq!(paths.len(), LESSON_MANIFEST.len());
    }

    #[test]
    fn test_manifest_groups_declared() {
        assert!(LESSON_MANIFEST.iter().all(|e| COURSE_GROUPS.contains(&e.group)));
        let week1 = LESSON_MANIFEST.iter().filter(|e| e.group == "week-1").count();
        assert_eq!(week1, 4);
    }

    #[test]
    fn test_find_manifest_entry() {
        let entry = find_manifest_entry("week-3-react-basics/03-react-state.md").unwrap();
        assert_eq!(entry.name, "React State");
        assert_eq!(entry.order, 3);
        assert!(find_manifest_entry("frontend-course/README.md").is_none());
    }
}
