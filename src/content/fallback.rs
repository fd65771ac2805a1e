//! Hard-coded lesson tree for the frontend course.
//!
//! Served when the course directory can't be scanned so the navigation
//! still lists every lesson.

use super::FileNode;

type Week = (&'static str, &'static str, &'static [(&'static str, &'static str)]);

const WEEKS: [Week; 4] = [
    (
        "Week 1 - HTML & CSS Basics",
        "week-1-html-css-basics",
        &[
            ("HTML Fundamentals", "01-html-fundamentals.md"),
            ("CSS Basics", "02-css-basics.md"),
            ("Week 1 Project", "03-week-1-project.md"),
        ],
    ),
    (
        "Week 2 - CSS Layout & Responsive",
        "week-2-css-layout-responsive",
        &[
            ("Flexbox Layout", "01-flexbox-layout.md"),
            ("CSS Grid Layout", "02-css-grid-layout.md"),
            ("Responsive Design & Media Queries", "03-responsive-design-media-queries.md"),
            ("Week 2 Project", "04-week-2-project.md"),
        ],
    ),
    (
        "Week 3 - React Basics",
        "week-3-react-basics",
        &[
            ("React Introduction", "01-react-introduction.md"),
            ("React Components", "02-react-components.md"),
            ("React State", "03-react-state.md"),
            ("React Todo App", "04-react-todo-app.md"),
        ],
    ),
    (
        "Week 4 - React Advanced",
        "week-4-react-advanced",
        &[
            ("React Hooks Basics", "01-react-hooks-basics.md"),
            ("React Advanced Hooks", "02-react-advanced-hooks.md"),
            ("React Patterns", "03-react-patterns.md"),
            ("React Portfolio", "04-react-portfolio.md"),
        ],
    ),
];

/// Static tree rooted at `course` (the path prefix of every node).
pub fn static_course_tree(course: &str) -> Vec<FileNode> {
    let mut tree = vec![FileNode::file("README", format!("{course}/README.md"))];

    for (title, dir, lessons) in WEEKS {
        let folder_path = format!("{course}/{dir}");
        let children = lessons
            .iter()
            .map(|(name, file)| FileNode::file(*name, format!("{folder_path}/{file}")))
            .collect();
        tree.push(FileNode::folder(title, folder_path, children));
    }

    tree
}
