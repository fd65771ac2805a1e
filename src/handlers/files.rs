//! Lesson tree and raw lesson text.

use axum::{
  extract::{Query, State},
  http::header,
  response::{IntoResponse, Response},
  Json,
};
use serde::Deserialize;

use super::ApiError;
use crate::content::{self, FileNode, LessonTextError};
use crate::state::AppState;

/// GET /api/files
///
/// Falls back to the built-in course tree when the course directory
/// can't be scanned.
pub async fn file_tree(State(state): State<AppState>) -> Json<Vec<FileNode>> {
  let settings = &state.content;
  let course_root = settings.course_root();

  let tree = match content::scan_directory(&course_root, &settings.course_dir, &settings.scan_options) {
    Ok(tree) => {
      tracing::debug!("Scanned {} top-level lesson entries", tree.len());
      tree
    }
    Err(e) => {
      tracing::warn!("{}; serving static lesson tree", e);
      content::static_course_tree(&settings.course_dir)
    }
  };

  Json(tree)
}

#[derive(Debug, Deserialize)]
pub struct MarkdownQuery {
  pub path: Option<String>,
}

/// GET /api/markdown?path=<lesson path>
pub async fn markdown(State(state): State<AppState>, Query(query): Query<MarkdownQuery>) -> Response {
  let requested = query.path.as_deref();

  match content::read_lesson_markdown(&state.content.content_root, requested) {
    Ok(text) => ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text).into_response(),
    Err(e) => lesson_text_error(e).with_path(requested).into_response(),
  }
}

fn lesson_text_error(e: LessonTextError) -> ApiError {
  match &e {
    LessonTextError::NotFound(_) => {
      tracing::debug!("Markdown file not found: {}", e);
      ApiError::not_found(e.user_message())
    }
    e if e.is_invalid_request() => {
      tracing::warn!("Rejected markdown request: {}", e);
      ApiError::invalid_request(e.user_message())
    }
    _ => {
      tracing::error!("Error reading markdown file: {}", e);
      ApiError::internal(e.user_message())
    }
  }
}
