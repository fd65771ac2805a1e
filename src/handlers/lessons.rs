//! Lesson catalog and per-lesson completion.

use axum::{
  extract::{rejection::JsonRejection, Path, State},
  Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::ApiError;
use crate::db::LogOnError;
use crate::progress::LessonRecord;
use crate::state::AppState;

/// Body of POST /api/lessons and PUT /api/lessons/{path}
#[derive(Debug, Deserialize)]
pub struct ActionRequest {
  pub action: String,
}

fn parse_action(body: Result<Json<ActionRequest>, JsonRejection>) -> Result<String, ApiError> {
  body
    .map(|Json(req)| req.action)
    .map_err(|e| ApiError::invalid_request(format!("Invalid request body: {}", e.body_text())))
}

/// GET /api/lessons
pub async fn list_lessons(State(state): State<AppState>) -> Json<Vec<LessonRecord>> {
  Json(state.progress.list_all().log_warn_default("Error fetching lessons"))
}

/// POST /api/lessons with `{"action": "initialize"}`
pub async fn lesson_action(
  State(state): State<AppState>,
  body: Result<Json<ActionRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
  match parse_action(body)?.as_str() {
    "initialize" => {
      let created = state
        .progress
        .initialize()
        .log_warn_default("Error initializing lessons");
      Ok(Json(json!({
        "message": "Lessons initialized successfully",
        "created": created,
      })))
    }
    _ => Err(ApiError::invalid_request("Invalid action")),
  }
}

/// GET /api/lessons/{*path}
///
/// `path` may be a tree path from /api/files or a catalog key.
pub async fn lesson_status(State(state): State<AppState>, Path(path): Path<String>) -> Json<Value> {
  let is_completed = state
    .progress
    .is_completed(state.content.lesson_key(&path))
    .log_warn_default("Error checking lesson completion");
  Json(json!({ "isCompleted": is_completed }))
}

/// PUT /api/lessons/{*path} with `{"action": "complete" | "incomplete"}`
///
/// A failed write is logged and reported as not completed.
pub async fn update_lesson(
  State(state): State<AppState>,
  Path(path): Path<String>,
  body: Result<Json<ActionRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
  let key = state.content.lesson_key(&path);
  let (result, message) = match parse_action(body)?.as_str() {
    "complete" => (state.progress.set_completed(key), "Lesson marked as completed"),
    "incomplete" => (state.progress.set_incomplete(key), "Lesson marked as incomplete"),
    _ => return Err(ApiError::invalid_request("Invalid action")),
  };

  let is_completed = result
    .log_warn("Error updating lesson")
    .is_some_and(|record| record.is_completed);
  if is_completed {
    tracing::info!("Completed lesson {}", key);
  }

  Ok(Json(json!({ "message": message, "isCompleted": is_completed })))
}
