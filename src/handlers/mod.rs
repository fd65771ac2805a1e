pub mod files;
pub mod lessons;
pub mod progress;

use axum::{
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::get,
  Json, Router,
};
use serde_json::json;
use std::path::Path;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::state::AppState;

pub use files::{file_tree, markdown};
pub use lessons::{lesson_action, lesson_status, list_lessons, update_lesson};
pub use progress::progress;

/// Error surfaced to API clients as an `{"error", "path"?}` body.
#[derive(Debug)]
pub struct ApiError {
  status: StatusCode,
  message: String,
  path: Option<String>,
}

impl ApiError {
  /// Missing parameter, unknown action, or an unsafe path (400)
  pub fn invalid_request(message: impl Into<String>) -> Self {
    Self::new(StatusCode::BAD_REQUEST, message)
  }

  /// Requested content doesn't exist (404)
  pub fn not_found(message: impl Into<String>) -> Self {
    Self::new(StatusCode::NOT_FOUND, message)
  }

  pub fn internal(message: impl Into<String>) -> Self {
    Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
  }

  fn new(status: StatusCode, message: impl Into<String>) -> Self {
    Self {
      status,
      message: message.into(),
      path: None,
    }
  }

  /// Echo the requested path back in the body
  pub fn with_path(mut self, path: Option<&str>) -> Self {
    self.path = path.map(str::to_string);
    self
  }

  pub fn status(&self) -> StatusCode {
    self.status
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let body = match self.path {
      Some(path) => json!({ "error": self.message, "path": path }),
      None => json!({ "error": self.message }),
    };
    (self.status, Json(body)).into_response()
  }
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
  Json(json!({
    "status": "ok",
    "backend": state.progress.backend_name(),
  }))
}

/// Build the application router. Anything outside the API is served from
/// `static_dir`, where the front end lives.
pub fn router(state: AppState, static_dir: &Path) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/api/files", get(file_tree))
    .route("/api/markdown", get(markdown))
    .route("/api/lessons", get(list_lessons).post(lesson_action))
    .route("/api/lessons/{*path}", get(lesson_status).put(update_lesson))
    .route("/api/progress", get(progress))
    .fallback_service(ServeDir::new(static_dir))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
