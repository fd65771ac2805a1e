use axum::{
  extract::{Query, State},
  response::{IntoResponse, Response},
  Json,
};
use serde::Deserialize;

use crate::db::LogOnError;
use crate::progress::GroupProgress;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
  pub week: Option<String>,
}

/// GET /api/progress[?week=<group>]
///
/// With `week`, a single group summary; otherwise one summary per course
/// group. Storage failures report zero progress instead of an error.
pub async fn progress(State(state): State<AppState>, Query(query): Query<ProgressQuery>) -> Response {
  match query.week.as_deref().filter(|w| !w.is_empty()) {
    Some(week) => {
      let summary = state
        .progress
        .group_progress(week)
        .log_warn("Error fetching group progress")
        .unwrap_or_else(|| GroupProgress::empty(week));
      Json(summary).into_response()
    }
    None => {
      let overall: Vec<GroupProgress> = state
        .progress
        .overall_progress()
        .log_warn_default("Error fetching overall progress");
      Json(overall).into_response()
    }
  }
}
