use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use course_viewer::config::AppConfig;
use course_viewer::handlers;
use course_viewer::progress::ProgressStore;
use course_viewer::state::{AppState, ContentSettings};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "course_viewer=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = match AppConfig::load() {
    Ok(config) => config,
    Err(e) => {
      tracing::error!("Invalid configuration: {}", e);
      process::exit(1);
    }
  };

  let progress = match ProgressStore::open(&config.backend) {
    Ok(store) => store,
    Err(e) => {
      tracing::error!("Failed to open {} progress backend: {}", config.backend.as_str(), e);
      process::exit(1);
    }
  };
  if let Err(e) = progress.initialize() {
    tracing::warn!("Failed to seed lesson catalog: {}", e);
  }

  let course_root = config.course_root();
  if !course_root.is_dir() {
    tracing::warn!(
      "Course directory {} not found; the static lesson tree will be served",
      course_root.display()
    );
  }

  let state = AppState::new(progress, ContentSettings::from_config(&config));
  let app = handlers::router(state, &config.static_dir);

  let bind_addr = config.bind_addr();
  let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
    Ok(listener) => listener,
    Err(e) => {
      tracing::error!("Failed to bind to {}: {}", bind_addr, e);
      process::exit(1);
    }
  };

  tracing::info!("Server running on http://localhost:{}", config.server_port);

  if let Err(e) = axum::serve(listener, app).await {
    tracing::error!("Server error: {}", e);
    process::exit(1);
  }
}
