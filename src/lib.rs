pub mod config;
pub mod content;
pub mod db;
pub mod handlers;
pub mod paths;
pub mod progress;
pub mod state;

#[cfg(test)]
pub mod testing;
