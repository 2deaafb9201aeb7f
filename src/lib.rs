pub mod config;
pub mod error;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod parser;
pub mod prompts;
pub mod routes;
pub mod services;
pub mod telemetry;

use std::sync::Arc;
use std::time::Instant;

pub use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }
}
