pub mod config;
pub mod error;
pub mod handlers;
pub mod loader;
pub mod metrics;
pub mod models;
pub mod openapi;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
pub use loader::Artifacts;
pub use services::{EngineConfig, RecommendError, RecommendationEngine, ScoreStore};
