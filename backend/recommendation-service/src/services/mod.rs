//! Recommendation retrieval
//!
//! - **Score Store**: precomputed user/item scores in long or matrix layout
//! - **Metadata Table**: item display fields keyed by item id
//! - **Engine**: validate → fetch → rank → truncate → enrich
pub mod engine;
pub mod metadata;
pub mod score_store;

pub use engine::{EngineConfig, RecommendationEngine};
pub use metadata::MetadataTable;
pub use score_store::{Layout, LongScores, MatrixScores, ScoreStore};

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecommendError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{}", user_not_found_message(.0))]
    UserNotFound(i64),
}

impl RecommendError {
    /// Metric label for the outcome this error represents.
    pub fn outcome(&self) -> &'static str {
        match self {
            RecommendError::InvalidRequest(_) => "invalid_request",
            RecommendError::UserNotFound(_) => "user_not_found",
        }
    }
}

/// Message for an unknown user, shared with ids that never reach the store.
pub fn user_not_found_message(user_id: impl fmt::Display) -> String {
    format!("user_id {} not found in score artifact", user_id)
}

pub type Result<T> = std::result::Result<T, RecommendError>;
