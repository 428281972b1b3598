use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One (user, item, score) triple from the score artifact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRecord {
    pub user_id: i64,
    pub item_id: i64,
    pub score: f64,
}

/// An item scored for a single user, before ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredItem {
    pub item_id: i64,
    pub score: f64,
}

impl From<&ScoreRecord> for ScoredItem {
    fn from(record: &ScoreRecord) -> Self {
        Self {
            item_id: record.item_id,
            score: record.score,
        }
    }
}

/// Display metadata for an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub item_id: i64,
    pub title: Option<String>,
}

/// A ranked, enriched recommendation as returned to callers.
///
/// Field names on the wire follow the movie catalogue the scores were
/// computed against (`movie_id`, `predicted_rating`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Recommendation {
    #[serde(rename = "movie_id")]
    pub item_id: i64,
    pub title: String,
    #[serde(rename = "predicted_rating")]
    pub score: f64,
}
