use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;

use crate::metrics;
use crate::models::{Recommendation, ScoredItem};

use super::{MetadataTable, RecommendError, Result, ScoreStore};

pub const DEFAULT_MAX_K: usize = 50;
pub const DEFAULT_PLACEHOLDER_TITLE: &str = "Unknown title";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Largest accepted `k`; bounds response size.
    pub max_k: usize,
    /// Title used when an item has no metadata.
    pub placeholder_title: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_k: DEFAULT_MAX_K,
            placeholder_title: DEFAULT_PLACEHOLDER_TITLE.to_string(),
        }
    }
}

/// Top-K retrieval over the loaded score and metadata artifacts.
///
/// Both stores are shared read-only; `recommend` is a pure, synchronous
/// computation and can run concurrently from any number of workers.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    scores: Arc<ScoreStore>,
    metadata: Arc<MetadataTable>,
    config: EngineConfig,
}

impl RecommendationEngine {
    pub fn new(scores: Arc<ScoreStore>, metadata: Arc<MetadataTable>, config: EngineConfig) -> Self {
        Self {
            scores,
            metadata,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scores(&self) -> &ScoreStore {
        &self.scores
    }

    pub fn metadata(&self) -> &MetadataTable {
        &self.metadata
    }

    /// Top `k` items for `user_id`, highest score first.
    ///
    /// Equal scores are ordered by ascending item id; duplicate rows for the
    /// same item keep their artifact order and are not merged.
    pub fn recommend(&self, user_id: Option<i64>, k: i64) -> Result<Vec<Recommendation>> {
        let user_id =
            user_id.ok_or_else(|| RecommendError::InvalidRequest("missing user_id".to_string()))?;
        let k = self.validate_k(k)?;

        let items = self.scores.scores_for_user(user_id)?;
        let candidates = items.len();
        let top = rank_top_k(items, k);

        debug!(
            user_id,
            k,
            candidates,
            returned = top.len(),
            "Ranked recommendations"
        );

        Ok(top.into_iter().map(|item| self.enrich(item)).collect())
    }

    /// Checks `k` against `1..=max_k`.
    pub fn validate_k(&self, k: i64) -> Result<usize> {
        usize::try_from(k)
            .ok()
            .filter(|k| (1..=self.config.max_k).contains(k))
            .ok_or_else(|| {
                RecommendError::InvalidRequest(format!(
                    "k out of range: must be between 1 and {}",
                    self.config.max_k
                ))
            })
    }

    fn enrich(&self, item: ScoredItem) -> Recommendation {
        let title = match self.metadata.title(item.item_id) {
            Some(title) => title.to_string(),
            None => {
                debug!(item_id = item.item_id, "No metadata for item, using placeholder title");
                metrics::METADATA_PLACEHOLDER_TOTAL.inc();
                self.config.placeholder_title.clone()
            }
        };

        Recommendation {
            item_id: item.item_id,
            title,
            score: item.score,
        }
    }
}

/// Sorts by score descending, then item id ascending, and keeps the first `k`.
pub fn rank_top_k(mut items: Vec<ScoredItem>, k: usize) -> Vec<ScoredItem> {
    items.sort_by(compare_ranked);
    items.truncate(k);
    items
}

fn compare_ranked(a: &ScoredItem, b: &ScoredItem) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.item_id.cmp(&b.item_id))
}
