//! Artifact loading
//!
//! Reads the score and metadata artifacts once at startup and normalizes
//! them into the read-only stores the engine serves from. Malformed rows are
//! filtered out here, counted, and reported; they never fail a request later.
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::metrics;
use crate::models::{MetadataEntry, ScoreRecord};
use crate::services::{LongScores, MatrixScores, MetadataTable, ScoreStore};

pub mod coerce;

pub use coerce::{coerce_id, coerce_score};

const USER_FIELD: &str = "user_id";
const ITEM_FIELD: &str = "movie_id";
const SCORE_FIELD: &str = "predicted_rating";
const TITLE_FIELD: &str = "title";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artifact {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported artifact shape in {path}: {reason}")]
    UnsupportedShape { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, ArtifactError>;

/// Process-wide, read-only state loaded before the server accepts requests.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub scores: Arc<ScoreStore>,
    pub metadata: Arc<MetadataTable>,
}

impl Artifacts {
    pub fn load(scores_path: &Path, metadata_path: &Path) -> Result<Self> {
        let scores = load_score_store(scores_path)?;
        info!(
            path = %scores_path.display(),
            layout = %scores.layout(),
            users = scores.user_count(),
            "Score artifact loaded"
        );
        if let ScoreStore::Long(long) = &scores {
            if long.is_empty() {
                warn!(path = %scores_path.display(), "Score artifact has no usable rows");
            }
        }

        let metadata = load_metadata(metadata_path)?;
        info!(
            path = %metadata_path.display(),
            items = metadata.len(),
            "Metadata artifact loaded"
        );
        if metadata.is_empty() {
            warn!(
                path = %metadata_path.display(),
                "Metadata artifact has no usable entries; every item gets the placeholder title"
            );
        }
        if metadata.shadowed() > 0 {
            warn!(
                shadowed = metadata.shadowed(),
                "Metadata artifact repeats item ids; first entry per item is used"
            );
        }

        Ok(Self {
            scores: Arc::new(scores),
            metadata: Arc::new(metadata),
        })
    }
}

pub fn load_score_store(path: &Path) -> Result<ScoreStore> {
    let value = read_json(path)?;
    parse_score_store(&value, path)
}

pub fn load_metadata(path: &Path) -> Result<MetadataTable> {
    let value = read_json(path)?;
    parse_metadata(&value, path)
}

fn read_json(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Picks the layout from the artifact's shape: an array of records carrying
/// user, item and score fields is long form, an object of per-user rows is
/// matrix form.
pub fn parse_score_store(value: &Value, path: &Path) -> Result<ScoreStore> {
    match value {
        Value::Array(rows) => {
            if !rows.is_empty() && !has_long_fields(rows) {
                return Err(ArtifactError::UnsupportedShape {
                    path: path.to_path_buf(),
                    reason: format!(
                        "records must carry {}, {} and {}",
                        USER_FIELD, ITEM_FIELD, SCORE_FIELD
                    ),
                });
            }
            Ok(ScoreStore::Long(parse_long(rows)))
        }
        Value::Object(users) => Ok(ScoreStore::Matrix(parse_matrix(users))),
        other => Err(ArtifactError::UnsupportedShape {
            path: path.to_path_buf(),
            reason: format!("expected an array or object, found {}", kind(other)),
        }),
    }
}

pub fn parse_metadata(value: &Value, path: &Path) -> Result<MetadataTable> {
    let rows = value
        .as_array()
        .ok_or_else(|| ArtifactError::UnsupportedShape {
            path: path.to_path_buf(),
            reason: format!("expected an array of records, found {}", kind(value)),
        })?;

    let mut dropped = Dropped::new("metadata");
    let entries: Vec<MetadataEntry> = rows
        .iter()
        .filter_map(|row| {
            let Some(record) = row.as_object() else {
                dropped.count("malformed_row");
                return None;
            };
            let Some(item_id) = record.get(ITEM_FIELD).and_then(coerce_id) else {
                dropped.count("invalid_item_id");
                return None;
            };
            let title = record
                .get(TITLE_FIELD)
                .and_then(Value::as_str)
                .map(str::to_string);
            Some(MetadataEntry { item_id, title })
        })
        .collect();
    dropped.report();

    Ok(MetadataTable::from_entries(entries))
}

// A column exists if any record carries it, as in a table with nullable cells.
fn has_long_fields(rows: &[Value]) -> bool {
    [USER_FIELD, ITEM_FIELD, SCORE_FIELD].iter().all(|field| {
        rows.iter()
            .filter_map(Value::as_object)
            .any(|record| record.contains_key(*field))
    })
}

fn parse_long(rows: &[Value]) -> LongScores {
    let mut dropped = Dropped::new("scores");
    let records = rows
        .iter()
        .filter_map(|row| {
            let Some(record) = row.as_object() else {
                dropped.count("malformed_row");
                return None;
            };
            let Some(user_id) = record.get(USER_FIELD).and_then(coerce_id) else {
                dropped.count("invalid_user_id");
                return None;
            };
            let Some(item_id) = record.get(ITEM_FIELD).and_then(coerce_id) else {
                dropped.count("invalid_item_id");
                return None;
            };
            let Some(score) = record.get(SCORE_FIELD).and_then(coerce_score) else {
                dropped.count("missing_score");
                return None;
            };
            Some(ScoreRecord {
                user_id,
                item_id,
                score,
            })
        })
        .collect();
    dropped.report();

    LongScores::new(records)
}

// Walks users in artifact order (serde_json `preserve_order`). Keys that
// coerce to the same id, such as "1" and "1.0", keep the first row.
fn parse_matrix(users: &Map<String, Value>) -> MatrixScores {
    let mut dropped = Dropped::new("scores");
    let mut matrix = MatrixScores::new();

    for (user_key, row) in users {
        let Some(user_id) = coerce::coerce_id_str(user_key) else {
            dropped.count("invalid_user_id");
            continue;
        };
        let Some(row) = row.as_object() else {
            dropped.count("malformed_row");
            continue;
        };

        let cells = row
            .iter()
            .filter_map(|(item_key, score)| match coerce::coerce_id_str(item_key) {
                Some(item_id) => Some((item_id, coerce_score(score))),
                None => {
                    dropped.count("invalid_item_id");
                    None
                }
            })
            .collect();

        if !matrix.insert_row(user_id, cells) {
            dropped.count("duplicate_user");
        }
    }
    dropped.report();

    matrix
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Per-artifact tally of rows filtered out during load.
struct Dropped {
    artifact: &'static str,
    reasons: BTreeMap<&'static str, usize>,
}

impl Dropped {
    fn new(artifact: &'static str) -> Self {
        Self {
            artifact,
            reasons: BTreeMap::new(),
        }
    }

    fn count(&mut self, reason: &'static str) {
        *self.reasons.entry(reason).or_default() += 1;
    }

    fn report(&self) {
        for (reason, count) in &self.reasons {
            warn!(
                artifact = self.artifact,
                reason = *reason,
                count = *count,
                "Dropped artifact entries"
            );
            metrics::record_dropped(self.artifact, reason, *count);
        }
    }
}
