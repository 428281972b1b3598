use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use crate::models::{ScoreRecord, ScoredItem};

use super::{RecommendError, Result};

/// Physical layout of the score artifact, detected once at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One row per (user, item, score)
    Long,
    /// One row per user, one column per item
    Matrix,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Long => write!(f, "long"),
            Layout::Matrix => write!(f, "matrix"),
        }
    }
}

/// Read-only score store over either artifact layout.
#[derive(Debug)]
pub enum ScoreStore {
    Long(LongScores),
    Matrix(MatrixScores),
}

impl ScoreStore {
    pub fn layout(&self) -> Layout {
        match self {
            ScoreStore::Long(_) => Layout::Long,
            ScoreStore::Matrix(_) => Layout::Matrix,
        }
    }

    /// Number of distinct users the store can answer for.
    pub fn user_count(&self) -> usize {
        match self {
            ScoreStore::Long(long) => long.by_user.len(),
            ScoreStore::Matrix(matrix) => matrix.rows.len(),
        }
    }

    /// All (item, score) pairs for `user_id`, in no particular order.
    ///
    /// Fails with [`RecommendError::UserNotFound`] when the long layout has no
    /// row for the user or the matrix layout has no index entry for it. A
    /// matrix user whose row holds no scores is found and yields nothing.
    pub fn scores_for_user(&self, user_id: i64) -> Result<Vec<ScoredItem>> {
        match self {
            ScoreStore::Long(long) => long.scores_for_user(user_id),
            ScoreStore::Matrix(matrix) => matrix.scores_for_user(user_id),
        }
    }
}

/// Long-form rows, indexed by user for lookup.
#[derive(Debug, Default)]
pub struct LongScores {
    rows: Vec<ScoreRecord>,
    by_user: HashMap<i64, Vec<usize>>,
}

impl LongScores {
    pub fn new(rows: Vec<ScoreRecord>) -> Self {
        let mut by_user: HashMap<i64, Vec<usize>> = HashMap::new();
        for (position, row) in rows.iter().enumerate() {
            by_user.entry(row.user_id).or_default().push(position);
        }

        Self { rows, by_user }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn scores_for_user(&self, user_id: i64) -> Result<Vec<ScoredItem>> {
        let positions = self
            .by_user
            .get(&user_id)
            .ok_or(RecommendError::UserNotFound(user_id))?;

        // Rows keep artifact order so equal (score, item) pairs stay stable.
        Ok(positions
            .iter()
            .map(|&position| ScoredItem::from(&self.rows[position]))
            .collect())
    }
}

/// Matrix rows keyed by user id. A `None` cell is an item with no score.
#[derive(Debug, Default)]
pub struct MatrixScores {
    rows: HashMap<i64, Vec<(i64, Option<f64>)>>,
}

impl MatrixScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user row. Returns `false` and keeps the existing row when the
    /// user is already present, so the first row in artifact order wins.
    pub fn insert_row(&mut self, user_id: i64, cells: Vec<(i64, Option<f64>)>) -> bool {
        match self.rows.entry(user_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(cells);
                true
            }
        }
    }

    fn scores_for_user(&self, user_id: i64) -> Result<Vec<ScoredItem>> {
        let row = self
            .rows
            .get(&user_id)
            .ok_or(RecommendError::UserNotFound(user_id))?;

        Ok(row
            .iter()
            .filter_map(|&(item_id, score)| {
                score
                    .filter(|s| s.is_finite())
                    .map(|score| ScoredItem { item_id, score })
            })
            .collect())
    }
}
