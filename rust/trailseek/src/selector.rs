use crate::resolver::Trail;
use serde::Serialize;

/// Trails that survive both global filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub max_length: usize,
    pub max_drop: u64,
    pub trails: Vec<Trail>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.trails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trails.is_empty()
    }
}

/// Keeps the longest trails, then among those the ones with the largest drop.
///
/// Input order is preserved for the survivors. With no candidates both
/// maxima are zero and the selection is empty.
pub fn select_trails(candidates: Vec<Trail>) -> Selection {
    let max_length = candidates.iter().map(Trail::len).max().unwrap_or(0);
    let longest: Vec<Trail> = candidates
        .into_iter()
        .filter(|t| t.len() == max_length)
        .collect();

    let max_drop = longest.iter().map(Trail::elevation_drop).max().unwrap_or(0);
    let trails = longest
        .into_iter()
        .filter(|t| t.elevation_drop() == max_drop)
        .collect();

    Selection {
        max_length,
        max_drop,
        trails,
    }
}
