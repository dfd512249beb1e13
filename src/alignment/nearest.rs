#[cfg(feature = "parallel")]
use rayon::prelude::*;

use serde::{Deserialize, Serialize};

use crate::alignment::distance::DistanceMatrix;
use crate::alignment::kd_tree::KdTree;
use crate::error::UnitSelectionError;
use crate::pipeline::traits::SpatialIndex;
use crate::types::{Cost, FeatureMatrix, ResultSequence};

/// Result of a single nearest-neighbor query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: Cost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Full target x corpus distance matrix, row-wise argmin.
    BruteForce,
    /// k-d tree over the corpus, one query per target frame.
    Tree,
}

impl SearchStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchStrategy::BruteForce => "brute_force",
            SearchStrategy::Tree => "tree",
        }
    }
}

/// Maps each target frame independently to its closest corpus frame.
pub fn nearest_neighbor_search(
    target: &FeatureMatrix,
    corpus: &FeatureMatrix,
    strategy: SearchStrategy,
) -> Result<ResultSequence, UnitSelectionError> {
    tracing::debug!(
        strategy = strategy.as_str(),
        target_frames = target.len(),
        corpus_frames = corpus.len(),
        "nearest-neighbor search"
    );
    match strategy {
        SearchStrategy::BruteForce => brute_force_search(target, corpus),
        SearchStrategy::Tree => tree_search(target, corpus),
    }
}

pub fn brute_force_search(
    target: &FeatureMatrix,
    corpus: &FeatureMatrix,
) -> Result<ResultSequence, UnitSelectionError> {
    let costs = DistanceMatrix::between(target, corpus)?;
    Ok((0..costs.rows()).map(|i| costs.argmin_row(i)).collect())
}

pub fn tree_search(
    target: &FeatureMatrix,
    corpus: &FeatureMatrix,
) -> Result<ResultSequence, UnitSelectionError> {
    corpus.ensure_non_empty("nearest-neighbor corpus")?;
    target.ensure_non_empty("nearest-neighbor target")?;
    target.ensure_same_dim(corpus, "nearest-neighbor search")?;

    let tree = KdTree::build(corpus)?;
    query_index(&tree, target)
}

/// Queries every target row against a prebuilt index.
pub fn query_index(
    index: &dyn SpatialIndex,
    target: &FeatureMatrix,
) -> Result<ResultSequence, UnitSelectionError> {
    #[cfg(feature = "parallel")]
    let hits: Vec<Option<Neighbor>> = {
        let rows: Vec<&[f64]> = target.rows().collect();
        rows.par_iter().map(|row| index.nearest(row)).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let hits: Vec<Option<Neighbor>> = target.rows().map(|row| index.nearest(row)).collect();

    hits.into_iter()
        .map(|hit| {
            hit.map(|n| n.index)
                .ok_or_else(|| UnitSelectionError::empty_input("spatial index"))
        })
        .collect()
}
