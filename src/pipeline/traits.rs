use crate::alignment::nearest::Neighbor;
use crate::error::UnitSelectionError;
use crate::types::{FeatureMatrix, ResultSequence};

/// Metric between two feature vectors of equal length.
pub trait DistanceFunction: Send + Sync {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;
}

/// Index over a corpus answering single nearest-neighbor queries.
pub trait SpatialIndex: Send + Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Closest indexed vector; ties resolve to the lowest corpus index.
    /// `None` only when the index is empty.
    fn nearest(&self, query: &[f64]) -> Option<Neighbor>;
}

/// Per-dimension rescaling fit on, and applied to, a single matrix.
pub trait Scaler: Send + Sync {
    fn fit_transform(&self, features: &FeatureMatrix) -> Result<FeatureMatrix, UnitSelectionError>;
}

/// Maps every target frame to a corpus index.
pub trait UnitSearch: Send + Sync {
    fn search(
        &self,
        target: &FeatureMatrix,
        corpus: &FeatureMatrix,
    ) -> Result<ResultSequence, UnitSelectionError>;
}
