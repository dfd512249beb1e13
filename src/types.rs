use serde::{Deserialize, Serialize};

use crate::error::UnitSelectionError;

/// Additive path cost. Lower is better; equivalent to a negative
/// log-probability in a classical HMM.
pub type Cost = f64;

/// Transition cost assigned to staying on the same corpus frame (no
/// self-loop policy). Any zero-distance state pair receives it, so a decoded
/// path never repeats a frame on consecutive steps.
pub const NO_SELF_LOOP_COST: Cost = f64::INFINITY;

/// One corpus index per target frame, in target order.
pub type ResultSequence = Vec<usize>;

/// Ordered frames of equal dimensionality.
///
/// Used both for target sequences (temporal order) and for corpora (order is
/// only an index space).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct FeatureMatrix {
    rows: Vec<Vec<f64>>,
    dim: usize,
}

impl FeatureMatrix {
    /// Builds a matrix, rejecting ragged rows and NaN or infinite values.
    /// Every search path ranks frames by finite distances only.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, UnitSelectionError> {
        let dim = rows.first().map(Vec::len).unwrap_or(0);
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(UnitSelectionError::dimension_mismatch(
                    "feature matrix rows",
                    dim,
                    row.len(),
                ));
            }
            if let Some(d) = row.iter().position(|x| !x.is_finite()) {
                return Err(UnitSelectionError::NonFiniteFeature {
                    row: row_idx,
                    dim: d,
                });
            }
        }
        Ok(Self { rows, dim })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Feature dimensionality; 0 for an empty matrix.
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn row(&self, index: usize) -> &[f64] {
        &self.rows[index]
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }

    pub(crate) fn ensure_non_empty(&self, context: &'static str) -> Result<(), UnitSelectionError> {
        if self.is_empty() {
            return Err(UnitSelectionError::empty_input(context));
        }
        Ok(())
    }

    /// Both matrices must be non-empty for the dimensions to be meaningful.
    pub(crate) fn ensure_same_dim(
        &self,
        other: &FeatureMatrix,
        context: &'static str,
    ) -> Result<(), UnitSelectionError> {
        if self.dim != other.dim {
            return Err(UnitSelectionError::dimension_mismatch(
                context, other.dim, self.dim,
            ));
        }
        Ok(())
    }
}

impl TryFrom<Vec<Vec<f64>>> for FeatureMatrix {
    type Error = UnitSelectionError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<FeatureMatrix> for Vec<Vec<f64>> {
    fn from(matrix: FeatureMatrix) -> Self {
        matrix.rows
    }
}
