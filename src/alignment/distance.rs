#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::UnitSelectionError;
use crate::pipeline::traits::DistanceFunction;
use crate::types::{Cost, FeatureMatrix};

/// Straight-line (L2) distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl DistanceFunction for Euclidean {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        euclidean(a, b)
    }
}

/// L2 distance, summed in dimension order. Every code path that ranks
/// corpus frames goes through this routine so results stay bit-identical.
#[inline]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Index of the smallest value; the lowest index wins ties.
pub fn argmin(values: &[Cost]) -> Option<(usize, Cost)> {
    let mut best: Option<(usize, Cost)> = None;
    for (idx, &value) in values.iter().enumerate() {
        match best {
            Some((_, best_value)) if value >= best_value || value.is_nan() => {}
            _ => best = Some((idx, value)),
        }
    }
    best
}

/// Row-major `rows x cols` table of pairwise distances between two sets.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    rows: usize,
    cols: usize,
    data: Vec<Cost>,
}

impl DistanceMatrix {
    /// Euclidean distances from every row of `a` to every row of `b`.
    pub fn between(a: &FeatureMatrix, b: &FeatureMatrix) -> Result<Self, UnitSelectionError> {
        Self::between_with(a, b, &Euclidean)
    }

    pub fn between_with(
        a: &FeatureMatrix,
        b: &FeatureMatrix,
        metric: &dyn DistanceFunction,
    ) -> Result<Self, UnitSelectionError> {
        a.ensure_non_empty("distance matrix: first set")?;
        b.ensure_non_empty("distance matrix: second set")?;
        a.ensure_same_dim(b, "distance matrix")?;

        let rows = a.len();
        let cols = b.len();

        #[cfg(feature = "parallel")]
        let data = {
            let left: Vec<&[f64]> = a.rows().collect();
            let right: Vec<&[f64]> = b.rows().collect();
            left.par_iter()
                .map(|x| right.iter().map(|y| metric.distance(x, y)).collect::<Vec<_>>())
                .collect::<Vec<_>>()
                .concat()
        };

        #[cfg(not(feature = "parallel"))]
        let data = {
            let mut data = Vec::with_capacity(rows * cols);
            for x in a.rows() {
                data.extend(b.rows().map(|y| metric.distance(x, y)));
            }
            data
        };

        tracing::trace!(rows, cols, "distance matrix computed");
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, i: usize, j: usize) -> Cost {
        self.data[i * self.cols + j]
    }

    pub fn row(&self, i: usize) -> &[Cost] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Column of the smallest entry in row `i`, lowest index on ties.
    pub fn argmin_row(&self, i: usize) -> usize {
        argmin(self.row(i)).map(|(idx, _)| idx).unwrap_or(0)
    }

    /// Overwrites every exact-zero entry with `value`, returning how many
    /// entries were replaced.
    pub(crate) fn replace_zeros(&mut self, value: Cost) -> usize {
        let mut replaced = 0;
        for entry in &mut self.data {
            if *entry == 0.0 {
                *entry = value;
                replaced += 1;
            }
        }
        replaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[f64]]) -> FeatureMatrix {
        FeatureMatrix::new(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn euclidean_matches_hand_computed() {
        assert_eq!(euclidean(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(euclidean(&[1.5], &[1.5]), 0.0);
    }

    #[test]
    fn argmin_prefers_lowest_index_on_ties() {
        assert_eq!(argmin(&[3.0, 1.0, 1.0, 2.0]), Some((1, 1.0)));
        assert_eq!(argmin(&[f64::INFINITY, f64::INFINITY]), Some((0, f64::INFINITY)));
        assert_eq!(argmin(&[]), None);
    }

    #[test]
    fn cross_distances_have_expected_shape_and_values() {
        let obs = matrix(&[&[1.0], &[11.0]]);
        let states = matrix(&[&[0.0], &[10.0], &[20.0]]);
        let d = DistanceMatrix::between(&obs, &states).unwrap();
        assert_eq!((d.rows(), d.cols()), (2, 3));
        assert_eq!(d.row(0), &[1.0, 9.0, 19.0]);
        assert_eq!(d.row(1), &[11.0, 1.0, 9.0]);
        assert_eq!(d.argmin_row(1), 1);
    }

    #[test]
    fn self_distances_are_symmetric_with_zero_diagonal() {
        let set = matrix(&[&[0.0, 1.0], &[2.0, -1.0], &[4.0, 4.0], &[-3.0, 0.5]]);
        let d = DistanceMatrix::between(&set, &set).unwrap();
        for i in 0..set.len() {
            assert_eq!(d.get(i, i), 0.0);
            for j in 0..set.len() {
                assert_eq!(d.get(i, j), d.get(j, i));
            }
        }
    }

    #[test]
    fn rejects_empty_sets_and_mismatched_dims() {
        let set = matrix(&[&[0.0, 1.0]]);
        let empty = FeatureMatrix::empty();
        assert!(matches!(
            DistanceMatrix::between(&set, &empty),
            Err(UnitSelectionError::EmptyInput { .. })
        ));
        assert!(matches!(
            DistanceMatrix::between(&empty, &set),
            Err(UnitSelectionError::EmptyInput { .. })
        ));

        let wide = matrix(&[&[0.0, 1.0, 2.0]]);
        assert!(matches!(
            DistanceMatrix::between(&wide, &set),
            Err(UnitSelectionError::DimensionMismatch {
                expected: 2,
                actual: 3,
                ..
            })
        ));
    }

    #[test]
    fn replace_zeros_counts_all_zero_entries() {
        let set = matrix(&[&[0.0], &[0.0], &[1.0]]);
        let mut d = DistanceMatrix::between(&set, &set).unwrap();
        // Diagonal plus the coincident (0, 1) pair in both directions.
        assert_eq!(d.replace_zeros(f64::INFINITY), 5);
        assert!(d.get(0, 1).is_infinite());
        assert_eq!(d.get(0, 2), 1.0);
    }
}
