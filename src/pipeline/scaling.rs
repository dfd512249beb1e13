use crate::error::UnitSelectionError;
use crate::pipeline::traits::Scaler;
use crate::types::FeatureMatrix;

/// Per-dimension `(x - offset) / scale`, fit from one matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineScaling {
    pub offset: Vec<f64>,
    pub scale: Vec<f64>,
}

impl AffineScaling {
    pub fn apply(&self, features: &FeatureMatrix) -> Result<FeatureMatrix, UnitSelectionError> {
        if features.dim() != self.offset.len() && !features.is_empty() {
            return Err(UnitSelectionError::dimension_mismatch(
                "apply scaling",
                self.offset.len(),
                features.dim(),
            ));
        }
        let rows = features
            .rows()
            .map(|row| {
                row.iter()
                    .zip(self.offset.iter().zip(&self.scale))
                    .map(|(x, (offset, scale))| (x - offset) / scale)
                    .collect()
            })
            .collect();
        FeatureMatrix::new(rows)
    }
}

/// A zero range or deviation divides by 1 instead, mapping the constant
/// dimension to 0.
fn guard_zero_scale(scale: &mut [f64], scaler: &'static str) {
    let mut constant_dims = 0usize;
    for s in scale.iter_mut() {
        if *s == 0.0 {
            *s = 1.0;
            constant_dims += 1;
        }
    }
    if constant_dims > 0 {
        tracing::warn!(scaler, constant_dims, "constant feature dimensions scaled to 0");
    }
}

/// Rescales each dimension to `[0, 1]` from its observed range.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinMaxScaler;

impl MinMaxScaler {
    pub fn fit(&self, features: &FeatureMatrix) -> Result<AffineScaling, UnitSelectionError> {
        features.ensure_non_empty("min-max scaler fit")?;
        let dim = features.dim();
        let mut min = vec![f64::INFINITY; dim];
        let mut max = vec![f64::NEG_INFINITY; dim];
        for row in features.rows() {
            for (d, &x) in row.iter().enumerate() {
                min[d] = min[d].min(x);
                max[d] = max[d].max(x);
            }
        }
        let mut scale: Vec<f64> = max.iter().zip(&min).map(|(hi, lo)| hi - lo).collect();
        guard_zero_scale(&mut scale, "min_max");
        Ok(AffineScaling { offset: min, scale })
    }
}

impl Scaler for MinMaxScaler {
    fn fit_transform(&self, features: &FeatureMatrix) -> Result<FeatureMatrix, UnitSelectionError> {
        self.fit(features)?.apply(features)
    }
}

/// Zero mean, unit population variance per dimension.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardScaler;

impl StandardScaler {
    pub fn fit(&self, features: &FeatureMatrix) -> Result<AffineScaling, UnitSelectionError> {
        features.ensure_non_empty("standard scaler fit")?;
        let dim = features.dim();
        let n = features.len() as f64;

        let mut mean = vec![0.0f64; dim];
        for row in features.rows() {
            for (acc, &x) in mean.iter_mut().zip(row) {
                *acc += x;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut var = vec![0.0f64; dim];
        for row in features.rows() {
            for ((acc, &x), m) in var.iter_mut().zip(row).zip(&mean) {
                let d = x - m;
                *acc += d * d;
            }
        }
        let mut scale: Vec<f64> = var.iter().map(|v| (v / n).sqrt()).collect();
        guard_zero_scale(&mut scale, "standard_score");
        Ok(AffineScaling {
            offset: mean,
            scale,
        })
    }
}

impl Scaler for StandardScaler {
    fn fit_transform(&self, features: &FeatureMatrix) -> Result<FeatureMatrix, UnitSelectionError> {
        self.fit(features)?.apply(features)
    }
}

/// Pass-through.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityScaler;

impl Scaler for IdentityScaler {
    fn fit_transform(&self, features: &FeatureMatrix) -> Result<FeatureMatrix, UnitSelectionError> {
        Ok(features.clone())
    }
}
