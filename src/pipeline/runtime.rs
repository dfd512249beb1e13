use crate::config::{Normalization, SelectionConfig, SelectionMethod};
use crate::error::UnitSelectionError;
use crate::pipeline::builder::UnitSelectorBuilder;
use crate::pipeline::traits::{Scaler, UnitSearch};
use crate::types::{FeatureMatrix, ResultSequence};

pub struct UnitSelector {
    config: SelectionConfig,
    scaler: Box<dyn Scaler>,
    search: Box<dyn UnitSearch>,
}

pub(crate) struct UnitSelectorParts {
    pub config: SelectionConfig,
    pub scaler: Box<dyn Scaler>,
    pub search: Box<dyn UnitSearch>,
}

impl UnitSelector {
    pub(crate) fn from_parts(parts: UnitSelectorParts) -> Self {
        Self {
            config: parts.config,
            scaler: parts.scaler,
            search: parts.search,
        }
    }

    pub fn config(&self) -> SelectionConfig {
        self.config
    }

    /// Scales target and corpus (each with its own fit), then searches.
    pub fn select(
        &self,
        target: &FeatureMatrix,
        corpus: &FeatureMatrix,
    ) -> Result<ResultSequence, UnitSelectionError> {
        target.ensure_non_empty("unit selection target")?;
        corpus.ensure_non_empty("unit selection corpus")?;
        target.ensure_same_dim(corpus, "unit selection")?;

        tracing::debug!(
            method = self.config.method.as_str(),
            normalization = self.config.normalization.as_str(),
            target_frames = target.len(),
            corpus_frames = corpus.len(),
            dim = target.dim(),
            "unit selection"
        );

        let target = self.scaler.fit_transform(target)?;
        let corpus = self.scaler.fit_transform(corpus)?;
        let sequence = self.search.search(&target, &corpus)?;

        debug_assert_eq!(sequence.len(), target.len());
        Ok(sequence)
    }
}

/// One-shot selection with the default strategy for `method`.
pub fn select_units(
    target: &FeatureMatrix,
    corpus: &FeatureMatrix,
    method: SelectionMethod,
    normalization: Normalization,
) -> Result<ResultSequence, UnitSelectionError> {
    UnitSelectorBuilder::new(SelectionConfig {
        method,
        normalization,
    })
    .build()
    .select(target, corpus)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[f64]]) -> FeatureMatrix {
        FeatureMatrix::new(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn select_without_normalization_matches_raw_search() {
        let corpus = matrix(&[&[0.0], &[10.0], &[20.0]]);
        let target = matrix(&[&[1.0], &[11.0]]);
        for method in SelectionMethod::ALL {
            let seq = select_units(&target, &corpus, method, Normalization::None).unwrap();
            assert_eq!(seq, vec![0, 1], "{method}");
        }
    }

    #[test]
    fn target_and_corpus_are_scaled_independently() {
        // After independent min-max fits the target [100, 200] becomes [0, 1]
        // and lines up with the corpus ends, not with the raw-nearest frame.
        let corpus = matrix(&[&[0.0], &[150.0], &[300.0]]);
        let target = matrix(&[&[100.0], &[200.0]]);
        let raw = select_units(
            &target,
            &corpus,
            SelectionMethod::NearestNeighborBruteForce,
            Normalization::None,
        )
        .unwrap();
        assert_eq!(raw, vec![1, 1]);

        let scaled = select_units(
            &target,
            &corpus,
            SelectionMethod::NearestNeighborBruteForce,
            Normalization::MinMax,
        )
        .unwrap();
        assert_eq!(scaled, vec![0, 2]);
    }

    #[test]
    fn select_rejects_empty_and_mismatched_inputs() {
        let corpus = matrix(&[&[0.0, 1.0], &[1.0, 0.0]]);
        let err = select_units(
            &FeatureMatrix::empty(),
            &corpus,
            SelectionMethod::ViterbiMarkov,
            Normalization::MinMax,
        )
        .unwrap_err();
        assert!(matches!(err, UnitSelectionError::EmptyInput { .. }));

        let wide = matrix(&[&[0.0, 1.0, 2.0]]);
        let err = select_units(
            &wide,
            &corpus,
            SelectionMethod::NearestNeighborTree,
            Normalization::StandardScore,
        )
        .unwrap_err();
        assert!(matches!(err, UnitSelectionError::DimensionMismatch { .. }));
    }
}
