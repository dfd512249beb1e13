use crate::alignment::nearest::{brute_force_search, tree_search};
use crate::alignment::viterbi::ViterbiDecoder;
use crate::config::{Normalization, SelectionMethod};
use crate::error::UnitSelectionError;
use crate::pipeline::scaling::{IdentityScaler, MinMaxScaler, StandardScaler};
use crate::pipeline::traits::{Scaler, UnitSearch};
use crate::types::{FeatureMatrix, ResultSequence};

pub struct KdTreeSearch;

impl UnitSearch for KdTreeSearch {
    fn search(
        &self,
        target: &FeatureMatrix,
        corpus: &FeatureMatrix,
    ) -> Result<ResultSequence, UnitSelectionError> {
        tree_search(target, corpus)
    }
}

pub struct BruteForceSearch;

impl UnitSearch for BruteForceSearch {
    fn search(
        &self,
        target: &FeatureMatrix,
        corpus: &FeatureMatrix,
    ) -> Result<ResultSequence, UnitSelectionError> {
        brute_force_search(target, corpus)
    }
}

#[derive(Default)]
pub struct ViterbiSearch {
    decoder: ViterbiDecoder,
}

impl ViterbiSearch {
    pub fn new(decoder: ViterbiDecoder) -> Self {
        Self { decoder }
    }
}

impl UnitSearch for ViterbiSearch {
    fn search(
        &self,
        target: &FeatureMatrix,
        corpus: &FeatureMatrix,
    ) -> Result<ResultSequence, UnitSelectionError> {
        self.decoder.decode(target, corpus)
    }
}

pub fn search_for(method: SelectionMethod) -> Box<dyn UnitSearch> {
    match method {
        SelectionMethod::NearestNeighborTree => Box::new(KdTreeSearch),
        SelectionMethod::NearestNeighborBruteForce => Box::new(BruteForceSearch),
        SelectionMethod::ViterbiMarkov => Box::new(ViterbiSearch::default()),
    }
}

pub fn scaler_for(normalization: Normalization) -> Box<dyn Scaler> {
    match normalization {
        Normalization::MinMax => Box::new(MinMaxScaler),
        Normalization::StandardScore => Box::new(StandardScaler),
        Normalization::None => Box::new(IdentityScaler),
    }
}

#[cfg(test)]
mod tests {
    use crate::alignment::viterbi::viterbi_decode;

    use super::*;

    fn matrix(rows: &[&[f64]]) -> FeatureMatrix {
        FeatureMatrix::new(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn viterbi_search_matches_free_function() {
        let states = matrix(&[&[0.0], &[10.0], &[20.0]]);
        let obs = matrix(&[&[1.0], &[11.0], &[19.0]]);
        let seq = ViterbiSearch::default().search(&obs, &states).unwrap();
        assert_eq!(seq, viterbi_decode(&obs, &states).unwrap());
    }

    #[test]
    fn every_method_has_a_search() {
        let corpus = matrix(&[&[0.0], &[10.0], &[20.0]]);
        let target = matrix(&[&[1.0], &[11.0]]);
        for method in SelectionMethod::ALL {
            let seq = search_for(method).search(&target, &corpus).unwrap();
            assert_eq!(seq, vec![0, 1], "{method}");
        }
    }

    #[test]
    fn identity_scaler_for_none() {
        let m = matrix(&[&[3.0, -1.0]]);
        assert_eq!(scaler_for(Normalization::None).fit_transform(&m).unwrap(), m);
    }
}
