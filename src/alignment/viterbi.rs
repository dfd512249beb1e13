#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::alignment::distance::{argmin, DistanceMatrix, Euclidean};
use crate::error::UnitSelectionError;
use crate::pipeline::traits::DistanceFunction;
use crate::types::{Cost, FeatureMatrix, ResultSequence, NO_SELF_LOOP_COST};

/// Distance-derived HMM costs: corpus frames are states, target frames are
/// observations.
#[derive(Debug, Clone)]
pub struct Trellis {
    /// `S x S`; zero-distance entries carry [`NO_SELF_LOOP_COST`].
    transition: DistanceMatrix,
    /// `T x S`.
    emission: DistanceMatrix,
}

impl Trellis {
    pub fn build(
        observations: &FeatureMatrix,
        states: &FeatureMatrix,
        metric: &dyn DistanceFunction,
    ) -> Result<Self, UnitSelectionError> {
        observations.ensure_non_empty("viterbi observations")?;
        states.ensure_non_empty("viterbi states")?;
        observations.ensure_same_dim(states, "viterbi decode")?;

        let mut transition = DistanceMatrix::between_with(states, states, metric)?;
        let masked = transition.replace_zeros(NO_SELF_LOOP_COST);
        let coincident = masked.saturating_sub(states.len());
        if coincident > 0 {
            tracing::warn!(
                coincident_pairs = coincident / 2,
                "distinct corpus states at zero distance; transitions between them are disallowed"
            );
        }

        let emission = DistanceMatrix::between_with(observations, states, metric)?;
        Ok(Self {
            transition,
            emission,
        })
    }

    pub fn observations(&self) -> usize {
        self.emission.rows()
    }

    pub fn states(&self) -> usize {
        self.emission.cols()
    }

    /// Cost of moving from state `from` to state `to`.
    pub fn transition_cost(&self, to: usize, from: usize) -> Cost {
        self.transition.get(to, from)
    }

    pub fn emission_cost(&self, t: usize, state: usize) -> Cost {
        self.emission.get(t, state)
    }
}

/// Minimum-cost state sequence and its accumulated cost.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPath {
    pub states: ResultSequence,
    pub total_cost: Cost,
}

/// Sequence-optimal unit selection over a distance-derived trellis.
pub struct ViterbiDecoder {
    metric: Box<dyn DistanceFunction>,
}

impl Default for ViterbiDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ViterbiDecoder {
    pub fn new() -> Self {
        Self {
            metric: Box::new(Euclidean),
        }
    }

    pub fn with_distance(metric: Box<dyn DistanceFunction>) -> Self {
        Self { metric }
    }

    pub fn decode(
        &self,
        observations: &FeatureMatrix,
        states: &FeatureMatrix,
    ) -> Result<ResultSequence, UnitSelectionError> {
        self.decode_path(observations, states).map(|path| path.states)
    }

    pub fn decode_path(
        &self,
        observations: &FeatureMatrix,
        states: &FeatureMatrix,
    ) -> Result<DecodedPath, UnitSelectionError> {
        let trellis = Trellis::build(observations, states, self.metric.as_ref())?;
        decode_trellis(&trellis)
    }
}

/// Viterbi with the default Euclidean metric.
pub fn viterbi_decode(
    observations: &FeatureMatrix,
    states: &FeatureMatrix,
) -> Result<ResultSequence, UnitSelectionError> {
    ViterbiDecoder::new().decode(observations, states)
}

/// Forward pass keeps two cost rows; back-pointers are a flat `T x S` table.
/// Row 0 points every state at itself.
pub fn decode_trellis(trellis: &Trellis) -> Result<DecodedPath, UnitSelectionError> {
    let t_len = trellis.observations();
    let s_len = trellis.states();
    if t_len == 0 || s_len == 0 {
        return Err(UnitSelectionError::empty_input("viterbi trellis"));
    }

    let mut prev: Vec<Cost> = trellis.emission.row(0).to_vec();
    let mut curr = vec![NO_SELF_LOOP_COST; s_len];
    let mut bp = vec![0usize; t_len * s_len];
    for (s, slot) in bp[..s_len].iter_mut().enumerate() {
        *slot = s;
    }

    for t in 1..t_len {
        let emission_row = trellis.emission.row(t);

        #[cfg(feature = "parallel")]
        let step: Vec<(Cost, usize)> = (0..s_len)
            .into_par_iter()
            .map(|s| best_predecessor(&prev, trellis.transition.row(s), emission_row[s]))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let step: Vec<(Cost, usize)> = (0..s_len)
            .map(|s| best_predecessor(&prev, trellis.transition.row(s), emission_row[s]))
            .collect();

        let bp_offset = t * s_len;
        for (s, (cost, from)) in step.into_iter().enumerate() {
            curr[s] = cost;
            bp[bp_offset + s] = from;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    // With a single observation `prev` still holds the initialization row,
    // so the argmin falls back to the closest emission directly.
    let (mut s, total_cost) =
        argmin(&prev).ok_or_else(|| UnitSelectionError::empty_input("viterbi trellis"))?;
    if !total_cost.is_finite() {
        return Err(UnitSelectionError::NoValidPath {
            observations: t_len,
            states: s_len,
        });
    }

    let mut path = vec![0usize; t_len];
    for t in (0..t_len).rev() {
        path[t] = s;
        s = bp[t * s_len + s];
    }

    tracing::trace!(
        observations = t_len,
        states = s_len,
        total_cost,
        "viterbi decode finished"
    );
    Ok(DecodedPath {
        states: path,
        total_cost,
    })
}

/// Cheapest predecessor of one state; the first minimizer in index order wins.
#[inline(always)]
fn best_predecessor(prev: &[Cost], transition_row: &[Cost], emission: Cost) -> (Cost, usize) {
    let mut best = prev[0] + transition_row[0] + emission;
    let mut from = 0usize;
    for (s0, (&v, &tr)) in prev.iter().zip(transition_row).enumerate().skip(1) {
        let cand = v + tr + emission;
        if cand < best {
            best = cand;
            from = s0;
        }
    }
    (best, from)
}
