pub mod alignment;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

pub use alignment::distance::{DistanceMatrix, Euclidean};
pub use alignment::kd_tree::KdTree;
pub use alignment::nearest::{nearest_neighbor_search, Neighbor, SearchStrategy};
pub use alignment::viterbi::{viterbi_decode, DecodedPath, Trellis, ViterbiDecoder};
pub use config::{Normalization, SelectionConfig, SelectionMethod};
pub use error::UnitSelectionError;
pub use pipeline::builder::UnitSelectorBuilder;
pub use pipeline::runtime::{select_units, UnitSelector};
pub use pipeline::traits::{DistanceFunction, Scaler, SpatialIndex, UnitSearch};
pub use types::{Cost, FeatureMatrix, ResultSequence, NO_SELF_LOOP_COST};
