pub mod distance;
pub mod kd_tree;
pub mod nearest;
pub mod viterbi;
