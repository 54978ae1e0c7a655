//! Text utilities shared by voting and selection.
//!
//! - [`normalize`]: canonical form of a free-text label
//! - [`similarity`] / [`find_best_match`]: fuzzy consolidation of labels
//! - [`keywords`]: stopword-filtered keyword weights for relevance scoring

pub mod keywords;
pub mod normalize;
pub mod similarity;

pub use normalize::{normalize, strip_markup};
pub use similarity::{DEFAULT_FUZZY_THRESHOLD, find_best_match, similarity};
