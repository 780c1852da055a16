//! Text primitives: normalization, header/footer detection, sentence
//! segmentation and similarity scoring.

mod boilerplate;
mod normalize;
mod segment;
mod similarity;
pub mod symbols;

pub use boilerplate::{LineFrequencyTable, MAX_BOILERPLATE_CHARS};
pub use normalize::{normalize, NormalizeOptions, Normalizer};
pub use segment::{is_plausible, segment, segment_plausible, Sentence};
pub use similarity::{similarity, upper_bound};
