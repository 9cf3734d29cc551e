//! Text utilities: accent normalization, slugs, and name similarity.

pub mod normalize;
pub mod similarity;

pub use normalize::{normalize, slugify};
pub use similarity::similarity;
