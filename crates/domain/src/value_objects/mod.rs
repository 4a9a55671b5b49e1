pub mod bin_range;
pub mod coverage;

pub use bin_range::{BinRangeCandidate, RangeSet};
pub use coverage::BinArrayCoverage;
