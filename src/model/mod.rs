pub mod dataset;
pub mod insight;
pub mod scores;
pub mod weights;
