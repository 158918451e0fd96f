pub mod engine;
pub mod ranking;
pub mod types;

pub use engine::score_match;
pub use ranking::{FullRecompute, RankingStrategy, WindowedRecompute};
pub use types::{MatchOutcome, RatingChange, Standing};
