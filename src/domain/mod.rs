pub mod models;
pub mod scores;

pub use models::*;
pub use scores::{SetScore, SetScores};
