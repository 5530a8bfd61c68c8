mod heuristic;
mod random;

pub use heuristic::HeuristicBot;
pub use random::RandBot;
