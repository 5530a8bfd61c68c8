mod params;
pub mod steps;

pub use params::HeuristicParams;
pub use steps::Rule;
