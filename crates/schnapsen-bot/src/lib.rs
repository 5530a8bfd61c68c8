pub mod bot;
pub mod policy;

pub use bot::{HeuristicParams, Rule};
pub use policy::{HeuristicBot, RandBot};
