pub mod card;
pub mod hand;
pub mod moves;
pub mod phase;
pub mod rank;
pub mod suit;
