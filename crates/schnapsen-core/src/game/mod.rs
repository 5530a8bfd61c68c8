pub mod bot;
pub mod engine;
pub mod perspective;
pub mod serialization;
