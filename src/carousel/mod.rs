pub mod deck;
pub mod engine;
