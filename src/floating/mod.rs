pub mod engine;
pub mod motion;
pub mod pool;
