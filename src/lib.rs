pub mod core;
pub mod utils;

// Re-export everything from core for ergonomic library use
// Users can write `signalman::loki` instead of `signalman::core::loki`
pub use core::*;
pub use utils::*;
