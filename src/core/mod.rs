//! Core types: sides and deterministic randomness.

pub mod rng;
pub mod side;

pub use rng::GameRng;
pub use side::Side;
