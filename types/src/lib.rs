//! Shared types for the casino engine.
//!
//! Everything here is plain data: game identifiers, bets, settlements and the aggregate
//! produced by a simulation batch. Randomness and game rules live in `casino-execution`.

pub mod casino;

pub use casino::*;
