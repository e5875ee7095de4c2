//! Monte Carlo verification of the casino engine's return-to-player figures.
//!
//! The [`Simulator`] drives any game through [`casino_execution::CasinoGame`] with its
//! own random source, aggregating per-round returns into a
//! [`SimulationResult`](casino_types::SimulationResult). [`verify_convergence`] repeats
//! that over many seeded batches in parallel.
//!
//! ```
//! use casino_execution::GameRegistry;
//! use casino_simulator::{BetStrategy, Simulator};
//! use casino_types::GameKind;
//!
//! let mut sim = Simulator::new(42, GameRegistry::new()).unwrap();
//! let result = sim.run(BetStrategy::default_for(GameKind::CoinFlip), 10_000).unwrap();
//! assert_eq!(result.num_rounds, 10_000);
//! assert!((result.theoretical_rtp - 0.98).abs() < 1e-12);
//! ```

mod config;
mod convergence;
mod error;
mod simulator;
mod stats;
mod strategy;

pub use config::{GameOverrides, SimConfig};
pub use convergence::{verify_convergence, ConvergenceReport, MIN_PASS_RATE};
pub use error::SimulationError;
pub use simulator::Simulator;
pub use stats::StatsAccumulator;
pub use strategy::BetStrategy;
