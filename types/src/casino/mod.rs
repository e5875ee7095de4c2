//! Casino domain types.
//!
//! Defines game identifiers, bet/settlement values, simulation aggregates and the
//! constants shared by the execution layer and the simulator.

mod bet;
mod constants;
mod error;
mod game;
mod simulation;

pub use bet::{Bet, Outcome, Settlement};
pub use constants::*;
pub use error::{BetError, ConfigError};
pub use game::{GameKind, UnknownGame};
pub use simulation::{
    expected_tolerance, OutcomeCounts, RiskLevel, RoundRecord, SimulationResult,
};
