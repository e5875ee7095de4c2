//! Casino game modules.
//!
//! Every game is a peer: none shares state with another. Each one owns its odds
//! configuration (and, for blackjack, its shoe), draws only from the [`RandomSource`]
//! passed in, and settles a [`Bet`] into a round result carrying a [`Settlement`].
//!
//! The [`CasinoGame`] trait is the seam the simulator drives; interactive flows
//! (blackjack hit/stand, crash cash-out) are exposed by the individual modules as
//! state machines.

pub mod blackjack;
pub mod cards;
pub mod coin_flip;
pub mod crash;
pub mod horse_race;
pub mod registry;
pub mod roulette;
pub mod slots;

#[cfg(test)]
mod integration_tests;

use crate::rng::RandomSource;
use casino_types::{Bet, GameKind, Settlement};
use thiserror::Error as ThisError;

/// Misuse of an interactive round through its dynamic (enum) API.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum GameError {
    #[error("round already settled")]
    RoundSettled,
    #[error("round has not started")]
    NotStarted,
    #[error("round still in progress")]
    InProgress,
}

/// A completed, immutable round.
pub trait PlayedRound {
    fn settlement(&self) -> &Settlement;
}

/// One game module: play a round for a bet and report the designed return.
pub trait CasinoGame {
    /// Game-specific bet selection (roulette bet, coin side, horse, cash-out target...).
    type Selection;
    /// Outcome of one independent round.
    type Round: PlayedRound;

    fn kind(&self) -> GameKind;

    /// Play one round. Zero stakes settle as void without charging or paying.
    fn play(&mut self, bet: &Bet<Self::Selection>, rng: &mut RandomSource) -> Self::Round;

    /// Expected return per unit staked on `selection`, derived from the odds model.
    fn theoretical_rtp(&self, selection: &Self::Selection) -> f64;
}
