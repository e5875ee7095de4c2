//! Casino execution layer.
//!
//! This crate contains the random source and the game modules (roulette, blackjack, slots,
//! coin flip, horse race and crash) consumed by the application and by the simulator.
//!
//! ## Determinism requirements
//! - Games never reach for ambient randomness; every draw comes from the [`RandomSource`]
//!   handed to them.
//! - Two sources built with the same seed produce identical draws for identical call
//!   sequences, so a seeded round can always be replayed.
//! - Odds tables are stored in declaration order (never hash order) so draws do not depend
//!   on collection iteration.
//!
//! ## Isolation
//! The live-play source and any simulation source are separate instances. A simulation
//! must construct its own source and never borrow the one used for play.
//!
//! ## Example
//! ```rust
//! use casino_execution::casino::coin_flip::{CoinFlip, CoinSide};
//! use casino_execution::{CasinoGame, RandomSource};
//! use casino_types::Bet;
//!
//! let mut rng = RandomSource::seeded(7);
//! let mut game = CoinFlip::default();
//! let round = game.play(&Bet::new(CoinSide::Heads, 100), &mut rng);
//! assert!(round.settlement.payout == 0 || round.settlement.payout == 196);
//! ```

pub mod casino;
pub mod rng;

pub use casino::registry::{
    BlackjackConfig, CoinFlipConfig, CrashConfig, GameCategory, GameConfig, GameInfo,
    GameRegistry, HorseRaceConfig, RouletteConfig, SlotsConfig,
};
pub use casino::{CasinoGame, GameError, PlayedRound};
pub use rng::{crash_point_from_uniform, RandomSource, WeightedTable};
