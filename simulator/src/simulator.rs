//! Simulation service: drives a game for many independent rounds and aggregates the
//! outcome into a [`SimulationResult`].
//!
//! A [`Simulator`] owns its own [`RandomSource`], separate from whatever source the
//! application uses for live play, and a validated snapshot of the game registry.

use crate::{BetStrategy, SimulationError, StatsAccumulator};
use casino_execution::casino::blackjack::{self, Blackjack};
use casino_execution::casino::coin_flip::CoinFlip;
use casino_execution::casino::crash::CrashGame;
use casino_execution::casino::horse_race::HorseRace;
use casino_execution::casino::roulette::Roulette;
use casino_execution::casino::slots::{Paytable, SlotMachine};
use casino_execution::{CasinoGame, GameRegistry, PlayedRound, RandomSource};
use casino_types::{Bet, GameKind, RoundRecord, SimulationResult, SIMULATION_DEFAULT_BET};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct Simulator {
    rng: RandomSource,
    registry: GameRegistry,
    bet_amount: u64,
}

impl Simulator {
    /// Reproducible simulator: equal seeds and registries yield identical results.
    pub fn new(seed: u64, registry: GameRegistry) -> Result<Self, SimulationError> {
        Self::with_source(RandomSource::seeded(seed), registry)
    }

    /// Simulator seeded from operating-system entropy.
    pub fn from_entropy(registry: GameRegistry) -> Result<Self, SimulationError> {
        Self::with_source(RandomSource::from_entropy(), registry)
    }

    /// Simulator driving an existing source (e.g. one forked for a convergence batch).
    pub fn with_source(rng: RandomSource, registry: GameRegistry) -> Result<Self, SimulationError> {
        registry.validate()?;
        Ok(Self {
            rng,
            registry,
            bet_amount: SIMULATION_DEFAULT_BET,
        })
    }

    /// Stake every simulated round with `amount` chips.
    pub fn with_bet_amount(mut self, amount: u64) -> Result<Self, SimulationError> {
        if amount == 0 {
            return Err(SimulationError::ZeroBet);
        }
        self.bet_amount = amount;
        Ok(self)
    }

    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    pub fn bet_amount(&self) -> u64 {
        self.bet_amount
    }

    pub fn seed(&self) -> Option<u64> {
        self.rng.seed()
    }

    /// Closed-form (or exact) RTP for `strategy` under the registry's configuration.
    pub fn theoretical_rtp(&self, strategy: &BetStrategy) -> Result<f64, SimulationError> {
        let rtp = match *strategy {
            BetStrategy::Roulette { bet } => Roulette.theoretical_rtp(&bet.validate()?),
            BetStrategy::Blackjack { stand_on } => {
                let config = self.registry.blackjack();
                config.validate()?;
                blackjack::theoretical_rtp(&config, stand_on)
            }
            BetStrategy::Slots => Paytable::from_config(&self.registry.slots())?.exact_rtp(),
            BetStrategy::CoinFlip { side } => {
                CoinFlip::new(self.registry.coin_flip()).theoretical_rtp(&side)
            }
            BetStrategy::HorseRace { horse } => {
                let race = HorseRace::new(&self.registry.horse_race())?;
                race.theoretical_rtp(&race.pick(horse)?)
            }
            BetStrategy::Crash { target } => {
                CrashGame::new(self.registry.crash())?.theoretical_rtp(&target)
            }
        };
        Ok(rtp)
    }

    /// Simulate `rounds` rounds of `game`. Without a strategy the game's default bet is
    /// used; a strategy for a different game is rejected.
    pub fn run_simulation(
        &mut self,
        game: GameKind,
        rounds: u64,
        strategy: Option<BetStrategy>,
    ) -> Result<SimulationResult, SimulationError> {
        let strategy = strategy.unwrap_or_else(|| BetStrategy::default_for(game));
        if strategy.game() != game {
            return Err(SimulationError::StrategyMismatch {
                game,
                strategy: strategy.game(),
            });
        }
        self.run(strategy, rounds)
    }

    /// Simulate `rounds` rounds of `strategy`.
    pub fn run(
        &mut self,
        strategy: BetStrategy,
        rounds: u64,
    ) -> Result<SimulationResult, SimulationError> {
        let never = AtomicBool::new(false);
        self.run_until(strategy, rounds, &never)
    }

    /// Like [`Simulator::run`], but stops between rounds once `cancel` is set and
    /// reports over the rounds actually played.
    pub fn run_until(
        &mut self,
        strategy: BetStrategy,
        rounds: u64,
        cancel: &AtomicBool,
    ) -> Result<SimulationResult, SimulationError> {
        let game = strategy.game();
        if !self.registry.is_active(game) {
            return Err(SimulationError::InactiveGame(game));
        }

        let label = strategy.label();
        let theoretical_rtp = self.theoretical_rtp(&strategy)?;
        info!(
            game = %game,
            strategy = %label,
            rounds,
            bet = self.bet_amount,
            seed = ?self.rng.seed(),
            "simulation started"
        );

        let start = Instant::now();
        let batch = Batch {
            rounds,
            bet_amount: self.bet_amount,
            cancel,
        };
        let rng = &mut self.rng;
        let stats = match strategy {
            BetStrategy::Roulette { bet } => batch.drive(&mut Roulette, bet.validate()?, rng),
            BetStrategy::Blackjack { stand_on } => {
                let mut table = Blackjack::new(self.registry.blackjack())?;
                batch.drive(&mut table, stand_on, rng)
            }
            BetStrategy::Slots => {
                let mut machine = SlotMachine::new(&self.registry.slots())?;
                batch.drive(&mut machine, (), rng)
            }
            BetStrategy::CoinFlip { side } => {
                let mut coin = CoinFlip::new(self.registry.coin_flip());
                batch.drive(&mut coin, side, rng)
            }
            BetStrategy::HorseRace { horse } => {
                let mut race = HorseRace::new(&self.registry.horse_race())?;
                let pick = race.pick(horse)?;
                batch.drive(&mut race, pick, rng)
            }
            BetStrategy::Crash { target } => {
                let mut crash = CrashGame::new(self.registry.crash())?;
                batch.drive(&mut crash, target, rng)
            }
        };

        if stats.rounds() < rounds {
            info!(
                game = %game,
                played = stats.rounds(),
                requested = rounds,
                "simulation cancelled"
            );
        }

        let result = stats.finish(
            game,
            label,
            self.rng.seed(),
            theoretical_rtp,
            start.elapsed(),
        );
        info!(
            game = %game,
            rounds = result.num_rounds,
            observed_rtp = result.observed_rtp,
            theoretical_rtp = result.theoretical_rtp,
            std_deviation = result.std_deviation,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "simulation finished"
        );
        if result.num_rounds > 0 && !result.within_tolerance {
            warn!(
                game = %game,
                deviation = result.rtp_deviation(),
                tolerance = result.expected_tolerance,
                "observed RTP outside tolerance"
            );
        }
        Ok(result)
    }
}

/// Per-batch loop parameters.
struct Batch<'a> {
    rounds: u64,
    bet_amount: u64,
    cancel: &'a AtomicBool,
}

impl Batch<'_> {
    fn drive<G: CasinoGame>(
        &self,
        game: &mut G,
        selection: G::Selection,
        rng: &mut RandomSource,
    ) -> StatsAccumulator {
        let bet = Bet::new(selection, self.bet_amount);
        let mut stats = StatsAccumulator::new();
        for _ in 0..self.rounds {
            if self.cancel.load(Ordering::Relaxed) {
                break;
            }
            let round = game.play(&bet, rng);
            stats.record(RoundRecord::from_settlement(round.settlement()));
        }
        debug!(game = %game.kind(), rounds = stats.rounds(), "batch drained");
        stats
    }
}
