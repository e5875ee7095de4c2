//! Crash ("aviator") game.
//!
//! A crash point `C >= 1.0` is drawn when the round starts and stays hidden. The live
//! multiplier grows as `exp(growth_rate * t)`; the round ends the moment it reaches `C`.
//! A cash-out strictly before that moment locks in the current multiplier as the
//! total-return multiplier; afterwards it is a no-op.
//!
//! Rounds are modelled as a state machine:
//! ```text
//! NotStarted -> Flying -> CashedOut
//!                     \-> Crashed
//! ```
//! [`Flight`] is the typestate for the only state where cashing out is meaningful; it can
//! only be obtained by starting a round and is consumed by the transition. [`CrashState`]
//! is the tagged form for callers that keep the round in a single slot.

use super::{CasinoGame, GameError, PlayedRound};
use crate::rng::RandomSource;
use crate::CrashConfig;
use casino_types::{Bet, BetError, ConfigError, GameKind, Settlement};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Auto cash-out target, a finite multiplier `>= 1.0`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct CashOutTarget(f64);

impl CashOutTarget {
    pub fn new(target: f64) -> Result<Self, BetError> {
        if !target.is_finite() || target < 1.0 {
            return Err(BetError::InvalidTarget { got: target });
        }
        Ok(Self(target))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for CashOutTarget {
    /// Double the stake.
    fn default() -> Self {
        Self(2.0)
    }
}

impl TryFrom<f64> for CashOutTarget {
    type Error = BetError;

    fn try_from(target: f64) -> Result<Self, Self::Error> {
        Self::new(target)
    }
}

impl From<CashOutTarget> for f64 {
    fn from(target: CashOutTarget) -> Self {
        target.0
    }
}

/// Effect of a cash-out request.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CashOut {
    pub won: bool,
    pub cashout_at: Option<f64>,
}

impl CashOut {
    /// Rejected request: nothing locked in.
    pub const NOOP: CashOut = CashOut {
        won: false,
        cashout_at: None,
    };
}

/// A finished crash round.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrashRound {
    pub crash_point: f64,
    /// Multiplier locked in by the cash-out, if it happened before the crash.
    pub cashout_at: Option<f64>,
    pub settlement: Settlement,
}

impl CrashRound {
    pub fn won(&self) -> bool {
        self.cashout_at.is_some()
    }
}

impl PlayedRound for CrashRound {
    fn settlement(&self) -> &Settlement {
        &self.settlement
    }
}

/// A round in flight. Only [`CrashGame::start`] creates one.
#[derive(Debug)]
pub struct Flight {
    stake: u64,
    crash_point: f64,
    growth_rate: f64,
}

impl Flight {
    pub fn stake(&self) -> u64 {
        self.stake
    }

    /// Live multiplier `elapsed` seconds after take-off.
    pub fn multiplier_at(&self, elapsed: f64) -> f64 {
        multiplier_at(self.growth_rate, elapsed)
    }

    /// Seconds until the multiplier reaches the crash point.
    pub fn crash_time(&self) -> f64 {
        self.crash_point.ln() / self.growth_rate
    }

    pub fn has_crashed(&self, elapsed: f64) -> bool {
        self.multiplier_at(elapsed) >= self.crash_point
    }

    /// Cash out at `elapsed` seconds. Succeeds only while the multiplier is still below
    /// the crash point.
    pub fn cash_out(self, elapsed: f64) -> CrashState {
        let multiplier = self.multiplier_at(elapsed);
        self.lock_in(multiplier)
    }

    /// Cash out the instant the multiplier reaches `target`.
    pub fn auto_cash_out(self, target: CashOutTarget) -> CrashState {
        self.lock_in(target.value())
    }

    /// Never cash out; the round runs to its crash.
    pub fn ride(self) -> CrashState {
        CrashState::Crashed(CrashRound {
            crash_point: self.crash_point,
            cashout_at: None,
            settlement: Settlement::loss(self.stake),
        })
    }

    fn lock_in(self, multiplier: f64) -> CrashState {
        if multiplier < self.crash_point {
            CrashState::CashedOut(CrashRound {
                crash_point: self.crash_point,
                cashout_at: Some(multiplier),
                settlement: Settlement::new(self.stake, multiplier),
            })
        } else {
            self.ride()
        }
    }
}

/// Tagged round state.
#[derive(Debug, Default)]
pub enum CrashState {
    #[default]
    NotStarted,
    Flying(Flight),
    CashedOut(CrashRound),
    Crashed(CrashRound),
}

impl CrashState {
    /// `NotStarted -> Flying`. Any other state is returned unchanged.
    pub fn launch(self, game: &CrashGame, stake: u64, rng: &mut RandomSource) -> CrashState {
        match self {
            CrashState::NotStarted => CrashState::Flying(game.start(stake, rng)),
            other => other,
        }
    }

    /// Request a cash-out at `elapsed` seconds.
    ///
    /// Only `Flying` transitions; every other state (and a request after the crash)
    /// yields [`CashOut::NOOP`].
    pub fn cash_out(self, elapsed: f64) -> (CrashState, CashOut) {
        match self {
            CrashState::Flying(flight) => {
                let next = flight.cash_out(elapsed);
                let effect = match &next {
                    CrashState::CashedOut(round) => CashOut {
                        won: true,
                        cashout_at: round.cashout_at,
                    },
                    _ => CashOut::NOOP,
                };
                (next, effect)
            }
            other => (other, CashOut::NOOP),
        }
    }

    pub fn is_flying(&self) -> bool {
        matches!(self, CrashState::Flying(_))
    }

    /// The finished round, if any.
    pub fn round(&self) -> Result<&CrashRound, GameError> {
        match self {
            CrashState::CashedOut(round) | CrashState::Crashed(round) => Ok(round),
            CrashState::NotStarted => Err(GameError::NotStarted),
            CrashState::Flying(_) => Err(GameError::InProgress),
        }
    }
}

fn multiplier_at(growth_rate: f64, elapsed: f64) -> f64 {
    if elapsed <= 0.0 {
        return 1.0;
    }
    (growth_rate * elapsed).exp()
}

#[derive(Clone, Debug, Default)]
pub struct CrashGame {
    config: CrashConfig,
}

impl CrashGame {
    pub fn new(config: CrashConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn house_edge(&self) -> f64 {
        self.config.house_edge
    }

    pub fn multiplier_at(&self, elapsed: f64) -> f64 {
        multiplier_at(self.config.growth_rate, elapsed)
    }

    /// Seconds for the live multiplier to reach `multiplier`.
    pub fn time_to_reach(&self, multiplier: f64) -> f64 {
        multiplier.max(1.0).ln() / self.config.growth_rate
    }

    /// Start a round: draws the hidden crash point.
    pub fn start(&self, stake: u64, rng: &mut RandomSource) -> Flight {
        let crash_point = rng.crash_point(self.config.house_edge);
        debug!(crash_point, "crash round started");
        self.flight_with(stake, crash_point)
    }

    /// A flight with a known crash point, for replaying a recorded round.
    pub fn flight_with(&self, stake: u64, crash_point: f64) -> Flight {
        Flight {
            stake,
            crash_point: crash_point.max(1.0),
            growth_rate: self.config.growth_rate,
        }
    }

    /// Expected return per unit for an auto cash-out at `target`.
    ///
    /// `P(C > x) = (1 - house_edge) / x` for `x >= 1`, so this is `1 - house_edge` for
    /// every valid target.
    pub fn rtp_at_target(&self, target: f64) -> f64 {
        if !target.is_finite() || target < 1.0 {
            return 0.0;
        }
        let survival = ((1.0 - self.config.house_edge) / target).min(1.0);
        target * survival
    }
}

impl CasinoGame for CrashGame {
    type Selection = CashOutTarget;
    type Round = CrashRound;

    fn kind(&self) -> GameKind {
        GameKind::Crash
    }

    fn play(&mut self, bet: &Bet<CashOutTarget>, rng: &mut RandomSource) -> CrashRound {
        let state = self.start(bet.amount, rng).auto_cash_out(bet.selection);
        let round = match state {
            CrashState::CashedOut(round) | CrashState::Crashed(round) => round,
            // auto_cash_out always finishes the round.
            _ => CrashRound {
                crash_point: 1.0,
                cashout_at: None,
                settlement: Settlement::loss(bet.amount),
            },
        };
        trace!(
            crash_point = round.crash_point,
            target = bet.selection.value(),
            payout = round.settlement.payout,
            "crash round"
        );
        round
    }

    fn theoretical_rtp(&self, selection: &CashOutTarget) -> f64 {
        self.rtp_at_target(selection.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(x: f64) -> CashOutTarget {
        CashOutTarget::new(x).unwrap()
    }

    #[test]
    fn test_rtp_independent_of_target() {
        let game = CrashGame::default();
        for x in [1.0, 1.01, 1.5, 2.0, 10.0, 1_000.0] {
            assert!((game.rtp_at_target(x) - 0.96).abs() < 1e-12, "target {x}");
            assert!((game.theoretical_rtp(&target(x)) - 0.96).abs() < 1e-12);
        }
        assert_eq!(game.rtp_at_target(0.5), 0.0);
    }

    #[test]
    fn test_invalid_targets() {
        assert_eq!(
            CashOutTarget::new(0.99),
            Err(BetError::InvalidTarget { got: 0.99 })
        );
        assert!(CashOutTarget::new(f64::INFINITY).is_err());
        assert!(CashOutTarget::new(f64::NAN).is_err());
        assert!(serde_json::from_str::<CashOutTarget>("0.5").is_err());
        assert_eq!(serde_json::from_str::<CashOutTarget>("2.0").unwrap(), target(2.0));
    }

    #[test]
    fn test_multiplier_growth() {
        let game = CrashGame::default();
        assert_eq!(game.multiplier_at(0.0), 1.0);
        assert_eq!(game.multiplier_at(-3.0), 1.0);
        assert!((game.multiplier_at(10.0) - 0.6f64.exp()).abs() < 1e-12);
        let t = game.time_to_reach(2.0);
        assert!((game.multiplier_at(t) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_cash_out_before_crash_locks_multiplier() {
        let game = CrashGame::default();
        let flight = game.flight_with(100, 2.5);
        let elapsed = game.time_to_reach(2.0);
        assert!(!flight.has_crashed(elapsed));
        let (state, effect) = CrashState::Flying(flight).cash_out(elapsed);
        assert!(effect.won);
        let locked = effect.cashout_at.unwrap();
        assert!((locked - 2.0).abs() < 1e-9);
        let round = state.round().unwrap();
        assert_eq!(round.settlement.payout, 200);
    }

    #[test]
    fn test_cash_out_after_crash_is_noop() {
        let game = CrashGame::default();
        let flight = game.flight_with(100, 1.5);
        let late = flight.crash_time() + 0.5;
        assert!(flight.has_crashed(late));
        let (state, effect) = CrashState::Flying(flight).cash_out(late);
        assert_eq!(effect, CashOut::NOOP);
        assert!(matches!(state, CrashState::Crashed(_)));
        assert_eq!(state.round().unwrap().settlement.payout, 0);

        // Once finished, further requests change nothing.
        let (state, effect) = state.cash_out(0.0);
        assert_eq!(effect, CashOut::NOOP);
        assert!(matches!(state, CrashState::Crashed(_)));
    }

    #[test]
    fn test_cash_out_outside_flight() {
        let (state, effect) = CrashState::NotStarted.cash_out(1.0);
        assert_eq!(effect, CashOut::NOOP);
        assert_eq!(state.round().err(), Some(GameError::NotStarted));
    }

    #[test]
    fn test_launch_only_from_not_started() {
        let game = CrashGame::default();
        let mut rng = RandomSource::seeded(4);
        let state = CrashState::default().launch(&game, 10, &mut rng);
        assert!(state.is_flying());
        assert_eq!(state.round().err(), Some(GameError::InProgress));
        let state = state.launch(&game, 10, &mut rng);
        assert!(state.is_flying());
    }

    #[test]
    fn test_instant_crash_loses_even_at_one() {
        let game = CrashGame::default();
        let state = game.flight_with(100, 1.0).auto_cash_out(target(1.0));
        let round = state.round().unwrap();
        assert!(!round.won());
        assert_eq!(round.settlement.payout, 0);
    }

    #[test]
    fn test_auto_cash_out_boundary() {
        let game = CrashGame::default();
        // Reaching the crash point exactly is a crash.
        let round = *game.flight_with(100, 2.0).auto_cash_out(target(2.0)).round().unwrap();
        assert!(!round.won());
        let round = *game.flight_with(100, 2.0001).auto_cash_out(target(2.0)).round().unwrap();
        assert_eq!(round.cashout_at, Some(2.0));
        assert_eq!(round.settlement.payout, 200);
    }

    #[test]
    fn test_seeded_play_matches_manual_flight() {
        let mut game = CrashGame::default();
        let bet = Bet::new(target(1.8), 50);
        let round = game.play(&bet, &mut RandomSource::seeded(21));
        let crash_point = RandomSource::seeded(21).crash_point(0.04);
        assert_eq!(round.crash_point, crash_point);
        assert_eq!(round.won(), 1.8 < crash_point);
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = CrashConfig {
            house_edge: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            CrashGame::new(config),
            Err(ConfigError::HouseEdgeOutOfRange { .. })
        ));
    }
}
