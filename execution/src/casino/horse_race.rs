//! Horse race.
//!
//! The winner is drawn by weight. Each horse pays its fair odds reduced by the house
//! edge, `(1 / p) * (1 - house_edge)`, so backing any horse returns `1 - house_edge`.
//! The full finishing order is generated only after the winner is fixed and has no
//! bearing on settlement.

use super::{CasinoGame, PlayedRound};
use crate::rng::{RandomSource, WeightedTable};
use crate::HorseRaceConfig;
use casino_types::{Bet, BetError, ConfigError, GameKind, Settlement};
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorseSpec {
    pub name: String,
    pub weight: u32,
}

impl HorseSpec {
    pub fn new(name: impl Into<String>, weight: u32) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// Default five-horse field.
pub fn default_horses() -> Vec<HorseSpec> {
    vec![
        HorseSpec::new("Thunder Road", 35),
        HorseSpec::new("Lucky Star", 25),
        HorseSpec::new("Night Runner", 20),
        HorseSpec::new("Silver Dash", 12),
        HorseSpec::new("Long Shot", 8),
    ]
}

/// Index of the backed horse in the configured field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HorsePick(pub usize);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub winner: usize,
    pub picked: usize,
    /// Horse indices from first to last. `finishing_order[0] == winner`.
    pub finishing_order: Vec<usize>,
    pub settlement: Settlement,
}

impl PlayedRound for RaceResult {
    fn settlement(&self) -> &Settlement {
        &self.settlement
    }
}

#[derive(Clone, Debug)]
pub struct HorseRace {
    names: Vec<String>,
    field: WeightedTable<usize>,
    house_edge: f64,
}

impl HorseRace {
    pub fn new(config: &HorseRaceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let field = WeightedTable::new(
            config
                .horses
                .iter()
                .enumerate()
                .map(|(idx, horse)| (idx, horse.weight))
                .collect(),
        )?;
        Ok(Self {
            names: config.horses.iter().map(|h| h.name.clone()).collect(),
            field,
            house_edge: config.house_edge,
        })
    }

    pub fn horses(&self) -> usize {
        self.names.len()
    }

    pub fn name(&self, horse: usize) -> Option<&str> {
        self.names.get(horse).map(String::as_str)
    }

    /// Validate a pick against this field.
    pub fn pick(&self, horse: usize) -> Result<HorsePick, BetError> {
        if horse >= self.horses() {
            return Err(BetError::HorseOutOfRange {
                got: horse,
                horses: self.horses(),
            });
        }
        Ok(HorsePick(horse))
    }

    pub fn win_probability(&self, horse: usize) -> f64 {
        self.field.probability(&horse)
    }

    /// Total-return multiplier if `horse` wins; `0.0` for an unknown horse.
    pub fn odds_for(&self, horse: usize) -> f64 {
        let p = self.win_probability(horse);
        if p == 0.0 {
            return 0.0;
        }
        (1.0 / p) * (1.0 - self.house_edge)
    }

    /// Draw the winner, then an order for the rest of the field.
    pub fn run(&self, rng: &mut RandomSource) -> Vec<usize> {
        let winner = self.field.choose(rng);
        let mut rest: Vec<usize> = (0..self.horses()).filter(|&h| h != winner).collect();
        rng.shuffle(&mut rest);
        let mut order = Vec::with_capacity(self.horses());
        order.push(winner);
        order.extend(rest);
        order
    }

    pub fn settle(&self, bet: &Bet<HorsePick>, finishing_order: Vec<usize>) -> RaceResult {
        let winner = finishing_order.first().copied().unwrap_or(usize::MAX);
        let picked = bet.selection.0;
        let multiplier = if picked == winner {
            self.odds_for(picked)
        } else {
            0.0
        };
        RaceResult {
            winner,
            picked,
            finishing_order,
            settlement: Settlement::new(bet.amount, multiplier),
        }
    }
}

impl Default for HorseRace {
    fn default() -> Self {
        let horses = default_horses();
        Self {
            names: horses.iter().map(|h| h.name.clone()).collect(),
            field: WeightedTable::from_validated(
                horses.iter().enumerate().map(|(idx, h)| (idx, h.weight)).collect(),
            ),
            house_edge: casino_types::HORSE_RACE_HOUSE_EDGE,
        }
    }
}

impl CasinoGame for HorseRace {
    type Selection = HorsePick;
    type Round = RaceResult;

    fn kind(&self) -> GameKind {
        GameKind::HorseRace
    }

    fn play(&mut self, bet: &Bet<HorsePick>, rng: &mut RandomSource) -> RaceResult {
        let order = self.run(rng);
        let result = self.settle(bet, order);
        trace!(
            winner = result.winner,
            picked = result.picked,
            payout = result.settlement.payout,
            "horse race"
        );
        result
    }

    fn theoretical_rtp(&self, selection: &HorsePick) -> f64 {
        self.win_probability(selection.0) * self.odds_for(selection.0)
    }
}
