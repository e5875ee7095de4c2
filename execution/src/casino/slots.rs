//! Three-reel slot machine.
//!
//! Each reel draws a symbol independently from the same weighted strip. A spin is
//! evaluated against the paytable in a fixed priority order, first match wins:
//! 1. three identical non-blank symbols pay that symbol's three-of-a-kind multiplier
//! 2. the first two reels identical and non-blank pay that symbol's first-two multiplier
//!    (if it has one)
//! 3. one or two cherries anywhere pay the cherry count
//! 4. anything else pays nothing
//!
//! [`Paytable::exact_rtp`] enumerates every reel combination through the same
//! [`Paytable::evaluate`] used for live spins, so the reported return can never drift from
//! the payout logic.

use super::{CasinoGame, PlayedRound};
use crate::rng::{RandomSource, WeightedTable};
use crate::SlotsConfig;
use casino_types::{Bet, ConfigError, GameKind, Settlement};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Reels per spin.
pub const REELS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    Blank,
    Cherry,
    Lemon,
    Orange,
    Plum,
    Bell,
    Bar,
    Seven,
}

impl Symbol {
    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::Blank => "blank",
            Symbol::Cherry => "cherry",
            Symbol::Lemon => "lemon",
            Symbol::Orange => "orange",
            Symbol::Plum => "plum",
            Symbol::Bell => "bell",
            Symbol::Bar => "bar",
            Symbol::Seven => "seven",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One paytable row: reel weight plus the two multipliers a symbol can pay.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymbolSpec {
    pub symbol: Symbol,
    pub weight: u32,
    /// Total-return multiplier for three of this symbol.
    pub three_of_a_kind: f64,
    /// Total-return multiplier when the first two reels show this symbol. `0.0` = none.
    #[serde(default)]
    pub first_two: f64,
}

impl SymbolSpec {
    pub const fn new(symbol: Symbol, weight: u32, three_of_a_kind: f64, first_two: f64) -> Self {
        Self {
            symbol,
            weight,
            three_of_a_kind,
            first_two,
        }
    }
}

/// Default strip and paytable.
pub const DEFAULT_SYMBOLS: [SymbolSpec; 8] = [
    SymbolSpec::new(Symbol::Blank, 30, 0.0, 0.0),
    SymbolSpec::new(Symbol::Cherry, 20, 10.0, 0.0),
    SymbolSpec::new(Symbol::Lemon, 15, 20.0, 0.0),
    SymbolSpec::new(Symbol::Orange, 12, 30.0, 0.0),
    SymbolSpec::new(Symbol::Plum, 10, 40.0, 2.0),
    SymbolSpec::new(Symbol::Bell, 7, 75.0, 5.0),
    SymbolSpec::new(Symbol::Bar, 4, 150.0, 10.0),
    SymbolSpec::new(Symbol::Seven, 2, 750.0, 25.0),
];

/// Which paytable rule produced a spin's multiplier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinRule {
    ThreeOfAKind(Symbol),
    FirstTwo(Symbol),
    Cherries(u8),
    NoWin,
}

/// Validated reel strip and paytable.
#[derive(Clone, Debug, PartialEq)]
pub struct Paytable {
    strip: WeightedTable<Symbol>,
    specs: Vec<SymbolSpec>,
}

impl Paytable {
    pub fn new(specs: &[SymbolSpec]) -> Result<Self, ConfigError> {
        for spec in specs {
            let invalid = |m: f64| !m.is_finite() || m < 0.0;
            if invalid(spec.three_of_a_kind) || invalid(spec.first_two) {
                return Err(ConfigError::PayoutBelowStake {
                    key: spec.symbol.to_string(),
                    multiplier: spec.three_of_a_kind.min(spec.first_two),
                });
            }
        }
        let strip = WeightedTable::new(specs.iter().map(|s| (s.symbol, s.weight)).collect())?;
        Ok(Self {
            strip,
            specs: specs.to_vec(),
        })
    }

    pub fn from_config(config: &SlotsConfig) -> Result<Self, ConfigError> {
        Self::new(&config.symbols)
    }

    pub fn specs(&self) -> &[SymbolSpec] {
        &self.specs
    }

    fn spec(&self, symbol: Symbol) -> Option<&SymbolSpec> {
        self.specs.iter().find(|s| s.symbol == symbol)
    }

    /// Probability of `symbol` on a single reel.
    pub fn probability(&self, symbol: Symbol) -> f64 {
        self.strip.probability(&symbol)
    }

    /// Draw three reels, left to right.
    pub fn spin_reels(&self, rng: &mut RandomSource) -> [Symbol; REELS] {
        [
            self.strip.choose(rng),
            self.strip.choose(rng),
            self.strip.choose(rng),
        ]
    }

    /// Total-return multiplier for a reel combination and the rule that produced it.
    pub fn evaluate(&self, reels: &[Symbol; REELS]) -> (f64, WinRule) {
        let [a, b, c] = *reels;

        if a != Symbol::Blank && a == b && b == c {
            let multiplier = self.spec(a).map(|s| s.three_of_a_kind).unwrap_or(0.0);
            return (multiplier, WinRule::ThreeOfAKind(a));
        }

        if a != Symbol::Blank && a == b {
            if let Some(spec) = self.spec(a).filter(|s| s.first_two > 0.0) {
                return (spec.first_two, WinRule::FirstTwo(a));
            }
        }

        let cherries = reels.iter().filter(|&&s| s == Symbol::Cherry).count() as u8;
        if cherries == 1 || cherries == 2 {
            return (f64::from(cherries), WinRule::Cherries(cherries));
        }

        (0.0, WinRule::NoWin)
    }

    /// Exact expected return per unit staked, summed over every reel combination.
    pub fn exact_rtp(&self) -> f64 {
        self.enumerate(|multiplier| multiplier)
    }

    /// Probability that a spin pays anything.
    pub fn hit_frequency(&self) -> f64 {
        self.enumerate(|multiplier| if multiplier > 0.0 { 1.0 } else { 0.0 })
    }

    fn enumerate(&self, value: impl Fn(f64) -> f64) -> f64 {
        let entries = self.strip.entries();
        let total = self.strip.total_weight() as f64;
        let mut sum = 0.0;
        for (a, wa) in entries {
            for (b, wb) in entries {
                for (c, wc) in entries {
                    let p = f64::from(*wa) * f64::from(*wb) * f64::from(*wc) / total.powi(3);
                    let (multiplier, _) = self.evaluate(&[*a, *b, *c]);
                    sum += p * value(multiplier);
                }
            }
        }
        sum
    }
}

/// One spin and its settlement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpinResult {
    pub reels: [Symbol; REELS],
    pub rule: WinRule,
    pub settlement: Settlement,
}

impl PlayedRound for SpinResult {
    fn settlement(&self) -> &Settlement {
        &self.settlement
    }
}

#[derive(Clone, Debug)]
pub struct SlotMachine {
    paytable: Paytable,
    rtp: f64,
}

impl SlotMachine {
    pub fn new(config: &SlotsConfig) -> Result<Self, ConfigError> {
        let paytable = Paytable::from_config(config)?;
        let rtp = paytable.exact_rtp();
        Ok(Self { paytable, rtp })
    }

    pub fn paytable(&self) -> &Paytable {
        &self.paytable
    }

    /// Settle a known reel combination.
    pub fn settle(&self, bet: &Bet<()>, reels: [Symbol; REELS]) -> SpinResult {
        let (multiplier, rule) = self.paytable.evaluate(&reels);
        SpinResult {
            reels,
            rule,
            settlement: Settlement::new(bet.amount, multiplier),
        }
    }
}

impl Default for SlotMachine {
    fn default() -> Self {
        let paytable = Paytable {
            strip: WeightedTable::from_validated(
                DEFAULT_SYMBOLS.iter().map(|s| (s.symbol, s.weight)).collect(),
            ),
            specs: DEFAULT_SYMBOLS.to_vec(),
        };
        let rtp = paytable.exact_rtp();
        Self { paytable, rtp }
    }
}

impl CasinoGame for SlotMachine {
    type Selection = ();
    type Round = SpinResult;

    fn kind(&self) -> GameKind {
        GameKind::Slots
    }

    fn play(&mut self, bet: &Bet<()>, rng: &mut RandomSource) -> SpinResult {
        let reels = self.paytable.spin_reels(rng);
        let result = self.settle(bet, reels);
        trace!(
            reels = ?result.reels,
            rule = ?result.rule,
            payout = result.settlement.payout,
            "slot spin"
        );
        result
    }

    fn theoretical_rtp(&self, _selection: &()) -> f64 {
        self.rtp
    }
}
