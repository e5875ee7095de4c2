//! European single-zero roulette.
//!
//! Numbers 0..=36; zero is green and belongs to no color, parity, range, dozen or column.
//!
//! Bet types (multiplier on the stake, paid on top of the returned stake):
//! Straight (single number, 35:1)
//! Red / Black / Even / Odd / Low (1-18) / High (19-36) (1:1)
//! Dozen (1-12, 13-24, 25-36) / Column (2:1), selected by index 0/1/2
//!
//! Every bet covers `n` numbers and pays `m` such that `n * (m + 1) == 36`, so the return
//! is `36/37` for every bet type.

use super::{CasinoGame, PlayedRound};
use crate::rng::RandomSource;
use casino_types::{Bet, BetError, GameKind, Settlement, ROULETTE_MAX_NUMBER, ROULETTE_POCKETS};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Red numbers on a European wheel.
const RED_NUMBERS: [u8; 18] = [1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Black,
    Green,
}

/// Roulette bet selections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouletteBet {
    Straight(u8),
    Red,
    Black,
    Even,
    Odd,
    Low,
    High,
    Dozen(u8),
    Column(u8),
}

impl RouletteBet {
    pub fn straight(number: u8) -> Result<Self, BetError> {
        if number > ROULETTE_MAX_NUMBER {
            return Err(BetError::NumberOutOfRange {
                got: number,
                max: ROULETTE_MAX_NUMBER,
            });
        }
        Ok(Self::Straight(number))
    }

    pub fn dozen(index: u8) -> Result<Self, BetError> {
        if index > 2 {
            return Err(BetError::GroupOutOfRange { got: index });
        }
        Ok(Self::Dozen(index))
    }

    pub fn column(index: u8) -> Result<Self, BetError> {
        if index > 2 {
            return Err(BetError::GroupOutOfRange { got: index });
        }
        Ok(Self::Column(index))
    }

    /// Re-check a selection that may have been built directly (e.g. deserialized).
    pub fn validate(self) -> Result<Self, BetError> {
        match self {
            Self::Straight(n) => Self::straight(n),
            Self::Dozen(i) => Self::dozen(i),
            Self::Column(i) => Self::column(i),
            other => Ok(other),
        }
    }

    /// Winnings multiplier, excluding the returned stake.
    pub fn payout_multiplier(self) -> u32 {
        match self {
            Self::Straight(_) => 35,
            Self::Red | Self::Black | Self::Even | Self::Odd | Self::Low | Self::High => 1,
            Self::Dozen(_) | Self::Column(_) => 2,
        }
    }

    /// Whether this bet wins when the wheel lands on `number`.
    pub fn wins(self, number: u8) -> bool {
        // Zero loses everything except a straight bet on zero.
        if number == 0 {
            return self == Self::Straight(0);
        }
        match self {
            Self::Straight(n) => n == number,
            Self::Red => color(number) == Color::Red,
            Self::Black => color(number) == Color::Black,
            Self::Even => number % 2 == 0,
            Self::Odd => number % 2 == 1,
            Self::Low => (1..=18).contains(&number),
            Self::High => (19..=36).contains(&number),
            Self::Dozen(i) => dozen(number) == Some(i),
            Self::Column(i) => column(number) == Some(i),
        }
    }

    /// Count of pockets this bet wins on.
    pub fn covered_numbers(self) -> u32 {
        (0..ROULETTE_POCKETS).filter(|&n| self.wins(n)).count() as u32
    }

    pub fn label(self) -> String {
        match self {
            Self::Straight(n) => format!("straight-{n}"),
            Self::Red => "red".to_string(),
            Self::Black => "black".to_string(),
            Self::Even => "even".to_string(),
            Self::Odd => "odd".to_string(),
            Self::Low => "low".to_string(),
            Self::High => "high".to_string(),
            Self::Dozen(i) => format!("dozen-{}", i + 1),
            Self::Column(i) => format!("column-{}", i + 1),
        }
    }
}

pub fn color(number: u8) -> Color {
    if number == 0 || number > ROULETTE_MAX_NUMBER {
        Color::Green
    } else if RED_NUMBERS.contains(&number) {
        Color::Red
    } else {
        Color::Black
    }
}

/// Dozen index (0, 1, 2) or `None` for zero.
pub fn dozen(number: u8) -> Option<u8> {
    (1..=ROULETTE_MAX_NUMBER)
        .contains(&number)
        .then(|| (number - 1) / 12)
}

/// Column index (0, 1, 2) or `None` for zero.
///
/// Column 0: 1, 4, 7, ... 34; column 1: 2, 5, ... 35; column 2: 3, 6, ... 36.
pub fn column(number: u8) -> Option<u8> {
    (1..=ROULETTE_MAX_NUMBER)
        .contains(&number)
        .then(|| (number - 1) % 3)
}

/// One spin and its settlement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouletteSpin {
    pub number: u8,
    pub color: Color,
    pub bet: RouletteBet,
    pub settlement: Settlement,
}

impl PlayedRound for RouletteSpin {
    fn settlement(&self) -> &Settlement {
        &self.settlement
    }
}

/// Single-zero wheel. Stateless: every spin is one independent draw.
#[derive(Clone, Copy, Debug, Default)]
pub struct Roulette;

impl Roulette {
    /// Draw a pocket.
    pub fn spin(&self, rng: &mut RandomSource) -> u8 {
        rng.uniform_int(u64::from(ROULETTE_POCKETS)) as u8
    }

    /// Settle `bet` against a known pocket.
    pub fn settle(&self, bet: &Bet<RouletteBet>, number: u8) -> RouletteSpin {
        let multiplier = if bet.selection.wins(number) {
            f64::from(bet.selection.payout_multiplier() + 1)
        } else {
            0.0
        };
        RouletteSpin {
            number,
            color: color(number),
            bet: bet.selection,
            settlement: Settlement::new(bet.amount, multiplier),
        }
    }
}

impl CasinoGame for Roulette {
    type Selection = RouletteBet;
    type Round = RouletteSpin;

    fn kind(&self) -> GameKind {
        GameKind::Roulette
    }

    fn play(&mut self, bet: &Bet<RouletteBet>, rng: &mut RandomSource) -> RouletteSpin {
        let number = self.spin(rng);
        let spin = self.settle(bet, number);
        trace!(number, bet = %bet.selection.label(), payout = spin.settlement.payout, "roulette spin");
        spin
    }

    /// `(covered / 37) * (multiplier + 1)`; the numerator is integral so every bet type
    /// evaluates to the same `36.0 / 37.0`.
    fn theoretical_rtp(&self, selection: &RouletteBet) -> f64 {
        let returned = selection.covered_numbers() * (selection.payout_multiplier() + 1);
        f64::from(returned) / f64::from(ROULETTE_POCKETS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_bets() -> Vec<RouletteBet> {
        let mut bets: Vec<RouletteBet> = (0..=36).map(RouletteBet::Straight).collect();
        bets.extend([
            RouletteBet::Red,
            RouletteBet::Black,
            RouletteBet::Even,
            RouletteBet::Odd,
            RouletteBet::Low,
            RouletteBet::High,
        ]);
        bets.extend((0..3).map(RouletteBet::Dozen));
        bets.extend((0..3).map(RouletteBet::Column));
        bets
    }

    #[test]
    fn test_colors() {
        assert_eq!(color(1), Color::Red);
        assert_eq!(color(32), Color::Red);
        assert_eq!(color(2), Color::Black);
        assert_eq!(color(17), Color::Black);
        assert_eq!(color(0), Color::Green);
        let reds = (1..=36).filter(|&n| color(n) == Color::Red).count();
        assert_eq!(reds, 18);
    }

    #[test]
    fn test_zero_belongs_to_no_bucket() {
        assert_eq!(dozen(0), None);
        assert_eq!(column(0), None);
        for bet in all_bets() {
            assert_eq!(bet.wins(0), bet == RouletteBet::Straight(0), "{bet:?}");
        }
    }

    #[test]
    fn test_bet_wins_dozen_and_column() {
        assert!(RouletteBet::Dozen(0).wins(12));
        assert!(!RouletteBet::Dozen(0).wins(13));
        assert!(RouletteBet::Dozen(2).wins(25));
        assert!(RouletteBet::Column(0).wins(34));
        assert!(RouletteBet::Column(1).wins(35));
        assert!(RouletteBet::Column(2).wins(36));
        assert!(!RouletteBet::Column(2).wins(1));
    }

    #[test]
    fn test_invalid_selections() {
        assert_eq!(
            RouletteBet::straight(37),
            Err(BetError::NumberOutOfRange { got: 37, max: 36 })
        );
        assert_eq!(RouletteBet::dozen(3), Err(BetError::GroupOutOfRange { got: 3 }));
        assert!(RouletteBet::Column(5).validate().is_err());
        assert_eq!(RouletteBet::Red.validate(), Ok(RouletteBet::Red));
    }

    #[test]
    fn test_rtp_identical_for_every_bet() {
        let roulette = Roulette::default();
        let expected = 36.0 / 37.0;
        for bet in all_bets() {
            assert_eq!(roulette.theoretical_rtp(&bet), expected, "{bet:?}");
        }
    }

    #[test]
    fn test_red_on_seventeen_loses_straight_wins() {
        let roulette = Roulette::default();

        let red = roulette.settle(&Bet::new(RouletteBet::Red, 100), 17);
        assert_eq!(red.color, Color::Black);
        assert_eq!(red.settlement.payout, 0);

        let straight = roulette.settle(&Bet::new(RouletteBet::Straight(17), 100), 17);
        assert_eq!(straight.settlement.payout, 100 + 100 * 35);
    }

    #[test]
    fn test_seeded_spin_landing_on_seventeen() {
        let mut roulette = Roulette::default();
        let seed = (0..10_000u64)
            .find(|&seed| roulette.spin(&mut RandomSource::seeded(seed)) == 17)
            .expect("some seed lands on 17");

        let mut rng = RandomSource::seeded(seed);
        let spin = roulette.play(&Bet::new(RouletteBet::Red, 100), &mut rng);
        assert_eq!(spin.number, 17);
        assert_eq!(spin.settlement.payout, 0);

        let mut rng = RandomSource::seeded(seed);
        let spin = roulette.play(&Bet::new(RouletteBet::Straight(17), 100), &mut rng);
        assert_eq!(spin.settlement.payout, 3600);
    }

    #[test]
    fn test_spin_range() {
        let roulette = Roulette::default();
        let mut rng = RandomSource::seeded(5);
        let mut seen = [false; 37];
        for _ in 0..5_000 {
            let n = roulette.spin(&mut rng);
            assert!(n <= 36);
            seen[n as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_zero_stake_is_void() {
        let roulette = Roulette::default();
        let spin = roulette.settle(&Bet::new(RouletteBet::Straight(5), 0), 5);
        assert_eq!(spin.settlement.payout, 0);
        assert_eq!(spin.settlement.outcome(), casino_types::Outcome::Void);
    }
}
