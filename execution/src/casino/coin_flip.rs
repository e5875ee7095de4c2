//! Coin flip.
//!
//! The draw is a fair coin; the house edge lives entirely in the payout:
//! `multiplier = 2 * (1 - house_edge)`, so `RTP = 0.5 * multiplier = 1 - house_edge`.

use super::{CasinoGame, PlayedRound};
use crate::rng::RandomSource;
use crate::CoinFlipConfig;
use casino_types::{Bet, GameKind, Settlement};
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinSide {
    Heads,
    Tails,
}

impl CoinSide {
    pub fn opposite(self) -> Self {
        match self {
            CoinSide::Heads => CoinSide::Tails,
            CoinSide::Tails => CoinSide::Heads,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CoinSide::Heads => "heads",
            CoinSide::Tails => "tails",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoinFlipRound {
    pub landed: CoinSide,
    pub called: CoinSide,
    pub settlement: Settlement,
}

impl PlayedRound for CoinFlipRound {
    fn settlement(&self) -> &Settlement {
        &self.settlement
    }
}

#[derive(Clone, Debug, Default)]
pub struct CoinFlip {
    config: CoinFlipConfig,
}

impl CoinFlip {
    pub fn new(config: CoinFlipConfig) -> Self {
        Self { config }
    }

    /// Total-return multiplier on a correct call.
    pub fn payout_multiplier(&self) -> f64 {
        2.0 * (1.0 - self.config.house_edge)
    }

    pub fn toss(&self, rng: &mut RandomSource) -> CoinSide {
        if rng.boolean() {
            CoinSide::Heads
        } else {
            CoinSide::Tails
        }
    }

    pub fn settle(&self, bet: &Bet<CoinSide>, landed: CoinSide) -> CoinFlipRound {
        let multiplier = if landed == bet.selection {
            self.payout_multiplier()
        } else {
            0.0
        };
        CoinFlipRound {
            landed,
            called: bet.selection,
            settlement: Settlement::new(bet.amount, multiplier),
        }
    }
}

impl CasinoGame for CoinFlip {
    type Selection = CoinSide;
    type Round = CoinFlipRound;

    fn kind(&self) -> GameKind {
        GameKind::CoinFlip
    }

    fn play(&mut self, bet: &Bet<CoinSide>, rng: &mut RandomSource) -> CoinFlipRound {
        let landed = self.toss(rng);
        let round = self.settle(bet, landed);
        trace!(landed = landed.as_str(), payout = round.settlement.payout, "coin flip");
        round
    }

    fn theoretical_rtp(&self, _selection: &CoinSide) -> f64 {
        0.5 * self.payout_multiplier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casino_types::Outcome;

    #[test]
    fn test_default_multiplier() {
        let game = CoinFlip::default();
        assert!((game.payout_multiplier() - 1.96).abs() < 1e-12);
        assert!((game.theoretical_rtp(&CoinSide::Heads) - 0.98).abs() < 1e-12);
    }

    #[test]
    fn test_win_pays_196() {
        let game = CoinFlip::default();
        let win = game.settle(&Bet::new(CoinSide::Tails, 100), CoinSide::Tails);
        assert_eq!(win.settlement.payout, 196);
        assert_eq!(win.settlement.outcome(), Outcome::Win);

        let loss = game.settle(&Bet::new(CoinSide::Tails, 100), CoinSide::Heads);
        assert_eq!(loss.settlement.payout, 0);
        assert_eq!(loss.settlement.outcome(), Outcome::Loss);
    }

    #[test]
    fn test_rtp_tracks_house_edge() {
        for edge in [0.0, 0.01, 0.025, 0.1] {
            let game = CoinFlip::new(CoinFlipConfig { house_edge: edge });
            assert!((game.theoretical_rtp(&CoinSide::Tails) - (1.0 - edge)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_toss_is_fair() {
        let game = CoinFlip::default();
        let mut rng = RandomSource::seeded(8);
        let draws = 100_000;
        let heads = (0..draws)
            .filter(|_| game.toss(&mut rng) == CoinSide::Heads)
            .count();
        let share = heads as f64 / draws as f64;
        assert!((share - 0.5).abs() < 0.01, "heads share {share}");
    }

    #[test]
    fn test_opposite() {
        assert_eq!(CoinSide::Heads.opposite(), CoinSide::Tails);
        assert_eq!(CoinSide::Tails.opposite().opposite(), CoinSide::Tails);
    }
}
