//! Bet strategies the simulator can drive.
//!
//! A strategy pins one selection for the whole batch: every round stakes the same
//! bet on the same outcome.

use crate::SimulationError;
use casino_execution::casino::blackjack::BlackjackStrategy;
use casino_execution::casino::coin_flip::CoinSide;
use casino_execution::casino::crash::CashOutTarget;
use casino_execution::casino::roulette::RouletteBet;
use casino_types::GameKind;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "kebab-case")]
pub enum BetStrategy {
    Roulette { bet: RouletteBet },
    Blackjack { stand_on: BlackjackStrategy },
    Slots,
    CoinFlip { side: CoinSide },
    HorseRace { horse: usize },
    Crash { target: CashOutTarget },
}

impl BetStrategy {
    /// The strategy used when none is given: red, stand on 17, heads, the favourite,
    /// cash out at 2x.
    pub fn default_for(game: GameKind) -> Self {
        match game {
            GameKind::Roulette => Self::Roulette {
                bet: RouletteBet::Red,
            },
            GameKind::Blackjack => Self::Blackjack {
                stand_on: BlackjackStrategy::default(),
            },
            GameKind::Slots => Self::Slots,
            GameKind::CoinFlip => Self::CoinFlip {
                side: CoinSide::Heads,
            },
            GameKind::HorseRace => Self::HorseRace { horse: 0 },
            GameKind::Crash => Self::Crash {
                target: CashOutTarget::default(),
            },
        }
    }

    pub fn game(&self) -> GameKind {
        match self {
            Self::Roulette { .. } => GameKind::Roulette,
            Self::Blackjack { .. } => GameKind::Blackjack,
            Self::Slots => GameKind::Slots,
            Self::CoinFlip { .. } => GameKind::CoinFlip,
            Self::HorseRace { .. } => GameKind::HorseRace,
            Self::Crash { .. } => GameKind::Crash,
        }
    }

    /// Parse a command-line bet for `game`.
    ///
    /// Roulette: `red`, `black`, `even`, `odd`, `low`, `high`, `straight-N`, `dozen-N`,
    /// `column-N` (groups numbered 1..=3). Blackjack: stand threshold. Coin flip: `heads`
    /// or `tails`. Horse race: horse index. Crash: cash-out multiplier. Slots take no bet.
    pub fn parse(game: GameKind, bet: &str) -> Result<Self, SimulationError> {
        let invalid = || SimulationError::InvalidStrategy {
            game,
            bet: bet.to_string(),
        };
        let bet_lower = bet.trim().to_ascii_lowercase();
        let strategy = match game {
            GameKind::Roulette => Self::Roulette {
                bet: parse_roulette(&bet_lower).ok_or_else(invalid)??,
            },
            GameKind::Blackjack => {
                let threshold = bet_lower.parse::<u8>().map_err(|_| invalid())?;
                Self::Blackjack {
                    stand_on: BlackjackStrategy::stand_on(threshold)?,
                }
            }
            GameKind::Slots => Self::Slots,
            GameKind::CoinFlip => Self::CoinFlip {
                side: match bet_lower.as_str() {
                    "heads" | "h" => CoinSide::Heads,
                    "tails" | "t" => CoinSide::Tails,
                    _ => return Err(invalid()),
                },
            },
            GameKind::HorseRace => Self::HorseRace {
                horse: bet_lower.parse().map_err(|_| invalid())?,
            },
            GameKind::Crash => {
                let target = bet_lower
                    .trim_end_matches('x')
                    .parse::<f64>()
                    .map_err(|_| invalid())?;
                Self::Crash {
                    target: CashOutTarget::new(target)?,
                }
            }
        };
        Ok(strategy)
    }

    /// Short label for reports (`red`, `stand-on-17`, `cash-out-2.00x`...).
    pub fn label(&self) -> String {
        match self {
            Self::Roulette { bet } => bet.label(),
            Self::Blackjack { stand_on } => format!("stand-on-{}", stand_on.threshold()),
            Self::Slots => "spin".to_string(),
            Self::CoinFlip { side } => side.as_str().to_string(),
            Self::HorseRace { horse } => format!("horse-{horse}"),
            Self::Crash { target } => format!("cash-out-{:.2}x", target.value()),
        }
    }
}

impl fmt::Display for BetStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.game(), self.label())
    }
}

fn parse_roulette(bet: &str) -> Option<Result<RouletteBet, casino_types::BetError>> {
    let simple = match bet {
        "red" => Some(RouletteBet::Red),
        "black" => Some(RouletteBet::Black),
        "even" => Some(RouletteBet::Even),
        "odd" => Some(RouletteBet::Odd),
        "low" | "1-18" => Some(RouletteBet::Low),
        "high" | "19-36" => Some(RouletteBet::High),
        _ => None,
    };
    if let Some(bet) = simple {
        return Some(Ok(bet));
    }
    let (kind, value) = bet.split_once(|c: char| matches!(c, '-' | ':' | ' '))?;
    let value: u8 = value.parse().ok()?;
    match kind {
        "straight" | "number" => Some(RouletteBet::straight(value)),
        // Groups are numbered from 1 on the command line.
        "dozen" => Some(RouletteBet::dozen(value.checked_sub(1)?)),
        "column" => Some(RouletteBet::column(value.checked_sub(1)?)),
        _ => None,
    }
}
