use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Games offered by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    Roulette,
    Blackjack,
    Slots,
    CoinFlip,
    HorseRace,
    Crash,
}

impl GameKind {
    pub const ALL: [GameKind; 6] = [
        GameKind::Roulette,
        GameKind::Blackjack,
        GameKind::Slots,
        GameKind::CoinFlip,
        GameKind::HorseRace,
        GameKind::Crash,
    ];

    /// Stable kebab-case identifier (CLI and config keys).
    pub fn as_str(self) -> &'static str {
        match self {
            GameKind::Roulette => "roulette",
            GameKind::Blackjack => "blackjack",
            GameKind::Slots => "slots",
            GameKind::CoinFlip => "coin-flip",
            GameKind::HorseRace => "horse-race",
            GameKind::Crash => "crash",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown game identifier.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown game: {0}")]
pub struct UnknownGame(pub String);

impl FromStr for GameKind {
    type Err = UnknownGame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "roulette" => Ok(GameKind::Roulette),
            "blackjack" => Ok(GameKind::Blackjack),
            "slots" | "slot" | "slot-machine" => Ok(GameKind::Slots),
            "coin-flip" | "coinflip" => Ok(GameKind::CoinFlip),
            "horse-race" | "horses" => Ok(GameKind::HorseRace),
            "crash" | "aviator" => Ok(GameKind::Crash),
            _ => Err(UnknownGame(s.to_string())),
        }
    }
}
