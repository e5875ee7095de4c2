use casino_types::{BetError, ConfigError, GameKind, UnknownGame};
use std::path::PathBuf;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum SimulationError {
    #[error("invalid game configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid bet: {0}")]
    Bet(#[from] BetError),
    #[error(transparent)]
    UnknownGame(#[from] UnknownGame),
    #[error("strategy for {strategy} cannot drive {game}")]
    StrategyMismatch { game: GameKind, strategy: GameKind },
    #[error("unrecognised {game} bet: {bet}")]
    InvalidStrategy { game: GameKind, bet: String },
    #[error("{0} is disabled in the registry")]
    InactiveGame(GameKind),
    #[error("bet amount must be positive")]
    ZeroBet,
    #[error("convergence check needs at least one batch")]
    NoBatches,
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
