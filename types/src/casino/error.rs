use thiserror::Error as ThisError;

/// Odds-table and rule misconfiguration, detected when a config is loaded.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum ConfigError {
    #[error("weight table is empty")]
    EmptyWeights,
    #[error("weight for {key} must be positive")]
    ZeroWeight { key: String },
    #[error("house edge must be in [0, 1) (got={got})")]
    HouseEdgeOutOfRange { got: f64 },
    #[error("unsupported deck count (got={got})")]
    UnsupportedDecks { got: u8 },
    #[error("growth rate must be positive and finite (got={got})")]
    InvalidGrowthRate { got: f64 },
    #[error("horse race needs at least two horses (got={got})")]
    TooFewHorses { got: usize },
    #[error("payout for {key} would be below 1.0x (multiplier={multiplier})")]
    PayoutBelowStake { key: String, multiplier: f64 },
    #[error("duplicate symbol {key} in paytable")]
    DuplicateKey { key: String },
}

/// Invalid selection supplied when constructing a bet.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum BetError {
    #[error("roulette number out of range (got={got}, max={max})")]
    NumberOutOfRange { got: u8, max: u8 },
    #[error("dozen/column index out of range (got={got}, max=2)")]
    GroupOutOfRange { got: u8 },
    #[error("horse index out of range (got={got}, horses={horses})")]
    HorseOutOfRange { got: usize, horses: usize },
    #[error("cash-out target must be a finite multiplier >= 1.0 (got={got})")]
    InvalidTarget { got: f64 },
    #[error("stand threshold must be in 2..=21 (got={got})")]
    InvalidStandThreshold { got: u8 },
}
