/// Pockets on a European single-zero wheel (0..=36).
pub const ROULETTE_POCKETS: u8 = 37;

/// Highest number on the roulette wheel.
pub const ROULETTE_MAX_NUMBER: u8 = 36;

/// Decks in the default blackjack shoe.
pub const BLACKJACK_DEFAULT_DECKS: u8 = 6;

/// Supported shoe sizes.
pub const BLACKJACK_ALLOWED_DECKS: [u8; 5] = [1, 2, 4, 6, 8];

/// Dealer and default player stand threshold.
pub const BLACKJACK_STAND_TOTAL: u8 = 17;

/// Coin flip house edge (payout multiplier 1.96).
pub const COIN_FLIP_HOUSE_EDGE: f64 = 0.02;

/// Horse race house edge applied to fair odds.
pub const HORSE_RACE_HOUSE_EDGE: f64 = 0.05;

/// Crash game house edge (probability of an instant crash at 1.00x).
pub const CRASH_HOUSE_EDGE: f64 = 0.04;

/// Live multiplier growth per second: `multiplier(t) = exp(CRASH_GROWTH_RATE * t)`.
pub const CRASH_GROWTH_RATE: f64 = 0.06;

/// Default stake used by simulations (chips).
pub const SIMULATION_DEFAULT_BET: u64 = 100;

/// Default batch size for simulations.
pub const SIMULATION_DEFAULT_ROUNDS: u64 = 100_000;

/// Two-sided 95% normal quantile.
pub const Z_95: f64 = 1.96;

/// Variance bound used by the sample-size-aware tolerance: `Z_95 * sqrt(0.25 / n)`.
pub const TOLERANCE_VARIANCE_BOUND: f64 = 0.25;

/// Upper standard-deviation bounds for the descriptive risk levels.
pub const RISK_LOW_MAX_STD_DEV: f64 = 1.0;
pub const RISK_MEDIUM_MAX_STD_DEV: f64 = 2.5;
pub const RISK_HIGH_MAX_STD_DEV: f64 = 5.0;
