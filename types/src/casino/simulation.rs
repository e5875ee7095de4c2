use super::{
    GameKind, Outcome, Settlement, RISK_HIGH_MAX_STD_DEV, RISK_LOW_MAX_STD_DEV,
    RISK_MEDIUM_MAX_STD_DEV, TOLERANCE_VARIANCE_BOUND, Z_95,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One simulated round, as seen by the statistics accumulator.
///
/// `returned` is `bet * multiplier` without ledger rounding so that aggregate RTP is
/// comparable with closed-form theoretical values.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub bet: f64,
    pub returned: f64,
    pub is_win: bool,
    pub is_push: bool,
}

impl RoundRecord {
    pub fn from_settlement(settlement: &Settlement) -> Self {
        let bet = settlement.stake as f64;
        let (is_win, is_push) = match settlement.outcome() {
            Outcome::Win => (true, false),
            Outcome::Push => (false, true),
            Outcome::Loss | Outcome::Void => (false, false),
        };
        Self {
            bet,
            returned: bet * settlement.multiplier,
            is_win,
            is_push,
        }
    }

    /// Return ratio for this round (`returned / bet`), zero for a void stake.
    pub fn ratio(&self) -> f64 {
        if self.bet > 0.0 {
            self.returned / self.bet
        } else {
            0.0
        }
    }
}

/// Win/loss/push tallies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub wins: u64,
    pub losses: u64,
    pub pushes: u64,
}

impl OutcomeCounts {
    pub fn total(&self) -> u64 {
        self.wins + self.losses + self.pushes
    }
}

/// Descriptive volatility bucket derived from the per-round return standard deviation.
///
/// Not used for pass/fail decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub fn from_std_dev(std_dev: f64) -> Self {
        if std_dev < RISK_LOW_MAX_STD_DEV {
            RiskLevel::Low
        } else if std_dev < RISK_MEDIUM_MAX_STD_DEV {
            RiskLevel::Medium
        } else if std_dev < RISK_HIGH_MAX_STD_DEV {
            RiskLevel::High
        } else {
            RiskLevel::VeryHigh
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "very-high",
        }
    }
}

/// Sample-size-aware 95% tolerance on observed RTP: `1.96 * sqrt(0.25 / n)`.
///
/// Returns `0.0` for an empty batch.
pub fn expected_tolerance(num_rounds: u64) -> f64 {
    if num_rounds == 0 {
        return 0.0;
    }
    Z_95 * (TOLERANCE_VARIANCE_BOUND / num_rounds as f64).sqrt()
}

/// Aggregate over one simulation batch. Read-only once produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub game: GameKind,
    /// Human-readable description of the bet strategy (e.g. `red`, `stand-on-17`).
    pub strategy: String,
    pub seed: Option<u64>,
    pub num_rounds: u64,
    pub total_wagered: f64,
    pub total_returned: f64,
    pub net_profit: f64,
    pub observed_rtp: f64,
    pub theoretical_rtp: f64,
    pub hit_rate: f64,
    pub std_deviation: f64,
    pub standard_error: f64,
    pub confidence_half_width: f64,
    pub expected_tolerance: f64,
    pub within_tolerance: bool,
    pub max_drawdown: f64,
    pub longest_winning_streak: u64,
    pub longest_losing_streak: u64,
    pub counts: OutcomeCounts,
    pub risk_level: RiskLevel,
    pub elapsed: Duration,
}

impl SimulationResult {
    /// Neutral result for a batch that played no rounds.
    pub fn empty(game: GameKind, strategy: impl Into<String>, theoretical_rtp: f64) -> Self {
        Self {
            game,
            strategy: strategy.into(),
            seed: None,
            num_rounds: 0,
            total_wagered: 0.0,
            total_returned: 0.0,
            net_profit: 0.0,
            observed_rtp: 0.0,
            theoretical_rtp,
            hit_rate: 0.0,
            std_deviation: 0.0,
            standard_error: 0.0,
            confidence_half_width: 0.0,
            expected_tolerance: 0.0,
            within_tolerance: false,
            max_drawdown: 0.0,
            longest_winning_streak: 0,
            longest_losing_streak: 0,
            counts: OutcomeCounts::default(),
            risk_level: RiskLevel::Low,
            elapsed: Duration::ZERO,
        }
    }

    /// Signed difference between observed and theoretical RTP.
    pub fn rtp_deviation(&self) -> f64 {
        self.observed_rtp - self.theoretical_rtp
    }

    /// Whether the observed RTP falls inside the variance-aware interval
    /// (`1.96 * observed_sd / sqrt(n)`), as opposed to the fixed-bound tolerance.
    pub fn within_confidence_interval(&self) -> bool {
        self.num_rounds > 0 && self.rtp_deviation().abs() < self.confidence_half_width
    }
}
