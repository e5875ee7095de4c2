//! Running aggregates over a simulation batch.

use casino_types::{
    expected_tolerance, GameKind, OutcomeCounts, RiskLevel, RoundRecord, SimulationResult, Z_95,
};
use std::time::Duration;

/// Incremental accumulator: every statistic is updated per round in `O(1)` so batches of
/// any size run in constant memory.
#[derive(Clone, Debug, Default)]
pub struct StatsAccumulator {
    rounds: u64,
    total_wagered: f64,
    total_returned: f64,
    ratio_sum: f64,
    ratio_sum_sq: f64,
    counts: OutcomeCounts,
    cumulative_profit: f64,
    peak_profit: f64,
    max_drawdown: f64,
    win_streak: u64,
    loss_streak: u64,
    longest_win_streak: u64,
    longest_loss_streak: u64,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    pub fn record(&mut self, round: RoundRecord) {
        self.rounds += 1;
        self.total_wagered += round.bet;
        self.total_returned += round.returned;

        let ratio = round.ratio();
        self.ratio_sum += ratio;
        self.ratio_sum_sq += ratio * ratio;

        // Peak starts at zero profit, so an opening losing run counts as drawdown.
        self.cumulative_profit += round.returned - round.bet;
        if self.cumulative_profit > self.peak_profit {
            self.peak_profit = self.cumulative_profit;
        }
        let drawdown = self.peak_profit - self.cumulative_profit;
        if drawdown > self.max_drawdown {
            self.max_drawdown = drawdown;
        }

        if round.is_push {
            self.counts.pushes += 1;
            self.win_streak = 0;
            self.loss_streak = 0;
        } else if round.is_win {
            self.counts.wins += 1;
            self.win_streak += 1;
            self.loss_streak = 0;
            self.longest_win_streak = self.longest_win_streak.max(self.win_streak);
        } else {
            self.counts.losses += 1;
            self.loss_streak += 1;
            self.win_streak = 0;
            self.longest_loss_streak = self.longest_loss_streak.max(self.loss_streak);
        }
    }

    pub fn observed_rtp(&self) -> f64 {
        if self.total_wagered > 0.0 {
            self.total_returned / self.total_wagered
        } else {
            0.0
        }
    }

    /// Population standard deviation of the per-round return ratio.
    pub fn std_deviation(&self) -> f64 {
        if self.rounds == 0 {
            return 0.0;
        }
        let n = self.rounds as f64;
        let mean = self.ratio_sum / n;
        let var = self.ratio_sum_sq / n - mean * mean;
        var.max(0.0).sqrt()
    }

    pub fn finish(
        self,
        game: GameKind,
        strategy: impl Into<String>,
        seed: Option<u64>,
        theoretical_rtp: f64,
        elapsed: Duration,
    ) -> SimulationResult {
        if self.rounds == 0 {
            let mut result = SimulationResult::empty(game, strategy, theoretical_rtp);
            result.seed = seed;
            result.elapsed = elapsed;
            return result;
        }

        let n = self.rounds as f64;
        let observed_rtp = self.observed_rtp();
        let std_deviation = self.std_deviation();
        let standard_error = std_deviation / n.sqrt();
        let tolerance = expected_tolerance(self.rounds);

        SimulationResult {
            game,
            strategy: strategy.into(),
            seed,
            num_rounds: self.rounds,
            total_wagered: self.total_wagered,
            total_returned: self.total_returned,
            net_profit: self.total_returned - self.total_wagered,
            observed_rtp,
            theoretical_rtp,
            hit_rate: self.counts.wins as f64 / n,
            std_deviation,
            standard_error,
            confidence_half_width: Z_95 * standard_error,
            expected_tolerance: tolerance,
            within_tolerance: (observed_rtp - theoretical_rtp).abs() < tolerance,
            max_drawdown: self.max_drawdown,
            longest_winning_streak: self.longest_win_streak,
            longest_losing_streak: self.longest_loss_streak,
            counts: self.counts,
            risk_level: RiskLevel::from_std_dev(std_deviation),
            elapsed,
        }
    }
}
