//! Multi-batch convergence check.
//!
//! Runs many independently seeded batches of one strategy and counts how often the
//! observed RTP lands inside its tolerance band. At 95% confidence roughly one batch in
//! twenty is expected to miss; a pass rate far below that points at a broken odds table
//! or a biased random source.

use crate::{BetStrategy, SimulationError, Simulator};
use casino_execution::{GameRegistry, RandomSource};
use casino_types::{GameKind, SimulationResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Pass rate below which a convergence run is flagged.
pub const MIN_PASS_RATE: f64 = 0.9;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceReport {
    pub game: GameKind,
    pub strategy: String,
    pub seed: u64,
    pub rounds_per_batch: u64,
    pub theoretical_rtp: f64,
    /// Batches inside `1.96 * sqrt(0.25 / n)`.
    pub within_tolerance: usize,
    /// Batches inside `1.96 * sd / sqrt(n)`.
    pub within_confidence: usize,
    pub mean_observed_rtp: f64,
    pub worst_deviation: f64,
    pub batches: Vec<SimulationResult>,
}

impl ConvergenceReport {
    pub fn num_batches(&self) -> usize {
        self.batches.len()
    }

    /// Fraction of batches inside the fixed-bound tolerance.
    pub fn pass_rate(&self) -> f64 {
        self.within_tolerance as f64 / self.num_batches().max(1) as f64
    }

    /// Fraction of batches inside the variance-aware interval.
    ///
    /// The fixed bound assumes a per-round variance of at most 0.25, which only holds for
    /// returns in `[0, 1]`; games that pay more than 1x are judged on this rate instead.
    pub fn confidence_pass_rate(&self) -> f64 {
        self.within_confidence as f64 / self.num_batches().max(1) as f64
    }

    pub fn is_converged(&self) -> bool {
        self.confidence_pass_rate() >= MIN_PASS_RATE
    }
}

/// Run `batches` batches of `rounds_per_batch` rounds each, in parallel.
///
/// Batch sources are forked in order from one root seeded with `seed`, so the report is
/// reproducible regardless of how rayon schedules the work.
pub fn verify_convergence(
    registry: &GameRegistry,
    strategy: BetStrategy,
    batches: usize,
    rounds_per_batch: u64,
    seed: u64,
) -> Result<ConvergenceReport, SimulationError> {
    if batches == 0 {
        return Err(SimulationError::NoBatches);
    }
    registry.validate()?;

    let mut root = RandomSource::seeded(seed);
    let sources: Vec<RandomSource> = (0..batches).map(|_| root.fork()).collect();
    let results = sources
        .into_par_iter()
        .map(|rng| Simulator::with_source(rng, registry.clone())?.run(strategy, rounds_per_batch))
        .collect::<Result<Vec<_>, _>>()?;

    let theoretical_rtp = results
        .first()
        .map(|result| result.theoretical_rtp)
        .unwrap_or_default();
    let within_tolerance = results.iter().filter(|r| r.within_tolerance).count();
    let within_confidence = results
        .iter()
        .filter(|r| r.within_confidence_interval())
        .count();
    let mean_observed_rtp =
        results.iter().map(|r| r.observed_rtp).sum::<f64>() / results.len() as f64;
    let worst_deviation = results
        .iter()
        .map(|r| r.rtp_deviation().abs())
        .fold(0.0, f64::max);

    let report = ConvergenceReport {
        game: strategy.game(),
        strategy: strategy.label(),
        seed,
        rounds_per_batch,
        theoretical_rtp,
        within_tolerance,
        within_confidence,
        mean_observed_rtp,
        worst_deviation,
        batches: results,
    };
    info!(
        game = %report.game,
        batches,
        pass_rate = report.pass_rate(),
        confidence_pass_rate = report.confidence_pass_rate(),
        mean_observed_rtp,
        "convergence check finished"
    );
    if !report.is_converged() {
        warn!(
            game = %report.game,
            confidence_pass_rate = report.confidence_pass_rate(),
            "convergence pass rate below {MIN_PASS_RATE}"
        );
    }
    Ok(report)
}
