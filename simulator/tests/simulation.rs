use casino_execution::casino::coin_flip::CoinSide;
use casino_execution::casino::crash::CashOutTarget;
use casino_execution::casino::roulette::RouletteBet;
use casino_execution::GameRegistry;
use casino_simulator::{verify_convergence, BetStrategy, SimConfig, SimulationError, Simulator};
use casino_types::{GameKind, SimulationResult};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

fn run(seed: u64, strategy: BetStrategy, rounds: u64) -> SimulationResult {
    Simulator::new(seed, GameRegistry::new())
        .unwrap()
        .run(strategy, rounds)
        .unwrap()
}

fn without_timing(mut result: SimulationResult) -> SimulationResult {
    result.elapsed = Duration::ZERO;
    result
}

#[test]
fn test_same_seed_same_result() {
    for game in GameKind::ALL {
        let strategy = BetStrategy::default_for(game);
        let a = without_timing(run(11, strategy, 20_000));
        let b = without_timing(run(11, strategy, 20_000));
        assert_eq!(a, b, "{game} diverged");
        let c = without_timing(run(12, strategy, 20_000));
        assert_ne!(a.total_returned, c.total_returned, "{game} ignored its seed");
    }
}

#[test]
fn test_result_is_internally_consistent() {
    for game in GameKind::ALL {
        let result = run(5, BetStrategy::default_for(game), 50_000);
        assert_eq!(result.num_rounds, 50_000);
        assert_eq!(result.counts.total(), 50_000);
        assert_eq!(result.total_wagered, 5_000_000.0);
        assert!((result.net_profit - (result.total_returned - result.total_wagered)).abs() < 1e-6);
        assert!((result.observed_rtp - result.total_returned / result.total_wagered).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&result.hit_rate));
        assert!(result.max_drawdown >= 0.0);
        assert!(result.longest_winning_streak <= result.counts.wins);
        assert!(result.longest_losing_streak <= result.counts.losses);
        assert!(result.longest_losing_streak > 0);
        assert!((result.expected_tolerance - 1.96 * (0.25f64 / 50_000.0).sqrt()).abs() < 1e-12);
    }
}

#[test]
fn test_coin_flip_matches_closed_form_statistics() {
    let result = run(
        21,
        BetStrategy::CoinFlip {
            side: CoinSide::Tails,
        },
        200_000,
    );
    // Ratios are 0 or 1.96 with even odds: sd = 0.98.
    assert!((result.std_deviation - 0.98).abs() < 0.005);
    assert!((result.hit_rate - 0.5).abs() < 0.01);
    assert_eq!(result.counts.pushes, 0);
    // A 200k-round fair-ish walk always dips below its running peak.
    assert!(result.max_drawdown > 0.0);
    assert!(result.longest_losing_streak >= 10);
}

#[test]
fn test_straight_bet_is_high_variance() {
    let result = run(
        3,
        BetStrategy::Roulette {
            bet: RouletteBet::Straight(17),
        },
        100_000,
    );
    // A 36x return at 1/37 has sd of about 5.84.
    assert!(result.std_deviation > 5.0, "sd {}", result.std_deviation);
    assert_eq!(result.risk_level.as_str(), "very-high");
    assert!((result.hit_rate - 1.0 / 37.0).abs() < 0.003);
}

#[test]
fn test_convergence_pass_rates() {
    let registry = GameRegistry::new();

    let report = verify_convergence(
        &registry,
        BetStrategy::CoinFlip {
            side: CoinSide::Heads,
        },
        40,
        100_000,
        2024,
    )
    .unwrap();
    assert_eq!(report.num_batches(), 40);
    assert!(
        report.confidence_pass_rate() >= 0.8,
        "variance-aware pass rate {}",
        report.confidence_pass_rate()
    );
    // The fixed bound assumes variance <= 0.25; coin-flip returns have ~0.96, so the
    // bound is about one standard error wide and passes roughly two batches in three.
    assert!(report.pass_rate() >= 0.4, "pass rate {}", report.pass_rate());
    assert!((report.mean_observed_rtp - 0.98).abs() < 0.002);

    for strategy in [
        BetStrategy::Roulette {
            bet: RouletteBet::Red,
        },
        BetStrategy::Crash {
            target: CashOutTarget::new(2.0).unwrap(),
        },
    ] {
        let report = verify_convergence(&registry, strategy, 20, 50_000, 99).unwrap();
        assert!(
            report.confidence_pass_rate() >= 0.75,
            "{strategy}: {}",
            report.confidence_pass_rate()
        );
    }
}

#[test]
fn test_cancel_returns_partial_result() {
    let cancel = AtomicBool::new(false);
    let mut sim = Simulator::new(8, GameRegistry::new()).unwrap();
    let requested = 500_000_000;
    let result = std::thread::scope(|scope| {
        scope.spawn(|| {
            std::thread::sleep(Duration::from_millis(20));
            cancel.store(true, Ordering::Relaxed);
        });
        sim.run_until(BetStrategy::Slots, requested, &cancel)
    })
    .unwrap();
    assert!(result.num_rounds < requested);
    assert_eq!(result.counts.total(), result.num_rounds);
    assert_eq!(result.total_wagered, result.num_rounds as f64 * 100.0);
}

#[test]
fn test_config_file_drives_simulation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "seed: 3\nbet_amount: 10\ngames:\n  crash:\n    house_edge: 0.1\n"
    )
    .unwrap();
    let config = SimConfig::load(file.path()).unwrap();
    let registry = config.registry().unwrap();

    let mut sim = Simulator::new(config.seed.unwrap(), registry)
        .unwrap()
        .with_bet_amount(config.bet_amount.unwrap())
        .unwrap();
    let result = sim.run_simulation(GameKind::Crash, 1_000, None).unwrap();
    assert!((result.theoretical_rtp - 0.9).abs() < 1e-12);
    assert_eq!(result.total_wagered, 10_000.0);

    let mut sim = Simulator::new(3, GameRegistry::new()).unwrap();
    assert!(matches!(
        sim.run_simulation(
            GameKind::Crash,
            10,
            Some(BetStrategy::default_for(GameKind::Slots))
        ),
        Err(SimulationError::StrategyMismatch { .. })
    ));
}
