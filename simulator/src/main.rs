use anyhow::{Context, Result};
use casino_execution::casino::roulette::RouletteBet;
use casino_execution::{GameRegistry, RandomSource};
use casino_simulator::{verify_convergence, BetStrategy, ConvergenceReport, SimConfig, Simulator};
use casino_types::{GameKind, SimulationResult, SIMULATION_DEFAULT_BET, SIMULATION_DEFAULT_ROUNDS};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    // RUST_LOG, when set, takes precedence over the default level.
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// YAML file with seed, rounds, bet amount and per-game overrides.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate one batch and report its statistics.
    Run(RunArgs),
    /// Run many seeded batches and report how often they land within tolerance.
    Verify {
        #[command(flatten)]
        run: RunArgs,

        #[arg(long, default_value_t = 40)]
        batches: usize,
    },
    /// Print theoretical RTP for every game and a spread of bets.
    Rtp,
    /// List the game registry.
    Games {
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    #[arg(short, long)]
    game: GameKind,

    /// Game-specific bet (e.g. `red`, `straight-17`, `16`, `tails`, `2`, `1.5x`).
    #[arg(short, long)]
    bet: Option<String>,

    #[arg(short, long)]
    rounds: Option<u64>,

    #[arg(short, long)]
    seed: Option<u64>,

    /// Stake per round, in chips.
    #[arg(long)]
    bet_amount: Option<u64>,

    /// Emit JSON instead of a text report.
    #[arg(long)]
    json: bool,
}

/// Run parameters after merging command-line flags over the config file.
#[derive(Debug)]
struct Settings {
    registry: GameRegistry,
    strategy: BetStrategy,
    rounds: u64,
    seed: Option<u64>,
    bet_amount: u64,
}

fn build_settings(run: &RunArgs, file: &SimConfig) -> Result<Settings> {
    let registry = file.registry().context("invalid game overrides")?;
    let strategy = match &run.bet {
        Some(bet) => BetStrategy::parse(run.game, bet)?,
        None => BetStrategy::default_for(run.game),
    };
    Ok(Settings {
        registry,
        strategy,
        rounds: run
            .rounds
            .or(file.rounds)
            .unwrap_or(SIMULATION_DEFAULT_ROUNDS),
        seed: run.seed.or(file.seed),
        bet_amount: run
            .bet_amount
            .or(file.bet_amount)
            .unwrap_or(SIMULATION_DEFAULT_BET),
    })
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    match path {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(SimConfig::default()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialise report")?;
    println!("{json}");
    Ok(())
}

fn print_result(result: &SimulationResult) {
    println!("{} / {}", result.game, result.strategy);
    println!("  rounds             {}", result.num_rounds);
    println!("  wagered            {:.0}", result.total_wagered);
    println!("  returned           {:.0}", result.total_returned);
    println!("  net profit         {:.0}", result.net_profit);
    println!("  observed RTP       {:.4}%", result.observed_rtp * 100.0);
    println!("  theoretical RTP    {:.4}%", result.theoretical_rtp * 100.0);
    println!(
        "  tolerance          ±{:.4}% ({})",
        result.expected_tolerance * 100.0,
        if result.within_tolerance { "within" } else { "outside" }
    );
    println!(
        "  95% interval       ±{:.4}% ({})",
        result.confidence_half_width * 100.0,
        if result.within_confidence_interval() {
            "within"
        } else {
            "outside"
        }
    );
    println!("  hit rate           {:.2}%", result.hit_rate * 100.0);
    println!(
        "  wins/losses/pushes {}/{}/{}",
        result.counts.wins, result.counts.losses, result.counts.pushes
    );
    println!("  std deviation      {:.4} ({})", result.std_deviation, result.risk_level.as_str());
    println!("  max drawdown       {:.0}", result.max_drawdown);
    println!(
        "  longest streaks    {} won / {} lost",
        result.longest_winning_streak, result.longest_losing_streak
    );
    println!("  elapsed            {:?}", result.elapsed);
}

fn print_report(report: &ConvergenceReport) {
    println!("{} / {}", report.game, report.strategy);
    println!("  batches            {} x {} rounds", report.num_batches(), report.rounds_per_batch);
    println!("  theoretical RTP    {:.4}%", report.theoretical_rtp * 100.0);
    println!("  mean observed RTP  {:.4}%", report.mean_observed_rtp * 100.0);
    println!("  worst deviation    {:.4}%", report.worst_deviation * 100.0);
    println!("  within tolerance   {:.1}%", report.pass_rate() * 100.0);
    println!("  within 95% interval {:.1}%", report.confidence_pass_rate() * 100.0);
    println!(
        "  verdict            {}",
        if report.is_converged() { "converged" } else { "NOT converged" }
    );
}

/// Strategies listed by `rtp`: each game's default plus the bets that change the figure.
fn rtp_strategies(registry: &GameRegistry) -> Vec<BetStrategy> {
    let mut strategies = Vec::new();
    for bet in [
        RouletteBet::Red,
        RouletteBet::Even,
        RouletteBet::Low,
        RouletteBet::Dozen(0),
        RouletteBet::Column(0),
        RouletteBet::Straight(17),
    ] {
        strategies.push(BetStrategy::Roulette { bet });
    }
    for threshold in [12, 13, 14, 15, 16, 17, 18] {
        if let Ok(strategy) = BetStrategy::parse(GameKind::Blackjack, &threshold.to_string()) {
            strategies.push(strategy);
        }
    }
    strategies.push(BetStrategy::Slots);
    strategies.push(BetStrategy::default_for(GameKind::CoinFlip));
    for horse in 0..registry.horse_race().horses.len() {
        strategies.push(BetStrategy::HorseRace { horse });
    }
    for target in ["1.01", "2", "10", "100"] {
        if let Ok(strategy) = BetStrategy::parse(GameKind::Crash, target) {
            strategies.push(strategy);
        }
    }
    strategies
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let file = load_config(args.config.as_deref())?;
    match args.command {
        Command::Run(run) => {
            let settings = build_settings(&run, &file)?;
            let simulator = match settings.seed {
                Some(seed) => Simulator::new(seed, settings.registry)?,
                None => Simulator::from_entropy(settings.registry)?,
            };
            let mut simulator = simulator.with_bet_amount(settings.bet_amount)?;
            let result = simulator.run(settings.strategy, settings.rounds)?;
            if run.json {
                print_json(&result)?;
            } else {
                print_result(&result);
            }
        }
        Command::Verify { run, batches } => {
            let settings = build_settings(&run, &file)?;
            let seed = settings
                .seed
                .unwrap_or_else(|| RandomSource::from_entropy().uniform_int(u64::MAX));
            info!(seed, batches, "verifying convergence");
            let report = verify_convergence(
                &settings.registry,
                settings.strategy,
                batches,
                settings.rounds,
                seed,
            )?;
            if run.json {
                print_json(&report)?;
            } else {
                print_report(&report);
            }
        }
        Command::Rtp => {
            let registry = file.registry().context("invalid game overrides")?;
            let simulator = Simulator::new(0, registry)?;
            println!("{:<12} {:<16} {:>10} {:>10}", "game", "bet", "rtp", "edge");
            for strategy in rtp_strategies(simulator.registry()) {
                let rtp = simulator.theoretical_rtp(&strategy)?;
                println!(
                    "{:<12} {:<16} {:>9.4}% {:>9.4}%",
                    strategy.game().as_str(),
                    strategy.label(),
                    rtp * 100.0,
                    (1.0 - rtp) * 100.0
                );
            }
        }
        Command::Games { json } => {
            let registry = file.registry().context("invalid game overrides")?;
            let games = registry.all_games_info();
            if json {
                return print_json(&games);
            }
            for info in games {
                println!(
                    "{:<12} {:<12} {:<8} edge {:>5.2}%  bets {}-{}{}",
                    info.kind.as_str(),
                    info.name,
                    format!("{:?}", info.category).to_lowercase(),
                    f64::from(info.house_edge_bps) / 100.0,
                    info.min_bet,
                    info.max_bet,
                    if info.active { "" } else { "  (disabled)" }
                );
            }
        }
    }
    Ok(())
}
