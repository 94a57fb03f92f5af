use gamba::cli::{self, Cli, Commands};
use gamba::game::{GameConfig, GameState};
use gamba::simulation::{run_batch, Policy, SimulationReport};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse_args(std::env::args());

    // Silent by default, RUST_LOG overrides
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match cli.game_config() {
        Ok(config) => {
            info!(cards = config.deck.total(), max_draws = config.max_draws, "config loaded");
            config
        }
        Err(e) => {
            eprintln!("✗ Failed to load deck: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Draw { cards, json }) => draw_sequence(config, &cards, json),
        Some(Commands::Odds) => show_odds(config),
        Some(Commands::Simulate {
            num_games,
            seed,
            policy,
            output,
        }) => simulate(&config, num_games, seed, policy, output.as_deref()),
        Some(Commands::Play) | None => play(config),
    }
}

fn play(config: GameConfig) {
    println!("\n=== Card Draw Simulator ===\n");
    let mut state = GameState::with_config(config);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    if let Err(e) = cli::run_session(&mut state, stdin.lock(), &mut stdout) {
        eprintln!("✗ I/O error: {}", e);
        std::process::exit(1);
    }
}

fn draw_sequence(config: GameConfig, cards: &[String], json: bool) {
    let mut state = GameState::with_config(config);

    for label in cards {
        let card = match label.parse() {
            Ok(card) => card,
            Err(e) => {
                eprintln!("✗ {}", e);
                std::process::exit(1);
            }
        };
        if let Err(e) = state.draw_card(card) {
            eprintln!("✗ {}", e);
            break;
        }
    }

    if json {
        match serde_json::to_string_pretty(&state) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("✗ Failed to serialize state: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let mut stdout = std::io::stdout();
    if let Err(e) = cli::write_history(&mut stdout, &state) {
        eprintln!("✗ I/O error: {}", e);
        std::process::exit(1);
    }
    if let Some(advice) = state.outcome() {
        println!("{}", cli::format_outcome(advice));
    }
}

fn show_odds(config: GameConfig) {
    let state = GameState::with_config(config);
    let mut stdout = std::io::stdout();
    if let Err(e) = cli::write_choices(&mut stdout, &state) {
        eprintln!("✗ I/O error: {}", e);
        std::process::exit(1);
    }
}

fn simulate(
    config: &GameConfig,
    num_games: usize,
    seed: Option<u64>,
    policy: Policy,
    output: Option<&str>,
) {
    println!("\n=== Card Draw Simulation ===\n");
    println!("Deck: {} cards", config.deck.total());
    println!("Max draws: {}", config.max_draws);
    println!("Policy: {:?}", policy);
    println!("Games: {}", num_games);
    if let Some(s) = seed {
        println!("Seed: {}", s);
    }
    println!();

    let pb = ProgressBar::new(num_games as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]") {
        pb.set_style(style);
    }

    let start = std::time::Instant::now();
    let results = run_batch(config, num_games, seed, policy, Some(&pb));
    let elapsed = start.elapsed();
    pb.finish_and_clear();

    let report = SimulationReport::from_results(&results, policy, seed);

    println!("=== Results ===\n");
    println!("Average final value: {:.2}%", report.mean_final_value);
    println!("Min / max: {:.2}% / {:.2}%", report.min_final_value, report.max_final_value);
    println!("Average draws: {:.2}", report.mean_draws);
    println!("Ended on Stop advice: {:.1}%", report.stop_advice_rate * 100.0);
    println!();

    println!("Final value distribution:");
    for (bucket, count) in &report.value_distribution {
        let pct = *count as f64 / num_games.max(1) as f64 * 100.0;
        let bar = "█".repeat((pct / 2.0) as usize);
        println!("  {:>5}%+: {:5.1}% {} ({})", bucket, pct, bar, count);
    }

    println!();
    println!(
        "Simulation completed in {:.2?} ({:.0} games/sec)",
        elapsed,
        num_games as f64 / elapsed.as_secs_f64()
    );

    if let Some(path) = output {
        match report.save_json(path) {
            Ok(()) => println!("\nReport saved to: {}", path),
            Err(e) => eprintln!("\nFailed to save report: {}", e),
        }
    }
}
