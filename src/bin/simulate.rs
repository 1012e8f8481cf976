//! Battle balance simulator CLI.
//!
//! Run Monte Carlo battle simulations to analyze balance.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                          # Default: 1000 runs in the slime forest
//!   cargo run --bin simulate -- -n 100 -e slime_king  # 100 runs against one enemy
//!   cargo run --bin simulate -- --seed 42             # Reproducible run

use monster_keeper::content::GameContent;
use monster_keeper::core::BattleConfig;
use monster_keeper::simulator::{run_simulation, SimConfig};
use std::env;
use std::error::Error;
use std::path::PathBuf;

struct CliArgs {
    config: SimConfig,
    content_path: Option<PathBuf>,
    battle_config_path: Option<PathBuf>,
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if let Err(e) = run(parse_args(&args)) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(mut cli: CliArgs) -> Result<(), Box<dyn Error>> {
    let content = match &cli.content_path {
        Some(path) => GameContent::from_path(path)?,
        None => GameContent::sample()?,
    };
    if let Some(path) = &cli.battle_config_path {
        cli.config.battle = BattleConfig::from_path(path)?;
    }
    let config = cli.config;

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              MONSTER KEEPER BATTLE SIMULATOR                  ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Dungeon:        {}", config.dungeon_id);
    if let Some(enemy_id) = &config.enemy_id {
        println!("  Enemy:          {}", enemy_id);
    }
    println!("  Monster:        {} (Lv.{})", config.monster_type_id, config.starting_level);
    println!("  Battles/Run:    {}", config.battles_per_run);
    println!("  Max Turns:      {}", config.max_turns_per_battle);
    if config.starting_potions > 0 {
        println!("  Potions:        {}", config.starting_potions);
    }
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = run_simulation(&config, &content)?;

    println!("{}", report.to_text());

    // Optionally save JSON report
    if cli.json {
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        std::fs::write(&filename, report.to_json())?;
        println!("JSON report saved to: {}", filename);
    }

    Ok(())
}

fn parse_args(args: &[String]) -> CliArgs {
    let mut cli = CliArgs {
        config: SimConfig::default(),
        content_path: None,
        battle_config_path: None,
        json: false,
    };

    let mut i = 1;
    while i < args.len() {
        let next = args.get(i + 1);
        match args[i].as_str() {
            "-n" | "--runs" => {
                if let Some(value) = next {
                    cli.config.num_runs = value.parse().unwrap_or(1000);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if let Some(value) = next {
                    cli.config.seed = value.parse().ok();
                    i += 1;
                }
            }
            "-d" | "--dungeon" => {
                if let Some(value) = next {
                    cli.config.dungeon_id = value.clone();
                    i += 1;
                }
            }
            "-e" | "--enemy" => {
                if let Some(value) = next {
                    cli.config.enemy_id = Some(value.clone());
                    i += 1;
                }
            }
            "-m" | "--monster" => {
                if let Some(value) = next {
                    cli.config.monster_type_id = value.clone();
                    i += 1;
                }
            }
            "-l" | "--level" => {
                if let Some(value) = next {
                    cli.config.starting_level = value.parse().unwrap_or(1);
                    i += 1;
                }
            }
            "-b" | "--battles" => {
                if let Some(value) = next {
                    cli.config.battles_per_run = value.parse().unwrap_or(20);
                    i += 1;
                }
            }
            "-t" | "--turns" => {
                if let Some(value) = next {
                    cli.config.max_turns_per_battle = value.parse().unwrap_or(200);
                    i += 1;
                }
            }
            "-p" | "--potions" => {
                if let Some(value) = next {
                    cli.config.starting_potions = value.parse().unwrap_or(0);
                    i += 1;
                }
            }
            "--content" => {
                if let Some(value) = next {
                    cli.content_path = Some(PathBuf::from(value));
                    i += 1;
                }
            }
            "--battle-config" => {
                if let Some(value) = next {
                    cli.battle_config_path = Some(PathBuf::from(value));
                    i += 1;
                }
            }
            "-v" | "--verbose" => {
                cli.config.verbosity = 2;
            }
            "--json" => {
                cli.json = true;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "--quick" => {
                cli.config = SimConfig::quick();
            }
            "--grind" => {
                cli.config = SimConfig::grind(100);
            }
            _ => {}
        }
        i += 1;
    }

    cli
}

fn print_help() {
    println!("Monster Keeper Battle Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>          Number of simulation runs (default: 1000)");
    println!("    -s, --seed <S>          Random seed for reproducibility");
    println!("    -d, --dungeon <ID>      Dungeon to fight in (default: dungeon_slime_forest)");
    println!("    -e, --enemy <ID>        Fight only this enemy");
    println!("    -m, --monster <ID>      Monster type to battle with");
    println!("    -l, --level <L>         Starting monster level (default: 1)");
    println!("    -b, --battles <B>       Battles per run (default: 20)");
    println!("    -t, --turns <T>         Turn limit per battle (default: 200)");
    println!("    -p, --potions <P>       Healing potions per run (default: 0)");
    println!("    --content <PATH>        Content JSON (default: bundled sample)");
    println!("    --battle-config <PATH>  Battle formula overrides (JSON)");
    println!("    -v, --verbose           Verbose output");
    println!("    --json                  Save JSON report");
    println!("    --quick                 Quick test (100 runs, 10 battles)");
    println!("    --grind                 Long grind (50 runs, 100 battles, potions)");
    println!("    -h, --help              Show this help");
    println!();
    println!("EXAMPLES:");
    println!("    cargo run --bin simulate                              # Default run");
    println!("    cargo run --bin simulate -- -e slime_king -l 10       # Boss matchup");
    println!("    cargo run --bin simulate -- --seed 42                 # Reproducible");
    println!("    RUST_LOG=monster_keeper=debug cargo run --bin simulate -- -n 1 -b 1  # Turn trace");
}
