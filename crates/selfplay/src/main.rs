//! Self-play CLI
//!
//! Let two sessions play each other on forced random moves.

use anyhow::{anyhow, bail, Result};
use game_core::GameKind;
use selfplay::{MatchConfig, MatchRunner};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("Board game self-play runner");
    println!();
    println!("Usage:");
    println!("  selfplay [--variant V] [--games N] [--max-plies N] [--seed S] [--save FILE] [--quiet]");
    println!();
    println!("Variants:");
    println!("  chess, janggi, omok, all (default)");
    println!();
    println!("Examples:");
    println!("  selfplay --variant omok --games 50");
    println!("  selfplay --games 5 --max-plies 150 --save results.json");
}

struct Args {
    variants: Vec<GameKind>,
    config: MatchConfig,
    save: Option<PathBuf>,
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{flag} needs a value"))
}

fn parse_args(args: &[String]) -> Result<Option<Args>> {
    let mut parsed = Args {
        variants: GameKind::ALL.to_vec(),
        config: MatchConfig {
            seed: rand::random(),
            ..MatchConfig::default()
        },
        save: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--variant" | "-v" => {
                let v = value(args, i, "--variant")?;
                parsed.variants = if v == "all" {
                    GameKind::ALL.to_vec()
                } else {
                    vec![v.parse().map_err(|e: String| anyhow!(e))?]
                };
                i += 1;
            }
            "--games" | "-g" => {
                parsed.config.num_games = value(args, i, "--games")?.parse()?;
                i += 1;
            }
            "--max-plies" | "-m" => {
                parsed.config.max_plies = value(args, i, "--max-plies")?.parse()?;
                i += 1;
            }
            "--seed" | "-s" => {
                parsed.config.seed = value(args, i, "--seed")?.parse()?;
                i += 1;
            }
            "--save" => {
                parsed.save = Some(PathBuf::from(value(args, i, "--save")?));
                i += 1;
            }
            "--quiet" | "-q" => parsed.config.verbose = false,
            "--help" | "-h" => return Ok(None),
            other => bail!("unknown argument: {other}"),
        }
        i += 1;
    }
    Ok(Some(parsed))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(args) = parse_args(&args)? else {
        print_usage();
        return Ok(());
    };

    println!(
        "Self-play: {} game(s) per variant, seed {}",
        args.config.num_games, args.config.seed
    );
    let runner = MatchRunner::new(args.config);
    let names: Vec<String> = args.variants.iter().map(|k| k.to_string()).collect();
    let results = runner.run(&names.join("+"), &args.variants).await?;
    results.print_report();

    if let Some(path) = args.save {
        results.save(&path)?;
        println!("Results saved to {}", path.display());
    }
    Ok(())
}
