use std::path::PathBuf;

use anyhow::{Context, Result};
use cachain_crypto::{HashMethod, DEFAULT_RULE, DEFAULT_STEPS};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod settings;

use settings::Settings;

#[derive(Parser)]
#[command(name = "cachain-cli")]
#[command(about = "Cellular-automaton hash and ledger experiments", long_about = None)]
struct Cli {
    /// Settings file (defaults to ./cachain.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the digest of an input string
    Hash {
        input: String,
        #[arg(long)]
        rule: Option<u8>,
        #[arg(long)]
        steps: Option<usize>,
        /// Use the SHA-256 reference digest
        #[arg(long, conflicts_with_all = ["rule", "steps"])]
        sha256: bool,
    },

    /// Evolve a single centred cell and print each generation
    Trace {
        #[arg(long, default_value_t = DEFAULT_RULE)]
        rule: u8,
        #[arg(long, default_value_t = 32)]
        generations: usize,
    },

    /// Compare digests of two inputs differing in one bit
    Avalanche {
        #[arg(long, default_value = commands::AVALANCHE_INPUT)]
        input: String,
        #[arg(long, default_value_t = DEFAULT_RULE)]
        rule: u8,
        #[arg(long, default_value_t = DEFAULT_STEPS)]
        steps: usize,
    },

    /// Share of one-bits across many digests
    Distribution {
        #[arg(long, default_value_t = 500)]
        samples: usize,
        #[arg(long, default_value_t = DEFAULT_RULE)]
        rule: u8,
        #[arg(long, default_value_t = DEFAULT_STEPS)]
        steps: usize,
    },

    /// Time rules 30, 90 and 110
    Rules {
        #[arg(long, default_value_t = 20_000)]
        count: usize,
    },

    /// Mine proof-of-work chains with SHA-256 and the automaton hash
    Mine {
        #[arg(long)]
        blocks: Option<usize>,
        #[arg(long)]
        difficulty: Option<usize>,
    },

    /// Append one proof-of-stake and one proof-of-work block
    Stake {
        #[arg(long)]
        difficulty: Option<usize>,
    },

    /// Build, validate and print a mixed chain as JSON
    Chain {
        #[arg(long)]
        blocks: Option<usize>,
        #[arg(long)]
        difficulty: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    info!("Using {} at difficulty {}", settings.hash, settings.difficulty);

    match cli.command {
        Commands::Hash {
            input,
            rule,
            steps,
            sha256,
        } => {
            let method = if sha256 {
                HashMethod::Sha256
            } else if rule.is_some() || steps.is_some() {
                commands::default_automaton(rule, steps, settings.hash)
            } else {
                settings.hash
            };
            commands::hash(&input, method);
        }
        Commands::Trace { rule, generations } => commands::trace(rule, generations),
        Commands::Avalanche { input, rule, steps } => commands::run_avalanche(&input, rule, steps),
        Commands::Distribution { samples, rule, steps } => commands::distribution(samples, rule, steps),
        Commands::Rules { count } => commands::rules(count),
        Commands::Mine { blocks, difficulty } => {
            settings.blocks = blocks.unwrap_or(settings.blocks);
            settings.difficulty = difficulty.unwrap_or(settings.difficulty);
            commands::mine(&settings)?;
        }
        Commands::Stake { difficulty } => {
            settings.difficulty = difficulty.unwrap_or(settings.difficulty);
            commands::stake(&settings)?;
        }
        Commands::Chain { blocks, difficulty } => {
            settings.blocks = blocks.unwrap_or(settings.blocks);
            settings.difficulty = difficulty.unwrap_or(settings.difficulty);
            commands::chain(&settings)?;
        }
    }

    Ok(())
}
