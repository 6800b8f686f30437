use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scenefold_core::{AccordionConfig, SnapStrategy};

mod commands;

#[derive(Parser)]
#[command(name = "scenefold")]
#[command(author, version, about = "Scroll-linked accordion demo and gesture simulator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the configured snap strategy
    #[arg(long, global = true, value_enum)]
    strategy: Option<StrategyArg>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI demo
    Run,
    /// Replay a scripted drag and print the ratio trace
    Simulate {
        /// Total drag distance in scroll units (negative scrolls up)
        #[arg(short, long, default_value_t = 60.0)]
        distance: f64,
        /// Number of frames the drag is spread over
        #[arg(long, default_value_t = 12)]
        steps: u32,
        /// Coast this many extra units after release with momentum events
        #[arg(short, long)]
        momentum: Option<f64>,
        /// Measured drawer content height in scroll units
        #[arg(long, default_value_t = 40.0)]
        drawer_height: f64,
        /// Print JSON lines instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as TOML
    Config {
        /// Also write it to the config file
        #[arg(long)]
        write: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Momentum,
    Delayed,
}

impl From<StrategyArg> for SnapStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Momentum => SnapStrategy::Momentum,
            StrategyArg::Delayed => SnapStrategy::Delayed,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = AccordionConfig::load()?;
    if let Some(strategy) = cli.strategy {
        config.snap.strategy = strategy.into();
    }

    // Initialize logging; stderr keeps stdout free for traces and the TUI
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Some(Commands::Run) | None => commands::run::run(config).await,
        Some(Commands::Simulate {
            distance,
            steps,
            momentum,
            drawer_height,
            json,
        }) => {
            let script = commands::simulate::Script {
                distance,
                steps,
                momentum,
                drawer_height,
            };
            commands::simulate::run(&config, script, json).await
        }
        Some(Commands::Config { write }) => commands::config::run(&config, write),
    }
}
