//! Ember CLI - Run particle emitters without a window

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, simulate};

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "Headless driver for Ember particle emitters", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Step an emitter for a number of frames and report particle counts
    Simulate {
        /// Emitter file (TOML); defaults are used when omitted
        #[arg(long)]
        config: Option<String>,

        /// Number of frames to simulate
        #[arg(long, default_value = "60")]
        frames: u32,

        /// Frame delta in seconds
        #[arg(long, default_value = "0.016666668")]
        dt: f64,

        /// Random seed for spawn sampling
        #[arg(long, default_value = "3735928559")]
        seed: u32,

        /// Fire a burst of this many particles before the first frame
        #[arg(long)]
        burst: Option<u32>,

        /// Burst radius in pixels
        #[arg(long, default_value = "0")]
        radius: f32,

        /// Print a progress line every N frames (0 = summary only)
        #[arg(long, default_value = "0")]
        every: u32,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the default emitter configuration as TOML
    Config {
        /// Output file; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    // RUST_LOG, when set, takes precedence over -v
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Simulate {
            config,
            frames,
            dt,
            seed,
            burst,
            radius,
            every,
            json,
        } => simulate::run(simulate::SimulateArgs {
            config,
            frames,
            dt,
            seed,
            burst,
            radius,
            every,
            json,
        }),
        Commands::Config { output, force } => config::run(output.as_deref(), force),
    }
}
