// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use gaze_tonemap::ToneMappingOperatorType;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "gaze-tonemap")]
#[command(about = "Gaze-weighted temporal tone mapping")]
#[command(version = env!("GIT_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tone map an image over a sequence of frames
    Render {
        /// HDR or LDR input image
        #[arg(short, long)]
        input: PathBuf,

        /// Directory receiving frame_NNNN.png files
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Number of frames to render (the first one only seeds adaptation)
        #[arg(short, long, default_value = "2")]
        frames: u32,

        /// Config file (default: user config dir)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Tone mapping operator (none, reinhard, reinhard-gaze, debug)
        #[arg(long)]
        operator: Option<ToneMappingOperatorType>,

        /// Gaze spread; 0 disables the effect
        #[arg(long)]
        sigma: Option<f32>,

        /// Render the gaze mask instead of the image
        #[arg(long)]
        show_mask: bool,

        /// Sweep the gaze horizontally instead of holding it fixed
        #[arg(long)]
        simulate_gaze: bool,
    },

    /// Show or write the configuration
    Config {
        /// Config file (default: user config dir)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Write the defaults to the config file
        #[arg(short, long)]
        write: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=gaze_tonemap=trace, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            output_dir,
            frames,
            config,
            operator,
            sigma,
            show_mask,
            simulate_gaze,
        } => cli::render_frames(cli::RenderOptions {
            input,
            output_dir,
            frames,
            config,
            operator,
            sigma,
            show_mask,
            simulate_gaze,
        }),
        Commands::Config { path, write } => {
            if write {
                cli::write_config(path)
            } else {
                cli::show_config(path)
            }
        }
    }
}
