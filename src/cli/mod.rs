//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod check;
mod mark;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::position::Position;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// wmark - stamp a watermark onto JPEG, PNG and GIF images in place
#[derive(Parser)]
#[command(name = "wmark")]
#[command(about = "Stamp a watermark onto JPEG, PNG and GIF images in place")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). WMARK_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Watermark image files in place
    Mark {
        /// Files or directories to mark
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Watermark image (.png, .jpg, .jpeg or .gif)
        #[arg(short, long)]
        watermark: Option<PathBuf>,

        /// Margin between the watermark and the image edges, in pixels
        #[arg(short, long)]
        padding: Option<u32>,

        /// Anchor position: top-left, top-right, bottom-left, bottom-right or center
        #[arg(long)]
        position: Option<Position>,

        /// Config file (default: nearest wmark.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Descend into sub-directories
        #[arg(short, long)]
        recursive: bool,

        /// Number of parallel jobs (0 = available parallelism)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },

    /// Check whether extensions or files are supported
    Check {
        /// Extensions (".png") or file paths
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Parse arguments and run the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    crate::logging::init(cli.verbose);

    match cli.command {
        Commands::Mark { paths, watermark, padding, position, config, recursive, jobs, json } => {
            mark::run_mark(mark::MarkArgs {
                paths,
                watermark,
                padding,
                position,
                config,
                recursive,
                jobs,
                json,
            })
        }
        Commands::Check { inputs, json } => check::run_check(&inputs, json),
    }
}
