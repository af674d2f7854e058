//! CLI dispatch for the `wmark mark` command.

use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{debug, info};

use crate::batch::{discover_targets, BatchMark, BatchResult};
use crate::config::{load_config, merge_cli_overrides, CliOverrides};
use crate::position::Position;
use crate::watermark::Watermark;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Arguments of `wmark mark`, as parsed by clap.
pub(crate) struct MarkArgs {
    pub paths: Vec<PathBuf>,
    pub watermark: Option<PathBuf>,
    pub padding: Option<u32>,
    pub position: Option<Position>,
    pub config: Option<PathBuf>,
    pub recursive: bool,
    pub jobs: Option<usize>,
    pub json: bool,
}

/// Execute the mark command.
pub(crate) fn run_mark(args: MarkArgs) -> ExitCode {
    let mut config = match load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let overrides = CliOverrides {
        watermark: args.watermark,
        padding: args.padding,
        position: args.position,
        recursive: args.recursive.then_some(true),
        jobs: args.jobs,
    };
    merge_cli_overrides(&mut config, &overrides);
    debug!(?config, "effective configuration");

    let watermark_path = match config.watermark.path {
        Some(ref p) => p.clone(),
        None => {
            eprintln!("Error: no watermark image given");
            eprintln!("Pass --watermark or set [watermark] path in wmark.toml");
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let watermark = match Watermark::from_file(
        &watermark_path,
        config.watermark.padding,
        config.watermark.position,
    ) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error: cannot load watermark '{}': {}", watermark_path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let targets = match discover_targets(&args.paths, config.mark.recursive) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if targets.is_empty() {
        eprintln!("Error: no image files found");
        return ExitCode::from(EXIT_ERROR);
    }

    info!(count = targets.len(), watermark = %watermark_path.display(), "marking");
    let result = BatchMark::new(&watermark).with_jobs(config.mark.jobs).run(&targets);

    if args.json {
        print_json(&result);
    } else {
        print_text(&result);
    }

    if result.is_success() {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}

fn print_text(result: &BatchResult) {
    for file in &result.files {
        println!("{}: {}", file.path.display(), file.status);
    }
    println!("{}", result.summary());
}

fn print_json(result: &BatchResult) {
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: failed to serialize report: {}", e),
    }
}
