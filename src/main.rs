//! wmark - stamp a watermark onto JPEG, PNG and GIF images in place

use std::process::ExitCode;

use watermark::cli;

fn main() -> ExitCode {
    cli::run()
}
