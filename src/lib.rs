//! Watermark - stamp a watermark image onto JPEG, PNG and GIF images
//!
//! This library provides functionality to:
//! - Decode a watermark once (still or animated GIF) and reuse it
//! - Anchor it at one of five positions with padding
//! - Composite it with source-over blending, frame by frame for GIFs
//! - Re-encode targets in place in their original format

pub mod animation;
pub mod batch;
pub mod cli;
pub mod composite;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod output;
pub mod position;
pub mod watermark;

pub use error::{CodecError, WatermarkError};
pub use format::{is_allowed_ext, ImageKind};
pub use position::Position;
pub use watermark::Watermark;
