//! Configuration schema types for `wmark.toml`
//!
//! Defines the structure and validation rules for watermark settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::format::ImageKind;
use crate::position::Position;

/// Root of `wmark.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WmarkConfig {
    /// Watermark image and placement
    #[serde(default)]
    pub watermark: WatermarkConfig,
    /// Batch marking behaviour
    #[serde(default)]
    pub mark: MarkConfig,
}

/// `[watermark]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatermarkConfig {
    /// Watermark image (.png, .jpg, .jpeg or .gif)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Margin between the watermark and the target edges, in pixels
    #[serde(default)]
    pub padding: u32,
    /// Anchor position
    #[serde(default)]
    pub position: Position,
}

/// `[mark]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkConfig {
    /// Descend into sub-directories when a directory is given
    #[serde(default)]
    pub recursive: bool,
    /// Worker threads; 0 uses the available parallelism
    #[serde(default)]
    pub jobs: usize,
}

/// A single config validation problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl WmarkConfig {
    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if let Some(path) = &self.watermark.path {
            if path.as_os_str().is_empty() {
                errors.push(ConfigValidationError {
                    field: "watermark.path".to_string(),
                    message: "must not be empty".to_string(),
                });
            } else if ImageKind::from_path(path).is_none() {
                errors.push(ConfigValidationError {
                    field: "watermark.path".to_string(),
                    message: format!(
                        "'{}' is not a .png, .jpg, .jpeg or .gif file",
                        path.display()
                    ),
                });
            }
        }

        errors
    }
}
