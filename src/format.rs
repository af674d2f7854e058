//! Supported image formats and the extension allow-list

use std::fmt;
use std::path::Path;

use image::ImageFormat;

/// Extensions (lower-case, with the leading dot) that can be watermarked.
pub const ALLOWED_EXTS: [&str; 4] = [".gif", ".jpg", ".jpeg", ".png"];

/// Image formats the compositor can decode and re-encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
}

impl ImageKind {
    /// Resolve a format hint such as `.png` or `.JPEG`.
    ///
    /// Returns `None` for anything outside the allow-list, including the
    /// empty string and hints without the leading dot.
    pub fn from_ext(ext: &str) -> Option<ImageKind> {
        match ext.to_ascii_lowercase().as_str() {
            ".jpg" | ".jpeg" => Some(ImageKind::Jpeg),
            ".png" => Some(ImageKind::Png),
            ".gif" => Some(ImageKind::Gif),
            _ => None,
        }
    }

    /// Resolve the format of a file from its extension.
    pub fn from_path(path: &Path) -> Option<ImageKind> {
        ImageKind::from_ext(&ext_hint(path))
    }

    /// Matching `image` crate format, used for the still-image codecs.
    pub fn image_format(self) -> ImageFormat {
        match self {
            ImageKind::Jpeg => ImageFormat::Jpeg,
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Gif => ImageFormat::Gif,
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageKind::Jpeg => write!(f, "JPEG"),
            ImageKind::Png => write!(f, "PNG"),
            ImageKind::Gif => write!(f, "GIF"),
        }
    }
}

/// Format hint for a path: its extension with a leading dot, or `""`.
pub fn ext_hint(path: &Path) -> String {
    path.extension().and_then(|e| e.to_str()).map(|e| format!(".{}", e)).unwrap_or_default()
}

/// Check whether images with this extension can be watermarked.
///
/// `ext` must include the leading dot (`.png`); the comparison ignores case.
///
/// # Panics
///
/// Panics if `ext` is empty or does not start with `.`.
pub fn is_allowed_ext(ext: &str) -> bool {
    assert!(!ext.is_empty(), "extension must not be empty");
    assert!(ext.starts_with('.'), "extension must start with '.', got '{}'", ext);

    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTS.contains(&ext.as_str())
}
