//! Error types for watermark construction and marking

use std::io;

use thiserror::Error;

use crate::format::ImageKind;

/// Failure reported by one of the underlying codecs.
#[derive(Debug, Error)]
pub enum CodecError {
    /// JPEG/PNG codec failure from the `image` crate
    #[error(transparent)]
    Image(image::ImageError),
    /// GIF decoder failure
    #[error(transparent)]
    GifDecode(gif::DecodingError),
    /// GIF encoder failure
    #[error(transparent)]
    GifEncode(gif::EncodingError),
}

/// Error returned when building a watermark or marking an image.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WatermarkError {
    /// Extension is not one of `.jpg`, `.jpeg`, `.png`, `.gif`
    #[error("unsupported image format '{0}' (expected .jpg, .jpeg, .png or .gif)")]
    UnsupportedFormat(String),

    /// Raw position value outside the five anchors
    #[error("invalid watermark position '{0}' (expected top-left, top-right, bottom-left, bottom-right or center)")]
    InvalidPosition(String),

    /// Malformed image bytes
    #[error("failed to decode {kind} image: {source}")]
    Decode {
        kind: ImageKind,
        #[source]
        source: CodecError,
    },

    /// Space left after padding is smaller than the watermark
    #[error("watermark ({mark_w}x{mark_h}) does not fit the available area ({avail_w}x{avail_h})", mark_w = .mark.0, mark_h = .mark.1, avail_w = .available.0, avail_h = .available.1)]
    WatermarkTooLarge { mark: (u32, u32), available: (i64, i64) },

    /// GIF stream without a single image frame
    #[error("GIF image contains no frames")]
    EmptyAnimation,

    /// Re-encoding the composited image failed
    #[error("failed to encode {kind} image: {source}")]
    Encode {
        kind: ImageKind,
        #[source]
        source: CodecError,
    },

    /// Stream open/seek/read/write failure
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl WatermarkError {
    /// Wrap a decoder failure, surfacing plain I/O faults as [`WatermarkError::Io`].
    pub(crate) fn decode(kind: ImageKind, source: CodecError) -> Self {
        match source.into_io() {
            Ok(io) => WatermarkError::Io(io),
            Err(source) => WatermarkError::Decode { kind, source },
        }
    }

    /// Wrap an encoder failure, surfacing plain I/O faults as [`WatermarkError::Io`].
    pub(crate) fn encode(kind: ImageKind, source: CodecError) -> Self {
        match source.into_io() {
            Ok(io) => WatermarkError::Io(io),
            Err(source) => WatermarkError::Encode { kind, source },
        }
    }
}

impl CodecError {
    fn into_io(self) -> Result<io::Error, Self> {
        match self {
            CodecError::Image(image::ImageError::IoError(e)) => Ok(e),
            CodecError::GifDecode(gif::DecodingError::Io(e)) => Ok(e),
            CodecError::GifEncode(gif::EncodingError::Io(e)) => Ok(e),
            other => Err(other),
        }
    }
}

impl From<image::ImageError> for CodecError {
    fn from(e: image::ImageError) -> Self {
        CodecError::Image(e)
    }
}

impl From<gif::DecodingError> for CodecError {
    fn from(e: gif::DecodingError) -> Self {
        CodecError::GifDecode(e)
    }
}

impl From<gif::EncodingError> for CodecError {
    fn from(e: gif::EncodingError) -> Self {
        CodecError::GifEncode(e)
    }
}
