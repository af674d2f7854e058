//! Still-image encoding and writing results back over the target stream

use std::io::{Cursor, Seek, SeekFrom, Write};

use image::{ColorType, DynamicImage};

use crate::error::{CodecError, WatermarkError};
use crate::format::ImageKind;

/// Quality used for re-encoded JPEGs.
pub const JPEG_QUALITY: u8 = 75;

/// True for the 16 bits per channel layouts a PNG can carry.
pub fn is_16bit(color: ColorType) -> bool {
    matches!(color, ColorType::L16 | ColorType::La16 | ColorType::Rgb16 | ColorType::Rgba16)
}

/// Encode a composited canvas in the target's format.
///
/// JPEG output is always 8-bit RGB. PNG output keeps the canvas depth, and
/// keeps an alpha channel only when `keep_alpha` is set (the target had one).
pub fn encode_still(
    canvas: DynamicImage,
    kind: ImageKind,
    keep_alpha: bool,
) -> Result<Vec<u8>, WatermarkError> {
    let image = match kind {
        ImageKind::Jpeg => DynamicImage::ImageRgb8(canvas.to_rgb8()),
        _ if keep_alpha => canvas,
        _ if is_16bit(canvas.color()) => DynamicImage::ImageRgb16(canvas.to_rgb16()),
        _ => DynamicImage::ImageRgb8(canvas.to_rgb8()),
    };

    let format = match kind {
        ImageKind::Jpeg => image::ImageOutputFormat::Jpeg(JPEG_QUALITY),
        other => other.image_format().into(),
    };

    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, format)
        .map_err(|e| WatermarkError::encode(kind, CodecError::from(e)))?;
    Ok(out.into_inner())
}

/// Rewind `stream` and overwrite it from the start with `bytes`.
///
/// Bytes past `bytes.len()` are left in place; callers owning a file
/// truncate it afterwards.
pub fn write_back<S: Write + Seek>(stream: &mut S, bytes: &[u8]) -> Result<(), WatermarkError> {
    stream.seek(SeekFrom::Start(0))?;
    stream.write_all(bytes)?;
    stream.flush()?;
    Ok(())
}
