//! The watermark compositor
//!
//! A [`Watermark`] is decoded once and can then be stamped onto any number
//! of JPEG, PNG or GIF targets. Targets are rewritten in place in their
//! original format.
//!
//! ```no_run
//! use watermark::{Position, Watermark};
//!
//! let mark = Watermark::from_file("logo.png", 10, Position::BottomRight)?;
//! mark.mark_file("photos/beach.jpg")?;
//! # Ok::<(), watermark::WatermarkError>(())
//! ```

use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Seek, Write};
use std::path::Path;

use image::DynamicImage;
use tracing::{debug, info};

use crate::animation::{self, Animation};
use crate::composite::{self, Layer};
use crate::error::{CodecError, WatermarkError};
use crate::format::{ext_hint, ImageKind};
use crate::output::{encode_still, is_16bit, write_back};
use crate::position::{check_fit, placement, Offset, Position};

/// Decoded watermark pixels.
#[derive(Debug, Clone)]
enum WatermarkSource {
    /// JPEG or PNG watermark
    Still(Layer),
    /// GIF watermark, cycled frame by frame over animated targets
    Animated(Frames),
}

/// Non-empty frame sequence of an animated watermark.
#[derive(Debug, Clone)]
struct Frames {
    first: Layer,
    rest: Vec<Layer>,
}

impl Frames {
    fn from_layers(layers: Vec<Layer>) -> Option<Self> {
        let mut layers = layers.into_iter();
        let first = layers.next()?;
        Some(Self { first, rest: layers.collect() })
    }

    fn len(&self) -> usize {
        self.rest.len() + 1
    }

    /// Frame used for target frame `index`, wrapping at the frame count.
    fn cycled(&self, index: usize) -> &Layer {
        match index % self.len() {
            0 => &self.first,
            i => &self.rest[i - 1],
        }
    }
}

/// A decoded watermark image plus its placement settings.
///
/// Immutable after construction, so one instance can be shared across
/// threads marking different targets.
#[derive(Debug, Clone)]
pub struct Watermark {
    source: WatermarkSource,
    padding: u32,
    position: Position,
}

impl Watermark {
    /// Decode a watermark from `reader`, using `ext` (`.png`, `.jpg`,
    /// `.jpeg` or `.gif`, any case) as the format hint.
    pub fn new<R: Read>(
        mut reader: R,
        ext: &str,
        padding: u32,
        position: Position,
    ) -> Result<Self, WatermarkError> {
        let kind = ImageKind::from_ext(ext)
            .ok_or_else(|| WatermarkError::UnsupportedFormat(ext.to_string()))?;

        let source = match kind {
            ImageKind::Gif => {
                let animation = Animation::decode(BufReader::new(reader))
                    .map_err(|e| WatermarkError::decode(kind, CodecError::from(e)))?;
                let layers = animation.frames.iter().map(|f| animation.frame_layer(f)).collect();
                let frames = Frames::from_layers(layers).ok_or(WatermarkError::EmptyAnimation)?;
                WatermarkSource::Animated(frames)
            }
            ImageKind::Jpeg | ImageKind::Png => {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes)?;
                let image = image::load_from_memory_with_format(&bytes, kind.image_format())
                    .map_err(|e| WatermarkError::decode(kind, CodecError::from(e)))?;
                WatermarkSource::Still(Layer::new(image.to_rgba8()))
            }
        };

        let watermark = Self { source, padding, position };
        let (w, h) = watermark.dimensions();
        debug!(%kind, width = w, height = h, frames = watermark.frame_count(), "decoded watermark");
        Ok(watermark)
    }

    /// Load a watermark from a file; its extension is the format hint.
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        padding: u32,
        position: Position,
    ) -> Result<Self, WatermarkError> {
        let path = path.as_ref();
        let ext = ext_hint(path);
        if ImageKind::from_ext(&ext).is_none() {
            return Err(WatermarkError::UnsupportedFormat(ext));
        }
        let file = File::open(path)?;
        Self::new(file, &ext, padding, position)
    }

    pub fn padding(&self) -> u32 {
        self.padding
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Size of the reference still (frame 0 for animated watermarks).
    pub fn dimensions(&self) -> (u32, u32) {
        self.reference().dimensions()
    }

    /// Number of frames: 1 for still watermarks.
    pub fn frame_count(&self) -> usize {
        match &self.source {
            WatermarkSource::Still(_) => 1,
            WatermarkSource::Animated(frames) => frames.len(),
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self.source, WatermarkSource::Animated(_))
    }

    fn reference(&self) -> &Layer {
        match &self.source {
            WatermarkSource::Still(layer) => layer,
            WatermarkSource::Animated(frames) => &frames.first,
        }
    }

    /// Watermark layer for target frame `index`.
    fn layer_for_frame(&self, index: usize) -> &Layer {
        match &self.source {
            WatermarkSource::Still(layer) => layer,
            WatermarkSource::Animated(frames) => frames.cycled(index),
        }
    }

    /// Placement offset on a `width`x`height` target, after the fit check.
    fn place(&self, width: u32, height: u32) -> Result<Offset, WatermarkError> {
        let target = (width, height);
        let mark = self.dimensions();
        let offset = placement(self.position, target, mark, self.padding);
        check_fit(offset, target, mark, self.padding)?;
        debug!(width, height, x = offset.x, y = offset.y, "placed watermark");
        Ok(offset)
    }

    /// Stamp the watermark onto the image in `stream`, in place.
    ///
    /// The image is decoded from the current stream position; the result is
    /// written from the start of the stream. Decode and placement failures
    /// leave the stream content untouched.
    pub fn mark<S: Read + Write + Seek>(
        &self,
        stream: &mut S,
        ext: &str,
    ) -> Result<(), WatermarkError> {
        let kind = ImageKind::from_ext(ext)
            .ok_or_else(|| WatermarkError::UnsupportedFormat(ext.to_string()))?;

        match kind {
            ImageKind::Gif => self.mark_gif(stream),
            ImageKind::Jpeg | ImageKind::Png => self.mark_still(stream, kind),
        }
    }

    /// Stamp the watermark onto the file at `path`, in place.
    pub fn mark_file<P: AsRef<Path>>(&self, path: P) -> Result<(), WatermarkError> {
        let path = path.as_ref();
        let ext = ext_hint(path);
        if ImageKind::from_ext(&ext).is_none() {
            return Err(WatermarkError::UnsupportedFormat(ext));
        }

        let mut file = OpenOptions::new().read(true).write(true).open(path)?;
        self.mark(&mut file, &ext)?;

        // Drop whatever the previous, longer encoding left behind.
        let len = file.stream_position()?;
        file.set_len(len)?;

        info!(path = %path.display(), "marked");
        Ok(())
    }

    fn mark_still<S: Read + Write + Seek>(
        &self,
        stream: &mut S,
        kind: ImageKind,
    ) -> Result<(), WatermarkError> {
        let reader = BufReader::new(&mut *stream);
        let target = image::io::Reader::with_format(reader, kind.image_format())
            .decode()
            .map_err(|e| WatermarkError::decode(kind, CodecError::from(e)))?;

        let offset = self.place(target.width(), target.height())?;
        let keep_alpha = target.color().has_alpha();

        // 16-bit PNGs keep their depth so untouched pixels round-trip exactly.
        let canvas = if is_16bit(target.color()) {
            let mut canvas = target.to_rgba16();
            composite::overlay_wide(&mut canvas, self.reference(), offset.origin());
            DynamicImage::ImageRgba16(canvas)
        } else {
            let mut canvas = target.to_rgba8();
            composite::overlay(&mut canvas, self.reference(), offset.origin());
            DynamicImage::ImageRgba8(canvas)
        };

        let bytes = encode_still(canvas, kind, keep_alpha)?;
        write_back(stream, &bytes)
    }

    fn mark_gif<S: Read + Write + Seek>(&self, stream: &mut S) -> Result<(), WatermarkError> {
        let kind = ImageKind::Gif;
        let mut target = Animation::decode(BufReader::new(&mut *stream))
            .map_err(|e| WatermarkError::decode(kind, CodecError::from(e)))?;

        let (first_left, first_top, width, height) = match target.frames.first() {
            Some(f) => (f.left as i64, f.top as i64, f.width as u32, f.height as u32),
            None => return Err(WatermarkError::EmptyAnimation),
        };
        let offset = self.place(width, height)?;
        let (origin_x, origin_y) = offset.origin();

        for index in 0..target.frames.len() {
            let frame = &target.frames[index];
            let palette = target.palette(frame);
            let mut canvas = frame.buffer.to_vec();

            // Placement is relative to frame 0; shift into this frame's space.
            let at = (
                origin_x + first_left - frame.left as i64,
                origin_y + first_top - frame.top as i64,
            );
            composite::overlay_indexed(
                &mut canvas,
                frame.width as u32,
                frame.height as u32,
                &palette,
                self.layer_for_frame(index),
                at,
            );

            animation::replace_buffer(&mut target.frames[index], canvas);
        }

        debug!(frames = target.frames.len(), "composited animation");

        let bytes = target
            .encode(Vec::new())
            .map_err(|e| WatermarkError::encode(kind, CodecError::from(e)))?;
        write_back(stream, &bytes)
    }
}
