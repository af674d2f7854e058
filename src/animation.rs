//! GIF animation decoding and re-encoding
//!
//! Frames are kept palette-indexed exactly as stored in the file so that a
//! decode/encode cycle preserves palettes, delays, disposal methods, frame
//! offsets and loop metadata. Only frame pixel buffers are meant to change.

use std::borrow::Cow;
use std::io::{Read, Write};

use gif::{ColorOutput, DecodeOptions, Encoder, Frame, Repeat};
use image::{Rgba, RgbaImage};

use crate::composite::{Layer, Palette};

/// A fully decoded GIF.
#[derive(Debug, Clone)]
pub struct Animation {
    /// Logical screen width
    pub width: u16,
    /// Logical screen height
    pub height: u16,
    /// Global color table (packed RGB)
    pub global_palette: Option<Vec<u8>>,
    /// Loop count from the NETSCAPE extension; `Finite(0)` when absent
    pub repeat: Repeat,
    /// Frames in display order
    pub frames: Vec<Frame<'static>>,
}

impl Animation {
    /// Decode every frame of a GIF stream.
    pub fn decode<R: Read>(reader: R) -> Result<Self, gif::DecodingError> {
        let mut options = DecodeOptions::new();
        options.set_color_output(ColorOutput::Indexed);
        let mut decoder = options.read_info(reader)?;

        let width = decoder.width();
        let height = decoder.height();
        let global_palette = decoder.global_palette().map(|p| p.to_vec());

        let mut frames = Vec::new();
        while let Some(frame) = decoder.read_next_frame()? {
            frames.push(frame.clone());
        }

        // The loop extension may follow the first frame, read it last.
        let repeat = decoder.repeat();

        Ok(Self { width, height, global_palette, repeat, frames })
    }

    /// Encode the animation, returning the writer.
    pub fn encode<W: Write>(&self, writer: W) -> Result<W, gif::EncodingError> {
        let global = self.global_palette.as_deref().unwrap_or(&[]);
        let mut encoder = Encoder::new(writer, self.width, self.height, global)?;

        // An explicit Finite(0) would be written as "loop forever".
        if self.repeat != Repeat::Finite(0) {
            encoder.set_repeat(self.repeat)?;
        }

        for frame in &self.frames {
            if frame.interlaced {
                // Buffers are stored de-interlaced after decoding.
                let mut frame = frame.clone();
                frame.interlaced = false;
                encoder.write_frame(&frame)?;
            } else {
                encoder.write_frame(frame)?;
            }
        }

        Ok(encoder.into_inner()?)
    }

    /// Effective palette of a frame: its local table, else the global one.
    pub fn palette(&self, frame: &Frame<'_>) -> Palette {
        let rgb = frame.palette.as_deref().or(self.global_palette.as_deref()).unwrap_or(&[]);
        Palette::from_rgb(rgb, frame.transparent)
    }

    /// Convert a frame into an RGBA layer positioned at its frame offset.
    pub fn frame_layer(&self, frame: &Frame<'_>) -> Layer {
        let palette = self.palette(frame);
        let width = frame.width as u32;
        let mut pixels = RgbaImage::new(width, frame.height as u32);

        for (i, index) in frame.buffer.iter().enumerate() {
            let (x, y) = (i as u32 % width.max(1), i as u32 / width.max(1));
            if y >= pixels.height() {
                break;
            }
            let color: Rgba<u8> = palette.color(*index);
            pixels.put_pixel(x, y, color);
        }

        Layer::with_origin(pixels, frame.left as i64, frame.top as i64)
    }
}

/// Replace the pixel buffer of a frame, keeping every other field.
pub(crate) fn replace_buffer(frame: &mut Frame<'static>, buffer: Vec<u8>) {
    frame.buffer = Cow::Owned(buffer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const PALETTE: [u8; 12] = [255, 255, 255, 255, 0, 0, 0, 255, 0, 0, 0, 255];

    /// Create a simple indexed frame filled with one palette index
    fn create_test_frame(width: u16, height: u16, index: u8, delay: u16) -> Frame<'static> {
        Frame {
            width,
            height,
            delay,
            buffer: Cow::Owned(vec![index; width as usize * height as usize]),
            ..Frame::default()
        }
    }

    fn create_test_gif(frames: &[Frame<'static>], repeat: Repeat) -> Vec<u8> {
        let animation = Animation {
            width: 4,
            height: 4,
            global_palette: Some(PALETTE.to_vec()),
            repeat,
            frames: frames.to_vec(),
        };
        animation.encode(Vec::new()).unwrap()
    }

    #[test]
    fn test_decode_preserves_metadata() {
        let bytes = create_test_gif(
            &[create_test_frame(4, 4, 1, 10), create_test_frame(4, 4, 2, 25)],
            Repeat::Infinite,
        );

        let animation = Animation::decode(Cursor::new(&bytes)).unwrap();
        assert_eq!((animation.width, animation.height), (4, 4));
        assert_eq!(animation.frames.len(), 2);
        assert_eq!(animation.frames[0].delay, 10);
        assert_eq!(animation.frames[1].delay, 25);
        assert_eq!(animation.repeat, Repeat::Infinite);
        assert_eq!(animation.global_palette.as_deref(), Some(&PALETTE[..]));
        assert!(animation.frames[1].buffer.iter().all(|&i| i == 2));
    }

    #[test]
    fn test_no_loop_extension_round_trips() {
        let bytes = create_test_gif(&[create_test_frame(4, 4, 0, 5)], Repeat::Finite(0));
        let animation = Animation::decode(Cursor::new(&bytes)).unwrap();
        assert_eq!(animation.repeat, Repeat::Finite(0));

        let again = Animation::decode(Cursor::new(animation.encode(Vec::new()).unwrap())).unwrap();
        assert_eq!(again.repeat, Repeat::Finite(0));
    }

    #[test]
    fn test_finite_loop_count_round_trips() {
        let bytes = create_test_gif(&[create_test_frame(4, 4, 0, 5)], Repeat::Finite(3));
        let animation = Animation::decode(Cursor::new(&bytes)).unwrap();
        assert_eq!(animation.repeat, Repeat::Finite(3));
    }

    #[test]
    fn test_frame_layer_uses_offset_and_transparency() {
        let mut frame = create_test_frame(2, 1, 1, 0);
        frame.left = 2;
        frame.top = 3;
        frame.transparent = Some(0);
        frame.buffer = Cow::Owned(vec![0, 1]);

        let animation = Animation {
            width: 4,
            height: 4,
            global_palette: Some(PALETTE.to_vec()),
            repeat: Repeat::Finite(0),
            frames: vec![],
        };
        let layer = animation.frame_layer(&frame);

        assert_eq!(layer.origin(), (2, 3));
        assert_eq!(layer.dimensions(), (2, 1));
        assert_eq!(*layer.pixels().get_pixel(0, 0), Rgba([0, 0, 0, 0]));
        assert_eq!(*layer.pixels().get_pixel(1, 0), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_local_palette_wins() {
        let mut frame = create_test_frame(1, 1, 0, 0);
        frame.palette = Some(vec![1, 2, 3]);
        let animation = Animation {
            width: 1,
            height: 1,
            global_palette: Some(PALETTE.to_vec()),
            repeat: Repeat::Finite(0),
            frames: vec![],
        };
        assert_eq!(animation.palette(&frame).color(0), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(Animation::decode(Cursor::new(b"not a gif at all")).is_err());
    }
}
