//! Compositing watermark layers onto RGBA and palette-indexed canvases
//!
//! Both canvases use the same placement rule: a layer pixel at `(x, y)`
//! inside the layer lands on canvas pixel
//! `(at.0 + layer.left + x, at.1 + layer.top + y)`, where `at` is the canvas
//! position of the watermark's origin. Pixels falling outside the canvas are
//! clipped and fully transparent layer pixels are skipped.

mod blend;
mod palette;

pub use palette::Palette;

use image::{ImageBuffer, Rgba, RgbaImage};

use blend::{blend_pixels, blend_pixels_wide};

/// 16 bits per channel RGBA canvas, used for 16-bit PNG targets.
pub type Rgba16Image = ImageBuffer<Rgba<u16>, Vec<u16>>;

/// RGBA pixels positioned inside the watermark's own coordinate space.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    left: i64,
    top: i64,
    pixels: RgbaImage,
}

impl Layer {
    /// A layer anchored at the watermark origin.
    pub fn new(pixels: RgbaImage) -> Self {
        Self::with_origin(pixels, 0, 0)
    }

    /// A layer offset inside the watermark space (GIF frames).
    pub fn with_origin(pixels: RgbaImage, left: i64, top: i64) -> Self {
        Self { left, top, pixels }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn origin(&self) -> (i64, i64) {
        (self.left, self.top)
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Visit every visible layer pixel that falls inside a `width`x`height` canvas.
    fn for_each_visible<F>(&self, at: (i64, i64), width: u32, height: u32, mut f: F)
    where
        F: FnMut(u32, u32, &Rgba<u8>),
    {
        let base_x = at.0 + self.left;
        let base_y = at.1 + self.top;

        for (sx, sy, pixel) in self.pixels.enumerate_pixels() {
            if pixel[3] == 0 {
                continue;
            }
            let cx = base_x + sx as i64;
            let cy = base_y + sy as i64;
            if cx < 0 || cy < 0 || cx >= width as i64 || cy >= height as i64 {
                continue;
            }
            f(cx as u32, cy as u32, pixel);
        }
    }
}

/// Composite `layer` over an RGBA canvas.
pub fn overlay(canvas: &mut RgbaImage, layer: &Layer, at: (i64, i64)) {
    let (width, height) = canvas.dimensions();
    layer.for_each_visible(at, width, height, |x, y, src| {
        let blended = blend_pixels(src, canvas.get_pixel(x, y));
        canvas.put_pixel(x, y, blended);
    });
}

/// Composite `layer` over a 16-bit RGBA canvas.
pub fn overlay_wide(canvas: &mut Rgba16Image, layer: &Layer, at: (i64, i64)) {
    let (width, height) = canvas.dimensions();
    layer.for_each_visible(at, width, height, |x, y, src| {
        let blended = blend_pixels_wide(src, canvas.get_pixel(x, y));
        canvas.put_pixel(x, y, blended);
    });
}

/// Composite `layer` over a palette-indexed canvas of `width`x`height`.
///
/// Each touched pixel is blended in RGBA and mapped back to the nearest
/// palette entry; untouched pixels keep their original index.
pub fn overlay_indexed(
    buffer: &mut [u8],
    width: u32,
    height: u32,
    palette: &Palette,
    layer: &Layer,
    at: (i64, i64),
) {
    if palette.is_empty() {
        return;
    }
    layer.for_each_visible(at, width, height, |x, y, src| {
        let i = (y as usize) * (width as usize) + x as usize;
        if let Some(index) = buffer.get_mut(i) {
            let blended = blend_pixels(src, &palette.color(*index));
            *index = palette.nearest(blended);
        }
    });
}
