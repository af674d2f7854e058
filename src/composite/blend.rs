//! Source-over alpha blending

use image::Rgba;

/// Source-over on normalized straight-alpha channels, `[r, g, b, a]` in `0..=1`.
fn source_over(src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
    let (src_alpha, dst_alpha) = (src[3], dst[3]);

    // out_alpha = src_alpha + dst_alpha * (1 - src_alpha)
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
    if out_alpha == 0.0 {
        return [0.0; 4];
    }

    // out_color = (src_color * src_alpha + dst_color * dst_alpha * (1 - src_alpha)) / out_alpha
    let composite = |s: f32, d: f32| -> f32 {
        ((s * src_alpha + d * dst_alpha * (1.0 - src_alpha)) / out_alpha).clamp(0.0, 1.0)
    };

    [
        composite(src[0], dst[0]),
        composite(src[1], dst[1]),
        composite(src[2], dst[2]),
        out_alpha,
    ]
}

fn normalize<T: Into<f32> + Copy>(pixel: &Rgba<T>, max: f32) -> [f32; 4] {
    pixel.0.map(|c| c.into() / max)
}

/// Composite `src` over `dst` (porter-duff "source over").
///
/// Both pixels are straight (non-premultiplied) RGBA.
pub(crate) fn blend_pixels(src: &Rgba<u8>, dst: &Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        255 => *src,
        0 => *dst,
        _ => {
            let out = source_over(normalize(src, 255.0), normalize(dst, 255.0));
            Rgba(out.map(|c| (c * 255.0).round() as u8))
        }
    }
}

/// Composite an 8-bit `src` over a 16-bit `dst`.
///
/// Source channels widen exactly (`v * 257`), so an opaque watermark pixel
/// keeps its 8-bit value in the 16-bit result.
pub(crate) fn blend_pixels_wide(src: &Rgba<u8>, dst: &Rgba<u16>) -> Rgba<u16> {
    match src[3] {
        255 => Rgba(src.0.map(|c| c as u16 * 257)),
        0 => *dst,
        _ => {
            let out = source_over(normalize(src, 255.0), normalize(dst, 65535.0));
            Rgba(out.map(|c| (c * 65535.0).round() as u16))
        }
    }
}
