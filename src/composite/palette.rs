//! Palette lookup for indexed (GIF) frames

use image::Rgba;

/// Colours of an indexed frame, with the transparent entry at alpha 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Rgba<u8>>,
}

impl Palette {
    /// Build from packed RGB triplets as stored in a GIF color table.
    pub fn from_rgb(rgb: &[u8], transparent: Option<u8>) -> Self {
        let mut colors: Vec<Rgba<u8>> =
            rgb.chunks_exact(3).map(|c| Rgba([c[0], c[1], c[2], 255])).collect();
        if let Some(color) = transparent.and_then(|t| colors.get_mut(t as usize)) {
            *color = Rgba([0, 0, 0, 0]);
        }
        Self { colors }
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colour at `index`; indices past the table read as fully transparent.
    pub fn color(&self, index: u8) -> Rgba<u8> {
        self.colors.get(index as usize).copied().unwrap_or(Rgba([0, 0, 0, 0]))
    }

    /// Index of the palette entry closest to `color`.
    ///
    /// Distance is squared euclidean over premultiplied RGBA, so every fully
    /// transparent colour matches the transparent entry equally well.
    pub fn nearest(&self, color: Rgba<u8>) -> u8 {
        let target = premultiply(color);
        let mut best = 0usize;
        let mut best_dist = u32::MAX;

        for (i, candidate) in self.colors.iter().enumerate() {
            let c = premultiply(*candidate);
            let dist: u32 = (0..4)
                .map(|k| {
                    let d = target[k] as i32 - c[k] as i32;
                    (d * d) as u32
                })
                .sum();
            if dist < best_dist {
                best = i;
                best_dist = dist;
                if dist == 0 {
                    break;
                }
            }
        }

        best as u8
    }
}

fn premultiply(c: Rgba<u8>) -> [u16; 4] {
    let a = c[3] as u16;
    let mul = |v: u8| (v as u16 * a + 127) / 255;
    [mul(c[0]), mul(c[1]), mul(c[2]), a]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_palette() -> Palette {
        // white, red, green, blue, black
        Palette::from_rgb(&[255, 255, 255, 255, 0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0], None)
    }

    #[test]
    fn test_from_rgb() {
        let palette = test_palette();
        assert_eq!(palette.color(4), Rgba([0, 0, 0, 255]));
        assert_eq!(palette.color(1), Rgba([255, 0, 0, 255]));
        assert_eq!(palette.color(9), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_transparent_entry() {
        let palette = Palette::from_rgb(&[255, 255, 255, 10, 20, 30], Some(1));
        assert_eq!(palette.color(1), Rgba([0, 0, 0, 0]));
        assert_eq!(palette.nearest(Rgba([99, 99, 99, 0])), 1);
    }

    #[test]
    fn test_nearest_exact_and_close() {
        let palette = test_palette();
        assert_eq!(palette.nearest(Rgba([0, 255, 0, 255])), 2);
        assert_eq!(palette.nearest(Rgba([250, 10, 5, 255])), 1);
        assert_eq!(palette.nearest(Rgba([20, 20, 30, 255])), 4);
    }

    #[test]
    fn test_nearest_prefers_first_on_tie() {
        let palette = Palette::from_rgb(&[1, 2, 3, 1, 2, 3], None);
        assert_eq!(palette.nearest(Rgba([1, 2, 3, 255])), 0);
    }
}
