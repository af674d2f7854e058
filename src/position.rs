//! Anchor positions and watermark placement
//!
//! The placement offset follows the "source alignment point" convention: it
//! is the point of the watermark's own coordinate space that lines up with
//! the canvas origin. Offsets are therefore usually negative; watermark pixel
//! `(sx, sy)` lands on canvas pixel `(sx - offset.x, sy - offset.y)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WatermarkError;

/// Where the watermark is anchored on the target image.
///
/// Deserializes from a name (`"bottom-right"`) or an index (`3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "RawPosition")]
pub enum Position {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
}

impl Position {
    /// All anchors, in index order.
    pub const ALL: [Position; 5] = [
        Position::TopLeft,
        Position::TopRight,
        Position::BottomLeft,
        Position::BottomRight,
        Position::Center,
    ];

    /// Kebab-case name, as accepted by `FromStr` and the config file.
    pub fn name(self) -> &'static str {
        match self {
            Position::TopLeft => "top-left",
            Position::TopRight => "top-right",
            Position::BottomLeft => "bottom-left",
            Position::BottomRight => "bottom-right",
            Position::Center => "center",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses `--position` values and config names: case-insensitive, `_` or `-`.
impl FromStr for Position {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Position::ALL
            .into_iter()
            .find(|p| p.name() == normalized)
            .ok_or_else(|| WatermarkError::InvalidPosition(s.to_string()))
    }
}

/// Numeric positions as written in `wmark.toml`.
///
/// Indices 0-4 map to top-left, top-right, bottom-left, bottom-right, center.
/// Out-of-range values are user input, so they come back as
/// [`WatermarkError::InvalidPosition`]; a `Position` that exists is always
/// one of the five anchors.
impl TryFrom<i32> for Position {
    type Error = WatermarkError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(|i| Position::ALL.get(i).copied())
            .ok_or_else(|| WatermarkError::InvalidPosition(value.to_string()))
    }
}

/// `position` as written in a config file.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPosition {
    Name(String),
    Index(i64),
}

impl TryFrom<RawPosition> for Position {
    type Error = WatermarkError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        match raw {
            RawPosition::Name(name) => name.parse(),
            RawPosition::Index(index) => i32::try_from(index)
                .map_err(|_| WatermarkError::InvalidPosition(index.to_string()))
                .and_then(Position::try_from),
        }
    }
}

/// Source alignment point handed to the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub x: i64,
    pub y: i64,
}

impl Offset {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Canvas position of the watermark's origin.
    pub fn origin(self) -> (i64, i64) {
        (-self.x, -self.y)
    }
}

/// Compute the placement offset for a watermark of size `mark` on a target
/// of size `target`.
pub fn placement(position: Position, target: (u32, u32), mark: (u32, u32), padding: u32) -> Offset {
    let (tw, th) = (target.0 as i64, target.1 as i64);
    let (mw, mh) = (mark.0 as i64, mark.1 as i64);
    let p = padding as i64;

    // Distance from the canvas origin to the far-edge anchor.
    let right = tw - p - mw;
    let bottom = th - p - mh;

    match position {
        Position::TopLeft => Offset::new(-p, -p),
        Position::TopRight => Offset::new(-right, -p),
        Position::BottomLeft => Offset::new(-p, -bottom),
        Position::BottomRight => Offset::new(-right, -bottom),
        Position::Center => Offset::new(-right / 2, -bottom / 2),
    }
}

/// Reject placements that leave less room than the watermark needs.
///
/// Available space is `target - offset - padding` on each axis.
pub fn check_fit(
    offset: Offset,
    target: (u32, u32),
    mark: (u32, u32),
    padding: u32,
) -> Result<(), WatermarkError> {
    let p = padding as i64;
    let available = (target.0 as i64 - offset.x - p, target.1 as i64 - offset.y - p);

    if available.0 < mark.0 as i64 || available.1 < mark.1 as i64 {
        return Err(WatermarkError::WatermarkTooLarge { mark, available });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_corners() {
        let target = (200, 100);
        let mark = (50, 20);

        assert_eq!(placement(Position::TopLeft, target, mark, 10), Offset::new(-10, -10));
        assert_eq!(placement(Position::TopRight, target, mark, 10), Offset::new(-140, -10));
        assert_eq!(placement(Position::BottomLeft, target, mark, 10), Offset::new(-10, -70));
        assert_eq!(placement(Position::BottomRight, target, mark, 10), Offset::new(-140, -70));
    }

    #[test]
    fn test_placement_center_truncates() {
        // (201 - 0 - 50) / 2 = 75.5 -> 75, (101 - 0 - 20) / 2 = 40.5 -> 40
        let offset = placement(Position::Center, (201, 101), (50, 20), 0);
        assert_eq!(offset, Offset::new(-75, -40));
    }

    #[test]
    fn test_placement_center_negative_truncates_toward_zero() {
        // (10 - 0 - 15) / 2 = -2.5 -> -2
        let offset = placement(Position::Center, (10, 10), (15, 15), 0);
        assert_eq!(offset, Offset::new(2, 2));
    }

    #[test]
    fn test_zero_padding_aligns_with_edges() {
        let (tw, th) = (64u32, 48u32);
        let (mw, mh) = (16u32, 8u32);

        for position in Position::ALL {
            let (x, y) = placement(position, (tw, th), (mw, mh), 0).origin();
            match position {
                Position::TopLeft => assert_eq!((x, y), (0, 0)),
                Position::TopRight => {
                    assert_eq!(x + mw as i64, tw as i64);
                    assert_eq!(y, 0);
                }
                Position::BottomLeft => {
                    assert_eq!(x, 0);
                    assert_eq!(y + mh as i64, th as i64);
                }
                Position::BottomRight => {
                    assert_eq!(x + mw as i64, tw as i64);
                    assert_eq!(y + mh as i64, th as i64);
                }
                Position::Center => {
                    // equal margins on both sides
                    assert_eq!(tw as i64 - (x + mw as i64), x);
                    assert_eq!(th as i64 - (y + mh as i64), y);
                }
            }
        }
    }

    #[test]
    fn test_check_fit_accepts_exact_fit() {
        for position in Position::ALL {
            let offset = placement(position, (40, 30), (40, 30), 0);
            assert!(check_fit(offset, (40, 30), (40, 30), 0).is_ok(), "{position}");
        }
    }

    #[test]
    fn test_check_fit_rejects_oversized() {
        let offset = placement(Position::BottomRight, (100, 100), (60, 20), 50);
        let err = check_fit(offset, (100, 100), (60, 20), 50).unwrap_err();
        match err {
            WatermarkError::WatermarkTooLarge { mark, available } => {
                assert_eq!(mark, (60, 20));
                // offset.x = -(100 - 50 - 60) = 10 -> 100 - 10 - 50 = 40
                assert_eq!(available.0, 40);
            }
            other => panic!("expected WatermarkTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_check_fit_rejects_single_axis() {
        let offset = placement(Position::BottomRight, (100, 30), (20, 40), 0);
        assert!(matches!(
            check_fit(offset, (100, 30), (20, 40), 0),
            Err(WatermarkError::WatermarkTooLarge { .. })
        ));
    }

    #[test]
    fn test_position_from_str() {
        assert_eq!("top-left".parse::<Position>().unwrap(), Position::TopLeft);
        assert_eq!("Bottom_Right".parse::<Position>().unwrap(), Position::BottomRight);
        assert_eq!(" center ".parse::<Position>().unwrap(), Position::Center);
        assert!(matches!(
            "middle".parse::<Position>(),
            Err(WatermarkError::InvalidPosition(s)) if s == "middle"
        ));
    }

    #[test]
    fn test_position_try_from_index() {
        assert_eq!(Position::try_from(0).unwrap(), Position::TopLeft);
        assert_eq!(Position::try_from(4).unwrap(), Position::Center);
        assert!(matches!(Position::try_from(-1), Err(WatermarkError::InvalidPosition(_))));
        assert!(matches!(Position::try_from(5), Err(WatermarkError::InvalidPosition(_))));
    }

    #[test]
    fn test_position_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            position: Position,
        }
        let w: Wrapper = toml::from_str("position = \"top-right\"").unwrap();
        assert_eq!(w.position, Position::TopRight);
        let w: Wrapper = toml::from_str("position = \"Bottom_Left\"").unwrap();
        assert_eq!(w.position, Position::BottomLeft);
        assert!(toml::from_str::<Wrapper>("position = \"left\"").is_err());
    }

    #[test]
    fn test_position_serde_index() {
        #[derive(Debug, Deserialize)]
        struct Wrapper {
            position: Position,
        }
        let w: Wrapper = toml::from_str("position = 3").unwrap();
        assert_eq!(w.position, Position::BottomRight);

        let err = toml::from_str::<Wrapper>("position = 7").unwrap_err();
        assert!(err.to_string().contains("invalid watermark position '7'"), "got {}", err);
        assert!(toml::from_str::<Wrapper>("position = 4294967296").is_err());
    }

    #[test]
    fn test_position_serializes_name() {
        #[derive(Serialize)]
        struct Wrapper {
            position: Position,
        }
        let out = toml::to_string(&Wrapper { position: Position::TopLeft }).unwrap();
        assert_eq!(out.trim(), "position = \"top-left\"");
    }
}
