pub mod config;
pub mod error;
pub mod image;

pub use config::{Interpolation, OrbConfig};
pub use error::{OrbError, OrbResult};
pub use image::{ImageView, PaddedImage};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Diameter of the patch used for orientation and description
pub const PATCH_SIZE: usize = 31;
pub const HALF_PATCH_SIZE: usize = 15;

/// Border kept around every pyramid level so that FAST, the orientation disk
/// and the descriptor pattern never read outside the level buffer
pub const EDGE_THRESHOLD: usize = 19;

/// Angle reported when orientation computation is disabled
pub const NO_ORIENTATION: f32 = -1.0;

/// 256-bit binary descriptor = 32 bytes
pub const DESCRIPTOR_SIZE: usize = 32;
pub type Descriptor = [u8; DESCRIPTOR_SIZE];

/// Provenance of a keypoint relative to the lapping area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KeypointClass {
    /// Outside the overlap (or no lapping area given)
    #[default]
    Mono,
    /// Left half of the overlap
    OverlapLeft,
    /// Right half of the overlap
    OverlapRight,
}

impl KeypointClass {
    /// Integer class identifier: 0 = mono, 1 = left overlap, 2 = right overlap
    pub fn id(self) -> i32 {
        match self {
            KeypointClass::Mono => 0,
            KeypointClass::OverlapLeft => 1,
            KeypointClass::OverlapRight => 2,
        }
    }

    pub fn is_overlap(self) -> bool {
        self != KeypointClass::Mono
    }
}

/// Oriented keypoint in level-0 image coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    /// Patch diameter at the detection level, in level-0 pixels
    pub size: f32,
    /// Degrees in [0, 360), or `NO_ORIENTATION`
    pub angle: f32,
    pub response: f32,
    /// Pyramid level the keypoint was detected on
    pub octave: usize,
    pub class: KeypointClass,
}

impl Keypoint {
    pub fn has_orientation(&self) -> bool {
        self.angle >= 0.0
    }
}

/// Column range `[x0, x1)` of stereo overlap in level-0 pixels.
///
/// `(0, 0)` or any pair of equal bounds disables overlap handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LappingArea {
    pub x0: i32,
    pub x1: i32,
}

impl LappingArea {
    pub const NONE: LappingArea = LappingArea { x0: 0, x1: 0 };

    pub fn new(x0: i32, x1: i32) -> Self {
        Self { x0, x1 }
    }

    pub fn is_active(&self) -> bool {
        self.x0 != self.x1
    }

    /// Ordered bounds clamped to `[0, width]`, or `None` when the range is
    /// inactive or empty after clamping
    pub fn normalized(&self, width: usize) -> Option<(f32, f32)> {
        if !self.is_active() {
            return None;
        }
        let (lo, hi) = if self.x0 < self.x1 { (self.x0, self.x1) } else { (self.x1, self.x0) };
        let w = width as i64;
        let lo = (lo as i64).clamp(0, w);
        let hi = (hi as i64).clamp(0, w);
        if lo >= hi {
            return None;
        }
        Some((lo as f32, hi as f32))
    }

    /// Class of a level-0 column given the normalized bounds
    pub fn classify(bounds: (f32, f32), x: f32) -> KeypointClass {
        let (lo, hi) = bounds;
        if x < lo || x >= hi {
            KeypointClass::Mono
        } else if x < (lo + hi) * 0.5 {
            KeypointClass::OverlapLeft
        } else {
            KeypointClass::OverlapRight
        }
    }
}

impl From<(i32, i32)> for LappingArea {
    fn from((x0, x1): (i32, i32)) -> Self {
        Self { x0, x1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_ids() {
        assert_eq!(KeypointClass::Mono.id(), 0);
        assert_eq!(KeypointClass::OverlapLeft.id(), 1);
        assert_eq!(KeypointClass::OverlapRight.id(), 2);
        assert!(!KeypointClass::Mono.is_overlap());
    }

    #[test]
    fn test_lapping_inactive() {
        assert!(LappingArea::NONE.normalized(100).is_none());
        assert!(LappingArea::new(10, 10).normalized(100).is_none());
        // Entirely beyond the image
        assert!(LappingArea::new(120, 150).normalized(100).is_none());
    }

    #[test]
    fn test_lapping_normalization() {
        assert_eq!(LappingArea::new(70, 30).normalized(100), Some((30.0, 70.0)));
        assert_eq!(LappingArea::new(-5, 160).normalized(100), Some((0.0, 100.0)));
    }

    #[test]
    fn test_lapping_classify() {
        let bounds = (30.0, 70.0);
        assert_eq!(LappingArea::classify(bounds, 29.9), KeypointClass::Mono);
        assert_eq!(LappingArea::classify(bounds, 30.0), KeypointClass::OverlapLeft);
        assert_eq!(LappingArea::classify(bounds, 49.9), KeypointClass::OverlapLeft);
        assert_eq!(LappingArea::classify(bounds, 50.0), KeypointClass::OverlapRight);
        assert_eq!(LappingArea::classify(bounds, 69.9), KeypointClass::OverlapRight);
        assert_eq!(LappingArea::classify(bounds, 70.0), KeypointClass::Mono);
    }
}
