/// Geometry and quota of one pyramid level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleLevel {
    pub level: usize,
    /// Scale relative to level 0 (`scale_factor^level`)
    pub scale: f32,
    pub inv_scale: f32,
    pub width: usize,
    pub height: usize,
    /// Keypoints requested from this level
    pub n_features: usize,
}

/// FAST corner found on a level, in level-local pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub x: f32,
    pub y: f32,
    pub response: f32,
    pub level: usize,
}

/// Axis-aligned rectangle `[min_x, max_x] x [min_y, max_y]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Rect {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Area shared with `other` (zero when they only touch)
    #[cfg(test)]
    pub fn overlap_area(&self, other: &Rect) -> f32 {
        let w = self.max_x.min(other.max_x) - self.min_x.max(other.min_x);
        let h = self.max_y.min(other.max_y) - self.min_y.max(other.min_y);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_area() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(a.overlap_area(&Rect::new(5.0, 5.0, 15.0, 20.0)), 25.0);
        assert_eq!(a.overlap_area(&a), 100.0);
        // Shared edge only
        assert_eq!(a.overlap_area(&Rect::new(10.0, 0.0, 20.0, 10.0)), 0.0);
        assert_eq!(a.overlap_area(&Rect::new(30.0, 30.0, 40.0, 40.0)), 0.0);
    }
}
