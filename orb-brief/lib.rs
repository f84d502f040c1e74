use orb_core::{Descriptor, Keypoint, PaddedImage, DESCRIPTOR_SIZE};
use rayon::prelude::*;

mod bit_pattern;

pub use bit_pattern::BIT_PATTERN;

/// Number of intensity comparisons per descriptor
pub const PATTERN_PAIRS: usize = DESCRIPTOR_SIZE * 8;

/// Sampling offsets are kept inside a 27x27 window around the keypoint
pub const MAX_OFFSET: i32 = 13;

pub fn pattern() -> &'static [[i32; 4]; PATTERN_PAIRS] {
    &BIT_PATTERN
}

/// Steered BRIEF over the smoothed level image
pub struct DescriptorComputer;

impl DescriptorComputer {
    /// One descriptor per keypoint, in keypoint order. Keypoint coordinates
    /// must be local to the level `img` was built for.
    pub fn compute(img: &PaddedImage, keypoints: &[Keypoint]) -> Vec<Descriptor> {
        keypoints
            .par_iter()
            .map(|kp| Self::describe(img, kp.x, kp.y, kp.angle))
            .collect()
    }

    /// Descriptor at `(x, y)` with the pattern rotated by `angle` degrees.
    /// A negative angle leaves the pattern unrotated.
    pub fn describe(img: &PaddedImage, x: f32, y: f32, angle: f32) -> Descriptor {
        let cx = x.round() as isize;
        let cy = y.round() as isize;
        let (sin, cos) = if angle >= 0.0 { angle.to_radians().sin_cos() } else { (0.0, 1.0) };

        let sample = |px: i32, py: i32| {
            let (px, py) = (px as f32, py as f32);
            let dx = (px * cos - py * sin).round() as isize;
            let dy = (px * sin + py * cos).round() as isize;
            img.at(cx + dx, cy + dy)
        };

        let mut descriptor = [0u8; DESCRIPTOR_SIZE];
        for (i, &[ax, ay, bx, by]) in BIT_PATTERN.iter().enumerate() {
            if sample(ax, ay) < sample(bx, by) {
                descriptor[i / 8] |= 0x80 >> (i % 8);
            }
        }
        descriptor
    }
}

/// Number of differing bits
#[inline]
pub fn hamming_distance(a: &Descriptor, b: &Descriptor) -> u32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x ^ y).count_ones()).sum()
}

/// Nearest train descriptor for a query descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorMatch {
    pub query: usize,
    pub train: usize,
    pub distance: u32,
}

/// Exhaustive Hamming matcher
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceMatcher {
    /// Keep a match only when it is also the best match in the reverse direction
    pub cross_check: bool,
    /// Reject matches farther than this
    pub max_distance: Option<u32>,
}

impl BruteForceMatcher {
    pub fn new(cross_check: bool) -> Self {
        Self { cross_check, max_distance: None }
    }

    pub fn with_max_distance(mut self, max_distance: u32) -> Self {
        self.max_distance = Some(max_distance);
        self
    }

    /// Best match for every query descriptor, ordered by query index
    pub fn match_descriptors(&self, query: &[Descriptor], train: &[Descriptor]) -> Vec<DescriptorMatch> {
        if query.is_empty() || train.is_empty() {
            return Vec::new();
        }

        let forward: Vec<(usize, u32)> = query.par_iter().map(|q| nearest(q, train)).collect();
        let backward: Option<Vec<usize>> = self
            .cross_check
            .then(|| train.par_iter().map(|t| nearest(t, query).0).collect());

        forward
            .into_iter()
            .enumerate()
            .filter(|&(q, (t, _))| backward.as_ref().is_none_or(|back| back[t] == q))
            .filter(|&(_, (_, distance))| self.max_distance.is_none_or(|max| distance <= max))
            .map(|(q, (t, distance))| DescriptorMatch { query: q, train: t, distance })
            .collect()
    }
}

/// Index and distance of the closest descriptor, lowest index on ties
fn nearest(needle: &Descriptor, haystack: &[Descriptor]) -> (usize, u32) {
    haystack
        .iter()
        .enumerate()
        .map(|(i, d)| (i, hamming_distance(needle, d)))
        .min_by_key(|&(i, distance)| (distance, i))
        .unwrap_or((0, u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orb_core::{EDGE_THRESHOLD, NO_ORIENTATION};
    use proptest::prelude::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn noise_pixels(size: usize, seed: u64) -> Vec<u8> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..size * size).map(|_| rng.gen_range(0..=255u8)).collect()
    }

    fn padded(pixels: &[u8], size: usize) -> PaddedImage {
        PaddedImage::from_compact(pixels, size, size, EDGE_THRESHOLD)
    }

    #[test]
    fn test_pattern_shape() {
        let pattern = pattern();
        assert_eq!(pattern.len(), 256);
        for pair in pattern.iter() {
            assert!(pair.iter().all(|v| v.abs() <= MAX_OFFSET));
            assert!(pair[0] != pair[2] || pair[1] != pair[3]);
        }
        // Offsets spread over the window rather than collapsing on the centre
        let spread = pattern.iter().flatten().filter(|v| v.abs() >= 5).count();
        assert!(spread > 200);
    }

    #[test]
    fn test_pattern_is_pinned() {
        assert_eq!(pattern()[0], [3, 1, -1, -5]);
        assert_eq!(pattern()[1], [10, 7, 10, -4]);
        assert_eq!(pattern()[2], [-3, -12, -13, 1]);
        assert_eq!(pattern()[3], [-3, 7, -1, -2]);
    }

    #[test]
    fn test_uniform_patch_gives_zero_descriptor() {
        let img = padded(&vec![100u8; 64 * 64], 64);
        assert_eq!(DescriptorComputer::describe(&img, 32.0, 32.0, 45.0), [0u8; 32]);
    }

    #[test]
    fn test_bits_packed_msb_first() {
        // Intensity grows with x, so every bit is `ax < bx`
        let size = 64;
        let pixels: Vec<u8> = (0..size * size).map(|i| ((i % size) * 4) as u8).collect();
        let img = padded(&pixels, size);
        let descriptor = DescriptorComputer::describe(&img, 32.0, 32.0, NO_ORIENTATION);

        for (i, pair) in pattern().iter().enumerate() {
            let expected = pair[0] < pair[2];
            let bit = descriptor[i / 8] & (0x80 >> (i % 8)) != 0;
            assert_eq!(bit, expected, "bit {}", i);
        }
    }

    #[test]
    fn test_rotation_follows_angle() {
        let size = 80;
        let c = 40isize;
        let pixels = noise_pixels(size, 5);
        // rotated(c + R90 p) = original(c + p)
        let mut rotated = vec![0u8; size * size];
        for y in 0..size as isize {
            for x in 0..size as isize {
                let (dx, dy) = (x - c, y - c);
                let (sx, sy) = (c + dy, c - dx);
                if (0..size as isize).contains(&sx) && (0..size as isize).contains(&sy) {
                    rotated[(y as usize) * size + x as usize] = pixels[sy as usize * size + sx as usize];
                }
            }
        }

        let original = DescriptorComputer::describe(&padded(&pixels, size), 40.0, 40.0, 0.0);
        let turned = DescriptorComputer::describe(&padded(&rotated, size), 40.0, 40.0, 90.0);
        assert_eq!(original, turned);
        let unsteered = DescriptorComputer::describe(&padded(&rotated, size), 40.0, 40.0, 0.0);
        assert!(hamming_distance(&original, &unsteered) > 40);
    }

    #[test]
    fn test_compute_preserves_order() {
        let pixels = noise_pixels(64, 9);
        let img = padded(&pixels, 64);
        let keypoints: Vec<Keypoint> = (0..20)
            .map(|i| Keypoint {
                x: 20.0 + i as f32,
                y: 30.0,
                size: 31.0,
                angle: i as f32 * 17.0,
                response: 1.0,
                octave: 0,
                class: Default::default(),
            })
            .collect();
        let descriptors = DescriptorComputer::compute(&img, &keypoints);
        assert_eq!(descriptors.len(), keypoints.len());
        for (kp, d) in keypoints.iter().zip(&descriptors) {
            assert_eq!(*d, DescriptorComputer::describe(&img, kp.x, kp.y, kp.angle));
        }
    }

    #[test]
    fn test_hamming_distance() {
        let a = [0u8; 32];
        let mut b = [0u8; 32];
        assert_eq!(hamming_distance(&a, &b), 0);
        b[0] = 0b1010_0000;
        b[31] = 0xff;
        assert_eq!(hamming_distance(&a, &b), 10);
        assert_eq!(hamming_distance(&a, &[0xff; 32]), 256);
    }

    #[test]
    fn test_cross_check_drops_one_sided_matches() {
        let mut near = [0u8; 32];
        near[0] = 1;
        let query = [[0u8; 32], near];
        let train = [[0u8; 32]];

        let plain = BruteForceMatcher::new(false).match_descriptors(&query, &train);
        assert_eq!(plain.len(), 2);

        let checked = BruteForceMatcher::new(true).match_descriptors(&query, &train);
        assert_eq!(checked, vec![DescriptorMatch { query: 0, train: 0, distance: 0 }]);

        let bounded = BruteForceMatcher::new(false)
            .with_max_distance(0)
            .match_descriptors(&query, &train);
        assert_eq!(bounded.len(), 1);
        assert!(BruteForceMatcher::new(true).match_descriptors(&[], &train).is_empty());
    }

    proptest! {
        #[test]
        fn hamming_is_symmetric_and_bounded(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
            let d = hamming_distance(&a, &b);
            prop_assert_eq!(d, hamming_distance(&b, &a));
            prop_assert!(d <= 256);
            prop_assert_eq!(hamming_distance(&a, &a), 0);
        }
    }
}
