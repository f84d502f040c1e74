use once_cell::sync::Lazy;
use orb_core::{PaddedImage, HALF_PATCH_SIZE, NO_ORIENTATION};
use crate::types::Candidate;

/// Half width of the circular patch for each row offset `0..=HALF_PATCH_SIZE`.
/// The upper rows are rebuilt from the lower ones so the disk is symmetric
/// under transposition.
static UMAX: Lazy<[i32; HALF_PATCH_SIZE + 1]> = Lazy::new(|| {
    let half = HALF_PATCH_SIZE as i32;
    let mut umax = [0i32; HALF_PATCH_SIZE + 2];
    let vmax = (half as f32 * std::f32::consts::SQRT_2 / 2.0 + 1.0).floor() as i32;
    let vmin = (half as f32 * std::f32::consts::SQRT_2 / 2.0).ceil() as i32;
    let hp2 = (half * half) as f32;
    for v in 0..=vmax {
        umax[v as usize] = (hp2 - (v * v) as f32).sqrt().round() as i32;
    }

    let mut v0 = 0usize;
    let mut v = half;
    while v >= vmin {
        while umax[v0] == umax[v0 + 1] {
            v0 += 1;
        }
        umax[v as usize] = v0 as i32;
        v0 += 1;
        v -= 1;
    }

    let mut table = [0i32; HALF_PATCH_SIZE + 1];
    table.copy_from_slice(&umax[..=HALF_PATCH_SIZE]);
    table
});

/// Intensity-centroid orientation over a disk of radius `HALF_PATCH_SIZE`
pub struct OrientationEstimator;

impl OrientationEstimator {
    pub fn umax() -> &'static [i32] {
        &UMAX[..]
    }

    /// Angle in degrees `[0, 360)` of the vector from `(x, y)` to the patch
    /// intensity centroid, measured on the level buffer
    pub fn ic_angle(img: &PaddedImage, x: f32, y: f32) -> f32 {
        let cx = x.round() as isize;
        let cy = y.round() as isize;
        let half = HALF_PATCH_SIZE as isize;
        let umax = &*UMAX;

        let mut m_01 = 0i64;
        let mut m_10 = 0i64;

        for u in -half..=half {
            m_10 += u as i64 * img.at(cx + u, cy) as i64;
        }

        // Rows above and below the centre are visited in pairs
        for v in 1..=half {
            let d = umax[v as usize] as isize;
            let mut v_sum = 0i64;
            for u in -d..=d {
                let val_plus = img.at(cx + u, cy + v) as i64;
                let val_minus = img.at(cx + u, cy - v) as i64;
                v_sum += val_plus - val_minus;
                m_10 += u as i64 * (val_plus + val_minus);
            }
            m_01 += v as i64 * v_sum;
        }

        let mut angle = (m_01 as f32).atan2(m_10 as f32).to_degrees();
        if angle < 0.0 {
            angle += 360.0;
        }
        if angle >= 360.0 {
            angle = 0.0;
        }
        angle
    }

    /// One angle per candidate, or `NO_ORIENTATION` for all when disabled
    pub fn assign(img: &PaddedImage, candidates: &[Candidate], enabled: bool) -> Vec<f32> {
        if !enabled {
            return vec![NO_ORIENTATION; candidates.len()];
        }
        candidates
            .iter()
            .map(|c| Self::ic_angle(img, c.x, c.y))
            .collect()
    }
}
