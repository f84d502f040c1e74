use orb_core::{ImageView, Keypoint, KeypointClass, LappingArea, OrbConfig, PATCH_SIZE};
use crate::corner_detection::CornerDetector;
use crate::orientation::OrientationEstimator;
use crate::pyramid::PyramidLevel;
use crate::quadtree::QuadtreeDistributor;
use crate::types::{Candidate, Rect};

/// Keypoints kept on one level, still in level-local coordinates
#[derive(Debug, Clone, Default)]
pub struct LevelFeatures {
    pub keypoints: Vec<Keypoint>,
    /// Quadtree leaf each keypoint won, parallel to `keypoints`
    pub leaf_bounds: Vec<Rect>,
}

/// Per-level pipeline: tiled FAST, mask filter, quadtree distribution and
/// orientation
#[derive(Debug, Clone)]
pub struct FastDetector {
    ini_th_fast: u8,
    min_th_fast: u8,
    tile_size: usize,
    compute_orientation: bool,
}

impl FastDetector {
    pub fn new(cfg: &OrbConfig) -> Self {
        Self {
            ini_th_fast: cfg.ini_th_fast,
            min_th_fast: cfg.min_th_fast,
            tile_size: cfg.tile_size,
            compute_orientation: cfg.compute_orientation,
        }
    }

    /// Detect and distribute keypoints on `level`.
    ///
    /// `mask` is at level-0 resolution. `lapping` holds normalized level-0
    /// bounds; when present each overlap half and the remainder of the image
    /// are distributed separately with proportional shares of the quota.
    pub fn detect_level(
        &self,
        level: &PyramidLevel,
        mask: Option<&ImageView>,
        lapping: Option<(f32, f32)>,
    ) -> LevelFeatures {
        let scale = level.scale.scale;
        let index = level.scale.level;

        let (mut candidates, _) = CornerDetector::detect_level(
            &level.image,
            index,
            self.ini_th_fast,
            self.min_th_fast,
            self.tile_size,
        );
        let detected = candidates.len();

        if let Some(mask) = mask {
            candidates.retain(|c| mask.get_rounded(c.x * scale, c.y * scale) != 0);
        }

        let region = CornerDetector::detection_rect(level.image.width(), level.image.height());
        let quota = level.scale.n_features;

        let mut features = LevelFeatures::default();
        match lapping {
            None => self.distribute_segment(level, &candidates, region, quota, KeypointClass::Mono, &mut features),
            Some(bounds) => {
                for (class, nominal, segment_quota) in lapping_segments(region, bounds, scale, quota) {
                    // Classified on the level-0 column the keypoint is reported at
                    let members: Vec<Candidate> = candidates
                        .iter()
                        .copied()
                        .filter(|c| LappingArea::classify(bounds, c.x * scale) == class)
                        .collect();
                    let area = enclose(nominal, &members);
                    self.distribute_segment(level, &members, area, segment_quota, class, &mut features);
                }
            }
        }

        log::debug!(
            "level {} ({}x{}): {} candidates, {} after mask, {} kept of quota {}",
            index,
            level.image.width(),
            level.image.height(),
            detected,
            candidates.len(),
            features.keypoints.len(),
            quota
        );

        features
    }

    fn distribute_segment(
        &self,
        level: &PyramidLevel,
        candidates: &[Candidate],
        bounds: Rect,
        quota: usize,
        class: KeypointClass,
        out: &mut LevelFeatures,
    ) {
        let distribution = QuadtreeDistributor::distribute(candidates, bounds, quota);
        let angles = OrientationEstimator::assign(&level.image, &distribution.retained, self.compute_orientation);
        let size = PATCH_SIZE as f32 * level.scale.scale;

        out.keypoints.extend(distribution.retained.iter().zip(angles).map(|(c, angle)| Keypoint {
            x: c.x,
            y: c.y,
            size,
            angle,
            response: c.response,
            octave: c.level,
            class,
        }));
        out.leaf_bounds.extend(distribution.leaf_bounds);
    }
}

/// Split `total` proportionally to `weights` with largest remainders, so the
/// shares always sum to `total`
pub fn split_quota(total: usize, weights: &[f32]) -> Vec<usize> {
    let sum: f64 = weights.iter().map(|&w| w.max(0.0) as f64).sum();
    if weights.is_empty() {
        return Vec::new();
    }
    if sum <= 0.0 {
        let mut shares = vec![0; weights.len()];
        shares[0] = total;
        return shares;
    }

    let exact: Vec<f64> = weights.iter().map(|&w| total as f64 * w.max(0.0) as f64 / sum).collect();
    let mut shares: Vec<usize> = exact.iter().map(|e| e.floor() as usize).collect();
    let assigned: usize = shares.iter().sum();

    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.total_cmp(&ra)
    });
    for &i in order.iter().take(total.saturating_sub(assigned)) {
        shares[i] += 1;
    }
    shares
}

/// Nominal area and share of `quota` for the mono remainder and the two
/// overlap halves. Shares follow the columns each part covers inside the
/// detection `region`.
fn lapping_segments(region: Rect, bounds: (f32, f32), scale: f32, quota: usize) -> [(KeypointClass, Rect, usize); 3] {
    let (lo, hi) = bounds;
    let mid = (lo + hi) * 0.5;
    let left = clip_columns(region, lo / scale, mid / scale);
    let right = clip_columns(region, mid / scale, hi / scale);
    let mono_width = (region.width() - left.width() - right.width()).max(0.0);

    let shares = split_quota(quota, &[mono_width, left.width(), right.width()]);
    [
        (KeypointClass::Mono, region, shares[0]),
        (KeypointClass::OverlapLeft, left, shares[1]),
        (KeypointClass::OverlapRight, right, shares[2]),
    ]
}

fn clip_columns(region: Rect, min_x: f32, max_x: f32) -> Rect {
    let lo = min_x.clamp(region.min_x, region.max_x);
    let hi = max_x.clamp(lo, region.max_x);
    Rect::new(lo, region.min_y, hi, region.max_y)
}

/// Grow `bounds` until it holds every candidate
fn enclose(bounds: Rect, candidates: &[Candidate]) -> Rect {
    candidates.iter().fold(bounds, |r, c| {
        Rect::new(r.min_x.min(c.x), r.min_y.min(c.y), r.max_x.max(c.x), r.max_y.max(c.y))
    })
}
