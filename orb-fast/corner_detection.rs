use orb_core::{PaddedImage, EDGE_THRESHOLD};
use crate::types::{Candidate, Rect};
use crate::utils::has_consecutive_bits;
use rayon::prelude::*;

/// Contiguous ring pixels required by FAST-9
const ARC_LENGTH: usize = 9;
/// Radius of the FAST ring
const RING_RADIUS: usize = 3;

/// One detection tile, `[x0, x1) x [y0, y1)` in level pixels including the
/// ring margin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

/// Per-level tile bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileStats {
    pub tiles: usize,
    /// Tiles that only produced corners at the fallback threshold
    pub fallback_tiles: usize,
    /// Tiles without corners at either threshold
    pub empty_tiles: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TileOutcome {
    Initial,
    Fallback,
    Empty,
}

/// Tiled FAST-9 corner detection with threshold fallback
pub struct CornerDetector;

impl CornerDetector {
    /// FAST circle offsets, contiguous around the ring
    pub const FAST_OFFSETS: [(isize, isize); 16] = [
        (0, -3), (1, -3), (2, -2), (3, -1),
        (3, 0), (3, 1), (2, 2), (1, 3),
        (0, 3), (-1, 3), (-2, 2), (-3, 1),
        (-3, 0), (-3, -1), (-2, -2), (-1, -3),
    ];

    /// Area of a level where tiles are laid out, `[min, max)` per axis
    pub fn detection_bounds(width: usize, height: usize) -> (usize, usize, usize, usize) {
        let min_border = EDGE_THRESHOLD - RING_RADIUS;
        let max_x = (width + RING_RADIUS).saturating_sub(EDGE_THRESHOLD).max(min_border);
        let max_y = (height + RING_RADIUS).saturating_sub(EDGE_THRESHOLD).max(min_border);
        (min_border, min_border, max_x, max_y)
    }

    /// Detection area as a float rectangle for the distributor
    pub fn detection_rect(width: usize, height: usize) -> Rect {
        let (x0, y0, x1, y1) = Self::detection_bounds(width, height);
        Rect::new(x0 as f32, y0 as f32, x1 as f32, y1 as f32)
    }

    /// Lay tiles of roughly `tile_size` pixels over the detection area. Each
    /// tile extends `2 * RING_RADIUS` pixels past its cell so that the tested
    /// pixels of neighbouring tiles abut.
    pub fn tiles(width: usize, height: usize, tile_size: usize) -> Vec<Tile> {
        let (min_x, min_y, max_x, max_y) = Self::detection_bounds(width, height);
        let region_w = max_x - min_x;
        let region_h = max_y - min_y;
        if region_w == 0 || region_h == 0 {
            return Vec::new();
        }

        let n_cols = (region_w / tile_size).max(1);
        let n_rows = (region_h / tile_size).max(1);
        let cell_w = region_w.div_ceil(n_cols);
        let cell_h = region_h.div_ceil(n_rows);
        let margin = 2 * RING_RADIUS;

        let mut tiles = Vec::with_capacity(n_cols * n_rows);
        for i in 0..n_rows {
            let y0 = min_y + i * cell_h;
            if y0 + RING_RADIUS >= max_y {
                continue;
            }
            let y1 = (y0 + cell_h + margin).min(max_y);
            for j in 0..n_cols {
                let x0 = min_x + j * cell_w;
                if x0 + margin >= max_x {
                    continue;
                }
                let x1 = (x0 + cell_w + margin).min(max_x);
                tiles.push(Tile { x0, y0, x1, y1 });
            }
        }
        tiles
    }

    /// Detect candidates on one level. Tiles without a corner at `ini_threshold`
    /// are retried once at `min_threshold`.
    pub fn detect_level(
        img: &PaddedImage,
        level: usize,
        ini_threshold: u8,
        min_threshold: u8,
        tile_size: usize,
    ) -> (Vec<Candidate>, TileStats) {
        let tiles = Self::tiles(img.width(), img.height(), tile_size);

        let per_tile: Vec<(Vec<Candidate>, TileOutcome)> = tiles
            .par_iter()
            .map(|tile| Self::detect_tile_with_fallback(img, tile, level, ini_threshold, min_threshold))
            .collect();

        let mut stats = TileStats {
            tiles: tiles.len(),
            ..TileStats::default()
        };
        let mut candidates = Vec::new();
        for (tile_candidates, outcome) in per_tile {
            match outcome {
                TileOutcome::Initial => {}
                TileOutcome::Fallback => stats.fallback_tiles += 1,
                TileOutcome::Empty => stats.empty_tiles += 1,
            }
            candidates.extend(tile_candidates);
        }

        log::trace!(
            "level {}: {} tiles, {} used fallback threshold, {} empty, {} candidates",
            level,
            stats.tiles,
            stats.fallback_tiles,
            stats.empty_tiles,
            candidates.len()
        );

        (candidates, stats)
    }

    fn detect_tile_with_fallback(
        img: &PaddedImage,
        tile: &Tile,
        level: usize,
        ini_threshold: u8,
        min_threshold: u8,
    ) -> (Vec<Candidate>, TileOutcome) {
        // Scores are independent of the threshold, so one map serves both passes
        let scores = Self::score_tile(img, tile, min_threshold);

        let found = Self::suppress_tile(&scores, tile, ini_threshold, level);
        if !found.is_empty() {
            return (found, TileOutcome::Initial);
        }
        if min_threshold < ini_threshold {
            let found = Self::suppress_tile(&scores, tile, min_threshold, level);
            if !found.is_empty() {
                return (found, TileOutcome::Fallback);
            }
        }
        (Vec::new(), TileOutcome::Empty)
    }

    /// Run FAST on a single tile at one threshold, with 3x3 non-maximum
    /// suppression inside the tile
    pub fn detect_tile(img: &PaddedImage, tile: &Tile, threshold: u8, level: usize) -> Vec<Candidate> {
        let scores = Self::score_tile(img, tile, threshold);
        Self::suppress_tile(&scores, tile, threshold, level)
    }

    /// Corner scores for every pixel of the tile; pixels that are not a
    /// corner at `threshold`, and the ring margin, score 0
    fn score_tile(img: &PaddedImage, tile: &Tile, threshold: u8) -> Vec<u8> {
        let tw = tile.x1 - tile.x0;
        let th = tile.y1 - tile.y0;
        let mut scores = vec![0u8; tw * th];
        if tw <= 2 * RING_RADIUS || th <= 2 * RING_RADIUS {
            return scores;
        }
        for cy in RING_RADIUS..th - RING_RADIUS {
            for cx in RING_RADIUS..tw - RING_RADIUS {
                let x = (tile.x0 + cx) as isize;
                let y = (tile.y0 + cy) as isize;
                scores[cy * tw + cx] = Self::corner_score(img, x, y, threshold);
            }
        }
        scores
    }

    fn suppress_tile(scores: &[u8], tile: &Tile, threshold: u8, level: usize) -> Vec<Candidate> {
        let tw = tile.x1 - tile.x0;
        let th = tile.y1 - tile.y0;
        let at = |cx: usize, cy: usize| {
            let s = scores[cy * tw + cx];
            if s >= threshold { s } else { 0 }
        };

        let mut candidates = Vec::new();
        if tw <= 2 * RING_RADIUS || th <= 2 * RING_RADIUS {
            return candidates;
        }
        for cy in RING_RADIUS..th - RING_RADIUS {
            for cx in RING_RADIUS..tw - RING_RADIUS {
                let s = at(cx, cy);
                if s == 0 {
                    continue;
                }
                // Plateaus keep their first pixel in scan order
                let is_max = (cy - 1..=cy + 1)
                    .flat_map(|ny| (cx - 1..=cx + 1).map(move |nx| (nx, ny)))
                    .filter(|&(nx, ny)| (nx, ny) != (cx, cy))
                    .all(|(nx, ny)| {
                        let earlier = ny < cy || (ny == cy && nx < cx);
                        if earlier { s > at(nx, ny) } else { s >= at(nx, ny) }
                    });
                if is_max {
                    candidates.push(Candidate {
                        x: (tile.x0 + cx) as f32,
                        y: (tile.y0 + cy) as f32,
                        response: s as f32,
                        level,
                    });
                }
            }
        }
        candidates
    }

    /// FAST-9 score: the largest threshold at which `(x, y)` is still a
    /// corner, or 0 when it is not a corner at `threshold`
    pub fn corner_score(img: &PaddedImage, x: isize, y: isize, threshold: u8) -> u8 {
        let p = img.at(x, y) as i32;
        let t = threshold as i32;

        let mut diffs = [0i32; 16];
        let mut brighter = 0u16;
        let mut darker = 0u16;
        for (i, &(dx, dy)) in Self::FAST_OFFSETS.iter().enumerate() {
            let d = img.at(x + dx, y + dy) as i32 - p;
            diffs[i] = d;
            if d > t {
                brighter |= 1 << i;
            } else if d < -t {
                darker |= 1 << i;
            }
        }

        if !has_consecutive_bits(brighter, ARC_LENGTH) && !has_consecutive_bits(darker, ARC_LENGTH) {
            return 0;
        }

        let mut best = 0i32;
        for start in 0..16 {
            let mut min_bright = i32::MAX;
            let mut min_dark = i32::MAX;
            for k in 0..ARC_LENGTH {
                let d = diffs[(start + k) % 16];
                min_bright = min_bright.min(d);
                min_dark = min_dark.min(-d);
            }
            best = best.max(min_bright).max(min_dark);
        }

        (best - 1).clamp(0, 255) as u8
    }
}
