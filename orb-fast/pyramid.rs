use orb_core::image::reflect101;
use orb_core::{ImageView, Interpolation, OrbConfig, PaddedImage, EDGE_THRESHOLD};
use crate::types::ScaleLevel;

/// Smallest level edge that still leaves one full FAST window inside the
/// detection region (`EDGE_THRESHOLD - 3` pixels on each side)
pub const MIN_LEVEL_SIZE: usize = 2 * (EDGE_THRESHOLD - 3) + 7;

const BLUR_RADIUS: usize = 3;
const BLUR_SIGMA: f32 = 2.0;
const CUBIC_A: f64 = -0.75;

/// One pyramid level: geometry plus the buffers used by detection and description
#[derive(Debug, Clone)]
pub struct PyramidLevel {
    pub scale: ScaleLevel,
    /// Resampled level, used for FAST and orientation
    pub image: PaddedImage,
    /// Gaussian-smoothed copy, used for descriptors
    pub smoothed: PaddedImage,
}

/// Geometric scale pyramid for multi-scale feature detection
#[derive(Debug, Clone)]
pub struct ImagePyramid {
    levels: Vec<PyramidLevel>,
    requested_levels: usize,
}

impl ImagePyramid {
    /// Generate scale levels, dropping levels too small to detect on
    pub fn scale_levels(width: usize, height: usize, cfg: &OrbConfig) -> Vec<ScaleLevel> {
        let mut levels = Vec::with_capacity(cfg.n_levels);
        let mut scale = 1.0f32;

        for level in 0..cfg.n_levels {
            if level > 0 {
                scale *= cfg.scale_factor;
            }
            let inv_scale = 1.0 / scale;
            let scaled_width = (width as f32 * inv_scale).round() as usize;
            let scaled_height = (height as f32 * inv_scale).round() as usize;

            // Sizes only shrink from here on
            if scaled_width < MIN_LEVEL_SIZE || scaled_height < MIN_LEVEL_SIZE {
                log::debug!(
                    "pyramid: level {} would be {}x{} (< {}), keeping {} of {} levels",
                    level,
                    scaled_width,
                    scaled_height,
                    MIN_LEVEL_SIZE,
                    level,
                    cfg.n_levels
                );
                break;
            }

            levels.push(ScaleLevel {
                level,
                scale,
                inv_scale,
                width: scaled_width,
                height: scaled_height,
                n_features: 0,
            });
        }

        let quotas = Self::feature_quotas(cfg.n_features, cfg.scale_factor, levels.len());
        for (level, quota) in levels.iter_mut().zip(quotas) {
            level.n_features = quota;
        }
        levels
    }

    /// Split `n_features` over `n_levels` as a geometric series with ratio
    /// `1 / scale_factor`. The result always sums to `n_features`.
    pub fn feature_quotas(n_features: usize, scale_factor: f32, n_levels: usize) -> Vec<usize> {
        if n_levels == 0 {
            return Vec::new();
        }
        let factor = 1.0 / scale_factor as f64;
        let mut desired = n_features as f64 * (1.0 - factor) / (1.0 - factor.powi(n_levels as i32));

        let mut quotas = Vec::with_capacity(n_levels);
        let mut remaining = n_features;
        for _ in 0..n_levels - 1 {
            let quota = (desired.round() as usize).min(remaining);
            quotas.push(quota);
            remaining -= quota;
            desired *= factor;
        }
        quotas.push(remaining);
        quotas
    }

    /// Build the pyramid. Each level is resampled from the one above it.
    pub fn build(img: &ImageView, cfg: &OrbConfig) -> Self {
        let scale_levels = Self::scale_levels(img.width(), img.height(), cfg);
        let mut levels: Vec<PyramidLevel> = Vec::with_capacity(scale_levels.len());
        let mut previous: Option<(Vec<u8>, usize, usize)> = None;

        for scale_level in scale_levels {
            let pixels = match &previous {
                None => img.to_compact(),
                Some((pixels, w, h)) => Self::resize(
                    pixels,
                    *w,
                    *h,
                    scale_level.width,
                    scale_level.height,
                    cfg.interpolation,
                ),
            };

            let image = PaddedImage::from_compact(&pixels, scale_level.width, scale_level.height, EDGE_THRESHOLD);
            let smoothed = Self::gaussian_blur(&image);
            levels.push(PyramidLevel { scale: scale_level, image, smoothed });
            previous = Some((pixels, scale_level.width, scale_level.height));
        }

        log::debug!(
            "pyramid: {} levels built for {}x{} ({} requested)",
            levels.len(),
            img.width(),
            img.height(),
            cfg.n_levels
        );

        Self {
            levels,
            requested_levels: cfg.n_levels,
        }
    }

    pub fn levels(&self) -> &[PyramidLevel] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn requested_levels(&self) -> usize {
        self.requested_levels
    }

    /// Levels discarded because they were below `MIN_LEVEL_SIZE`
    pub fn dropped_levels(&self) -> usize {
        self.requested_levels - self.levels.len()
    }

    /// Resample a compact buffer with separable weight tables
    pub fn resize(
        src: &[u8],
        src_width: usize,
        src_height: usize,
        dst_width: usize,
        dst_height: usize,
        mode: Interpolation,
    ) -> Vec<u8> {
        let x_taps = Self::resample_taps(src_width, dst_width, mode);
        let y_taps = Self::resample_taps(src_height, dst_height, mode);

        let mut horizontal = vec![0f32; src_height * dst_width];
        for y in 0..src_height {
            let row = &src[y * src_width..(y + 1) * src_width];
            let out = &mut horizontal[y * dst_width..(y + 1) * dst_width];
            for (dst, taps) in out.iter_mut().zip(&x_taps) {
                *dst = taps.iter().map(|&(i, w)| row[i] as f32 * w).sum();
            }
        }

        let mut resized = vec![0u8; dst_width * dst_height];
        for (y, taps) in y_taps.iter().enumerate() {
            for x in 0..dst_width {
                let v: f32 = taps.iter().map(|&(i, w)| horizontal[i * dst_width + x] * w).sum();
                resized[y * dst_width + x] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
        resized
    }

    /// Source indices and weights contributing to every destination sample
    fn resample_taps(src_len: usize, dst_len: usize, mode: Interpolation) -> Vec<Vec<(usize, f32)>> {
        let ratio = src_len as f64 / dst_len as f64;
        let last = src_len - 1;

        (0..dst_len)
            .map(|d| match mode {
                Interpolation::Nearest => {
                    let s = ((d as f64 * ratio).floor() as usize).min(last);
                    vec![(s, 1.0)]
                }
                Interpolation::Linear => Self::linear_taps(d, ratio, last),
                Interpolation::Cubic => {
                    let fx = (d as f64 + 0.5) * ratio - 0.5;
                    let i = fx.floor();
                    let t = fx - i;
                    let w0 = ((CUBIC_A * (t + 1.0) - 5.0 * CUBIC_A) * (t + 1.0) + 8.0 * CUBIC_A) * (t + 1.0) - 4.0 * CUBIC_A;
                    let w1 = ((CUBIC_A + 2.0) * t - (CUBIC_A + 3.0)) * t * t + 1.0;
                    let w2 = ((CUBIC_A + 2.0) * (1.0 - t) - (CUBIC_A + 3.0)) * (1.0 - t) * (1.0 - t) + 1.0;
                    let w3 = 1.0 - w0 - w1 - w2;
                    [w0, w1, w2, w3]
                        .iter()
                        .enumerate()
                        .map(|(k, &w)| {
                            let idx = (i as isize + k as isize - 1).clamp(0, last as isize) as usize;
                            (idx, w as f32)
                        })
                        .collect()
                }
                Interpolation::Area if ratio > 1.0 => {
                    let start = d as f64 * ratio;
                    let end = start + ratio;
                    let mut taps = Vec::with_capacity(ratio.ceil() as usize + 1);
                    let mut k = start.floor() as usize;
                    while (k as f64) < end && k <= last {
                        let covered = (end.min(k as f64 + 1.0) - start.max(k as f64)) / ratio;
                        if covered > 1e-9 {
                            taps.push((k, covered as f32));
                        }
                        k += 1;
                    }
                    taps
                }
                // Area sampling only differs from linear when shrinking
                Interpolation::Area => Self::linear_taps(d, ratio, last),
            })
            .collect()
    }

    /// Bilinear taps with pixel centres at half-integer positions
    fn linear_taps(d: usize, ratio: f64, last: usize) -> Vec<(usize, f32)> {
        let fx = ((d as f64 + 0.5) * ratio - 0.5).max(0.0);
        let i0 = fx.floor() as usize;
        if i0 >= last {
            return vec![(last, 1.0)];
        }
        let t = (fx - i0 as f64) as f32;
        vec![(i0, 1.0 - t), (i0 + 1, t)]
    }

    fn gaussian_kernel() -> [f32; 2 * BLUR_RADIUS + 1] {
        let mut kernel = [0f32; 2 * BLUR_RADIUS + 1];
        let denom = 2.0 * BLUR_SIGMA * BLUR_SIGMA;
        for (i, k) in kernel.iter_mut().enumerate() {
            let d = i as f32 - BLUR_RADIUS as f32;
            *k = (-(d * d) / denom).exp();
        }
        let sum: f32 = kernel.iter().sum();
        for k in kernel.iter_mut() {
            *k /= sum;
        }
        kernel
    }

    /// Separable 7x7 Gaussian over the whole padded buffer
    pub fn gaussian_blur(img: &PaddedImage) -> PaddedImage {
        let kernel = Self::gaussian_kernel();
        let stride = img.stride();
        let rows = img.padded_height();
        let src = img.padded_data();
        let r = BLUR_RADIUS as isize;

        let mut horizontal = vec![0f32; stride * rows];
        for y in 0..rows {
            let row = &src[y * stride..(y + 1) * stride];
            for x in 0..stride {
                horizontal[y * stride + x] = kernel
                    .iter()
                    .enumerate()
                    .map(|(k, &w)| row[reflect101(x as isize + k as isize - r, stride)] as f32 * w)
                    .sum();
            }
        }

        let mut blurred = vec![0u8; stride * rows];
        for y in 0..rows {
            for x in 0..stride {
                let v: f32 = kernel
                    .iter()
                    .enumerate()
                    .map(|(k, &w)| horizontal[reflect101(y as isize + k as isize - r, rows) * stride + x] * w)
                    .sum();
                blurred[y * stride + x] = v.round().clamp(0.0, 255.0) as u8;
            }
        }

        PaddedImage::from_padded(blurred, img.width(), img.height(), img.border())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_levels(n_levels: usize) -> OrbConfig {
        OrbConfig {
            n_levels,
            n_threads: 1,
            ..OrbConfig::default()
        }
    }

    #[test]
    fn test_scale_levels_vga() {
        let levels = ImagePyramid::scale_levels(640, 480, &config_with_levels(8));
        assert_eq!(levels.len(), 8);
        assert_eq!((levels[0].width, levels[0].height), (640, 480));
        assert_eq!((levels[1].width, levels[1].height), (533, 400));
        for pair in levels.windows(2) {
            assert!(pair[1].scale > pair[0].scale);
            assert!(pair[1].width <= pair[0].width);
        }
        let total: usize = levels.iter().map(|l| l.n_features).sum();
        assert_eq!(total, 1000);
    }

    #[test]
    fn test_degenerate_levels_dropped() {
        let img = vec![0u8; 100 * 100];
        let view = ImageView::new(&img, 100, 100).unwrap();
        let pyramid = ImagePyramid::build(&view, &config_with_levels(8));
        // 100 / 1.2^6 rounds to 33 which is below MIN_LEVEL_SIZE
        assert_eq!(pyramid.len(), 6);
        assert_eq!(pyramid.dropped_levels(), 2);
        assert_eq!(pyramid.levels()[5].scale.width, 40);
        let total: usize = pyramid.levels().iter().map(|l| l.scale.n_features).sum();
        assert_eq!(total, 1000);
    }

    #[test]
    fn test_tiny_image_has_no_levels() {
        let levels = ImagePyramid::scale_levels(20, 200, &config_with_levels(4));
        assert!(levels.is_empty());
    }

    #[test]
    fn test_feature_quotas_geometric() {
        let quotas = ImagePyramid::feature_quotas(1000, 1.2, 8);
        assert_eq!(quotas, vec![217, 181, 151, 126, 105, 87, 73, 60]);
        assert_eq!(ImagePyramid::feature_quotas(50, 1.2, 1), vec![50]);
        assert!(ImagePyramid::feature_quotas(10, 1.2, 0).is_empty());
    }

    #[test]
    fn test_feature_quotas_never_exceed_total() {
        for n in [0usize, 1, 2, 5, 17] {
            let quotas = ImagePyramid::feature_quotas(n, 1.5, 8);
            assert_eq!(quotas.len(), 8);
            assert_eq!(quotas.iter().sum::<usize>(), n);
        }
    }

    #[test]
    fn test_resize_uniform_all_modes() {
        let src = vec![100u8; 50 * 40];
        for mode in [
            Interpolation::Nearest,
            Interpolation::Linear,
            Interpolation::Cubic,
            Interpolation::Area,
        ] {
            let out = ImagePyramid::resize(&src, 50, 40, 42, 33, mode);
            assert_eq!(out.len(), 42 * 33);
            assert!(out.iter().all(|&v| v == 100), "{:?} changed a flat image", mode);
        }
    }

    #[test]
    fn test_resize_halving() {
        // Alternating columns of 0 and 100
        let src: Vec<u8> = (0..4 * 4).map(|i| if i % 2 == 0 { 0 } else { 100 }).collect();

        let nearest = ImagePyramid::resize(&src, 4, 4, 2, 2, Interpolation::Nearest);
        assert_eq!(nearest, vec![0, 0, 0, 0]);

        let linear = ImagePyramid::resize(&src, 4, 4, 2, 2, Interpolation::Linear);
        assert_eq!(linear, vec![50, 50, 50, 50]);

        let area = ImagePyramid::resize(&src, 4, 4, 2, 2, Interpolation::Area);
        assert_eq!(area, vec![50, 50, 50, 50]);
    }

    #[test]
    fn test_blur_preserves_flat_and_spreads_impulse() {
        let flat = PaddedImage::from_compact(&vec![77u8; 9 * 9], 9, 9, 4);
        let blurred = ImagePyramid::gaussian_blur(&flat);
        assert!(blurred.padded_data().iter().all(|&v| v == 77));

        let mut pixels = vec![0u8; 21 * 21];
        pixels[10 * 21 + 10] = 255;
        let impulse = PaddedImage::from_compact(&pixels, 21, 21, 2);
        let blurred = ImagePyramid::gaussian_blur(&impulse);
        let centre = blurred.get(10, 10);
        assert!(centre > 0 && centre < 255);
        assert_eq!(blurred.get(9, 10), blurred.get(11, 10));
        assert_eq!(blurred.get(10, 9), blurred.get(10, 11));
        assert_eq!(blurred.get(0, 0), 0);
    }

    #[test]
    fn test_level_buffers_are_padded() {
        let img: Vec<u8> = (0..64 * 48).map(|i| (i % 251) as u8).collect();
        let view = ImageView::new(&img, 64, 48).unwrap();
        let pyramid = ImagePyramid::build(&view, &config_with_levels(2));
        let level0 = &pyramid.levels()[0];
        assert_eq!(level0.image.border(), EDGE_THRESHOLD);
        assert_eq!(level0.image.to_compact(), img);
        assert_eq!(level0.smoothed.width(), 64);
    }
}
