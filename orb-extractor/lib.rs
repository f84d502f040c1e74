use orb_brief::DescriptorComputer;
use orb_core::{Descriptor, ImageView, Keypoint, LappingArea, OrbConfig, OrbError, DESCRIPTOR_SIZE};
use orb_fast::{FastDetector, ImagePyramid};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

pub mod builder;

pub use builder::ExtractorBuilder;
pub use orb_brief::{hamming_distance, BruteForceMatcher, DescriptorMatch};
pub use orb_core::{self, Interpolation, KeypointClass};

#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error(transparent)]
    Orb(#[from] OrbError),
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ExtractorError {
    /// Whether the image or mask handed to `extract` was rejected
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ExtractorError::Orb(e) if e.is_invalid_input())
    }
}

pub type ExtractorResult<T> = Result<T, ExtractorError>;

/// Keypoints in level-0 coordinates with their descriptors, pairwise aligned
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extraction {
    pub keypoints: Vec<Keypoint>,
    pub descriptors: Vec<Descriptor>,
    /// Pyramid levels large enough to detect on
    pub levels_used: usize,
}

impl Extraction {
    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }

    /// Descriptors as a row-major `len() x 32` byte matrix
    pub fn descriptor_matrix(&self) -> Vec<u8> {
        let mut matrix = Vec::with_capacity(self.descriptors.len() * DESCRIPTOR_SIZE);
        for d in &self.descriptors {
            matrix.extend_from_slice(d);
        }
        matrix
    }

    /// Keypoints inside the lapping area
    pub fn overlap_count(&self) -> usize {
        self.keypoints.iter().filter(|kp| kp.class.is_overlap()).count()
    }

    /// Move overlap keypoints behind mono keypoints, keeping relative order
    /// and descriptor pairing. Returns the number of mono keypoints.
    pub fn partition_by_overlap(&mut self) -> usize {
        let (mono, overlap): (Vec<_>, Vec<_>) = self
            .keypoints
            .drain(..)
            .zip(self.descriptors.drain(..))
            .partition(|(kp, _)| !kp.class.is_overlap());
        let mono_count = mono.len();
        let (keypoints, descriptors): (Vec<Keypoint>, Vec<Descriptor>) = mono.into_iter().chain(overlap).unzip();
        self.keypoints = keypoints;
        self.descriptors = descriptors;
        mono_count
    }
}

/// Multi-scale ORB extractor running one task per pyramid level on its own
/// thread pool
pub struct OrbExtractor {
    cfg: OrbConfig,
    detector: FastDetector,
    pool: rayon::ThreadPool,
}

impl OrbExtractor {
    pub fn new(cfg: OrbConfig) -> ExtractorResult<Self> {
        cfg.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(cfg.n_threads)
            .thread_name(|i| format!("orb-level-{}", i))
            .build()?;
        log::debug!("{}", cfg.summary());
        Ok(Self {
            detector: FastDetector::new(&cfg),
            cfg,
            pool,
        })
    }

    pub fn config(&self) -> &OrbConfig {
        &self.cfg
    }

    /// Detect keypoints and compute descriptors.
    ///
    /// `mask` must match the image size; keypoints are kept only where it is
    /// non-zero. An active `lapping` area classifies keypoints by column.
    pub fn extract(
        &self,
        image: ImageView<'_>,
        mask: Option<ImageView<'_>>,
        lapping: LappingArea,
    ) -> ExtractorResult<Extraction> {
        let (width, height) = image.dimensions();
        if width < 2 || height < 2 {
            return Err(OrbError::InvalidImageSize { width, height }.into());
        }
        if let Some(mask) = &mask {
            if mask.dimensions() != (width, height) {
                return Err(OrbError::MaskMismatch {
                    width,
                    height,
                    mask_width: mask.width(),
                    mask_height: mask.height(),
                }
                .into());
            }
        }

        let extraction = self.pool.install(|| {
            let pyramid = ImagePyramid::build(&image, &self.cfg);
            if pyramid.is_empty() {
                log::warn!(
                    "image {}x{} is too small for any pyramid level, no keypoints extracted",
                    width,
                    height
                );
                return Extraction::default();
            }

            let bounds = lapping.normalized(width);
            let per_level: Vec<(Vec<Keypoint>, Vec<Descriptor>)> = pyramid
                .levels()
                .par_iter()
                .map(|level| {
                    let features = self.detector.detect_level(level, mask.as_ref(), bounds);
                    let descriptors = DescriptorComputer::compute(&level.smoothed, &features.keypoints);
                    let scale = level.scale.scale;
                    let keypoints = features
                        .keypoints
                        .into_iter()
                        .map(|mut kp| {
                            kp.x *= scale;
                            kp.y *= scale;
                            kp
                        })
                        .collect();
                    (keypoints, descriptors)
                })
                .collect();

            let mut extraction = Extraction {
                levels_used: pyramid.len(),
                ..Extraction::default()
            };
            for (keypoints, descriptors) in per_level {
                extraction.keypoints.extend(keypoints);
                extraction.descriptors.extend(descriptors);
            }
            extraction
        });

        log::debug!(
            "extracted {} keypoints ({} in overlap) from {}x{} over {} levels",
            extraction.len(),
            extraction.overlap_count(),
            width,
            height,
            extraction.levels_used
        );
        Ok(extraction)
    }

    /// Extract without mask or lapping area
    pub fn extract_image(&self, image: ImageView<'_>) -> ExtractorResult<Extraction> {
        self.extract(image, None, LappingArea::NONE)
    }
}

/// Borrow a decoded grayscale image as an `ImageView`
pub fn gray_view(img: &image::GrayImage) -> ExtractorResult<ImageView<'_>> {
    Ok(ImageView::new(img.as_raw(), img.width() as usize, img.height() as usize)?)
}
