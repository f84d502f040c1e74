use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrbError {
    #[error("invalid image dimensions: {width}x{height} (both must be at least 2)")]
    InvalidImageSize { width: usize, height: usize },
    #[error("image data length mismatch: expected at least {expected_len}, got {actual_len}")]
    InvalidImageData { expected_len: usize, actual_len: usize },
    #[error("row stride {stride} smaller than image width {width}")]
    InvalidStride { stride: usize, width: usize },
    #[error("mask is {mask_width}x{mask_height} but image is {width}x{height}")]
    MaskMismatch {
        width: usize,
        height: usize,
        mask_width: usize,
        mask_height: usize,
    },
    #[error("invalid scale factor: {0} (must be finite and > 1)")]
    InvalidScaleFactor(f32),
    #[error("invalid level count: {0} (must be 1-32)")]
    InvalidLevelCount(usize),
    #[error("invalid FAST thresholds: initial {initial}, minimum {minimum} (need 1 <= minimum <= initial)")]
    InvalidThreshold { initial: u8, minimum: u8 },
    #[error("invalid tile size: {0} (must be >= 7)")]
    InvalidTileSize(usize),
    #[error("invalid thread count: {0}")]
    InvalidThreadCount(usize),
    #[error("unsupported interpolation code: {0}")]
    UnsupportedInterpolation(i32),
}

impl OrbError {
    /// Whether the error was caused by the image or mask handed to an
    /// extraction call rather than by the configuration
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            OrbError::InvalidImageSize { .. }
                | OrbError::InvalidImageData { .. }
                | OrbError::InvalidStride { .. }
                | OrbError::MaskMismatch { .. }
        )
    }
}

pub type OrbResult<T> = Result<T, OrbError>;
