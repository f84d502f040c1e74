use orb_core::{Interpolation, OrbConfig};
use crate::{ExtractorResult, OrbExtractor};

/// Builder for creating an `OrbExtractor`
#[derive(Debug, Clone, Default)]
pub struct ExtractorBuilder {
    config: OrbConfig,
}

impl ExtractorBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of keypoints requested across all levels
    pub fn features(mut self, n_features: usize) -> Self {
        self.config.n_features = n_features;
        self
    }

    /// Scale ratio between consecutive pyramid levels (> 1)
    pub fn scale_factor(mut self, scale_factor: f32) -> Self {
        self.config.scale_factor = scale_factor;
        self
    }

    pub fn levels(mut self, n_levels: usize) -> Self {
        self.config.n_levels = n_levels;
        self
    }

    /// Initial and fallback FAST thresholds
    pub fn fast_thresholds(mut self, initial: u8, minimum: u8) -> Self {
        self.config.ini_th_fast = initial;
        self.config.min_th_fast = minimum;
        self
    }

    pub fn interpolation(mut self, interpolation: Interpolation) -> Self {
        self.config.interpolation = interpolation;
        self
    }

    /// Enable or disable orientation; disabled keypoints carry angle -1
    pub fn orientation(mut self, enable: bool) -> Self {
        self.config.compute_orientation = enable;
        self
    }

    /// Edge length of the FAST detection tiles
    pub fn tile_size(mut self, tile_size: usize) -> Self {
        self.config.tile_size = tile_size;
        self
    }

    /// Set the number of threads for parallel processing
    pub fn threads(mut self, n_threads: usize) -> Self {
        self.config.n_threads = n_threads;
        self
    }

    /// Create a builder from an existing configuration
    pub fn from_config(config: OrbConfig) -> Self {
        Self { config }
    }

    pub fn to_config(self) -> OrbConfig {
        self.config
    }

    /// Generate a summary of the builder's configuration
    pub fn summary(&self) -> String {
        self.config.summary()
    }

    /// Validate the configuration and build the extractor with its own thread pool
    pub fn build(self) -> ExtractorResult<OrbExtractor> {
        OrbExtractor::new(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orb_core::OrbError;
    use crate::ExtractorError;

    #[test]
    fn test_builder_basic() {
        let extractor = ExtractorBuilder::new()
            .features(500)
            .levels(4)
            .threads(2)
            .build()
            .unwrap();

        assert_eq!(extractor.config().n_features, 500);
        assert_eq!(extractor.config().n_levels, 4);
        assert_eq!(extractor.config().n_threads, 2);
    }

    #[test]
    fn test_builder_all_setters() {
        let config = ExtractorBuilder::new()
            .features(250)
            .scale_factor(1.5)
            .levels(3)
            .fast_thresholds(30, 10)
            .interpolation(Interpolation::Area)
            .orientation(false)
            .tile_size(40)
            .threads(1)
            .to_config();

        assert_eq!(config.n_features, 250);
        assert_eq!(config.scale_factor, 1.5);
        assert_eq!(config.n_levels, 3);
        assert_eq!((config.ini_th_fast, config.min_th_fast), (30, 10));
        assert_eq!(config.interpolation, Interpolation::Area);
        assert!(!config.compute_orientation);
        assert_eq!(config.tile_size, 40);
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let result = ExtractorBuilder::new().scale_factor(1.0).build();
        assert!(matches!(result, Err(ExtractorError::Orb(OrbError::InvalidScaleFactor(_)))));

        let result = ExtractorBuilder::new().fast_thresholds(5, 9).build();
        assert!(matches!(result, Err(ExtractorError::Orb(OrbError::InvalidThreshold { .. }))));

        let result = ExtractorBuilder::new().levels(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_config_round_trip() {
        let original = ExtractorBuilder::new().features(123).orientation(false);
        let restored = ExtractorBuilder::from_config(original.clone().to_config());
        assert_eq!(original.to_config(), restored.to_config());
    }

    #[test]
    fn test_summary_mentions_settings() {
        let summary = ExtractorBuilder::new().features(321).levels(5).summary();
        assert!(summary.contains("features=321"));
        assert!(summary.contains("levels=5"));
    }
}
