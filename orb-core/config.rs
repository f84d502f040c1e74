use crate::error::{OrbError, OrbResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Resampling used when building pyramid levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Interpolation {
    Nearest,
    #[default]
    Linear,
    Cubic,
    Area,
}

impl Interpolation {
    /// Map the OpenCV interpolation codes (0 nearest, 1 linear, 2 cubic, 3 area)
    pub fn from_code(code: i32) -> OrbResult<Self> {
        match code {
            0 => Ok(Interpolation::Nearest),
            1 => Ok(Interpolation::Linear),
            2 => Ok(Interpolation::Cubic),
            3 => Ok(Interpolation::Area),
            other => Err(OrbError::UnsupportedInterpolation(other)),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Interpolation::Nearest => 0,
            Interpolation::Linear => 1,
            Interpolation::Cubic => 2,
            Interpolation::Area => 3,
        }
    }
}

/// Extraction parameters, fixed for the lifetime of an extractor
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OrbConfig {
    /// Total keypoints requested across all levels
    pub n_features: usize,
    pub scale_factor: f32,
    pub n_levels: usize,
    /// FAST threshold tried first on every tile
    pub ini_th_fast: u8,
    /// Fallback FAST threshold for tiles that found nothing
    pub min_th_fast: u8,
    pub interpolation: Interpolation,
    pub compute_orientation: bool,
    /// Edge length of the detection tiles, in level pixels
    pub tile_size: usize,
    pub n_threads: usize,
}

impl Default for OrbConfig {
    fn default() -> Self {
        Self {
            n_features: 1000,
            scale_factor: 1.2,
            n_levels: 8,
            ini_th_fast: 20,
            min_th_fast: 7,
            interpolation: Interpolation::Linear,
            compute_orientation: true,
            tile_size: 30,
            n_threads: num_cpus::get().max(1),
        }
    }
}

pub const MAX_LEVELS: usize = 32;
pub const MIN_TILE_SIZE: usize = 7;

impl OrbConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> OrbResult<()> {
        if !self.scale_factor.is_finite() || self.scale_factor <= 1.0 {
            return Err(OrbError::InvalidScaleFactor(self.scale_factor));
        }
        if self.n_levels == 0 || self.n_levels > MAX_LEVELS {
            return Err(OrbError::InvalidLevelCount(self.n_levels));
        }
        if self.min_th_fast == 0 || self.min_th_fast > self.ini_th_fast {
            return Err(OrbError::InvalidThreshold {
                initial: self.ini_th_fast,
                minimum: self.min_th_fast,
            });
        }
        if self.tile_size < MIN_TILE_SIZE {
            return Err(OrbError::InvalidTileSize(self.tile_size));
        }
        if self.n_threads == 0 {
            return Err(OrbError::InvalidThreadCount(self.n_threads));
        }
        Ok(())
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "OrbConfig: features={}, scale={:.2}, levels={}, FAST={}/{}, interpolation={:?}, orientation={}, tile={}, threads={}",
            self.n_features,
            self.scale_factor,
            self.n_levels,
            self.ini_th_fast,
            self.min_th_fast,
            self.interpolation,
            self.compute_orientation,
            self.tile_size,
            self.n_threads
        )
    }

    /// Serialize to JSON string
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    #[cfg(feature = "serde")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserialize from TOML string
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json` or `.toml` file, chosen by extension
    #[cfg(feature = "serde")]
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&content),
            _ => Self::from_json(&content),
        }
    }

    /// Save to a `.json` or `.toml` file, chosen by extension
    #[cfg(feature = "serde")]
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => self.to_toml()?,
            _ => self.to_json()?,
        };
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = OrbConfig::default();
        assert_eq!(cfg.n_features, 1000);
        assert_eq!(cfg.n_levels, 8);
        assert_eq!(cfg.ini_th_fast, 20);
        assert_eq!(cfg.min_th_fast, 7);
        assert_eq!(cfg.interpolation, Interpolation::Linear);
        assert!(cfg.compute_orientation);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_invalid_scale_factor() {
        for bad in [1.0, 0.5, f32::NAN, f32::INFINITY] {
            let cfg = OrbConfig { scale_factor: bad, ..OrbConfig::default() };
            assert!(matches!(cfg.validate(), Err(OrbError::InvalidScaleFactor(_))));
        }
    }

    #[test]
    fn test_invalid_levels_and_thresholds() {
        let cfg = OrbConfig { n_levels: 0, ..OrbConfig::default() };
        assert!(matches!(cfg.validate(), Err(OrbError::InvalidLevelCount(0))));

        let cfg = OrbConfig { min_th_fast: 25, ..OrbConfig::default() };
        assert!(matches!(cfg.validate(), Err(OrbError::InvalidThreshold { initial: 20, minimum: 25 })));

        let cfg = OrbConfig { min_th_fast: 0, ..OrbConfig::default() };
        assert!(cfg.validate().is_err());

        let cfg = OrbConfig { tile_size: 3, ..OrbConfig::default() };
        assert!(matches!(cfg.validate(), Err(OrbError::InvalidTileSize(3))));

        let cfg = OrbConfig { n_threads: 0, ..OrbConfig::default() };
        assert!(matches!(cfg.validate(), Err(OrbError::InvalidThreadCount(0))));
    }

    #[test]
    fn test_interpolation_codes() {
        for mode in [
            Interpolation::Nearest,
            Interpolation::Linear,
            Interpolation::Cubic,
            Interpolation::Area,
        ] {
            assert_eq!(Interpolation::from_code(mode.code()).unwrap(), mode);
        }
        assert!(matches!(
            Interpolation::from_code(7),
            Err(OrbError::UnsupportedInterpolation(7))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_toml_partial_config_uses_defaults() {
        let cfg = OrbConfig::from_toml("n_features = 500\ninterpolation = \"area\"\n").unwrap();
        assert_eq!(cfg.n_features, 500);
        assert_eq!(cfg.interpolation, Interpolation::Area);
        assert_eq!(cfg.n_levels, 8);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_rejects_invalid() {
        assert!(OrbConfig::from_json(r#"{"scale_factor": 0.9}"#).is_err());
    }
}
