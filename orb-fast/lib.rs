//! Scale pyramid, tiled FAST-9 detection, quadtree keypoint distribution and
//! intensity-centroid orientation.

pub mod corner_detection;
pub mod detector;
pub mod orientation;
pub mod pyramid;
pub mod quadtree;
pub mod types;
pub mod utils;

pub use corner_detection::{CornerDetector, Tile, TileStats};
pub use detector::{split_quota, FastDetector, LevelFeatures};
pub use orientation::OrientationEstimator;
pub use pyramid::{ImagePyramid, PyramidLevel, MIN_LEVEL_SIZE};
pub use quadtree::{Distribution, QuadtreeDistributor};
pub use types::{Candidate, Rect, ScaleLevel};
