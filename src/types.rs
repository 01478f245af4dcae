use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub regions: RegionsConfig,
    pub subtractor: SubtractorConfig,
    pub detection: DetectionConfig,
    pub tracking: TrackingConfig,
    pub occupancy: OccupancyConfig,
    pub video: VideoConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionsConfig {
    /// JSON file with `{id, region: [[x, y], ...]}` records
    pub file: String,
    /// Resolution the region coordinates were authored against
    pub reference_width: i32,
    pub reference_height: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtractorConfig {
    pub history: i32,
    pub var_threshold: f64,
    pub detect_shadows: bool,
    pub median_kernel: i32,
    pub morph_iterations: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Contours with area <= this many px² are discarded as noise
    pub min_blob_area: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Maximum centroid distance (px) to match a detection to a live track
    pub max_match_distance: f32,
    /// Frames a track survives without a detection before deletion
    pub max_coast_frames: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupancyConfig {
    /// A spot becomes occupied once its candidate has been present longer than this
    pub grace_secs: f64,
    /// Timer entries unseen for longer than this are pruned
    pub stale_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    pub input_dir: String,
    pub output_dir: String,
    pub save_annotated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Axis-aligned bounding box of a candidate moving object, one frame only.
/// Persistence across frames happens through the tracker's identity, not
/// through the box coordinates themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl CandidateBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn centroid(&self) -> (f64, f64) {
        (
            (self.x1 + self.x2) as f64 * 0.5,
            (self.y1 + self.y2) as f64 * 0.5,
        )
    }
}

/// A candidate box paired with the stable identity the tracker assigned it.
#[derive(Debug, Clone, Copy)]
pub struct TrackedBox {
    pub id: u32,
    pub bbox: CandidateBox,
}

/// Occupancy verdict for a single spot on a single frame.
#[derive(Debug, Clone)]
pub struct SpotStatus {
    pub id: String,
    pub occupied: bool,
}

/// Per-frame evaluation output. Derived each frame, never stored.
#[derive(Debug, Clone)]
pub struct FrameResult {
    pub spots: Vec<SpotStatus>,
    pub occupied_count: usize,
    pub moving_count: usize,
    pub available_count: usize,
}
