// src/session.rs
//
// One AnalysisSession per video stream. The background model, the tracker
// and the occupancy timers all carry frame-history dependent state, so
// parallel analyses of independent segments each need their own session;
// nothing in here is shared.

use crate::blob_detection;
use crate::foreground::ForegroundExtractor;
use crate::occupancy::OccupancyEvaluator;
use crate::regions::ParkingSpot;
use crate::tracker::CentroidTracker;
use crate::types::{Config, FrameResult};
use anyhow::Result;
use opencv::core::Mat;

pub struct AnalysisSession {
    extractor: ForegroundExtractor,
    tracker: CentroidTracker,
    evaluator: OccupancyEvaluator,
    regions: Vec<ParkingSpot>,
    min_blob_area: f64,
}

impl AnalysisSession {
    pub fn new(config: &Config, regions: Vec<ParkingSpot>) -> Result<Self> {
        Ok(Self {
            extractor: ForegroundExtractor::new(&config.subtractor)?,
            tracker: CentroidTracker::new(config.tracking.clone()),
            evaluator: OccupancyEvaluator::new(config.occupancy.clone()),
            regions,
            min_blob_area: config.detection.min_blob_area,
        })
    }

    /// Run the full per-frame pipeline: foreground mask, blob boxes,
    /// identity assignment, occupancy evaluation. `timestamp` is in seconds
    /// and must increase monotonically across calls.
    pub fn process_frame(&mut self, frame: &Mat, timestamp: f64) -> Result<FrameResult> {
        let mask = self.extractor.apply(frame)?;
        let boxes = blob_detection::detect(&mask, self.min_blob_area)?;
        let tracked = self.tracker.update(&boxes);
        Ok(self.evaluator.evaluate(&self.regions, &tracked, timestamp))
    }

    pub fn regions(&self) -> &[ParkingSpot] {
        &self.regions
    }
}
