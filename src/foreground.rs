// src/foreground.rs
//
// Adaptive background model producing a per-frame binary motion mask.
// MOG2 keeps a running statistical estimate of the background, so gradual
// lighting change in a daytime lot does not need a clean reference frame.

use crate::types::SubtractorConfig;
use anyhow::Result;
use opencv::{
    core::{self, Mat, Point, Ptr},
    imgproc,
    prelude::*,
    video::{self, BackgroundSubtractorMOG2},
};

pub struct ForegroundExtractor {
    mog2: Ptr<BackgroundSubtractorMOG2>,
    median_kernel: i32,
    morph_iterations: i32,
}

impl ForegroundExtractor {
    pub fn new(config: &SubtractorConfig) -> Result<Self> {
        let mog2 = video::create_background_subtractor_mog2(
            config.history,
            config.var_threshold,
            config.detect_shadows,
        )?;

        Ok(Self {
            mog2,
            median_kernel: config.median_kernel,
            morph_iterations: config.morph_iterations,
        })
    }

    /// Feed one frame into the background model and return the cleaned
    /// foreground mask. Stateful: call order is the frame order.
    pub fn apply(&mut self, frame: &Mat) -> Result<Mat> {
        let mut raw_mask = Mat::default();
        BackgroundSubtractorMOG2Trait::apply(&mut self.mog2, frame, &mut raw_mask, -1.0)?;

        // Salt-and-pepper noise out first, then close gaps in the blobs
        let mut blurred = Mat::default();
        imgproc::median_blur(&raw_mask, &mut blurred, self.median_kernel)?;

        let anchor = Point::new(-1, -1);
        let border_value = imgproc::morphology_default_border_value()?;

        let mut dilated = Mat::default();
        imgproc::dilate(
            &blurred,
            &mut dilated,
            &Mat::default(),
            anchor,
            self.morph_iterations,
            core::BORDER_CONSTANT,
            border_value,
        )?;

        let mut mask = Mat::default();
        imgproc::erode(
            &dilated,
            &mut mask,
            &Mat::default(),
            anchor,
            self.morph_iterations,
            core::BORDER_CONSTANT,
            border_value,
        )?;

        Ok(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::{Scalar, CV_8UC3};

    fn test_config() -> SubtractorConfig {
        SubtractorConfig {
            history: 500,
            var_threshold: 50.0,
            detect_shadows: true,
            median_kernel: 5,
            morph_iterations: 2,
        }
    }

    #[test]
    fn test_mask_matches_frame_geometry() {
        let mut extractor = ForegroundExtractor::new(&test_config()).unwrap();
        let frame =
            Mat::new_rows_cols_with_default(120, 160, CV_8UC3, Scalar::all(90.0)).unwrap();

        let mask = extractor.apply(&frame).unwrap();
        assert_eq!(mask.rows(), 120);
        assert_eq!(mask.cols(), 160);
        assert_eq!(mask.channels(), 1);
    }

    #[test]
    fn test_static_scene_settles_to_empty_mask() {
        let mut extractor = ForegroundExtractor::new(&test_config()).unwrap();
        let frame =
            Mat::new_rows_cols_with_default(120, 160, CV_8UC3, Scalar::all(90.0)).unwrap();

        // An unchanging scene must end up mostly background
        let mut mask = Mat::default();
        for _ in 0..20 {
            mask = extractor.apply(&frame).unwrap();
        }
        let foreground = opencv::core::count_non_zero(&mask).unwrap();
        assert!(foreground < 120 * 160 / 100);
    }
}
