// src/blob_detection.rs

use crate::types::CandidateBox;
use anyhow::Result;
use opencv::{
    core::{Mat, Point, Vector},
    imgproc,
    prelude::*,
};
use tracing::debug;

/// Convert a foreground mask into candidate bounding boxes. External
/// contours only: a car is one solid blob, its internal edges are noise.
/// Output follows contour discovery order, which keeps runs reproducible.
pub fn detect(mask: &Mat, min_area: f64) -> Result<Vec<CandidateBox>> {
    let mut contours: Vector<Vector<Point>> = Vector::new();
    imgproc::find_contours(
        mask,
        &mut contours,
        imgproc::RETR_EXTERNAL,
        imgproc::CHAIN_APPROX_SIMPLE,
        Point::new(0, 0),
    )?;

    let mut boxes = Vec::new();
    for contour in contours.iter() {
        let area = imgproc::contour_area(&contour, false)?;
        if area <= min_area {
            continue;
        }

        let rect = imgproc::bounding_rect(&contour)?;
        boxes.push(CandidateBox::new(
            rect.x,
            rect.y,
            rect.x + rect.width,
            rect.y + rect.height,
        ));
    }

    debug!(
        "{} contour(s), {} above {} px²",
        contours.len(),
        boxes.len(),
        min_area
    );

    Ok(boxes)
}
