// src/overlay.rs

use crate::regions::ParkingSpot;
use crate::types::FrameResult;
use anyhow::Result;
use opencv::{
    core::{Mat, Point, Scalar, Vector},
    imgproc,
};

const COLOR_AVAILABLE: Scalar = Scalar::new(0.0, 255.0, 0.0, 0.0); // green (BGR)
const COLOR_OCCUPIED: Scalar = Scalar::new(0.0, 0.0, 255.0, 0.0); // red
const COLOR_TEXT: Scalar = Scalar::new(255.0, 255.0, 255.0, 0.0); // white

/// Draw spot outlines, per-spot labels and the aggregate counts onto a BGR
/// frame in place.
pub fn draw(frame: &mut Mat, regions: &[ParkingSpot], result: &FrameResult) -> Result<()> {
    for (spot, status) in regions.iter().zip(&result.spots) {
        let color = if status.occupied {
            COLOR_OCCUPIED
        } else {
            COLOR_AVAILABLE
        };

        let mut polys: Vector<Vector<Point>> = Vector::new();
        polys.push(Vector::from_iter(spot.polygon.iter().copied()));
        imgproc::polylines(frame, &polys, true, color, 2, imgproc::LINE_8, 0)?;

        let label = format!(
            "Spot {} {}",
            status.id,
            if status.occupied { "Occupied" } else { "Available" }
        );
        let anchor = spot
            .polygon
            .first()
            .map(|p| Point::new(p.x, p.y - 10))
            .unwrap_or_default();
        imgproc::put_text(
            frame,
            &label,
            anchor,
            imgproc::FONT_HERSHEY_SIMPLEX,
            0.5,
            color,
            2,
            imgproc::LINE_8,
            false,
        )?;
    }

    let summary = format!(
        "parked: {}  moving: {}  available: {}",
        result.occupied_count, result.moving_count, result.available_count
    );
    imgproc::put_text(
        frame,
        &summary,
        Point::new(50, 50),
        imgproc::FONT_HERSHEY_SIMPLEX,
        0.8,
        COLOR_TEXT,
        2,
        imgproc::LINE_8,
        false,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SpotStatus;
    use opencv::core::{Scalar, CV_8UC3};

    #[test]
    fn test_draw_touches_frame() {
        let mut frame =
            Mat::new_rows_cols_with_default(200, 300, CV_8UC3, Scalar::all(0.0)).unwrap();
        let regions = vec![ParkingSpot {
            id: "1".to_string(),
            polygon: vec![
                Point::new(20, 80),
                Point::new(120, 80),
                Point::new(120, 180),
                Point::new(20, 180),
            ],
        }];
        let result = FrameResult {
            spots: vec![SpotStatus {
                id: "1".to_string(),
                occupied: true,
            }],
            occupied_count: 1,
            moving_count: 0,
            available_count: 0,
        };

        draw(&mut frame, &regions, &result).unwrap();

        let mut channels: Vector<Mat> = Vector::new();
        opencv::core::split(&frame, &mut channels).unwrap();
        // Red outline on a black frame: the red channel is no longer empty
        let red = opencv::core::count_non_zero(&channels.get(2).unwrap()).unwrap();
        assert!(red > 0);
    }
}
