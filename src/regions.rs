// src/regions.rs
//
// Parking spot region definitions. Regions are authored against a reference
// resolution (typically 1600x900) and scaled to the active video resolution
// once at load time; spots are immutable afterwards.

use anyhow::{bail, Context, Result};
use opencv::core::Point;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ParkingSpot {
    pub id: String,
    pub polygon: Vec<Point>,
}

#[derive(Debug, Deserialize)]
struct RawRegion {
    id: RawId,
    region: Vec<[i32; 2]>,
}

// Region files in the wild carry both numeric and string ids
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Str(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Int(n) => n.to_string(),
            RawId::Str(s) => s,
        }
    }
}

/// Load spot polygons from a JSON region file and scale them from the
/// reference resolution to the target frame resolution.
pub fn load_parking_regions(
    path: &Path,
    target_width: i32,
    target_height: i32,
    reference_width: i32,
    reference_height: i32,
) -> Result<Vec<ParkingSpot>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading region file {}", path.display()))?;

    let spots = parse_and_scale(
        &contents,
        target_width,
        target_height,
        reference_width,
        reference_height,
    )
    .with_context(|| format!("loading region file {}", path.display()))?;

    info!(
        "Loaded {} parking spot(s), scaled {}x{} -> {}x{}",
        spots.len(),
        reference_width,
        reference_height,
        target_width,
        target_height
    );

    Ok(spots)
}

pub fn parse_and_scale(
    json: &str,
    target_width: i32,
    target_height: i32,
    reference_width: i32,
    reference_height: i32,
) -> Result<Vec<ParkingSpot>> {
    if target_width <= 0 || target_height <= 0 || reference_width <= 0 || reference_height <= 0 {
        bail!(
            "invalid dimensions: target {}x{}, reference {}x{}",
            target_width,
            target_height,
            reference_width,
            reference_height
        );
    }

    let raw: Vec<RawRegion> = serde_json::from_str(json).context("malformed region JSON")?;

    let scale_x = target_width as f64 / reference_width as f64;
    let scale_y = target_height as f64 / reference_height as f64;

    let mut spots = Vec::with_capacity(raw.len());
    for region in raw {
        let id = region.id.into_string();

        if region.region.len() < 3 {
            bail!(
                "spot {} has {} point(s), a polygon needs at least 3",
                id,
                region.region.len()
            );
        }

        let polygon = region
            .region
            .iter()
            .map(|[x, y]| {
                Point::new(
                    (*x as f64 * scale_x) as i32,
                    (*y as f64 * scale_y) as i32,
                )
            })
            .collect();

        spots.push(ParkingSpot { id, polygon });
    }

    Ok(spots)
}
