// src/tracker.rs
//
// Nearest-centroid multi-object tracker. Assigns stable integer identities
// to candidate boxes across frames so the occupancy timers key on an object,
// not on raw box coordinates (which break under sub-pixel jitter).
//
// Greedy matching is sufficient here: a parking lot frame carries a handful
// of moving blobs, not a dense crowd.

use crate::types::{CandidateBox, TrackedBox, TrackingConfig};
use tracing::debug;

struct Track {
    id: u32,
    bbox: CandidateBox,
    frames_since_hit: u32,
}

impl Track {
    fn centroid(&self) -> (f64, f64) {
        self.bbox.centroid()
    }
}

pub struct CentroidTracker {
    config: TrackingConfig,
    tracks: Vec<Track>,
    next_id: u32,
}

impl CentroidTracker {
    pub fn new(config: TrackingConfig) -> Self {
        Self {
            config,
            tracks: Vec::with_capacity(16),
            next_id: 1,
        }
    }

    /// Process one frame of detections. Returns one TrackedBox per input
    /// detection, in input order: matched detections keep their track's id,
    /// unmatched ones open fresh tracks.
    pub fn update(&mut self, detections: &[CandidateBox]) -> Vec<TrackedBox> {
        let max_dist_sq =
            (self.config.max_match_distance as f64) * (self.config.max_match_distance as f64);

        // ── Greedy nearest-centroid matching ──
        let mut pairs: Vec<(usize, usize, f64)> = Vec::new();
        for (ti, track) in self.tracks.iter().enumerate() {
            let (tx, ty) = track.centroid();
            for (di, det) in detections.iter().enumerate() {
                let (dx, dy) = det.centroid();
                let dist_sq = (tx - dx).powi(2) + (ty - dy).powi(2);
                if dist_sq <= max_dist_sq {
                    pairs.push((ti, di, dist_sq));
                }
            }
        }
        pairs.sort_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal));

        let mut track_matched = vec![false; self.tracks.len()];
        let mut det_track_id: Vec<Option<u32>> = vec![None; detections.len()];

        for (ti, di, _dist_sq) in &pairs {
            if track_matched[*ti] || det_track_id[*di].is_some() {
                continue;
            }
            track_matched[*ti] = true;
            det_track_id[*di] = Some(self.tracks[*ti].id);
            self.tracks[*ti].bbox = detections[*di];
            self.tracks[*ti].frames_since_hit = 0;
        }

        // ── Unmatched tracks coast ──
        for (ti, matched) in track_matched.iter().enumerate() {
            if !matched {
                self.tracks[ti].frames_since_hit += 1;
            }
        }

        // ── Unmatched detections open new tracks ──
        for (di, det) in detections.iter().enumerate() {
            if det_track_id[di].is_none() {
                let id = self.next_id;
                self.next_id += 1;
                debug!(
                    "New track {} at ({:.0}, {:.0})",
                    id,
                    det.centroid().0,
                    det.centroid().1
                );
                self.tracks.push(Track {
                    id,
                    bbox: *det,
                    frames_since_hit: 0,
                });
                det_track_id[di] = Some(id);
            }
        }

        // ── Prune tracks that coasted too long ──
        let max_coast = self.config.max_coast_frames;
        self.tracks.retain(|t| t.frames_since_hit <= max_coast);

        detections
            .iter()
            .zip(det_track_id)
            .map(|(det, id)| TrackedBox {
                // Every detection was either matched or opened a track above
                id: id.unwrap_or(0),
                bbox: *det,
            })
            .collect()
    }

    pub fn live_track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn reset(&mut self) {
        self.tracks.clear();
        self.next_id = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> CentroidTracker {
        CentroidTracker::new(TrackingConfig {
            max_match_distance: 60.0,
            max_coast_frames: 30,
        })
    }

    fn boxed(x1: i32, y1: i32, x2: i32, y2: i32) -> CandidateBox {
        CandidateBox::new(x1, y1, x2, y2)
    }

    #[test]
    fn test_identical_box_keeps_identity() {
        let mut t = tracker();
        let det = boxed(100, 100, 160, 140);

        let first = t.update(&[det]);
        let second = t.update(&[det]);
        assert_eq!(first[0].id, second[0].id);
    }

    #[test]
    fn test_jittered_box_keeps_identity() {
        let mut t = tracker();
        let a = t.update(&[boxed(100, 100, 160, 140)]);
        let b = t.update(&[boxed(103, 98, 164, 141)]);
        assert_eq!(a[0].id, b[0].id);
    }

    #[test]
    fn test_distant_box_gets_new_identity() {
        let mut t = tracker();
        let a = t.update(&[boxed(0, 0, 40, 40)]);
        let b = t.update(&[boxed(500, 500, 540, 540)]);
        assert_ne!(a[0].id, b[0].id);
        assert_eq!(t.live_track_count(), 2);
    }

    #[test]
    fn test_track_survives_single_frame_gap() {
        let mut t = tracker();
        let det = boxed(100, 100, 160, 140);

        let before = t.update(&[det]);
        t.update(&[]); // one frame with nothing detected
        let after = t.update(&[det]);
        assert_eq!(before[0].id, after[0].id);
    }

    #[test]
    fn test_track_pruned_after_max_coast() {
        let mut t = CentroidTracker::new(TrackingConfig {
            max_match_distance: 60.0,
            max_coast_frames: 3,
        });
        let det = boxed(100, 100, 160, 140);

        let before = t.update(&[det]);
        for _ in 0..5 {
            t.update(&[]);
        }
        assert_eq!(t.live_track_count(), 0);

        let after = t.update(&[det]);
        assert_ne!(before[0].id, after[0].id);
    }

    #[test]
    fn test_two_objects_matched_independently() {
        let mut t = tracker();
        let a = boxed(0, 0, 40, 40);
        let b = boxed(300, 300, 340, 340);

        let first = t.update(&[a, b]);
        // Next frame arrives in swapped order; identities must follow position
        let second = t.update(&[b, a]);
        assert_eq!(first[0].id, second[1].id);
        assert_eq!(first[1].id, second[0].id);
    }

    #[test]
    fn test_output_aligned_with_input_order() {
        let mut t = tracker();
        let dets = [boxed(0, 0, 40, 40), boxed(300, 300, 340, 340)];
        let tracked = t.update(&dets);
        assert_eq!(tracked.len(), 2);
        assert_eq!(tracked[0].bbox, dets[0]);
        assert_eq!(tracked[1].bbox, dets[1]);
    }
}
