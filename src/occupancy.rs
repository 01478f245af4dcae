// src/occupancy.rs
//
// Per-spot occupancy decisions from tracked candidate boxes.
//
// A spot is matched by the first candidate whose box centroid falls inside
// (or on the boundary of) the spot polygon. A matched candidate starts a
// timer keyed by its track identity; only once it has been around longer
// than the grace window does the spot count as occupied. The grace window
// absorbs vehicles that are merely driving through a spot.
//
// The timer map is global, not per-spot: one physical vehicle whose centroid
// lands in two overlapping polygons shares a single timer entry. Accepted
// limitation.

use crate::geometry::point_in_polygon;
use crate::regions::ParkingSpot;
use crate::types::{FrameResult, OccupancyConfig, SpotStatus, TrackedBox};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

struct TimerEntry {
    first_seen: f64,
    last_seen: f64,
}

pub struct OccupancyEvaluator {
    config: OccupancyConfig,
    timers: HashMap<u32, TimerEntry>,
}

impl OccupancyEvaluator {
    pub fn new(config: OccupancyConfig) -> Self {
        Self {
            config,
            timers: HashMap::new(),
        }
    }

    /// Evaluate one frame. `now` must be monotonically increasing across
    /// calls (frame-index derived or wall clock). Never fails: degenerate
    /// polygons simply match nothing.
    pub fn evaluate(
        &mut self,
        regions: &[ParkingSpot],
        candidates: &[TrackedBox],
        now: f64,
    ) -> FrameResult {
        self.prune_stale(now);

        let mut spots = Vec::with_capacity(regions.len());
        let mut occupied_count = 0;

        for spot in regions {
            // First match wins; no best/closest search
            let matched = candidates
                .iter()
                .find(|c| point_in_polygon(c.bbox.centroid(), &spot.polygon));

            let occupied = match matched {
                Some(candidate) => match self.timers.entry(candidate.id) {
                    Entry::Occupied(mut entry) => {
                        let timer = entry.get_mut();
                        timer.last_seen = now;
                        now - timer.first_seen > self.config.grace_secs
                    }
                    Entry::Vacant(entry) => {
                        // Grace period: just appeared, might still be moving
                        entry.insert(TimerEntry {
                            first_seen: now,
                            last_seen: now,
                        });
                        false
                    }
                },
                None => false,
            };

            if occupied {
                occupied_count += 1;
            }
            spots.push(SpotStatus {
                id: spot.id.clone(),
                occupied,
            });
        }

        let moving_count = self
            .timers
            .values()
            .filter(|t| now - t.first_seen < self.config.grace_secs)
            .count();

        debug!(
            "t={:.2}s: {} occupied, {} moving, {} timer(s) live",
            now,
            occupied_count,
            moving_count,
            self.timers.len()
        );

        FrameResult {
            available_count: regions.len() - occupied_count,
            occupied_count,
            moving_count,
            spots,
        }
    }

    // Unbounded growth guard: identities unseen past the stale horizon are
    // dropped. A returning identity within the horizon resumes immediately
    // without re-arming the grace window.
    fn prune_stale(&mut self, now: f64) {
        let stale = self.config.stale_secs;
        self.timers.retain(|_, t| now - t.last_seen <= stale);
    }

    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }
}
