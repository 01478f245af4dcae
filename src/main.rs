// src/main.rs

mod blob_detection;
mod config;
mod foreground;
mod geometry;
mod occupancy;
mod overlay;
mod regions;
mod session;
mod tracker;
mod types;
mod video_processor;

use anyhow::Result;
use opencv::prelude::*;
use session::AnalysisSession;
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use types::{Config, FrameResult};
use video_processor::VideoProcessor;

fn main() -> Result<()> {
    let config = Config::load("config.yaml")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("parking_occupancy={}", config.logging.level))
        }))
        .init();

    info!("Parking occupancy analyzer starting");
    info!(
        "Grace window: {:.1}s, min blob area: {} px², reference resolution: {}x{}",
        config.occupancy.grace_secs,
        config.detection.min_blob_area,
        config.regions.reference_width,
        config.regions.reference_height
    );

    let processor = VideoProcessor::new(config.clone());
    let videos = processor.find_video_files()?;

    if videos.is_empty() {
        error!("No video files found in {}", config.video.input_dir);
        return Ok(());
    }

    for (idx, video_path) in videos.iter().enumerate() {
        info!("========================================");
        info!(
            "Processing video {}/{}: {}",
            idx + 1,
            videos.len(),
            video_path.display()
        );

        match process_video(video_path, &processor, &config) {
            Ok(stats) => {
                info!("Video processed: {} frames", stats.total_frames);
                if let Some(last) = &stats.last_result {
                    info!(
                        "Final state: {} occupied, {} moving, {} available",
                        last.occupied_count, last.moving_count, last.available_count
                    );
                }
            }
            Err(e) => {
                error!("Failed to process {}: {:#}", video_path.display(), e);
            }
        }
    }

    Ok(())
}

struct VideoStats {
    total_frames: u64,
    last_result: Option<FrameResult>,
}

fn process_video(
    video_path: &Path,
    processor: &VideoProcessor,
    config: &Config,
) -> Result<VideoStats> {
    let mut reader = processor.open_video(video_path)?;

    // Fatal before processing starts: a bad region file aborts the stream
    let regions = regions::load_parking_regions(
        Path::new(&config.regions.file),
        reader.width,
        reader.height,
        config.regions.reference_width,
        config.regions.reference_height,
    )?;

    let mut session = AnalysisSession::new(config, regions)?;
    let mut writer = processor.create_writer(video_path, reader.width, reader.height, reader.fps)?;

    let mut stats = VideoStats {
        total_frames: 0,
        last_result: None,
    };

    while let Some(frame) = reader.read_frame()? {
        let mut mat = frame.mat;
        let result = session.process_frame(&mat, frame.timestamp)?;

        if let Some(w) = writer.as_mut() {
            overlay::draw(&mut mat, session.regions(), &result)?;
            w.write(&mat)?;
        }

        if frame.frame_id % 100 == 0 {
            debug!(
                "Frame {} ({:.1}%): {} occupied, {} moving, {} available",
                frame.frame_id,
                reader.progress(),
                result.occupied_count,
                result.moving_count,
                result.available_count
            );
        }

        stats.total_frames += 1;
        stats.last_result = Some(result);
    }

    if let Some(mut w) = writer {
        w.release()?;
    }

    Ok(stats)
}
