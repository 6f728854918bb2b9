//! Display-less run mode.
//!
//! Starts the simulators and runs the coordinator's frame loop at the render
//! rate for a fixed duration, with no window and no drawing. The result is a
//! [`HeadlessReport`] the binary prints as JSON. Useful for measuring
//! throughput and drop rates on machines without a display.

use log::info;
use raylib::prelude::Vector2;
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::coordinator::RenderCoordinator;
use crate::events::input::ExitReason;
use crate::resources::config::SaverConfig;
use crate::resources::palette::Palette;
use crate::simulation::simulator::SimulatorReport;

/// Seconds a headless run lasts when the config asks for no limit.
pub const DEFAULT_HEADLESS_SECS: u32 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct HeadlessReport {
    pub seed: u64,
    pub duration_secs: f64,
    pub frames: u64,
    pub snapshots_drained: u64,
    pub shapes_displayed: usize,
    pub workers: Vec<SimulatorReport>,
    pub detached: usize,
    pub panicked: usize,
}

/// Run for `duration` over the configured window area and report.
pub fn run_headless(
    config: SaverConfig,
    seed: u64,
    duration: Duration,
) -> Result<HeadlessReport, String> {
    config.validate()?;
    let screen = config.window_size()?;
    let frame_period = Duration::from_secs_f64(1.0 / f64::from(config.render_fps.max(1)));

    let mut coordinator = RenderCoordinator::new(config, Palette::classic(), screen, Vector2::zero());
    coordinator.start(seed)?;

    info!("headless run for {:.1} s", duration.as_secs_f32());
    let started = Instant::now();
    let mut next_frame = started;
    while started.elapsed() < duration {
        coordinator.frame();
        next_frame += frame_period;
        let now = Instant::now();
        if next_frame > now {
            std::thread::sleep(next_frame - now);
        } else {
            next_frame = now;
        }
    }
    coordinator.request_exit(ExitReason::Timer);
    let elapsed = started.elapsed();

    let stats = coordinator.frame_stats();
    let shapes_displayed = coordinator.display_state().len();
    let summary = coordinator.finish();

    Ok(HeadlessReport {
        seed,
        duration_secs: elapsed.as_secs_f64(),
        frames: stats.frames,
        snapshots_drained: stats.drained_total,
        shapes_displayed,
        workers: summary.reports,
        detached: summary.detached.len(),
        panicked: summary.panicked.len(),
    })
}
