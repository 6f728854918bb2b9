//! Mystify main entry point.
//!
//! A classic idle-display effect: a handful of closed polylines whose
//! vertices bounce around the screen, leaving fading trails and slowly
//! changing color. Built on:
//! - **raylib** for the window, drawing and input
//! - **bevy_ecs** for the coordinator's resources, systems and observers
//! - one OS thread per shape feeding a bounded, lossy snapshot channel
//!
//! # Main Loop
//!
//! 1. Parse the command line and validate the configuration
//! 2. Open the window and create the trail canvas (exit 1 on failure,
//!    before any simulator exists)
//! 3. Start one simulator thread per shape
//! 4. Each frame: poll input, run the coordinator frame (exit check, snapshot
//!    drain), draw; an exit request ends the loop after that frame is drawn
//! 5. On exit: signal the simulators, collect them with a bounded wait,
//!    log the summary
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --windowed --debug
//! cargo run --release -- --headless --secs 3 --seed 42
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use clap::Parser;
use log::{error, info};
use mystify::coordinator::RenderCoordinator;
use mystify::events::input::ExitReason;
use mystify::headless::{DEFAULT_HEADLESS_SECS, run_headless};
use mystify::resources::config::SaverConfig;
use mystify::resources::palette::Palette;
use mystify::resources::screensize::ScreenSize;
use mystify::resources::trailcanvas::TrailCanvas;
use mystify::systems::input::poll_input_events;
use mystify::systems::render::render_frame;
use raylib::prelude::*;
use std::time::{Duration, Instant};

/// Mystify: bouncing, color-cycling polylines.
#[derive(Parser)]
#[command(version, about = "Bouncing polyline idle display. Any input exits.")]
struct Cli {
    /// Number of shapes (1..=50000).
    #[arg(long, value_name = "N")]
    shapes: Option<usize>,

    /// Points per shape (3..=128).
    #[arg(long, value_name = "M")]
    points: Option<usize>,

    /// Window width in windowed or headless mode (320..=16384).
    #[arg(long)]
    width: Option<u32>,

    /// Window height in windowed or headless mode (240..=16384).
    #[arg(long)]
    height: Option<u32>,

    /// Run in a window instead of fullscreen.
    #[arg(long)]
    windowed: bool,

    /// Also exit after this many seconds (0 = wait for input).
    #[arg(long, value_name = "T")]
    secs: Option<u32>,

    /// Master seed for a reproducible start.
    #[arg(long, value_name = "S")]
    seed: Option<u64>,

    /// Simulation tick cap per shape.
    #[arg(long)]
    sim_fps: Option<f32>,

    /// Render frame cap.
    #[arg(long)]
    render_fps: Option<u32>,

    /// Run without a window and print a JSON report.
    #[arg(long)]
    headless: bool,

    /// Show the diagnostics overlay.
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn into_config(self) -> SaverConfig {
        let mut config = SaverConfig::new();
        if let Some(shapes) = self.shapes {
            config.shape_count = shapes;
        }
        if let Some(points) = self.points {
            config.point_count = points;
        }
        if let Some(width) = self.width {
            config.window_width = width;
        }
        if let Some(height) = self.height {
            config.window_height = height;
        }
        if let Some(secs) = self.secs {
            config.run_secs = secs;
        }
        if let Some(sim_fps) = self.sim_fps {
            config.sim_fps = sim_fps;
        }
        if let Some(render_fps) = self.render_fps {
            config.render_fps = render_fps;
        }
        config.fullscreen = !self.windowed;
        config.seed = self.seed;
        config.debug = self.debug;
        config
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let headless = cli.headless;
    let config = cli.into_config();

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(2);
    }

    let seed = config.master_seed();

    // Early-exit: headless run, no window at all
    if headless {
        let secs = if config.run_secs > 0 {
            config.run_secs
        } else {
            DEFAULT_HEADLESS_SECS
        };
        match run_headless(config, seed, Duration::from_secs(u64::from(secs))) {
            Ok(report) => match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    error!("Failed to serialize report: {}", e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // --------------- Raylib window & trail canvas ---------------
    let (mut rl, thread) = match open_window(&config) {
        Ok(window) => window,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    rl.set_exit_key(None);
    rl.hide_cursor();
    rl.set_target_fps(config.render_fps);

    let screen = ScreenSize {
        w: rl.get_screen_width(),
        h: rl.get_screen_height(),
    };
    let mut canvas = match TrailCanvas::new(
        &mut rl,
        &thread,
        screen.w as u32,
        screen.h as u32,
        config.background,
    ) {
        Ok(canvas) => canvas,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    // One blank frame so the pointer position is current before it
    // becomes the exit origin.
    {
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(config.background);
    }
    let mut last_mouse = rl.get_mouse_position();

    // --------------- Coordinator + simulators ---------------
    let run_duration = config.run_duration();
    let mut coordinator = RenderCoordinator::new(config, Palette::classic(), screen, last_mouse);
    if let Err(e) = coordinator.start(seed) {
        error!("{}", e);
        std::process::exit(1);
    }
    info!("running {}x{}", screen.w, screen.h);

    // --------------- Main loop ---------------
    let started = Instant::now();
    while !coordinator.exit_requested() {
        let events = poll_input_events(&mut rl, &mut last_mouse);
        coordinator.push_input(events);
        if run_duration.is_some_and(|limit| started.elapsed() >= limit) {
            coordinator.request_exit(ExitReason::Timer);
        }

        // The frame that requests the exit is still drawn; the loop ends after it.
        coordinator.frame();
        render_frame(&mut rl, &thread, &mut canvas, coordinator.world());
    }

    let stats = coordinator.frame_stats();
    let reason = coordinator.exit_reason();
    let summary = coordinator.finish();
    info!(
        "exit after {} frames ({:?}): {} snapshots drained, {} workers joined, {} detached",
        stats.frames,
        reason,
        stats.drained_total,
        summary.reports.len(),
        summary.detached.len()
    );
}

/// Open the window, fullscreen at monitor resolution unless windowed.
///
/// raylib reports a failed window as a panic; it is turned into an error
/// here so the process exits cleanly before any simulator starts.
fn open_window(config: &SaverConfig) -> Result<(RaylibHandle, RaylibThread), String> {
    let fullscreen = config.fullscreen;
    let (width, height) = if fullscreen {
        (0, 0)
    } else {
        let size = config.window_size()?;
        (size.w, size.h)
    };

    std::panic::catch_unwind(move || {
        let mut builder = raylib::init();
        builder.size(width, height).title("Mystify").msaa_4x();
        if fullscreen {
            builder.fullscreen();
        }
        builder.build()
    })
    .map_err(|_| "Failed to open the display".to_string())
}
