//! Screensaver configuration resource.
//!
//! All tunables are compiled in. The binary may override a handful of them
//! from the command line before the run starts; nothing is read from or
//! written to disk.

use bevy_ecs::prelude::*;
use raylib::prelude::Color;
use std::time::Duration;

use crate::resources::screensize::ScreenSize;
use crate::simulation::shape::{Bounds, ShapeId, SpawnParams};
use crate::simulation::simulator::{SimulatorParams, shape_seed};

const DEFAULT_SHAPE_COUNT: usize = 6;
const DEFAULT_POINT_COUNT: usize = 6;
const DEFAULT_SIM_FPS: f32 = 45.0;
const DEFAULT_RENDER_FPS: u32 = 60;
const DEFAULT_LINE_THICKNESS: f32 = 2.0;
const DEFAULT_CHANNEL_CAPACITY: usize = 64;
const DEFAULT_SPAWN_MARGIN: f32 = 80.0;
const DEFAULT_MIN_SPEED: f32 = 80.0;
const DEFAULT_MAX_SPEED: f32 = 200.0;
const DEFAULT_COLOR_PERIOD: f32 = 3.5;
const DEFAULT_MAX_START_JITTER: f32 = 0.5;
const DEFAULT_MOUSE_THRESHOLD: f32 = 5.0;
const DEFAULT_SHUTDOWN_TIMEOUT: f32 = 0.5;
const DEFAULT_FADE_ALPHA: u8 = 18;
const DEFAULT_WINDOW_WIDTH: u32 = 800;
const DEFAULT_WINDOW_HEIGHT: u32 = 600;
const DEFAULT_CAPTION: &str = "Mystify";

pub const MAX_SHAPES: usize = 50_000;
pub const MIN_POINTS: usize = 3;
pub const MAX_POINTS: usize = 128;
pub const MIN_WINDOW_WIDTH: u32 = 320;
pub const MIN_WINDOW_HEIGHT: u32 = 240;
pub const MAX_WINDOW_WIDTH: u32 = 16_384;
pub const MAX_WINDOW_HEIGHT: u32 = 16_384;

/// Run configuration shared by the coordinator, the simulators and the
/// renderer.
#[derive(Resource, Debug, Clone)]
pub struct SaverConfig {
    /// Number of independently simulated shapes.
    pub shape_count: usize,
    /// Vertices per shape.
    pub point_count: usize,
    /// Simulation tick cap per shape.
    pub sim_fps: f32,
    /// Render frame cap.
    pub render_fps: u32,
    pub line_thickness: f32,
    /// Snapshot channel capacity.
    pub channel_capacity: usize,
    /// Inward margin for initial point positions.
    pub spawn_margin: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Simulated seconds between recolors.
    pub color_period: f32,
    /// Upper bound of each simulator's start delay, in seconds.
    pub max_start_jitter: f32,
    /// Mouse travel (per axis, in pixels) that ends the run.
    pub mouse_threshold: f32,
    /// How long shutdown waits for each simulator, in seconds.
    pub shutdown_timeout: f32,
    /// Alpha of the background wash drawn over the previous frame.
    pub fade_alpha: u8,
    pub background: Color,
    pub caption: Option<String>,
    /// Window size when not fullscreen; also the headless area.
    pub window_width: u32,
    pub window_height: u32,
    pub fullscreen: bool,
    /// Seconds until the run ends on its own; 0 waits for input.
    pub run_secs: u32,
    /// Master seed override. `None` draws a fresh seed per run.
    pub seed: Option<u64>,
    /// Show the diagnostics overlay.
    pub debug: bool,
}

impl Default for SaverConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SaverConfig {
    /// Create a configuration with the compiled-in defaults.
    pub fn new() -> Self {
        Self {
            shape_count: DEFAULT_SHAPE_COUNT,
            point_count: DEFAULT_POINT_COUNT,
            sim_fps: DEFAULT_SIM_FPS,
            render_fps: DEFAULT_RENDER_FPS,
            line_thickness: DEFAULT_LINE_THICKNESS,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            spawn_margin: DEFAULT_SPAWN_MARGIN,
            min_speed: DEFAULT_MIN_SPEED,
            max_speed: DEFAULT_MAX_SPEED,
            color_period: DEFAULT_COLOR_PERIOD,
            max_start_jitter: DEFAULT_MAX_START_JITTER,
            mouse_threshold: DEFAULT_MOUSE_THRESHOLD,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            fade_alpha: DEFAULT_FADE_ALPHA,
            background: Color::new(3, 3, 6, 255),
            caption: Some(DEFAULT_CAPTION.to_string()),
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            fullscreen: true,
            run_secs: 0,
            seed: None,
            debug: false,
        }
    }

    /// Check that every value is in its supported range.
    ///
    /// Returns a message naming the first offending value.
    pub fn validate(&self) -> Result<(), String> {
        if self.shape_count < 1 || self.shape_count > MAX_SHAPES {
            return Err(format!(
                "shape count {} out of range (1..={})",
                self.shape_count, MAX_SHAPES
            ));
        }
        if self.point_count < MIN_POINTS || self.point_count > MAX_POINTS {
            return Err(format!(
                "point count {} out of range ({}..={})",
                self.point_count, MIN_POINTS, MAX_POINTS
            ));
        }
        if self.window_width < MIN_WINDOW_WIDTH || self.window_height < MIN_WINDOW_HEIGHT {
            return Err(format!(
                "window {}x{} too small (min {}x{})",
                self.window_width, self.window_height, MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT
            ));
        }
        if self.window_width > MAX_WINDOW_WIDTH || self.window_height > MAX_WINDOW_HEIGHT {
            return Err(format!(
                "window {}x{} too large (max {}x{})",
                self.window_width, self.window_height, MAX_WINDOW_WIDTH, MAX_WINDOW_HEIGHT
            ));
        }
        if !(self.sim_fps > 0.0) {
            return Err(format!("simulation rate {} must be positive", self.sim_fps));
        }
        if self.render_fps == 0 {
            return Err("render rate must be positive".to_string());
        }
        if self.channel_capacity == 0 {
            return Err("channel capacity must be positive".to_string());
        }
        if self.min_speed > self.max_speed {
            return Err(format!(
                "speed range {}..{} is inverted",
                self.min_speed, self.max_speed
            ));
        }
        Ok(())
    }

    /// Randomization parameters for a new shape.
    pub fn spawn_params(&self, palette_len: usize) -> SpawnParams {
        SpawnParams {
            point_count: self.point_count,
            margin: self.spawn_margin,
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            palette_len,
        }
    }

    /// Start parameters of the simulator for `shape_id`.
    pub fn simulator_params(
        &self,
        shape_id: ShapeId,
        bounds: Bounds,
        master_seed: u64,
        palette_len: usize,
    ) -> SimulatorParams {
        SimulatorParams {
            shape_id,
            bounds,
            spawn: self.spawn_params(palette_len),
            seed: shape_seed(master_seed, shape_id),
            tick_rate: self.sim_fps,
            color_period: self.color_period,
            max_start_jitter: Duration::from_secs_f32(self.max_start_jitter.max(0.0)),
        }
    }

    /// The configured window area in pixels.
    pub fn window_size(&self) -> Result<ScreenSize, String> {
        let w = i32::try_from(self.window_width)
            .map_err(|_| format!("window width {} out of range", self.window_width))?;
        let h = i32::try_from(self.window_height)
            .map_err(|_| format!("window height {} out of range", self.window_height))?;
        Ok(ScreenSize { w, h })
    }

    /// Per-worker wait during shutdown.
    pub fn per_worker_timeout(&self) -> Duration {
        Duration::from_secs_f32(self.shutdown_timeout.max(0.0))
    }

    /// Length of a timed run, if any.
    pub fn run_duration(&self) -> Option<Duration> {
        (self.run_secs > 0).then(|| Duration::from_secs(u64::from(self.run_secs)))
    }

    /// The master seed to use: the override, or a fresh random one.
    pub fn master_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| fastrand::u64(..))
    }
}
