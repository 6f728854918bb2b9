//! Per-shape simulation loop.
//!
//! Each [`ShapeSimulator`] runs on its own thread (see
//! [`crate::simulation::workers`]) and owns its shape outright. Every tick:
//!
//! 1. Measure `dt` on the monotonic clock; if it is shorter than the tick
//!    period, sleep the remainder and measure again. This caps the rate, it
//!    does not guarantee it.
//! 2. Advance and bounce every point by `velocity * dt`.
//! 3. Feed `dt` into the color cycle.
//! 4. Offer a [`Snapshot`] to the state channel; a rejected send is dropped.
//! 5. Stop if the [`ShutdownSignal`] is set.
//!
//! Before the first tick the simulator waits a random start jitter so the
//! shapes do not move in lockstep. Both waits go through
//! [`ShutdownSignal::wait_timeout`], so shutdown interrupts them.

use fastrand::Rng;
use log::{debug, info};
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::simulation::channel::StateSender;
use crate::simulation::shape::{Bounds, ColorCycle, ShapeId, ShapeState, Snapshot, SpawnParams};
use crate::simulation::shutdown::ShutdownSignal;

/// Everything a simulator needs to start.
#[derive(Debug, Clone, Copy)]
pub struct SimulatorParams {
    pub shape_id: ShapeId,
    pub bounds: Bounds,
    pub spawn: SpawnParams,
    /// Seed of this simulator's private random source.
    pub seed: u64,
    /// Maximum ticks per second.
    pub tick_rate: f32,
    /// Seconds of simulated time between recolors.
    pub color_period: f32,
    /// Upper bound of the random delay before the first tick.
    pub max_start_jitter: Duration,
}

impl SimulatorParams {
    /// Target duration of one tick.
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.tick_rate.max(f32::EPSILON))
    }
}

/// Counters returned by a simulator when it stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SimulatorReport {
    pub shape_id: ShapeId,
    /// Ticks simulated.
    pub ticks: u64,
    /// Snapshots accepted by the channel.
    pub published: u64,
    /// Snapshots rejected because the channel was full or closed.
    pub dropped: u64,
}

/// One shape's simulation: state, recolor timer and private random source.
#[derive(Debug)]
pub struct ShapeSimulator {
    params: SimulatorParams,
    state: ShapeState,
    color: ColorCycle,
    rng: Rng,
    report: SimulatorReport,
}

/// Derive a per-shape seed from the run's master seed.
///
/// Neighbouring shape ids are spread across the seed space so adjacent
/// simulators do not start from correlated states.
pub fn shape_seed(master_seed: u64, shape_id: ShapeId) -> u64 {
    master_seed ^ (shape_id as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

impl ShapeSimulator {
    /// Create the simulator and randomize its initial shape.
    pub fn new(params: SimulatorParams) -> Self {
        let mut rng = Rng::with_seed(params.seed);
        let state = ShapeState::random(params.bounds, &params.spawn, &mut rng);
        Self {
            color: ColorCycle::new(params.color_period),
            report: SimulatorReport {
                shape_id: params.shape_id,
                ..SimulatorReport::default()
            },
            params,
            state,
            rng,
        }
    }

    pub fn shape_id(&self) -> ShapeId {
        self.params.shape_id
    }

    pub fn state(&self) -> &ShapeState {
        &self.state
    }

    pub fn report(&self) -> SimulatorReport {
        self.report
    }

    /// Advance the simulation by `dt` seconds without any pacing.
    pub fn step(&mut self, dt: f32) {
        self.state.advance(dt, self.params.bounds);
        let recolored = self.color.advance(
            dt,
            &mut self.state.color_index,
            self.params.spawn.palette_len,
            &mut self.rng,
        );
        if recolored {
            debug!(
                "shape {} recolored to {}",
                self.params.shape_id, self.state.color_index
            );
        }
        self.report.ticks += 1;
    }

    /// Current renderable state.
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot(self.params.shape_id)
    }

    /// Offer the current snapshot to the channel. Returns whether it was
    /// accepted.
    pub fn publish(&mut self, tx: &StateSender) -> bool {
        let accepted = tx.try_send(self.snapshot());
        if accepted {
            self.report.published += 1;
        } else {
            self.report.dropped += 1;
        }
        accepted
    }

    /// Run the paced loop until `shutdown` is set, then return the counters.
    pub fn run(mut self, tx: StateSender, shutdown: ShutdownSignal) -> SimulatorReport {
        let jitter = self
            .params
            .max_start_jitter
            .mul_f32(self.rng.f32());
        info!(
            "shape {} starting after {:.0} ms",
            self.params.shape_id,
            jitter.as_secs_f32() * 1000.0
        );
        if shutdown.wait_timeout(jitter) {
            return self.report;
        }

        let period = self.params.tick_period();
        let mut prev = Instant::now();

        loop {
            let mut now = Instant::now();
            let elapsed = now - prev;
            if elapsed < period {
                if shutdown.wait_timeout(period - elapsed) {
                    break;
                }
                now = Instant::now();
            }
            let dt = (now - prev).as_secs_f32();
            prev = now;

            self.step(dt);
            self.publish(&tx);

            if shutdown.is_set() {
                break;
            }
        }

        info!(
            "shape {} stopped: ticks={} published={} dropped={}",
            self.params.shape_id, self.report.ticks, self.report.published, self.report.dropped
        );
        self.report
    }
}
