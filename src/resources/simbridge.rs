//! ECS resource that bridges the coordinator with the simulator threads.
//!
//! Use [`setup_simulation`] once the display is up to spawn one simulator per
//! shape and insert the [`SimulationBridge`]. Call [`shutdown_simulation`]
//! during teardown to signal the simulators and collect them with a bounded
//! wait.

use bevy_ecs::prelude::*;
use log::info;
use std::time::Duration;

use crate::resources::config::SaverConfig;
use crate::resources::palette::Palette;
use crate::simulation::channel::{StateReceiver, state_channel};
use crate::simulation::shape::Bounds;
use crate::simulation::shutdown::ShutdownSignal;
use crate::simulation::workers::{ShutdownSummary, WorkerPool};

/// Receiving end of the snapshot channel plus the workers feeding it.
#[derive(Resource)]
pub struct SimulationBridge {
    receiver: StateReceiver,
    pool: WorkerPool,
    per_worker_timeout: Duration,
}

impl SimulationBridge {
    /// Wrap an existing channel and pool.
    pub fn new(receiver: StateReceiver, pool: WorkerPool, per_worker_timeout: Duration) -> Self {
        Self {
            receiver,
            pool,
            per_worker_timeout,
        }
    }

    pub fn receiver(&self) -> &StateReceiver {
        &self.receiver
    }

    pub fn shutdown_signal(&self) -> &ShutdownSignal {
        self.pool.shutdown_signal()
    }

    /// Number of simulator threads started.
    pub fn worker_count(&self) -> usize {
        self.pool.len()
    }

    /// Signal the simulators and wait for them (bounded per worker).
    pub fn shutdown(self) -> ShutdownSummary {
        self.pool.shutdown(self.per_worker_timeout)
    }
}

/// Spawn the simulators and insert [`SimulationBridge`].
///
/// Reads [`SaverConfig`] and [`Palette`] from the world. If any thread fails
/// to start, the ones already running are shut down and the error returned.
pub fn setup_simulation(world: &mut World, bounds: Bounds, master_seed: u64) -> Result<(), String> {
    let config = world.resource::<SaverConfig>().clone();
    let palette_len = world.resource::<Palette>().len();

    let (tx, rx) = state_channel(config.channel_capacity);
    let mut pool = WorkerPool::new(ShutdownSignal::new());

    for shape_id in 0..config.shape_count {
        let params = config.simulator_params(shape_id, bounds, master_seed, palette_len);
        if let Err(e) = pool.spawn_simulator(params, tx.clone()) {
            pool.shutdown(config.per_worker_timeout());
            return Err(e);
        }
    }

    info!(
        "started {} simulators ({} points, {} Hz) in {}x{} with seed {}",
        pool.len(),
        config.point_count,
        config.sim_fps,
        bounds.width,
        bounds.height,
        master_seed
    );

    world.insert_resource(SimulationBridge::new(rx, pool, config.per_worker_timeout()));
    Ok(())
}

/// Remove the bridge, signal shutdown and collect the simulators.
///
/// Returns `None` if no simulation was running.
pub fn shutdown_simulation(world: &mut World) -> Option<ShutdownSummary> {
    world
        .remove_resource::<SimulationBridge>()
        .map(SimulationBridge::shutdown)
}
