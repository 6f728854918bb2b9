//! The single consumer of shape snapshots.
//!
//! [`RenderCoordinator`] owns the ECS [`World`] holding the display state and
//! the per-frame [`Schedule`]. Each [`RenderCoordinator::frame`]:
//!
//! 1. turns queued input into an exit request, if any event warrants one;
//! 2. drains every queued snapshot into [`DisplayState`].
//!
//! Drawing happens outside, from a shared borrow of the world (see
//! [`crate::systems::render::render_frame`]). Nothing in a frame waits on a
//! simulator: the only blocking in the render loop is its own frame pacing.
//!
//! On [`RenderCoordinator::finish`] the shutdown signal is set (again, if an
//! exit request already set it) and the simulators are collected with a
//! bounded wait per worker.

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

use crate::events::exit::{ExitRequestedEvent, exit_requested_observer};
use crate::events::input::{ExitReason, InputEvent};
use crate::resources::config::SaverConfig;
use crate::resources::debugmode::DebugMode;
use crate::resources::displaystate::DisplayState;
use crate::resources::framestats::FrameStats;
use crate::resources::input::{ExitInput, ExitState, PendingInput};
use crate::resources::palette::Palette;
use crate::resources::screensize::ScreenSize;
use crate::resources::simbridge::{SimulationBridge, setup_simulation, shutdown_simulation};
use crate::simulation::workers::ShutdownSummary;
use crate::systems::input::process_exit_input;
use crate::systems::snapshots::drain_snapshots;

pub struct RenderCoordinator {
    world: World,
    frame: Schedule,
}

impl RenderCoordinator {
    /// Build the world for a run over `screen`, with the pointer at
    /// `mouse_origin`. No simulators are running yet.
    pub fn new(config: SaverConfig, palette: Palette, screen: ScreenSize, mouse_origin: Vector2) -> Self {
        let mut world = World::new();
        world.insert_resource(ExitInput::new(mouse_origin, config.mouse_threshold));
        if config.debug {
            world.insert_resource(DebugMode {});
        }
        world.insert_resource(config);
        world.insert_resource(palette);
        world.insert_resource(screen);
        world.insert_resource(DisplayState::default());
        world.insert_resource(FrameStats::default());
        world.insert_resource(PendingInput::default());
        world.insert_resource(ExitState::default());
        world.add_observer(exit_requested_observer);
        world.flush();

        let mut frame = Schedule::default();
        frame.add_systems((process_exit_input, drain_snapshots).chain());

        Self { world, frame }
    }

    /// Spawn one simulator per shape, bouncing inside the screen.
    pub fn start(&mut self, master_seed: u64) -> Result<(), String> {
        let bounds = self.world.resource::<ScreenSize>().bounds();
        setup_simulation(&mut self.world, bounds, master_seed)
    }

    /// Use an externally built channel and worker pool instead of
    /// [`RenderCoordinator::start`].
    pub fn attach(&mut self, bridge: SimulationBridge) {
        self.world.insert_resource(bridge);
    }

    /// Queue input for the next frame.
    pub fn push_input(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        self.world
            .resource_mut::<PendingInput>()
            .events
            .extend(events);
    }

    /// Ask the run to end, as if an exiting input event had arrived.
    pub fn request_exit(&mut self, reason: ExitReason) {
        self.world.trigger(ExitRequestedEvent { reason });
    }

    /// Run one frame: handle input, then drain snapshots.
    pub fn frame(&mut self) {
        self.frame.run(&mut self.world);
    }

    pub fn exit_requested(&self) -> bool {
        self.world.resource::<ExitState>().is_requested()
    }

    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.world.resource::<ExitState>().reason
    }

    /// Read-only view of the latest snapshot per shape.
    pub fn display_state(&self) -> &DisplayState {
        self.world.resource::<DisplayState>()
    }

    pub fn frame_stats(&self) -> FrameStats {
        *self.world.resource::<FrameStats>()
    }

    /// Shared access to the world, for drawing.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Stop the simulators and return what they reported.
    pub fn finish(mut self) -> ShutdownSummary {
        shutdown_simulation(&mut self.world).unwrap_or_default()
    }
}
