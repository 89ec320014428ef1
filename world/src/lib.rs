#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the dungeon.
//!
//! The world owns the immutable [`TileGrid`] and the per-tick [`FrameState`].
//! Adapters drive it exclusively through [`apply`], and read it back through
//! the [`query`] module.

mod grid;

pub use grid::{TileGrid, TileGridError};

use dungeon_core::{
    CameraOffset, FrameState, GameConfig, InputState, Viewport, WELCOME_BANNER,
};
use dungeon_system_simulation::Simulation;
use glam::Vec2;
use tracing::{debug, warn};

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation by one fixed tick.
    Tick {
        /// Key state sampled at the start of the tick.
        input: InputState,
        /// Drawing surface dimensions read for this tick.
        viewport: Viewport,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// The player's top-left corner changed position.
    PlayerMoved {
        /// Position before the tick.
        from: Vec2,
        /// Position after the tick.
        to: Vec2,
    },
    /// The camera offset changed.
    CameraMoved {
        /// Offset before the tick.
        from: CameraOffset,
        /// Offset after the tick.
        to: CameraOffset,
    },
    /// A tick finished; emitted last for every tick.
    TickCompleted {
        /// Number of ticks processed so far, including this one.
        tick: u64,
    },
}

/// Represents the authoritative dungeon world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tile_grid: TileGrid,
    tile_size: u32,
    simulation: Simulation,
    state: FrameState,
    tick_index: u64,
}

impl World {
    /// Creates a world over `tile_grid` with the player at the configured start.
    ///
    /// A start position outside the world is clamped into it.
    #[must_use]
    pub fn new(tile_grid: TileGrid, config: &GameConfig) -> Self {
        let world_size = tile_grid.world_size(config.tile_size);
        let simulation = Simulation::new(world_size, config.player_box(), config.player_speed);
        let requested = config.start_position();
        let state = simulation.settle(requested, config.initial_viewport());
        if state.player != requested {
            warn!(
                requested_x = requested.x,
                requested_y = requested.y,
                x = state.player.x,
                y = state.player.y,
                "player start lies outside the world; clamped"
            );
        }
        debug!(
            columns = tile_grid.columns(),
            rows = tile_grid.rows(),
            width = world_size.width,
            height = world_size.height,
            speed = simulation.speed(),
            "world created"
        );

        Self {
            banner: WELCOME_BANNER,
            tile_grid,
            tile_size: config.tile_size,
            simulation,
            state,
            tick_index: 0,
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { input, viewport } => {
            let before = world.state;
            let after = world.simulation.advance(input, &before, viewport);
            world.state = after;
            world.tick_index = world.tick_index.saturating_add(1);

            if after.player != before.player {
                out_events.push(Event::PlayerMoved {
                    from: before.player,
                    to: after.player,
                });
            }
            if after.camera != before.camera {
                out_events.push(Event::CameraMoved {
                    from: before.camera,
                    to: after.camera,
                });
            }
            out_events.push(Event::TickCompleted {
                tick: world.tick_index,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use dungeon_core::{FrameState, PlayerBox, WorldSize};

    use super::{TileGrid, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the world's tile grid.
    #[must_use]
    pub fn tile_grid(world: &World) -> &TileGrid {
        &world.tile_grid
    }

    /// Pixels per tile edge.
    #[must_use]
    pub fn tile_size(world: &World) -> u32 {
        world.tile_size
    }

    /// Current player position and camera offset.
    #[must_use]
    pub fn frame_state(world: &World) -> FrameState {
        world.state
    }

    /// Size of the player's box.
    #[must_use]
    pub fn player_box(world: &World) -> PlayerBox {
        world.simulation.player()
    }

    /// Pixel size of the whole world.
    #[must_use]
    pub fn world_size(world: &World) -> WorldSize {
        world.simulation.world()
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
