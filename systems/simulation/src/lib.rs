#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure simulation step that moves the player and derives the camera.
//!
//! The step is deterministic: the same input snapshot, prior state and
//! viewport always produce the same [`FrameState`]. It never fails and has no
//! side effects beyond the state it returns.

pub mod camera;
pub mod movement;

use dungeon_core::{FrameState, InputState, PlayerBox, Viewport, WorldSize};

/// Fixed parameters of the simulation step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Simulation {
    world: WorldSize,
    player: PlayerBox,
    speed: f32,
}

impl Simulation {
    /// Creates a simulation for a world of the given pixel size.
    #[must_use]
    pub const fn new(world: WorldSize, player: PlayerBox, speed: f32) -> Self {
        Self {
            world,
            player,
            speed,
        }
    }

    /// Pixel size of the world the player is confined to.
    #[must_use]
    pub const fn world(&self) -> WorldSize {
        self.world
    }

    /// Size of the player's box.
    #[must_use]
    pub const fn player(&self) -> PlayerBox {
        self.player
    }

    /// Pixels moved per tick at full magnitude.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Advances the player by one tick and recomputes the camera.
    ///
    /// The camera is derived from the new player position, so it must be
    /// computed before the frame that depends on it is rendered.
    #[must_use]
    pub fn advance(&self, input: InputState, state: &FrameState, viewport: Viewport) -> FrameState {
        let player = movement::step_player(input, state.player, self.speed, self.player, self.world);
        let camera = camera::follow(player, self.player, self.world, viewport);
        FrameState::new(player, camera)
    }

    /// Places a player at `position`, clamped to the world, with a matching camera.
    #[must_use]
    pub fn settle(&self, position: glam::Vec2, viewport: Viewport) -> FrameState {
        let player = movement::clamp_to_world(position, self.player, self.world);
        FrameState::new(
            player,
            camera::follow(player, self.player, self.world, viewport),
        )
    }
}
