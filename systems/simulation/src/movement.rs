//! Player movement: direction sampling, diagonal normalisation and world clamping.

use std::f32::consts::FRAC_1_SQRT_2;

use dungeon_core::{InputState, PlayerBox, WorldSize};
use glam::Vec2;

/// Raw direction vector derived from the four flags.
///
/// Opposite flags held together cancel to zero on their axis.
#[must_use]
pub fn direction_vector(input: InputState) -> Vec2 {
    let mut direction = Vec2::ZERO;
    if input.up {
        direction.y -= 1.0;
    }
    if input.down {
        direction.y += 1.0;
    }
    if input.left {
        direction.x -= 1.0;
    }
    if input.right {
        direction.x += 1.0;
    }
    direction
}

/// Direction vector scaled so diagonal travel is as fast as axis-aligned travel.
#[must_use]
pub fn normalized_direction(input: InputState) -> Vec2 {
    let direction = direction_vector(input);
    if direction.x != 0.0 && direction.y != 0.0 {
        direction * FRAC_1_SQRT_2
    } else {
        direction
    }
}

/// Displacement applied during a single tick.
///
/// The displacement is per tick rather than per second, so the effective speed
/// depends on the driver keeping a stable tick rate.
#[must_use]
pub fn displacement(input: InputState, speed: f32) -> Vec2 {
    normalized_direction(input) * speed
}

/// Clamps the player's top-left corner so the whole box stays inside the world.
///
/// Walkability is not consulted; only the world bounds are enforced. When the
/// box is larger than the world on an axis the position is pinned to zero.
#[must_use]
pub fn clamp_to_world(position: Vec2, player: PlayerBox, world: WorldSize) -> Vec2 {
    Vec2::new(
        clamp_axis(position.x, world.width, player.width),
        clamp_axis(position.y, world.height, player.height),
    )
}

fn clamp_axis(value: f32, world_extent: u32, box_extent: u32) -> f32 {
    let upper = world_extent.saturating_sub(box_extent) as f32;
    value.min(upper).max(0.0)
}

/// Moves the player by one tick of input and clamps the result to the world.
#[must_use]
pub fn step_player(
    input: InputState,
    position: Vec2,
    speed: f32,
    player: PlayerBox,
    world: WorldSize,
) -> Vec2 {
    clamp_to_world(position + displacement(input, speed), player, world)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_core::Direction;

    const PLAYER: PlayerBox = PlayerBox::new(32, 32);
    const WORLD: WorldSize = WorldSize::new(640, 480);

    #[test]
    fn opposite_flags_cancel() {
        let input = InputState::released()
            .with(Direction::Up)
            .with(Direction::Down)
            .with(Direction::Right);

        assert_eq!(direction_vector(input), Vec2::new(1.0, 0.0));
        assert_eq!(normalized_direction(input), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn diagonal_direction_has_unit_length() {
        let input = InputState::released()
            .with(Direction::Down)
            .with(Direction::Left);
        let direction = normalized_direction(input);

        assert!((direction.length() - 1.0).abs() < 1e-6);
        assert!(direction.x < 0.0 && direction.y > 0.0);
    }

    #[test]
    fn released_keys_do_not_move_the_player() {
        let position = Vec2::new(100.0, 120.0);
        let moved = step_player(InputState::released(), position, 4.0, PLAYER, WORLD);

        assert_eq!(moved, position);
    }

    #[test]
    fn clamp_keeps_box_inside_the_world() {
        let clamped = clamp_to_world(Vec2::new(-5.0, 470.0), PLAYER, WORLD);

        assert_eq!(clamped, Vec2::new(0.0, 448.0));
    }

    #[test]
    fn clamp_pins_to_zero_when_box_exceeds_world() {
        let clamped = clamp_to_world(Vec2::new(12.0, 3.0), PLAYER, WorldSize::new(16, 16));

        assert_eq!(clamped, Vec2::ZERO);
    }
}
