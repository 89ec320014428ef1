//! Camera follow with edge clamping.

use dungeon_core::{CameraOffset, PlayerBox, Viewport, WorldSize};
use glam::Vec2;

/// Centre of the player's box in world pixels.
#[must_use]
pub fn player_center(position: Vec2, player: PlayerBox) -> Vec2 {
    position + player.half_extents()
}

/// Camera offset that centres the viewport on the player.
///
/// The result always satisfies `0 <= offset <= max(0, world - viewport)` on
/// both axes, so the viewport never shows area outside the world and is
/// pinned to zero on any axis where it is larger than the world.
#[must_use]
pub fn follow(
    position: Vec2,
    player: PlayerBox,
    world: WorldSize,
    viewport: Viewport,
) -> CameraOffset {
    let center = player_center(position, player);
    let target = center - Vec2::new(viewport.width as f32, viewport.height as f32) * 0.5;

    CameraOffset::new(
        clamp_axis(target.x, world.width, viewport.width),
        clamp_axis(target.y, world.height, viewport.height),
    )
}

fn clamp_axis(target: f32, world_extent: u32, view_extent: u32) -> i32 {
    let upper = i64::from(world_extent) - i64::from(view_extent);
    // `as` saturates non-finite and out-of-range values.
    let target = target.floor() as i64;
    let clamped = target.min(upper).max(0);
    i32::try_from(clamped).unwrap_or(i32::MAX)
}
