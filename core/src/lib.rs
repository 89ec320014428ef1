#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the dungeon crates.
//!
//! This crate defines the value types that connect the input glue, the
//! authoritative world, the simulation step and the renderer. Adapters write
//! key state into [`InputFlags`], the world samples an [`InputState`] snapshot
//! at the start of every tick and advances the [`FrameState`], and renderers
//! read the resulting player position and [`CameraOffset`].

use std::sync::atomic::{AtomicBool, Ordering};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to the dungeon.";

/// Classification of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileCode {
    /// Walkable ground.
    Floor,
    /// Solid wall. Rendered distinctly but not collision-checked.
    Wall,
    /// Obstacle block. Rendered distinctly but not collision-checked.
    Obstacle,
}

impl TileCode {
    /// Resolves a raw map code into a tile classification.
    ///
    /// Returns `None` for codes outside `0..=2`.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Floor),
            1 => Some(Self::Wall),
            2 => Some(Self::Obstacle),
            _ => None,
        }
    }

    /// Raw map code associated with the tile.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Floor => 0,
            Self::Wall => 1,
            Self::Obstacle => 2,
        }
    }
}

/// Logical movement directions driven by the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing y.
    Up,
    /// Movement toward increasing y.
    Down,
    /// Movement toward decreasing x.
    Left,
    /// Movement toward increasing x.
    Right,
}

impl Direction {
    /// Every direction in a stable order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Snapshot of the held/released state of the four direction keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct InputState {
    /// Whether the up key is held.
    pub up: bool,
    /// Whether the down key is held.
    pub down: bool,
    /// Whether the left key is held.
    pub left: bool,
    /// Whether the right key is held.
    pub right: bool,
}

impl InputState {
    /// Returns a snapshot with every key released.
    #[must_use]
    pub const fn released() -> Self {
        Self {
            up: false,
            down: false,
            left: false,
            right: false,
        }
    }

    /// Returns a copy of the snapshot with the provided direction held.
    #[must_use]
    pub fn with(mut self, direction: Direction) -> Self {
        match direction {
            Direction::Up => self.up = true,
            Direction::Down => self.down = true,
            Direction::Left => self.left = true,
            Direction::Right => self.right = true,
        }
        self
    }

    /// Reports whether the provided direction is held.
    #[must_use]
    pub const fn held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Enumerates all sixteen combinations of the four flags.
    pub fn all_combinations() -> impl Iterator<Item = InputState> + Clone {
        (0u8..16).map(|bits| InputState {
            up: bits & 0b0001 != 0,
            down: bits & 0b0010 != 0,
            left: bits & 0b0100 != 0,
            right: bits & 0b1000 != 0,
        })
    }
}

/// Key state shared between an input callback and the simulation tick.
///
/// Each flag is an independent atomic. Reads and writes of a single flag never
/// tear, but a [`snapshot`](Self::snapshot) may observe one flag from a newer
/// event than another.
#[derive(Debug, Default)]
pub struct InputFlags {
    up: AtomicBool,
    down: AtomicBool,
    left: AtomicBool,
    right: AtomicBool,
}

impl InputFlags {
    /// Creates a flag set with every key released.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            up: AtomicBool::new(false),
            down: AtomicBool::new(false),
            left: AtomicBool::new(false),
            right: AtomicBool::new(false),
        }
    }

    fn flag(&self, direction: Direction) -> &AtomicBool {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }

    /// Records the held state of a single direction.
    pub fn set(&self, direction: Direction, held: bool) {
        self.flag(direction).store(held, Ordering::Relaxed);
    }

    /// Marks the direction as held.
    pub fn press(&self, direction: Direction) {
        self.set(direction, true);
    }

    /// Marks the direction as released.
    pub fn release(&self, direction: Direction) {
        self.set(direction, false);
    }

    /// Releases every direction.
    pub fn clear(&self) {
        for direction in Direction::ALL {
            self.release(direction);
        }
    }

    /// Reads the current state of all four flags.
    #[must_use]
    pub fn snapshot(&self) -> InputState {
        InputState {
            up: self.up.load(Ordering::Relaxed),
            down: self.down.load(Ordering::Relaxed),
            left: self.left.load(Ordering::Relaxed),
            right: self.right.load(Ordering::Relaxed),
        }
    }
}

/// Pixel dimensions of the drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Viewport {
    /// Width of the surface in pixels.
    pub width: u32,
    /// Height of the surface in pixels.
    pub height: u32,
}

impl Viewport {
    /// Creates a new viewport description.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Pixel dimensions of the whole tile grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WorldSize {
    /// Width of the world in pixels.
    pub width: u32,
    /// Height of the world in pixels.
    pub height: u32,
}

impl WorldSize {
    /// Creates a new world size description.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Size of the player's axis-aligned box in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlayerBox {
    /// Width of the box in pixels.
    pub width: u32,
    /// Height of the box in pixels.
    pub height: u32,
}

impl PlayerBox {
    /// Creates a new player box description.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Half extents of the box, used to derive the player's centre.
    #[must_use]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width as f32 * 0.5, self.height as f32 * 0.5)
    }
}

/// Integer top-left world-pixel offset of the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CameraOffset {
    /// Horizontal offset in world pixels.
    pub x: i32,
    /// Vertical offset in world pixels.
    pub y: i32,
}

impl CameraOffset {
    /// Camera pinned to the world origin.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Creates a new camera offset.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Player and camera state advanced once per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameState {
    /// Top-left corner of the player's box in world pixels.
    pub player: Vec2,
    /// Camera offset derived from the player's centre.
    pub camera: CameraOffset,
}

impl FrameState {
    /// Creates a new frame state.
    #[must_use]
    pub const fn new(player: Vec2, camera: CameraOffset) -> Self {
        Self { player, camera }
    }
}

/// Start-up configuration. Every field falls back to its default when absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Pixels per tile edge.
    pub tile_size: u32,
    /// Pixels moved per tick at full magnitude.
    pub player_speed: f32,
    /// Width of the player's box in pixels.
    pub player_width: u32,
    /// Height of the player's box in pixels.
    pub player_height: u32,
    /// Initial window width in pixels.
    pub window_width: u32,
    /// Initial window height in pixels.
    pub window_height: u32,
    /// Nominal interval between simulation ticks in milliseconds.
    pub tick_interval_ms: u64,
    /// World-space start position of the player's top-left corner.
    pub player_start: [f32; 2],
    /// Title shown by the window.
    pub window_title: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_size: 32,
            player_speed: 4.0,
            player_width: 32,
            player_height: 32,
            window_width: 640,
            window_height: 480,
            tick_interval_ms: 16,
            player_start: [50.0, 50.0],
            window_title: String::from("Dungeon"),
        }
    }
}

impl GameConfig {
    /// Rejects configurations that would make the simulation degenerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_size == 0 {
            return Err(ConfigError::ZeroTileSize);
        }
        if self.player_width == 0 || self.player_height == 0 {
            return Err(ConfigError::EmptyPlayerBox {
                width: self.player_width,
                height: self.player_height,
            });
        }
        if !self.player_speed.is_finite() || self.player_speed < 0.0 {
            return Err(ConfigError::InvalidSpeed {
                speed: self.player_speed,
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.player_start.iter().any(|value| !value.is_finite()) {
            return Err(ConfigError::InvalidStart {
                x: self.player_start[0],
                y: self.player_start[1],
            });
        }
        Ok(())
    }

    /// Size of the player's box.
    #[must_use]
    pub const fn player_box(&self) -> PlayerBox {
        PlayerBox::new(self.player_width, self.player_height)
    }

    /// Initial window dimensions.
    #[must_use]
    pub const fn initial_viewport(&self) -> Viewport {
        Viewport::new(self.window_width, self.window_height)
    }

    /// Start position of the player's top-left corner.
    #[must_use]
    pub fn start_position(&self) -> Vec2 {
        Vec2::from(self.player_start)
    }
}

/// Reasons a [`GameConfig`] is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Tiles must cover at least one pixel.
    #[error("tile_size must be positive")]
    ZeroTileSize,
    /// The player's box must have an area.
    #[error("player box must be non-empty (received {width}x{height})")]
    EmptyPlayerBox {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },
    /// Speed must be a finite, non-negative number.
    #[error("player_speed must be finite and non-negative (received {speed})")]
    InvalidSpeed {
        /// Configured speed.
        speed: f32,
    },
    /// The driver needs a positive tick period.
    #[error("tick_interval_ms must be positive")]
    ZeroTickInterval,
    /// The start position must be finite.
    #[error("player_start must be finite (received {x}, {y})")]
    InvalidStart {
        /// Configured x coordinate.
        x: f32,
        /// Configured y coordinate.
        y: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_codes_round_trip_known_values() {
        for code in 0..=2 {
            let tile = TileCode::from_code(code).expect("known code");
            assert_eq!(tile.code(), code);
        }
        assert_eq!(TileCode::from_code(3), None);
    }

    #[test]
    fn all_combinations_covers_every_flag_set_once() {
        let combinations: Vec<_> = InputState::all_combinations().collect();
        assert_eq!(combinations.len(), 16);
        for (index, state) in combinations.iter().enumerate() {
            assert!(!combinations[index + 1..].contains(state));
        }
    }

    #[test]
    fn all_combinations_can_be_cycled_into_a_script() {
        let script: Vec<_> = InputState::all_combinations().cycle().take(40).collect();

        assert_eq!(script.len(), 40);
        assert_eq!(script[0], InputState::released());
        assert_eq!(script[16], script[0]);
        assert_eq!(script[39], script[7]);
    }

    #[test]
    fn input_flags_snapshot_reflects_latest_writes() {
        let flags = InputFlags::new();
        flags.press(Direction::Up);
        flags.press(Direction::Right);
        flags.release(Direction::Up);

        assert_eq!(
            flags.snapshot(),
            InputState::released().with(Direction::Right)
        );

        flags.clear();
        assert_eq!(flags.snapshot(), InputState::released());
    }

    #[test]
    fn input_flags_are_shareable_across_threads() {
        let flags = std::sync::Arc::new(InputFlags::new());
        let writer = std::sync::Arc::clone(&flags);
        std::thread::spawn(move || writer.press(Direction::Down))
            .join()
            .expect("writer thread");

        assert!(flags.snapshot().held(Direction::Down));
    }

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.player_box(), PlayerBox::new(32, 32));
        assert_eq!(config.initial_viewport(), Viewport::new(640, 480));
    }

    #[test]
    fn config_rejects_degenerate_values() {
        let zero_tiles = GameConfig {
            tile_size: 0,
            ..GameConfig::default()
        };
        assert_eq!(zero_tiles.validate(), Err(ConfigError::ZeroTileSize));

        let negative_speed = GameConfig {
            player_speed: -1.0,
            ..GameConfig::default()
        };
        assert!(matches!(
            negative_speed.validate(),
            Err(ConfigError::InvalidSpeed { .. })
        ));

        let empty_box = GameConfig {
            player_height: 0,
            ..GameConfig::default()
        };
        assert_eq!(
            empty_box.validate(),
            Err(ConfigError::EmptyPlayerBox {
                width: 32,
                height: 0
            })
        );
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: GameConfig =
            toml::from_str("tile_size = 16\nplayer_speed = 2.5\n").expect("valid toml");

        assert_eq!(config.tile_size, 16);
        assert_eq!(config.player_speed, 2.5);
        assert_eq!(config.window_width, 640);
        assert_eq!(config.tick_interval_ms, 16);
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        let result: Result<GameConfig, _> = toml::from_str("tile_sise = 16\n");
        assert!(result.is_err());
    }
}
