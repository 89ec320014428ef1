#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for dungeon adapters.
//!
//! Backends expose a [`Surface`] that can report its pixel size and fill
//! solid rectangles. The [`FrameRenderer`] turns the world state into an
//! ordered sequence of those fills, culled to the visible tiles.

mod frame;

pub use frame::{FrameRenderer, TilePalette, VisibleTiles};

use anyhow::Result as AnyResult;
use dungeon_core::{InputState, Viewport};
use std::time::Duration;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Axis-aligned rectangle in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScreenRect {
    /// Left edge in screen pixels. May be negative for partially visible tiles.
    pub x: i32,
    /// Top edge in screen pixels. May be negative for partially visible tiles.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ScreenRect {
    /// Creates a new screen rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Drawing surface provided by a backend.
pub trait Surface {
    /// Current pixel dimensions of the surface.
    fn viewport(&self) -> Viewport;

    /// Fills `rect` with a solid color.
    fn fill_rect(&mut self, rect: ScreenRect, color: Color);

    /// Draws a line of debug text with its baseline at `(x, y)`.
    ///
    /// Surfaces without text support ignore the request.
    fn draw_text(&mut self, _text: &str, _x: f32, _y: f32, _font_size: f32, _color: Color) {}
}

/// Single draw call recorded by a [`DrawList`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Solid rectangle fill.
    FillRect {
        /// Destination rectangle in screen pixels.
        rect: ScreenRect,
        /// Fill color.
        color: Color,
    },
    /// Debug text.
    Text {
        /// Text content.
        text: String,
        /// Baseline origin x in screen pixels.
        x: f32,
        /// Baseline origin y in screen pixels.
        y: f32,
        /// Font size in pixels.
        font_size: f32,
        /// Text color.
        color: Color,
    },
}

/// Surface that records draw calls instead of presenting them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    viewport: Viewport,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Creates an empty list reporting the provided viewport.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
        }
    }

    /// Changes the viewport reported to renderers.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Discards every recorded command.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Recorded commands in submission order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Recorded rectangle fills in submission order.
    pub fn fills(&self) -> impl Iterator<Item = (ScreenRect, Color)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::FillRect { rect, color } => Some((*rect, *color)),
            DrawCommand::Text { .. } => None,
        })
    }

    /// Number of recorded commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no commands have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Surface for DrawList {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, font_size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            x,
            y,
            font_size,
            color,
        });
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Initial window dimensions.
    pub initial_viewport: Viewport,
    /// Nominal period between simulation ticks.
    pub tick_interval: Duration,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(
        window_title: T,
        clear_color: Color,
        initial_viewport: Viewport,
        tick_interval: Duration,
    ) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            initial_viewport,
            tick_interval,
        }
    }
}

/// Application driven by a rendering backend.
pub trait FrameSource {
    /// Runs one simulation step with the sampled input and current viewport.
    fn tick(&mut self, input: InputState, viewport: Viewport);

    /// Draws the state produced by the most recent tick.
    fn draw(&self, surface: &mut dyn Surface);
}

/// Rendering backend capable of presenting dungeon frames.
pub trait RenderingBackend {
    /// Runs the backend until it is requested to exit.
    ///
    /// The backend calls [`FrameSource::tick`] at the presentation's tick
    /// interval and [`FrameSource::draw`] once per presented frame, always
    /// after the ticks that frame depends on.
    fn run<S>(self, presentation: Presentation, source: S) -> AnyResult<()>
    where
        S: FrameSource + 'static;
}
