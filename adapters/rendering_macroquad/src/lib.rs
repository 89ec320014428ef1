#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the dungeon.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The adapter owns the window, the keyboard and the frame clock. Key state is
//! written into shared [`InputFlags`] and sampled once at the start of every
//! fixed tick; the frame is drawn after the ticks it depends on.

mod clock;
mod fps;

pub use self::clock::{TickClock, MAX_TICKS_PER_FRAME};

use self::fps::{FpsCounter, FpsMetrics, FrameBreakdown};
use anyhow::Result;
use dungeon_core::{Direction, InputFlags, Viewport};
use dungeon_rendering::{Color, FrameSource, Presentation, RenderingBackend, ScreenRect, Surface};
use macroquad::input::{is_key_down, is_key_pressed, KeyCode};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{info, warn};

/// Keys bound to each logical direction.
const DIRECTION_BINDINGS: [(Direction, [KeyCode; 2]); 4] = [
    (Direction::Up, [KeyCode::W, KeyCode::Up]),
    (Direction::Down, [KeyCode::S, KeyCode::Down]),
    (Direction::Left, [KeyCode::A, KeyCode::Left]),
    (Direction::Right, [KeyCode::D, KeyCode::Right]),
];

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);

        Self { quit_requested }
    }
}

/// Writes the held state of every bound direction into `flags`.
fn poll_directions(flags: &InputFlags) {
    for (direction, keys) in DIRECTION_BINDINGS {
        flags.set(direction, keys.iter().any(|key| is_key_down(*key)));
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    input: Arc<InputFlags>,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            input: Arc::new(InputFlags::new()),
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Key state written by the backend, for collaborators that inject input.
    #[must_use]
    pub fn input_flags(&self) -> Arc<InputFlags> {
        Arc::clone(&self.input)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<S>(self, presentation: Presentation, source: S) -> Result<()>
    where
        S: FrameSource + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            input,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            initial_viewport,
            tick_interval,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: window_extent(initial_viewport.width),
            window_height: window_extent(initial_viewport.height),
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        info!(
            width = initial_viewport.width,
            height = initial_viewport.height,
            tick_ms = tick_interval.as_millis() as u64,
            "opening window"
        );

        macroquad::Window::from_config(config, async move {
            let mut source = source;
            let mut clock = TickClock::new(tick_interval);
            let mut fps_counter = FpsCounter::default();
            let background = to_macroquad_color(clear_color);
            let mut total_ticks: u64 = 0;

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    info!(ticks = total_ticks, "quit requested");
                    break;
                }

                poll_directions(&input);
                let viewport = current_viewport();

                let frame_dt =
                    Duration::from_secs_f32(macroquad::time::get_frame_time().max(0.0));
                let due = clock.advance(frame_dt);
                if due == MAX_TICKS_PER_FRAME && frame_dt > tick_interval * MAX_TICKS_PER_FRAME {
                    warn!(
                        frame_ms = frame_dt.as_millis() as u64,
                        "frame exceeded the catch-up budget; dropping simulation time"
                    );
                }

                let simulation_start = Instant::now();
                for _ in 0..due {
                    source.tick(input.snapshot(), viewport);
                }
                let simulation = simulation_start.elapsed();
                total_ticks = total_ticks.saturating_add(u64::from(due));

                let render_start = Instant::now();
                macroquad::window::clear_background(background);
                let mut surface = MacroquadSurface { viewport };
                source.draw(&mut surface);
                let render = render_start.elapsed();

                let metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    ticks: due,
                    simulation,
                    render,
                });
                if show_fps {
                    if let Some(metrics) = metrics {
                        log_metrics(metrics);
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn log_metrics(metrics: FpsMetrics) {
    let FpsMetrics {
        per_second,
        trailing_ten_seconds,
        ticks_per_second,
        avg_simulation,
        avg_render,
    } = metrics;
    info!(
        fps = per_second,
        fps_10s = trailing_ten_seconds,
        tps = ticks_per_second,
        sim_ms = avg_simulation.as_secs_f64() * 1_000.0,
        render_ms = avg_render.as_secs_f64() * 1_000.0,
        "frame timing"
    );
}

fn window_extent(pixels: u32) -> i32 {
    i32::try_from(pixels).unwrap_or(i32::MAX)
}

fn current_viewport() -> Viewport {
    let width = macroquad::window::screen_width().max(0.0);
    let height = macroquad::window::screen_height().max(0.0);
    Viewport::new(width as u32, height as u32)
}

/// Surface that forwards fills to macroquad's immediate-mode shapes.
struct MacroquadSurface {
    viewport: Viewport,
}

impl Surface for MacroquadSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: Color) {
        macroquad::shapes::draw_rectangle(
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
            to_macroquad_color(color),
        );
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, font_size: f32, color: Color) {
        let _ = macroquad::text::draw_text(text, x, y, font_size, to_macroquad_color(color));
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
