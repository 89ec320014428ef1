#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the dungeon.

mod app;
mod settings;

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use dungeon_core::{Direction, GameConfig, InputState};
use dungeon_rendering::{Color, FrameRenderer, Presentation, RenderingBackend};
use dungeon_rendering_macroquad::MacroquadBackend;
use dungeon_world::{query, World};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    app::{run_headless, DungeonApp},
    settings::Overrides,
};

/// Command-line arguments for the dungeon.
#[derive(Debug, Parser)]
#[command(name = "dungeon", about = "Explore a tile dungeon with a scrolling camera")]
struct Cli {
    /// TOML configuration file; values not present fall back to defaults.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Map file with one digit per tile; the built-in dungeon is used when absent.
    #[arg(long, value_name = "PATH", global = true)]
    map: Option<PathBuf>,
    /// Overrides the tile edge length in pixels.
    #[arg(long, value_name = "PIXELS", global = true)]
    tile_size: Option<u32>,
    /// Overrides the player's speed in pixels per tick.
    #[arg(long, value_name = "PIXELS", global = true)]
    speed: Option<f32>,
    /// Overrides the initial window width.
    #[arg(long, value_name = "PIXELS", global = true)]
    width: Option<u32>,
    /// Overrides the initial window height.
    #[arg(long, value_name = "PIXELS", global = true)]
    height: Option<u32>,
    /// Synchronises presentation with the display refresh rate.
    #[arg(long)]
    vsync: bool,
    /// Logs frame timing once per second.
    #[arg(long)]
    show_fps: bool,
    /// Draws camera and viewport details over the frame.
    #[arg(long)]
    debug_overlay: bool,
    /// Enables debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validates the configuration and map, then exits.
    Check,
    /// Runs the simulation without a window and prints the final state.
    Simulate {
        /// Number of ticks to run.
        #[arg(long, default_value_t = 60)]
        ticks: u64,
        /// Directions held for the whole run, e.g. `up,right`.
        #[arg(long, value_enum, value_delimiter = ',')]
        hold: Vec<HeldDirection>,
    },
}

/// Direction names accepted by `--hold`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum HeldDirection {
    Up,
    Down,
    Left,
    Right,
}

impl From<HeldDirection> for Direction {
    fn from(value: HeldDirection) -> Self {
        match value {
            HeldDirection::Up => Direction::Up,
            HeldDirection::Down => Direction::Down,
            HeldDirection::Left => Direction::Left,
            HeldDirection::Right => Direction::Right,
        }
    }
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            tile_size: self.tile_size,
            player_speed: self.speed,
            window_width: self.width,
            window_height: self.height,
        }
    }
}

fn held_input(hold: &[HeldDirection]) -> InputState {
    hold.iter()
        .fold(InputState::released(), |input, held| input.with((*held).into()))
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Entry point for the dungeon command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = settings::load_config(cli.config.as_deref(), cli.overrides())?;
    let grid = settings::load_map(cli.map.as_deref())?;
    let world = World::new(grid, &config);
    info!("{}", query::welcome_banner(&world));

    match &cli.command {
        Some(Commands::Check) => {
            let grid = query::tile_grid(&world);
            let size = query::world_size(&world);
            println!(
                "ok: {}x{} tiles, world {}x{} px",
                grid.columns(),
                grid.rows(),
                size.width,
                size.height
            );
            Ok(())
        }
        Some(Commands::Simulate { ticks, hold }) => {
            let viewport = config.initial_viewport();
            let mut app = DungeonApp::new(world, renderer(cli.debug_overlay));
            let report = run_headless(&mut app, *ticks, held_input(hold), viewport);
            let state = report.final_state;
            println!(
                "ticks={} moves={} player=({:.2}, {:.2}) camera=({}, {}) draw_calls={}",
                report.ticks,
                report.player_moves,
                state.player.x,
                state.player.y,
                state.camera.x,
                state.camera.y,
                report.last_frame_draw_calls
            );
            Ok(())
        }
        None => play(&cli, &config, world),
    }
}

fn renderer(debug_overlay: bool) -> FrameRenderer {
    FrameRenderer::new().with_debug_overlay(debug_overlay)
}

fn play(cli: &Cli, config: &GameConfig, world: World) -> Result<()> {
    let presentation = Presentation::new(
        config.window_title.clone(),
        Color::from_rgb_u8(0, 0, 0),
        config.initial_viewport(),
        Duration::from_millis(config.tick_interval_ms),
    );
    let backend = MacroquadBackend::new()
        .with_vsync(cli.vsync)
        .with_show_fps(cli.show_fps);
    let app = DungeonApp::new(world, renderer(cli.debug_overlay));

    backend.run(presentation, app)
}
