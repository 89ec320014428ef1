//! Glue between the world, the frame renderer and a rendering backend.

use dungeon_core::{FrameState, InputState, Viewport};
use dungeon_rendering::{DrawList, FrameRenderer, FrameSource, Surface};
use dungeon_world::{self as world, query, Command, Event, World};

/// Dungeon application ticked and drawn by a backend.
#[derive(Debug)]
pub(crate) struct DungeonApp {
    world: World,
    renderer: FrameRenderer,
    events: Vec<Event>,
    player_moves: u64,
}

impl DungeonApp {
    pub(crate) fn new(world: World, renderer: FrameRenderer) -> Self {
        Self {
            world,
            renderer,
            events: Vec::new(),
            player_moves: 0,
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }
}

impl FrameSource for DungeonApp {
    fn tick(&mut self, input: InputState, viewport: Viewport) {
        self.events.clear();
        world::apply(
            &mut self.world,
            Command::Tick { input, viewport },
            &mut self.events,
        );
        let moved = self
            .events
            .iter()
            .any(|event| matches!(event, Event::PlayerMoved { .. }));
        if moved {
            self.player_moves = self.player_moves.saturating_add(1);
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let _ = self.renderer.render_world(surface, &self.world);
    }
}

/// Outcome of a scripted run without a window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct HeadlessReport {
    pub(crate) ticks: u64,
    pub(crate) player_moves: u64,
    pub(crate) final_state: FrameState,
    pub(crate) last_frame_draw_calls: usize,
}

/// Runs `ticks` simulation steps with constant input, drawing after each one.
pub(crate) fn run_headless(
    app: &mut DungeonApp,
    ticks: u64,
    input: InputState,
    viewport: Viewport,
) -> HeadlessReport {
    let mut frame = DrawList::new(viewport);
    for _ in 0..ticks {
        app.tick(input, viewport);
        frame.clear();
        app.draw(&mut frame);
    }

    HeadlessReport {
        ticks: query::tick_index(app.world()),
        player_moves: app.player_moves,
        final_state: query::frame_state(app.world()),
        last_frame_draw_calls: frame.len(),
    }
}
