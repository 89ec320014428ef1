use dungeon_core::{CameraOffset, PlayerBox, TileCode, Viewport};
use dungeon_world::{query, TileGrid, World};
use glam::Vec2;

use crate::{Color, ScreenRect, Surface};

/// Font size used by the debug overlay.
const OVERLAY_FONT_SIZE: f32 = 18.0;
/// Distance of the overlay baseline from the top-left corner.
const OVERLAY_MARGIN: f32 = 8.0;

/// Colors assigned to each tile kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePalette {
    /// Fill used for floor tiles.
    pub floor: Color,
    /// Fill used for wall tiles.
    pub wall: Color,
    /// Fill used for obstacle tiles.
    pub obstacle: Color,
}

impl TilePalette {
    /// Color assigned to the provided tile kind.
    #[must_use]
    pub const fn color_for(&self, tile: TileCode) -> Color {
        match tile {
            TileCode::Floor => self.floor,
            TileCode::Wall => self.wall,
            TileCode::Obstacle => self.obstacle,
        }
    }
}

impl Default for TilePalette {
    fn default() -> Self {
        Self {
            floor: Color::from_rgb_u8(170, 170, 170),
            wall: Color::from_rgb_u8(40, 40, 40),
            obstacle: Color::from_rgb_u8(80, 80, 80),
        }
    }
}

/// Half-open range of tile indices intersecting the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VisibleTiles {
    /// First visible column.
    pub start_column: u32,
    /// One past the last visible column.
    pub end_column: u32,
    /// First visible row.
    pub start_row: u32,
    /// One past the last visible row.
    pub end_row: u32,
}

impl VisibleTiles {
    /// Computes the tiles a viewport at `camera` overlaps.
    ///
    /// Start indices round down and end indices round up, so partially
    /// visible edge tiles are included. Both ends are clamped to the grid.
    #[must_use]
    pub fn compute(
        camera: CameraOffset,
        viewport: Viewport,
        columns: u32,
        rows: u32,
        tile_size: u32,
    ) -> Self {
        if tile_size == 0 {
            return Self::default();
        }

        let (start_column, end_column) =
            visible_axis(camera.x, viewport.width, columns, tile_size);
        let (start_row, end_row) = visible_axis(camera.y, viewport.height, rows, tile_size);
        Self {
            start_column,
            end_column,
            start_row,
            end_row,
        }
    }

    /// Number of visible tiles.
    #[must_use]
    pub const fn len(&self) -> usize {
        let columns = self.end_column.saturating_sub(self.start_column) as usize;
        let rows = self.end_row.saturating_sub(self.start_row) as usize;
        columns * rows
    }

    /// Whether no tile is visible.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reports whether the tile at `(column, row)` is in range.
    #[must_use]
    pub const fn contains(&self, column: u32, row: u32) -> bool {
        column >= self.start_column
            && column < self.end_column
            && row >= self.start_row
            && row < self.end_row
    }

    /// Visible `(column, row)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> {
        let columns = self.start_column..self.end_column;
        (self.start_row..self.end_row)
            .flat_map(move |row| columns.clone().map(move |column| (column, row)))
    }
}

fn visible_axis(camera: i32, view_extent: u32, tiles: u32, tile_size: u32) -> (u32, u32) {
    let origin = u64::try_from(camera).unwrap_or(0);
    let tile_size = u64::from(tile_size);
    let tiles = u64::from(tiles);
    let end = (origin + u64::from(view_extent)).div_ceil(tile_size).min(tiles);
    let start = (origin / tile_size).min(end);
    // Both values are bounded by `tiles`, which came from a `u32`.
    (start as u32, end as u32)
}

fn to_screen(world: i64, camera: i32) -> i32 {
    let screen = world - i64::from(camera);
    screen.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Draws the tile grid and the player onto a [`Surface`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameRenderer {
    palette: TilePalette,
    player_color: Color,
    debug_overlay: bool,
    overlay_color: Color,
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self {
            palette: TilePalette::default(),
            player_color: Color::from_rgb_u8(0, 0, 255),
            debug_overlay: false,
            overlay_color: Color::from_rgb_u8(255, 255, 255),
        }
    }
}

impl FrameRenderer {
    /// Returns a renderer with the default palette and no overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the tile palette.
    #[must_use]
    pub fn with_palette(mut self, palette: TilePalette) -> Self {
        self.palette = palette;
        self
    }

    /// Overrides the color used for the player.
    #[must_use]
    pub fn with_player_color(mut self, color: Color) -> Self {
        self.player_color = color;
        self
    }

    /// Configures whether a text line with camera and grid details is drawn.
    #[must_use]
    pub fn with_debug_overlay(mut self, enabled: bool) -> Self {
        self.debug_overlay = enabled;
        self
    }

    /// Draws the visible tiles followed by the player.
    ///
    /// Returns the tile range that was drawn.
    #[allow(clippy::too_many_arguments)]
    pub fn render<S>(
        &self,
        surface: &mut S,
        camera: CameraOffset,
        viewport: Viewport,
        grid: &TileGrid,
        tile_size: u32,
        player: Vec2,
        player_box: PlayerBox,
    ) -> VisibleTiles
    where
        S: Surface + ?Sized,
    {
        let visible =
            VisibleTiles::compute(camera, viewport, grid.columns(), grid.rows(), tile_size);
        let tile_extent = i64::from(tile_size);

        for (column, row) in visible.iter() {
            let Some(tile) = grid.tile(column, row) else {
                continue;
            };
            let rect = ScreenRect::new(
                to_screen(i64::from(column) * tile_extent, camera.x),
                to_screen(i64::from(row) * tile_extent, camera.y),
                tile_size,
                tile_size,
            );
            surface.fill_rect(rect, self.palette.color_for(tile));
        }

        let player_rect = ScreenRect::new(
            to_screen(player.x.round() as i64, camera.x),
            to_screen(player.y.round() as i64, camera.y),
            player_box.width,
            player_box.height,
        );
        surface.fill_rect(player_rect, self.player_color);

        if self.debug_overlay {
            let text = format!(
                "camera ({}, {})  view {}x{}  grid {}x{}",
                camera.x,
                camera.y,
                viewport.width,
                viewport.height,
                grid.columns(),
                grid.rows()
            );
            surface.draw_text(
                &text,
                OVERLAY_MARGIN,
                OVERLAY_MARGIN + OVERLAY_FONT_SIZE,
                OVERLAY_FONT_SIZE,
                self.overlay_color,
            );
        }

        visible
    }

    /// Draws the world's current state using the surface's viewport.
    pub fn render_world<S>(&self, surface: &mut S, world: &World) -> VisibleTiles
    where
        S: Surface + ?Sized,
    {
        let viewport = surface.viewport();
        let state = query::frame_state(world);
        self.render(
            surface,
            state.camera,
            viewport,
            query::tile_grid(world),
            query::tile_size(world),
            state.player,
            query::player_box(world),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DrawCommand, DrawList};
    use dungeon_core::GameConfig;
    use std::collections::HashSet;

    const TILE: u32 = 32;
    const PLAYER: PlayerBox = PlayerBox::new(32, 32);

    fn open_grid(columns: usize, rows: usize) -> TileGrid {
        TileGrid::from_rows(vec![vec![0; columns]; rows]).expect("rectangular grid")
    }

    #[test]
    fn aligned_camera_covers_exact_tiles() {
        let visible = VisibleTiles::compute(
            CameraOffset::new(64, 32),
            Viewport::new(640, 480),
            40,
            30,
            TILE,
        );

        assert_eq!(
            visible,
            VisibleTiles {
                start_column: 2,
                end_column: 22,
                start_row: 1,
                end_row: 16,
            }
        );
        assert_eq!(visible.len(), 300);
    }

    #[test]
    fn partially_visible_edge_tiles_are_included() {
        let visible = VisibleTiles::compute(
            CameraOffset::new(40, 10),
            Viewport::new(100, 50),
            40,
            30,
            TILE,
        );

        assert_eq!(visible.start_column, 1);
        assert_eq!(visible.end_column, 5);
        assert_eq!(visible.start_row, 0);
        assert_eq!(visible.end_row, 2);
    }

    #[test]
    fn range_is_clamped_to_the_grid() {
        let visible = VisibleTiles::compute(
            CameraOffset::ORIGIN,
            Viewport::new(1920, 1080),
            20,
            15,
            TILE,
        );

        assert_eq!(visible.end_column, 20);
        assert_eq!(visible.end_row, 15);
        assert!(visible.iter().all(|(column, row)| column < 20 && row < 15));
    }

    #[test]
    fn zero_tile_size_draws_nothing() {
        let visible =
            VisibleTiles::compute(CameraOffset::ORIGIN, Viewport::new(640, 480), 20, 15, 0);

        assert!(visible.is_empty());
    }

    #[test]
    fn drawn_tiles_match_the_visible_range_and_cover_the_viewport() {
        let grid = open_grid(50, 40);
        let world_width = 50 * TILE as i32;
        let world_height = 40 * TILE as i32;
        let viewports = [
            Viewport::new(640, 480),
            Viewport::new(333, 217),
            Viewport::new(1, 1),
        ];
        let cameras = [
            (0, 0),
            (13, 7),
            (64, 96),
            (world_width - 333, world_height - 217),
        ];

        for viewport in viewports {
            for (x, y) in cameras {
                let camera = CameraOffset::new(
                    x.min(world_width - viewport.width as i32),
                    y.min(world_height - viewport.height as i32),
                );
                let mut list = DrawList::new(viewport);
                let visible = FrameRenderer::new().render(
                    &mut list,
                    camera,
                    viewport,
                    &grid,
                    TILE,
                    Vec2::ZERO,
                    PLAYER,
                );

                let tiles: Vec<_> = list.fills().collect();
                let drawn: HashSet<_> = tiles[..tiles.len() - 1]
                    .iter()
                    .map(|(rect, _)| {
                        (
                            ((rect.x + camera.x) / TILE as i32) as u32,
                            ((rect.y + camera.y) / TILE as i32) as u32,
                        )
                    })
                    .collect();
                let expected: HashSet<_> = visible.iter().collect();
                assert!(expected
                    .iter()
                    .all(|&(column, row)| visible.contains(column, row)));
                assert_eq!(drawn, expected);
                assert_eq!(tiles.len() - 1, visible.len());

                for corner_x in [0, viewport.width as i32 - 1] {
                    for corner_y in [0, viewport.height as i32 - 1] {
                        let covered = tiles[..tiles.len() - 1].iter().any(|(rect, _)| {
                            corner_x >= rect.x
                                && corner_x < rect.x + rect.width as i32
                                && corner_y >= rect.y
                                && corner_y < rect.y + rect.height as i32
                        });
                        assert!(
                            covered,
                            "pixel ({corner_x}, {corner_y}) uncovered at {camera:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn tiles_use_palette_colors_and_player_is_drawn_last() {
        let grid = TileGrid::from_rows(vec![vec![0, 1, 2]]).expect("single row");
        let palette = TilePalette::default();
        let player_color = Color::from_rgb_u8(0, 0, 255);
        let mut list = DrawList::new(Viewport::new(96, 32));

        let _ = FrameRenderer::new().render(
            &mut list,
            CameraOffset::ORIGIN,
            Viewport::new(96, 32),
            &grid,
            TILE,
            Vec2::new(10.4, 0.6),
            PLAYER,
        );

        assert_eq!(
            list.fills().collect::<Vec<_>>(),
            vec![
                (ScreenRect::new(0, 0, 32, 32), palette.floor),
                (ScreenRect::new(32, 0, 32, 32), palette.wall),
                (ScreenRect::new(64, 0, 32, 32), palette.obstacle),
                (ScreenRect::new(10, 1, 32, 32), player_color),
            ]
        );
    }

    #[test]
    fn custom_palette_and_player_color_replace_the_defaults() {
        let grid = TileGrid::from_rows(vec![vec![2, 1, 0]]).expect("single row");
        let palette = TilePalette {
            floor: Color::from_rgb_u8(10, 20, 30),
            wall: Color::from_rgb_u8(90, 60, 30),
            obstacle: Color::from_rgb_u8(0, 120, 0),
        };
        let player_color = Color::from_rgb_u8(200, 50, 0);
        let renderer = FrameRenderer::new()
            .with_palette(palette)
            .with_player_color(player_color);
        let mut list = DrawList::new(Viewport::new(96, 32));

        let _ = renderer.render(
            &mut list,
            CameraOffset::ORIGIN,
            Viewport::new(96, 32),
            &grid,
            TILE,
            Vec2::ZERO,
            PLAYER,
        );

        let colors: Vec<_> = list.fills().map(|(_, color)| color).collect();
        assert_eq!(
            colors,
            vec![palette.obstacle, palette.wall, palette.floor, player_color]
        );
    }

    #[test]
    fn render_world_culls_to_the_resized_surface() {
        let world = World::new(open_grid(40, 30), &GameConfig::default());
        let renderer = FrameRenderer::new();
        let mut list = DrawList::new(Viewport::new(640, 480));

        let full = renderer.render_world(&mut list, &world);
        assert_eq!(full.len(), 300);
        assert_eq!(list.len(), 301);

        list.clear();
        list.resize(Viewport::new(100, 50));
        let small = renderer.render_world(&mut list, &world);
        assert_eq!(small.len(), 8);
        assert_eq!(list.len(), 9);
        assert_eq!(list.viewport(), Viewport::new(100, 50));
    }

    #[test]
    fn tiles_and_player_are_offset_by_the_camera() {
        let grid = open_grid(40, 30);
        let mut list = DrawList::new(Viewport::new(640, 480));

        let _ = FrameRenderer::new().render(
            &mut list,
            CameraOffset::new(40, 70),
            Viewport::new(640, 480),
            &grid,
            TILE,
            Vec2::new(300.0, 200.0),
            PLAYER,
        );

        let fills: Vec<_> = list.fills().collect();
        assert_eq!(fills[0].0, ScreenRect::new(32 - 40, 64 - 70, 32, 32));
        assert_eq!(
            fills.last().map(|(rect, _)| *rect),
            Some(ScreenRect::new(260, 130, 32, 32))
        );
    }

    #[test]
    fn debug_overlay_is_drawn_after_the_player() {
        let grid = open_grid(20, 15);
        let mut list = DrawList::new(Viewport::new(640, 480));

        let _ = FrameRenderer::new().with_debug_overlay(true).render(
            &mut list,
            CameraOffset::ORIGIN,
            Viewport::new(640, 480),
            &grid,
            TILE,
            Vec2::ZERO,
            PLAYER,
        );

        match list.commands().last() {
            Some(DrawCommand::Text { text, .. }) => {
                assert_eq!(text, "camera (0, 0)  view 640x480  grid 20x15");
            }
            other => panic!("expected overlay text, found {other:?}"),
        }
    }
}
