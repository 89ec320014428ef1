//! Immutable tile grid and its text format.

use dungeon_core::{TileCode, WorldSize};
use thiserror::Error;

/// Built-in 20x15 dungeon layout used when no map file is supplied.
const DEFAULT_DUNGEON: [[u8; 20]; 15] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 2, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 1, 2, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

/// Line prefix that marks a comment in the text map format.
const COMMENT_PREFIX: char = '#';

/// Row-major grid of tiles that never changes after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tiles: Vec<TileCode>,
}

impl TileGrid {
    /// Builds a grid from raw tile codes, one inner vector per row.
    ///
    /// Every row must have the same, non-zero length and every code must be a
    /// known [`TileCode`].
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, TileGridError> {
        let Some(first) = rows.first() else {
            return Err(TileGridError::Empty);
        };
        let expected = first.len();
        if expected == 0 {
            return Err(TileGridError::Empty);
        }

        let mut tiles = Vec::with_capacity(expected * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(TileGridError::RaggedRow {
                    row: row_index,
                    expected,
                    found: row.len(),
                });
            }
            for (column_index, &code) in row.iter().enumerate() {
                let tile = TileCode::from_code(code).ok_or(TileGridError::UnknownTile {
                    row: row_index,
                    column: column_index,
                    code,
                })?;
                tiles.push(tile);
            }
        }

        let columns = u32::try_from(expected).map_err(|_| TileGridError::TooLarge)?;
        let row_count = u32::try_from(rows.len()).map_err(|_| TileGridError::TooLarge)?;
        Ok(Self {
            columns,
            rows: row_count,
            tiles,
        })
    }

    /// Parses the text map format.
    ///
    /// Each non-blank line is a row and each digit a tile code. Commas and
    /// whitespace between digits are ignored, and lines starting with `#` are
    /// comments. Errors point at one-based lines and character columns of
    /// `source`.
    pub fn parse(source: &str) -> Result<Self, TileGridError> {
        let mut rows: Vec<Vec<u8>> = Vec::new();
        for (line_index, line) in source.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX) {
                continue;
            }
            let line_number = line_index + 1;

            let mut row = Vec::with_capacity(trimmed.len());
            for (column, character) in line.chars().enumerate() {
                if character == ',' || character.is_whitespace() {
                    continue;
                }
                let Some(digit) = character.to_digit(10) else {
                    return Err(TileGridError::InvalidCharacter {
                        line: line_number,
                        column: column + 1,
                        character,
                    });
                };
                // `to_digit(10)` is always below ten.
                let code = digit as u8;
                if TileCode::from_code(code).is_none() {
                    return Err(TileGridError::UnknownTileOnLine {
                        line: line_number,
                        column: column + 1,
                        code,
                    });
                }
                row.push(code);
            }

            if let Some(first) = rows.first() {
                if row.len() != first.len() {
                    return Err(TileGridError::RaggedLine {
                        line: line_number,
                        expected: first.len(),
                        found: row.len(),
                    });
                }
            }
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    /// The built-in 20x15 dungeon.
    #[must_use]
    pub fn default_dungeon() -> Self {
        let tiles = DEFAULT_DUNGEON
            .iter()
            .flatten()
            .map(|&code| TileCode::from_code(code).unwrap_or(TileCode::Floor))
            .collect();
        Self {
            columns: DEFAULT_DUNGEON[0].len() as u32,
            rows: DEFAULT_DUNGEON.len() as u32,
            tiles,
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Tile stored at the provided cell, or `None` outside the grid.
    #[must_use]
    pub fn tile(&self, column: u32, row: u32) -> Option<TileCode> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let index = row as usize * self.columns as usize + column as usize;
        self.tiles.get(index).copied()
    }

    /// Tiles composing a single row, or `None` outside the grid.
    #[must_use]
    pub fn row(&self, row: u32) -> Option<&[TileCode]> {
        if row >= self.rows {
            return None;
        }
        let start = row as usize * self.columns as usize;
        self.tiles.get(start..start + self.columns as usize)
    }

    /// Pixel size of the grid when every tile spans `tile_size` pixels.
    #[must_use]
    pub const fn world_size(&self, tile_size: u32) -> WorldSize {
        WorldSize::new(
            self.columns.saturating_mul(tile_size),
            self.rows.saturating_mul(tile_size),
        )
    }

    /// Number of tiles of each kind, as `(floor, wall, obstacle)`.
    #[must_use]
    pub fn tile_counts(&self) -> (usize, usize, usize) {
        self.tiles
            .iter()
            .fold((0, 0, 0), |(floor, wall, obstacle), tile| match tile {
                TileCode::Floor => (floor + 1, wall, obstacle),
                TileCode::Wall => (floor, wall + 1, obstacle),
                TileCode::Obstacle => (floor, wall, obstacle + 1),
            })
    }
}

/// Reasons a tile grid is rejected at load time.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TileGridError {
    /// The grid has no rows or its rows have no columns.
    #[error("tile grid must contain at least one tile")]
    Empty,
    /// A row's length differs from the first row's.
    #[error("row {row} has {found} tiles but the first row has {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A cell holds a code that is not a known tile.
    #[error("unknown tile code {code} at row {row}, column {column}")]
    UnknownTile {
        /// Zero-based row of the cell.
        row: usize,
        /// Zero-based column of the cell.
        column: usize,
        /// Offending code.
        code: u8,
    },
    /// A map line's tile count differs from the first row's.
    #[error("line {line} has {found} tiles but the first row has {expected}")]
    RaggedLine {
        /// One-based line number.
        line: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending line.
        found: usize,
    },
    /// A map line holds a digit that is not a known tile code.
    #[error("unknown tile code {code} at line {line}, column {column}")]
    UnknownTileOnLine {
        /// One-based line number.
        line: usize,
        /// One-based character column.
        column: usize,
        /// Offending code.
        code: u8,
    },
    /// The map text contains a character that is not a digit or separator.
    #[error("unexpected character {character:?} at line {line}, column {column}")]
    InvalidCharacter {
        /// One-based line number.
        line: usize,
        /// One-based character column.
        column: usize,
        /// Offending character.
        character: char,
    },
    /// The grid dimensions do not fit in 32 bits.
    #[error("tile grid dimensions exceed the supported range")]
    TooLarge,
}
