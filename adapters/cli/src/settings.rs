//! Configuration and map loading for the command-line adapter.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use dungeon_core::GameConfig;
use dungeon_world::TileGrid;
use tracing::debug;

/// Values supplied on the command line that take precedence over the config file.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) tile_size: Option<u32>,
    pub(crate) player_speed: Option<f32>,
    pub(crate) window_width: Option<u32>,
    pub(crate) window_height: Option<u32>,
}

impl Overrides {
    fn apply(self, mut config: GameConfig) -> GameConfig {
        if let Some(tile_size) = self.tile_size {
            config.tile_size = tile_size;
        }
        if let Some(player_speed) = self.player_speed {
            config.player_speed = player_speed;
        }
        if let Some(window_width) = self.window_width {
            config.window_width = window_width;
        }
        if let Some(window_height) = self.window_height {
            config.window_height = window_height;
        }
        config
    }
}

/// Parses a TOML configuration document.
pub(crate) fn parse_config(source: &str) -> Result<GameConfig> {
    toml::from_str(source).context("failed to parse configuration toml")
}

/// Resolves the effective configuration: defaults, then the file, then overrides.
pub(crate) fn load_config(path: Option<&Path>, overrides: Overrides) -> Result<GameConfig> {
    let base = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            let config = parse_config(&contents)
                .with_context(|| format!("invalid config file {}", path.display()))?;
            debug!(path = %path.display(), "loaded config file");
            config
        }
        None => GameConfig::default(),
    };

    let config = overrides.apply(base);
    config
        .validate()
        .context("configuration rejected")?;
    Ok(config)
}

/// Loads the tile grid from `path`, or the built-in dungeon when absent.
pub(crate) fn load_map(path: Option<&Path>) -> Result<TileGrid> {
    let Some(path) = path else {
        return Ok(TileGrid::default_dungeon());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read map file {}", path.display()))?;
    let grid = TileGrid::parse(&contents)
        .with_context(|| format!("invalid map file {}", path.display()))?;
    debug!(
        path = %path.display(),
        columns = grid.columns(),
        rows = grid.rows(),
        "loaded map"
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn defaults_apply_without_a_file() {
        let config = load_config(None, Overrides::default()).expect("defaults are valid");

        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn overrides_take_precedence_over_the_file() {
        let file = write_temp("tile_size = 16\nplayer_speed = 2.0\nwindow_width = 800\n");
        let overrides = Overrides {
            player_speed: Some(6.0),
            window_height: Some(600),
            ..Overrides::default()
        };

        let config = load_config(Some(file.path()), overrides).expect("valid config");

        assert_eq!(config.tile_size, 16);
        assert_eq!(config.player_speed, 6.0);
        assert_eq!(config.window_width, 800);
        assert_eq!(config.window_height, 600);
    }

    #[test]
    fn invalid_values_are_rejected_after_overrides() {
        let overrides = Overrides {
            tile_size: Some(0),
            ..Overrides::default()
        };

        let error = load_config(None, overrides).expect_err("zero tile size");
        assert!(format!("{error:#}").contains("tile_size must be positive"));
    }

    #[test]
    fn malformed_toml_reports_the_path() {
        let file = write_temp("tile_size = \"big\"\n");

        let error = load_config(Some(file.path()), Overrides::default()).expect_err("bad type");
        assert!(format!("{error:#}").contains("invalid config file"));
    }

    #[test]
    fn map_file_is_parsed_and_validated() {
        let good = write_temp("1111\n1021\n1111\n");
        let grid = load_map(Some(good.path())).expect("valid map");
        assert_eq!((grid.columns(), grid.rows()), (4, 3));

        let ragged = write_temp("# outer wall\n1111\n101\n");
        let error = load_map(Some(ragged.path())).expect_err("ragged map");
        assert!(format!("{error:#}").contains("line 3 has 3 tiles"));
    }

    #[test]
    fn missing_map_falls_back_to_the_built_in_dungeon() {
        let grid = load_map(None).expect("built-in map");

        assert_eq!(grid, TileGrid::default_dungeon());
    }
}
