use std::fs;
use std::path::{Path, PathBuf};

use ratatui::style::Color;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::grid::TileSize;

const APP_DIR_NAME: &str = "terminal-worm";
const CONFIG_FILE_NAME: &str = "config.json";

/// Tile edge in pixels for canvas-style viewports.
pub const CANVAS_TILE: TileSize = TileSize {
    width: 16,
    height: 16,
};

/// Terminal tile: two columns wide so item values up to `10` fit in one cell.
pub const TERMINAL_TILE: TileSize = TileSize {
    width: 2,
    height: 1,
};

/// Starting speed in ticks per second.
pub const BASE_SPEED: u32 = 6;

/// Speed cap in ticks per second.
pub const MAX_SPEED: u32 = 20;

/// Speed increases when the score lands exactly on a multiple of this.
pub const POINTS_PER_SPEED_STEP: u32 = 20;

/// Number of segments a fresh snake starts with.
pub const INITIAL_LENGTH: usize = 5;

/// Maximum number of items on the board at once.
pub const MAX_ITEMS: usize = 3;

/// Random placement trials per spawn request.
pub const SPAWN_ATTEMPTS: usize = 100;

/// Probability of a spawn request after each tick.
pub const SPAWN_CHANCE: f64 = 0.25;

/// Inclusive range of item values.
pub const ITEM_VALUE_MIN: u32 = 1;
pub const ITEM_VALUE_MAX: u32 = 10;

/// A color theme applied to all visual elements.
#[derive(Debug)]
pub struct Theme {
    pub snake_head: Color,
    pub snake_body: Color,
    /// Tile background behind an item's value.
    pub item_bg: Color,
    pub item_fg: Color,
    pub play_bg: Color,
    pub border_fg: Color,
    pub hud_label: Color,
    pub hud_value: Color,
    pub menu_title: Color,
    pub menu_footer: Color,
}

/// Green head, red body, yellow numbers on green diamonds.
pub const THEME_ARCADE: Theme = Theme {
    snake_head: Color::Rgb(0x66, 0xff, 0x66),
    snake_body: Color::Rgb(0xdd, 0x22, 0x33),
    item_bg: Color::Rgb(0x00, 0x66, 0x00),
    item_fg: Color::Rgb(0xff, 0xff, 0x00),
    play_bg: Color::Black,
    border_fg: Color::Rgb(0xcc, 0xff, 0x00),
    hud_label: Color::DarkGray,
    hud_value: Color::Rgb(0xff, 0xff, 0x00),
    menu_title: Color::Rgb(0x66, 0xff, 0x66),
    menu_footer: Color::DarkGray,
};

/// Tunable round parameters, read from an optional JSON file.
///
/// Item cap, value range and speed cap are fixed constants and are not part
/// of this struct.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub initial_length: usize,
    pub base_speed: u32,
    pub spawn_chance: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_length: INITIAL_LENGTH,
            base_speed: BASE_SPEED,
            spawn_chance: SPAWN_CHANCE,
        }
    }
}

impl GameConfig {
    /// Loads configuration.
    ///
    /// An explicit `path` must exist. Without one, the per-user config file is
    /// used when present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load_from_path(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parses and validates a config file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_json(&raw).map_err(|error| match error {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_length == 0 {
            return Err(ConfigError::Invalid {
                field: "initial_length",
                reason: "must be at least 1".to_owned(),
            });
        }

        if !(1..=MAX_SPEED).contains(&self.base_speed) {
            return Err(ConfigError::Invalid {
                field: "base_speed",
                reason: format!("must be between 1 and {MAX_SPEED}"),
            });
        }

        if !(0.0..=1.0).contains(&self.spawn_chance) {
            return Err(ConfigError::Invalid {
                field: "spawn_chance",
                reason: "must be between 0.0 and 1.0".to_owned(),
            });
        }

        Ok(())
    }
}

/// Returns the platform-correct per-user config file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    Some(base)
}
