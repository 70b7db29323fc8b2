//! Editor configuration
//!
//! All fields are optional in the JSON form; missing ones fall back to
//! [`EditorConfig::default`].
//!
//! ```rust
//! use layout_editor_core::{EditorConfig, SeatNaming};
//!
//! let config = EditorConfig::from_json_str(r#"{ "maxHistory": 20, "seatNaming": "position" }"#).unwrap();
//! assert_eq!(config.max_history, 20);
//! assert_eq!(config.seat_naming, SeatNaming::Position);
//! assert_eq!(config.default_grid_size.width, 10);
//! ```

use crate::grid::GridSize;
use crate::history::DEFAULT_MAX_HISTORY;
use crate::layout::DEFAULT_CELL_SIZE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the file failed.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON.
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    /// Parsed, but semantically invalid.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How freshly placed seats are named
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatNaming {
    /// `A-01`, `A-02`, ... from a counter stored on the layout.
    #[default]
    Counter,
    /// Row letter and column number of the cell (`(2, 0)` is `A-03`).
    Position,
}

/// Editor defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Grid size for newly created layouts.
    pub default_grid_size: GridSize,
    /// Category for newly created layouts.
    pub default_category: String,
    /// Pixel size of one cell (for renderers).
    pub cell_size: u32,
    /// Maximum number of history snapshots, including the initial one.
    pub max_history: usize,
    /// Seat naming strategy.
    pub seat_naming: SeatNaming,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_grid_size: GridSize::new(10, 10),
            default_category: "general".to_string(),
            cell_size: DEFAULT_CELL_SIZE,
            max_history: DEFAULT_MAX_HISTORY,
            seat_naming: SeatNaming::Counter,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), "loaded editor config");
        Ok(config)
    }

    /// Semantic checks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.default_grid_size.is_valid_grid() {
            return Err(ConfigError::Invalid(format!(
                "defaultGridSize {} is out of range",
                self.default_grid_size
            )));
        }
        if self.max_history == 0 {
            return Err(ConfigError::Invalid(
                "maxHistory must be at least 1".to_string(),
            ));
        }
        if self.cell_size == 0 {
            return Err(ConfigError::Invalid("cellSize must be positive".to_string()));
        }
        Ok(())
    }
}
