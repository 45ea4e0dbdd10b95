use std::path::Path;

use tracing::warn;

use crate::ai::SearchConfig;
use crate::error::{BoardError, ConfigError};
use crate::game::{Board, COLS, ROWS};

/// Shape of boards created from scratch (e.g. by `c4 play`). Boards decoded
/// from requests carry their own shape.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            rows: ROWS,
            cols: COLS,
        }
    }
}

impl BoardConfig {
    pub fn empty_board(&self) -> Result<Board, BoardError> {
        Board::new(self.rows, self.cols)
    }
}

/// Top-level engine configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub search: SearchConfig,
    pub board: BoardConfig,
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: EngineConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.depth == 0 {
            return Err(ConfigError::Validation(
                "search.depth must be >= 1".into(),
            ));
        }
        if self.search.win_score <= 0 {
            return Err(ConfigError::Validation(
                "search.win_score must be > 0".into(),
            ));
        }
        // the deepest win is scored win_score * (depth + 1)
        let fits = i32::try_from(self.search.depth)
            .ok()
            .and_then(|d| d.checked_add(1))
            .and_then(|plies| self.search.win_score.checked_mul(plies))
            .is_some();
        if !fits {
            return Err(ConfigError::Validation(
                "search.win_score * (search.depth + 1) must fit in a 32-bit score".into(),
            ));
        }
        if self.board.rows == 0 || self.board.cols == 0 {
            return Err(ConfigError::Validation(
                "board.rows and board.cols must be >= 1".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&EngineConfig::default())
    }
}
