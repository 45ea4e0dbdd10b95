use std::path::PathBuf;

use crate::game::Player;

/// Reasons a decoded grid cannot be turned into a [`Board`](crate::game::Board).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board has no rows")]
    Empty,

    #[error("board dimensions must be positive (got {rows}x{cols})")]
    ZeroDimension { rows: usize, cols: usize },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("cell ({row}, {col}) holds {value}, expected -1, 0 or 1")]
    InvalidCell { row: usize, col: usize, value: i32 },
}

/// Reasons a disc cannot be dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {column} is out of range (board has {cols} columns)")]
    InvalidColumn { column: usize, cols: usize },

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("game is already over")]
    GameOver,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors surfaced to the request layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("malformed board: {0}")]
    Board(#[from] BoardError),

    #[error("illegal move: {0}")]
    Move(#[from] MoveError),

    #[error("player must be 1 or -1, got {0}")]
    InvalidPlayer(i32),

    #[error("request is missing a player")]
    MissingPlayer,

    #[error("request is missing a column")]
    MissingColumn,

    #[error("column {0} is negative")]
    NegativeColumn(i64),

    #[error("{} has already won", .0.name())]
    GameOver(Player),

    #[error("board is full, no legal moves")]
    NoLegalMoves,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_display() {
        let err = BoardError::RaggedRow {
            row: 2,
            expected: 7,
            found: 6,
        };
        assert_eq!(err.to_string(), "row 2 has 6 cells, expected 7");

        let err = BoardError::InvalidCell {
            row: 0,
            col: 3,
            value: 2,
        };
        assert_eq!(err.to_string(), "cell (0, 3) holds 2, expected -1, 0 or 1");
    }

    #[test]
    fn test_move_error_display() {
        let err = MoveError::InvalidColumn { column: 9, cols: 7 };
        assert_eq!(
            err.to_string(),
            "column 9 is out of range (board has 7 columns)"
        );
        assert_eq!(MoveError::ColumnFull(4).to_string(), "column 4 is full");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("search.depth must be >= 1".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: search.depth must be >= 1"
        );
    }

    #[test]
    fn test_service_error_wraps_move_error() {
        let err: ServiceError = MoveError::ColumnFull(0).into();
        assert_eq!(err.to_string(), "illegal move: column 0 is full");
        assert_eq!(
            ServiceError::GameOver(Player::Yellow).to_string(),
            "Yellow has already won"
        );
    }
}
