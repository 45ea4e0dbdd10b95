//! Request/response layer for a transport in front of the engine.
//!
//! Each operation takes a decoded [`GameRequest`], validates it into typed
//! values and returns a serializable response. Encoding and transport are
//! left to the caller; the `c4` binary reads and writes these types as JSON.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::ai::{Minimax, SearchConfig};
use crate::config::EngineConfig;
use crate::error::ServiceError;
use crate::game::{lines, Board, Player};

/// A board in wire form (`board[0]` is the bottom row), plus the optional
/// player and column some operations need.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRequest {
    /// `null` or a missing board decodes as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub board: Vec<Vec<i32>>,
    #[serde(default)]
    pub player: Option<i32>,
    #[serde(default)]
    pub column: Option<i64>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Vec<i32>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<Vec<i32>>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckWinResponse {
    /// 1 or -1 for the winner, 0 when nobody has four in a row.
    pub winner: i32,
    /// `[row, col]` of the four winning cells, omitted when there is no winner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<Vec<[usize; 2]>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidMovesResponse {
    pub valid_moves: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    pub board: Vec<Vec<i32>>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputerMoveResponse {
    pub board: Vec<Vec<i32>>,
    pub column: usize,
    pub message: String,
}

/// The four engine operations behind a transport.
pub struct Engine {
    minimax: Minimax,
}

impl Engine {
    pub fn new(search: SearchConfig) -> Self {
        Engine {
            minimax: Minimax::new(search),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.search.clone())
    }

    pub fn check_win(&self, request: &GameRequest) -> Result<CheckWinResponse, ServiceError> {
        let board = Board::from_rows(&request.board)?;
        let Some(window) = lines::winning_line(&board) else {
            return Ok(CheckWinResponse {
                winner: 0,
                line: None,
            });
        };
        let winner = window.owner().map_or(0, Player::sign);
        let line = window.positions().iter().map(|&(r, c)| [r, c]).collect();
        Ok(CheckWinResponse {
            winner,
            line: Some(line),
        })
    }

    /// A board with no cells has no legal moves rather than being an error.
    pub fn valid_moves(&self, request: &GameRequest) -> Result<ValidMovesResponse, ServiceError> {
        if request.board.iter().all(Vec::is_empty) {
            return Ok(ValidMovesResponse {
                valid_moves: Vec::new(),
            });
        }
        let board = Board::from_rows(&request.board)?;
        Ok(ValidMovesResponse {
            valid_moves: board.legal_moves(),
        })
    }

    /// Drop the requesting player's disc into the requested column.
    pub fn user_move(&self, request: &GameRequest) -> Result<MoveResponse, ServiceError> {
        let mut board = Board::from_rows(&request.board)?;
        ensure_in_progress(&board)?;
        let player = match request.player {
            Some(value) => Player::from_sign(value).ok_or(ServiceError::InvalidPlayer(value))?,
            None => return Err(ServiceError::MissingPlayer),
        };
        let column = match request.column {
            Some(value) => usize::try_from(value).map_err(|_| ServiceError::NegativeColumn(value))?,
            None => return Err(ServiceError::MissingColumn),
        };

        let row = board.drop_piece(column, player)?;
        debug!(player = player.name(), column, row, "user move applied");

        Ok(MoveResponse {
            board: board.to_rows(),
            message: format!("Move executed at column {column}"),
        })
    }

    /// Search for the side given by `player` (Yellow when absent) and play
    /// the chosen column.
    pub fn computer_move(&self, request: &GameRequest) -> Result<ComputerMoveResponse, ServiceError> {
        let mut board = Board::from_rows(&request.board)?;
        ensure_in_progress(&board)?;
        let player = match request.player {
            Some(value) => Player::from_sign(value).ok_or(ServiceError::InvalidPlayer(value))?,
            None => Player::Yellow,
        };

        let result = self.minimax.choose(&board, player);
        let column = result.column.ok_or(ServiceError::NoLegalMoves)?;
        board.drop_piece(column, player)?;
        info!(
            player = player.name(),
            column,
            score = result.score,
            "computer move"
        );

        Ok(ComputerMoveResponse {
            board: board.to_rows(),
            column,
            message: format!("Computer moved to column {column}"),
        })
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

fn ensure_in_progress(board: &Board) -> Result<(), ServiceError> {
    if let Some(winner) = lines::winner(board) {
        return Err(ServiceError::GameOver(winner));
    }
    if board.is_full() {
        return Err(ServiceError::NoLegalMoves);
    }
    Ok(())
}
