//! Core Connect Four game logic: board representation, player types, line
//! scanning and a game state machine with immutable transitions.

mod board;
pub mod lines;
mod player;
mod state;

pub use board::{Board, Cell, COLS, ROWS};
pub use lines::{winner, Orientation, Window};
pub use player::Player;
pub use state::{GameOutcome, GameState};
