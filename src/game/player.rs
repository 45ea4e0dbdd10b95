use super::board::Cell;

/// One of the two sides. `Red` is player A (+1), `Yellow` is player B (-1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Red,
    Yellow,
}

impl Player {
    /// Get the other player
    pub fn other(self) -> Player {
        match self {
            Player::Red => Player::Yellow,
            Player::Yellow => Player::Red,
        }
    }

    /// Convert player to cell type
    pub fn to_cell(self) -> Cell {
        match self {
            Player::Red => Cell::Red,
            Player::Yellow => Cell::Yellow,
        }
    }

    /// +1 for Red, -1 for Yellow.
    pub fn sign(self) -> i32 {
        match self {
            Player::Red => 1,
            Player::Yellow => -1,
        }
    }

    /// Inverse of [`Player::sign`]; any other value is rejected.
    pub fn from_sign(value: i32) -> Option<Player> {
        match value {
            1 => Some(Player::Red),
            -1 => Some(Player::Yellow),
            _ => None,
        }
    }

    /// Get player name for display
    pub fn name(self) -> &'static str {
        match self {
            Player::Red => "Red",
            Player::Yellow => "Yellow",
        }
    }
}
