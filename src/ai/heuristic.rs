use crate::game::lines::{self, Window};
use crate::game::{Board, Cell};

/// Points per disc in a center column.
pub const CENTER_WEIGHT: i32 = 2;

/// Score of a window holding only one side's discs, indexed by disc count.
/// Four of a kind is a terminal position and never scored here.
pub const WINDOW_WEIGHTS: [i32; 4] = [0, 1, 10, 50];

/// Trait for scoring a non-terminal board.
///
/// Scores are absolute: positive favors Red (+1), negative favors Yellow (-1).
pub trait Heuristic: Send + Sync {
    fn evaluate(&self, board: &Board) -> i32;
}

/// Center bias plus a score for every 4-cell window.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectFourHeuristic;

impl ConnectFourHeuristic {
    /// Signed score of one window. Mixed windows are dead and score 0.
    pub fn score_window(window: &Window) -> i32 {
        let red = window.count(Cell::Red);
        let yellow = window.count(Cell::Yellow);
        match (red, yellow) {
            (n @ 1..=3, 0) => WINDOW_WEIGHTS[n],
            (0, n @ 1..=3) => -WINDOW_WEIGHTS[n],
            _ => 0,
        }
    }

    /// `cols / 2` for odd widths, `cols / 2 - 1` and `cols / 2` for even widths.
    pub fn center_columns(cols: usize) -> Vec<usize> {
        if cols % 2 == 1 {
            vec![cols / 2]
        } else {
            vec![cols / 2 - 1, cols / 2]
        }
    }

    fn center_bias(board: &Board) -> i32 {
        Self::center_columns(board.cols())
            .into_iter()
            .flat_map(|col| (0..board.rows()).map(move |row| (row, col)))
            .map(|(row, col)| CENTER_WEIGHT * board.get(row, col).value())
            .sum()
    }
}

impl Heuristic for ConnectFourHeuristic {
    fn evaluate(&self, board: &Board) -> i32 {
        let windows: i32 = lines::windows(board)
            .map(|w| Self::score_window(&w))
            .sum();
        Self::center_bias(board) + windows
    }
}

/// Evaluate with the default heuristic.
pub fn evaluate(board: &Board) -> i32 {
    ConnectFourHeuristic.evaluate(board)
}
