use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::debug;

use crate::game::{lines, Board, Player};

use super::heuristic::{ConnectFourHeuristic, Heuristic};

/// Magnitude of a won position, before the remaining-depth multiplier.
pub const WIN_SCORE: i32 = 100_000;
pub const DEFAULT_DEPTH: u32 = 5;

/// Search parameters, loadable from the `[search]` table of the engine config.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies searched below the root.
    pub depth: u32,
    pub win_score: i32,
    /// Search root moves on the rayon pool.
    pub parallel: bool,
    /// Wall-clock budget per search; unlimited when absent.
    pub time_limit_ms: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: DEFAULT_DEPTH,
            win_score: WIN_SCORE,
            parallel: false,
            time_limit_ms: None,
        }
    }
}

impl SearchConfig {
    pub fn with_depth(depth: u32) -> Self {
        SearchConfig {
            depth,
            ..Self::default()
        }
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }
}

/// Score of a node and the column that achieves it.
///
/// `column` is `None` at leaves: won positions, full boards and depth cutoffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub score: i32,
    pub column: Option<usize>,
}

impl SearchResult {
    fn leaf(score: i32) -> Self {
        SearchResult {
            score,
            column: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub cutoffs: u64,
    pub timed_out: bool,
}

impl SearchStats {
    fn merge(&mut self, other: &SearchStats) {
        self.nodes += other.nodes;
        self.cutoffs += other.cutoffs;
        self.timed_out |= other.timed_out;
    }
}

/// Depth-limited minimax with alpha-beta pruning.
///
/// Red maximizes and Yellow minimizes. Children are visited in ascending
/// column order and a later column only replaces the best one on a strictly
/// better score, so ties go to the lowest column.
pub struct Minimax<H: Heuristic = ConnectFourHeuristic> {
    config: SearchConfig,
    heuristic: H,
}

impl Minimax {
    pub fn new(config: SearchConfig) -> Self {
        Minimax {
            config,
            heuristic: ConnectFourHeuristic,
        }
    }
}

impl Default for Minimax {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl<H: Heuristic> Minimax<H> {
    pub fn with_heuristic(config: SearchConfig, heuristic: H) -> Self {
        Minimax { config, heuristic }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Best move for `player` at the configured depth.
    pub fn choose(&self, board: &Board, player: Player) -> SearchResult {
        self.search_with_stats(board, player).0
    }

    /// Like [`Minimax::choose`], also reporting node and cutoff counts.
    pub fn search_with_stats(&self, board: &Board, player: Player) -> (SearchResult, SearchStats) {
        let start = Instant::now();
        let deadline = self.config.time_limit().map(|limit| start + limit);
        let depth = self.config.depth;
        let maximizing = player == Player::Red;

        let (result, stats) = if self.config.parallel {
            self.search_root_parallel(board, depth, maximizing, deadline)
        } else {
            let mut search = Search::new(&self.heuristic, self.config.win_score, deadline);
            let result = search.minimax(board, depth, i32::MIN, i32::MAX, maximizing);
            (result, search.stats)
        };

        debug!(
            player = player.name(),
            depth,
            parallel = self.config.parallel,
            nodes = stats.nodes,
            cutoffs = stats.cutoffs,
            timed_out = stats.timed_out,
            elapsed_us = start.elapsed().as_micros() as u64,
            score = result.score,
            column = ?result.column,
            "search finished"
        );

        (result, stats)
    }

    /// Search with explicit depth and bounds, ignoring the configured depth
    /// and time limit.
    pub fn best_move(
        &self,
        board: &Board,
        depth: u32,
        alpha: i32,
        beta: i32,
        maximizing: bool,
    ) -> SearchResult {
        Search::new(&self.heuristic, self.config.win_score, None).minimax(
            board, depth, alpha, beta, maximizing,
        )
    }

    /// Root children run on the rayon pool, each with the full window and its
    /// own board copy. Picking the first strictly better score in column order
    /// gives the same answer as the sequential search.
    fn search_root_parallel(
        &self,
        board: &Board,
        depth: u32,
        maximizing: bool,
        deadline: Option<Instant>,
    ) -> (SearchResult, SearchStats) {
        let moves = board.legal_moves();
        if depth == 0 || moves.is_empty() || lines::winner(board).is_some() {
            let mut search = Search::new(&self.heuristic, self.config.win_score, deadline);
            let result = search.minimax(board, depth, i32::MIN, i32::MAX, maximizing);
            return (result, search.stats);
        }

        let side = side_to_move(maximizing);
        let children: Vec<Option<(usize, i32, SearchStats)>> = moves
            .par_iter()
            .map(|&col| {
                let child = board.with_move(col, side).ok()?;
                let mut search = Search::new(&self.heuristic, self.config.win_score, deadline);
                let score = search
                    .node(&child, depth - 1, i32::MIN, i32::MAX, !maximizing, 1)
                    .score;
                Some((col, score, search.stats))
            })
            .collect();

        let mut stats = SearchStats {
            nodes: 1,
            ..SearchStats::default()
        };
        let mut best = SearchResult {
            score: if maximizing { i32::MIN } else { i32::MAX },
            column: Some(moves[0]),
        };
        for (col, score, child_stats) in children.into_iter().flatten() {
            stats.merge(&child_stats);
            let better = if maximizing {
                score > best.score
            } else {
                score < best.score
            };
            if better {
                best = SearchResult {
                    score,
                    column: Some(col),
                };
            }
        }

        (best, stats)
    }
}

/// Search with the default heuristic and win score.
pub fn best_move(board: &Board, depth: u32, alpha: i32, beta: i32, maximizing: bool) -> SearchResult {
    Minimax::new(SearchConfig::default()).best_move(board, depth, alpha, beta, maximizing)
}

fn side_to_move(maximizing: bool) -> Player {
    if maximizing {
        Player::Red
    } else {
        Player::Yellow
    }
}

/// State of one sequential search: counters and the optional deadline.
struct Search<'a, H: Heuristic> {
    heuristic: &'a H,
    win_score: i32,
    deadline: Option<Instant>,
    stats: SearchStats,
}

impl<'a, H: Heuristic> Search<'a, H> {
    fn new(heuristic: &'a H, win_score: i32, deadline: Option<Instant>) -> Self {
        Search {
            heuristic,
            win_score,
            deadline,
            stats: SearchStats::default(),
        }
    }

    fn expired(&mut self) -> bool {
        if self.stats.timed_out {
            return true;
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.stats.timed_out = true;
            }
        }
        self.stats.timed_out
    }

    /// Winning sooner scores higher: the magnitude grows with remaining depth.
    fn terminal_score(&self, winner: Player, depth: u32) -> i32 {
        let plies_left = i32::try_from(depth).map_or(i32::MAX, |d| d.saturating_add(1));
        winner.sign() * self.win_score.saturating_mul(plies_left)
    }

    fn minimax(
        &mut self,
        board: &Board,
        depth: u32,
        alpha: i32,
        beta: i32,
        maximizing: bool,
    ) -> SearchResult {
        self.node(board, depth, alpha, beta, maximizing, 0)
    }

    /// The root (`ply == 0`) ignores the deadline on entry so that at least one
    /// child is searched and a column is always chosen.
    fn node(
        &mut self,
        board: &Board,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        ply: u32,
    ) -> SearchResult {
        self.stats.nodes += 1;

        let moves = board.legal_moves();
        if let Some(winner) = lines::winner(board) {
            return SearchResult::leaf(self.terminal_score(winner, depth));
        }
        if depth == 0 || (ply > 0 && self.expired()) {
            return SearchResult::leaf(self.heuristic.evaluate(board));
        }
        if moves.is_empty() {
            return SearchResult::leaf(0);
        }

        let side = side_to_move(maximizing);
        let mut best_col = moves[0];
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for &col in &moves {
            let Ok(child) = board.with_move(col, side) else {
                continue;
            };
            let score = self
                .node(&child, depth - 1, alpha, beta, !maximizing, ply + 1)
                .score;

            if maximizing {
                if score > best {
                    best = score;
                    best_col = col;
                }
                alpha = alpha.max(best);
            } else {
                if score < best {
                    best = score;
                    best_col = col;
                }
                beta = beta.min(best);
            }

            if beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
            if self.expired() {
                break;
            }
        }

        SearchResult {
            score: best,
            column: Some(best_col),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::heuristic::evaluate;

    fn standard(rows: &[[i32; 7]]) -> Board {
        let mut grid = vec![[0; 7]; 6];
        grid[..rows.len()].copy_from_slice(rows);
        Board::from_rows(&grid).unwrap()
    }

    fn full_search(board: &Board, depth: u32, maximizing: bool) -> SearchResult {
        best_move(board, depth, i32::MIN, i32::MAX, maximizing)
    }

    #[test]
    fn opening_move_is_central() {
        let result = full_search(&Board::standard(), 5, true);
        assert!(
            matches!(result.column, Some(2) | Some(3)),
            "expected a center column, got {:?}",
            result.column
        );
    }

    #[test]
    fn completes_three_in_a_row() {
        let board = standard(&[[1, 1, 1, 0, 0, 0, 0]]);
        assert_eq!(lines::winner(&board), None);

        // winning on the first ply leaves 4 plies of depth: 5 * WIN_SCORE
        assert_eq!(
            full_search(&board, 5, true),
            SearchResult {
                score: 5 * WIN_SCORE,
                column: Some(3)
            }
        );
        assert_eq!(
            full_search(&board, 1, true),
            SearchResult {
                score: WIN_SCORE,
                column: Some(3)
            }
        );
    }

    #[test]
    fn yellow_takes_immediate_win() {
        // Yellow stacked three in column 5; Red has scattered discs
        let board = standard(&[
            [1, 1, 0, 0, 1, -1, 0],
            [0, 0, 0, 0, 0, -1, 0],
            [0, 0, 0, 0, 0, -1, 0],
        ]);
        let result = full_search(&board, 1, false);
        assert_eq!(result.column, Some(5));
        assert_eq!(result.score, -WIN_SCORE);
    }

    #[test]
    fn blocks_opponent_win() {
        // Yellow threatens (0, 3); Red must block
        let board = standard(&[[-1, -1, -1, 0, 0, 1, 1], [0, 0, 0, 0, 0, 0, 1]]);
        for depth in [2, 3, 5] {
            assert_eq!(full_search(&board, depth, true).column, Some(3), "depth {depth}");
        }
    }

    #[test]
    fn avoids_enabling_opponent_win() {
        // Yellow has three on row 1 waiting on (1, 3); dropping into column 3
        // fills (0, 3) and hands Yellow the win.
        let board = standard(&[[1, 1, -1, 0, 0, 0, 1], [-1, -1, -1, 0, 0, 0, 1]]);
        let result = full_search(&board, 3, true);
        assert_ne!(result.column, Some(3));
        assert!(result.score > -WIN_SCORE, "score {}", result.score);

        let poisoned = board.with_move(3, Player::Red).unwrap();
        assert!(full_search(&poisoned, 2, false).score <= -WIN_SCORE);
    }

    #[test]
    fn won_position_is_a_leaf() {
        let board = standard(&[[-1, -1, -1, -1, 1, 1, 1]]);
        assert_eq!(
            full_search(&board, 3, true),
            SearchResult {
                score: -4 * WIN_SCORE,
                column: None
            }
        );
    }

    #[test]
    fn depth_zero_returns_evaluation() {
        let board = standard(&[[0, 1, -1, 1, 0, 0, 0]]);
        assert_eq!(
            full_search(&board, 0, true),
            SearchResult {
                score: evaluate(&board),
                column: None
            }
        );
    }

    #[test]
    fn full_board_is_a_draw() {
        let board = Board::from_rows(&[
            [1, -1, 1, -1],
            [1, -1, 1, -1],
            [-1, 1, -1, 1],
            [-1, 1, -1, 1],
        ])
        .unwrap();
        assert_eq!(lines::winner(&board), None);
        assert_eq!(full_search(&board, 4, true), SearchResult::leaf(0));
    }

    #[test]
    fn ties_go_to_lowest_column() {
        // both columns of a 1x2 board are center columns worth the same
        let board = Board::new(1, 2).unwrap();
        assert_eq!(
            full_search(&board, 1, true),
            SearchResult {
                score: 2,
                column: Some(0)
            }
        );
        assert_eq!(
            full_search(&board, 1, false),
            SearchResult {
                score: -2,
                column: Some(0)
            }
        );
    }

    #[test]
    fn search_does_not_mutate_input() {
        let board = standard(&[[0, 1, -1, 1, 0, 0, 0]]);
        let before = board.clone();
        full_search(&board, 4, true);
        assert_eq!(board, before);
    }

    #[test]
    fn choose_maps_player_to_side() {
        let board = standard(&[[1, 1, 1, 0, -1, -1, -1]]);
        let engine = Minimax::new(SearchConfig::with_depth(3));
        // both sides win at column 3
        assert_eq!(engine.choose(&board, Player::Red).column, Some(3));
        assert_eq!(engine.choose(&board, Player::Yellow).column, Some(3));
        assert!(engine.choose(&board, Player::Red).score > 0);
        assert!(engine.choose(&board, Player::Yellow).score < 0);
    }

    /// Values only the rightmost column, so any other choice looks neutral.
    struct RightEdge;

    impl Heuristic for RightEdge {
        fn evaluate(&self, board: &Board) -> i32 {
            let col = board.cols() - 1;
            (0..board.rows()).map(|row| board.get(row, col).value()).sum()
        }
    }

    #[test]
    fn custom_heuristic_drives_the_choice() {
        let engine = Minimax::with_heuristic(SearchConfig::with_depth(1), RightEdge);
        assert_eq!(engine.config().depth, 1);

        let board = Board::standard();
        assert_eq!(
            engine.choose(&board, Player::Red),
            SearchResult {
                score: 1,
                column: Some(6)
            }
        );
        assert_eq!(
            engine.choose(&board, Player::Yellow),
            SearchResult {
                score: -1,
                column: Some(6)
            }
        );
        // the default heuristic prefers the center instead
        assert_eq!(
            Minimax::new(SearchConfig::with_depth(1))
                .choose(&board, Player::Red)
                .column,
            Some(3)
        );
    }

    #[test]
    fn parallel_root_matches_sequential() {
        let positions = [
            Board::standard(),
            standard(&[[1, 1, -1, 0, 0, 0, 1], [-1, -1, -1, 0, 0, 0, 1]]),
            standard(&[[0, 0, -1, 1, 1, 0, 0], [0, 0, 0, -1, 0, 0, 0]]),
        ];
        for player in [Player::Red, Player::Yellow] {
            for board in &positions {
                let sequential = Minimax::new(SearchConfig::with_depth(4));
                let parallel = Minimax::new(SearchConfig {
                    parallel: true,
                    ..SearchConfig::with_depth(4)
                });
                assert_eq!(
                    sequential.choose(board, player),
                    parallel.choose(board, player)
                );
            }
        }
    }

    #[test]
    fn pruning_visits_fewer_nodes_than_full_tree() {
        let engine = Minimax::new(SearchConfig::with_depth(4));
        let (_, stats) = engine.search_with_stats(&Board::standard(), Player::Red);
        // 1 + 7 + 49 + 343 + 2401 nodes without pruning
        assert!(stats.nodes < 2801, "visited {} nodes", stats.nodes);
        assert!(stats.cutoffs > 0);
        assert!(!stats.timed_out);
    }

    #[test]
    fn expired_deadline_still_returns_a_legal_move() {
        let engine = Minimax::new(SearchConfig {
            depth: 8,
            time_limit_ms: Some(0),
            ..SearchConfig::default()
        });
        let board = standard(&[[0, 0, 1, -1, 0, 0, 0]]);
        let (result, stats) = engine.search_with_stats(&board, Player::Red);
        assert!(stats.timed_out);
        let column = result.column.expect("root always picks a column");
        assert!(board.legal_moves().contains(&column));
    }
}
