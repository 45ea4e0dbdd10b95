mod agent;
pub mod heuristic;
pub mod minimax;
mod random;

pub use agent::{Agent, MinimaxAgent};
pub use heuristic::{evaluate, ConnectFourHeuristic, Heuristic};
pub use minimax::{best_move, Minimax, SearchConfig, SearchResult, SearchStats, WIN_SCORE};
pub use random::RandomAgent;
