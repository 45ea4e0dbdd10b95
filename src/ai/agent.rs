use crate::game::GameState;

use super::heuristic::Heuristic;
use super::minimax::{Minimax, SearchConfig};

/// Anything that can pick a column for the side to move.
pub trait Agent {
    /// Select a column given the current game state, or `None` when the game
    /// is over or no column is open.
    fn select_action(&mut self, state: &GameState) -> Option<usize>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}

/// Agent backed by the alpha-beta search.
pub struct MinimaxAgent<H: Heuristic = super::heuristic::ConnectFourHeuristic> {
    engine: Minimax<H>,
}

impl MinimaxAgent {
    pub fn new(config: SearchConfig) -> Self {
        MinimaxAgent {
            engine: Minimax::new(config),
        }
    }
}

impl<H: Heuristic> MinimaxAgent<H> {
    pub fn with_engine(engine: Minimax<H>) -> Self {
        MinimaxAgent { engine }
    }
}

impl<H: Heuristic> Agent for MinimaxAgent<H> {
    fn select_action(&mut self, state: &GameState) -> Option<usize> {
        if state.is_terminal() {
            return None;
        }
        self.engine
            .choose(state.board(), state.current_player())
            .column
    }

    fn name(&self) -> &str {
        "Minimax"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::RandomAgent;
    use crate::game::{GameOutcome, Player};

    fn play(red: &mut dyn Agent, yellow: &mut dyn Agent) -> GameState {
        let mut state = GameState::initial();
        while !state.is_terminal() {
            let action = match state.current_player() {
                Player::Red => red.select_action(&state),
                Player::Yellow => yellow.select_action(&state),
            }
            .unwrap();
            state = state.apply_move(action).unwrap();
        }
        state
    }

    #[test]
    fn selects_legal_action() {
        let mut agent = MinimaxAgent::new(SearchConfig::with_depth(4));
        let state = GameState::initial();
        let action = agent.select_action(&state).unwrap();
        assert!(state.legal_actions().contains(&action), "Action {action} is not legal");
    }

    #[test]
    fn terminal_state_has_no_action() {
        let mut state = GameState::initial();
        for col in 0..4 {
            state = state.apply_move(col).unwrap();
            if col < 3 {
                state = state.apply_move(col).unwrap();
            }
        }
        let mut agent = MinimaxAgent::new(SearchConfig::with_depth(2));
        assert_eq!(agent.select_action(&state), None);
    }

    #[test]
    fn full_game_vs_self_completes() {
        let mut red = MinimaxAgent::new(SearchConfig::with_depth(3));
        let mut yellow = MinimaxAgent::new(SearchConfig::with_depth(3));
        let state = play(&mut red, &mut yellow);
        assert!(state.outcome().is_some());
    }

    #[test]
    fn beats_random_agent() {
        let games_per_color = 10;
        let mut wins = 0;

        for seed in 0..games_per_color {
            let mut minimax = MinimaxAgent::new(SearchConfig::with_depth(4));
            let mut random = RandomAgent::with_seed(seed);
            let state = play(&mut minimax, &mut random);
            if state.outcome() == Some(GameOutcome::Winner(Player::Red)) {
                wins += 1;
            }

            let mut minimax = MinimaxAgent::new(SearchConfig::with_depth(4));
            let mut random = RandomAgent::with_seed(seed + 100);
            let state = play(&mut random, &mut minimax);
            if state.outcome() == Some(GameOutcome::Winner(Player::Yellow)) {
                wins += 1;
            }
        }

        let total = games_per_color * 2;
        assert!(
            wins * 10 >= total * 8,
            "Minimax should beat random at least 80% of the time, got {wins}/{total}"
        );
    }

    #[test]
    fn agent_uses_supplied_engine() {
        struct LeftEdge;
        impl Heuristic for LeftEdge {
            fn evaluate(&self, board: &crate::game::Board) -> i32 {
                (0..board.rows()).map(|row| board.get(row, 0).value()).sum()
            }
        }

        let engine = Minimax::with_heuristic(SearchConfig::with_depth(1), LeftEdge);
        let mut agent = MinimaxAgent::with_engine(engine);
        // Red maximizes the left-column count; Yellow drives it down
        let state = GameState::initial().apply_move(3).unwrap();
        assert_eq!(agent.select_action(&state), Some(0));
        assert_eq!(agent.name(), "Minimax");
    }

    #[test]
    fn name_is_minimax() {
        let agent = MinimaxAgent::new(SearchConfig::default());
        assert_eq!(agent.name(), "Minimax");
    }
}
