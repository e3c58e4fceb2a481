// Game server: owns the current game shared by the /new_game and /solve_blotto endpoints.

use std::sync::{Arc, RwLock};
use std::time::Instant;

use crate::metrics;

use super::game::{Game, Limits, Solution, SolverError};

/// Holds the single game instance the HTTP endpoints operate on.
///
/// `/new_game` replaces it and `/solve_blotto` solves whatever is current, so two
/// clients interleaving those calls see each other's games.
pub struct GameServer {
    current: RwLock<Arc<Game>>,
    limits: Limits,
}

impl GameServer {
    pub fn new(troops: u32, fields: u32, limits: Limits) -> Result<Self, SolverError> {
        let game = Game::new(troops, fields, limits)?;
        metrics::CURRENT_GAME_COMBOS.set(game.combos().len() as i64);
        Ok(Self {
            current: RwLock::new(Arc::new(game)),
            limits,
        })
    }

    /// Snapshot of the current game.
    pub fn current(&self) -> Arc<Game> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the current game. On error the previous game stays in place.
    pub fn new_game(&self, troops: u32, fields: u32) -> Result<(), SolverError> {
        let game = Game::new(troops, fields, self.limits)?;
        let combos = game.combos().len();
        let work = game.solve_work();
        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Arc::new(game);

        metrics::NEW_GAMES_TOTAL.inc();
        metrics::CURRENT_GAME_COMBOS.set(combos as i64);
        tracing::info!(
            "New game: {troops} troops, {fields} fields, {combos} combinations, ~{work} evaluations"
        );
        Ok(())
    }

    /// Solve the current game on a blocking thread.
    pub async fn solve(&self) -> Result<Solution, String> {
        let game = self.current();
        let start = Instant::now();

        let result = tokio::task::spawn_blocking(move || game.solve())
            .await
            .map_err(|e| format!("Solver task failed: {e}"));

        let elapsed = start.elapsed().as_secs_f64();
        match &result {
            Ok(solution) => {
                metrics::SOLVES_TOTAL.inc();
                metrics::SOLVE_DURATION_SECONDS.observe(elapsed);
                tracing::info!(
                    "Solved in {elapsed:.3}s: {:?} (min win-lose {:.4}, dominant: {})",
                    solution.solution_combo,
                    solution.min_win_minus_lose_diff,
                    solution.is_dominant()
                );
            }
            Err(e) => {
                metrics::SOLVE_ERRORS_TOTAL.inc();
                tracing::error!("{e}");
            }
        }
        result
    }
}
