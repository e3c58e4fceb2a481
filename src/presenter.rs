// Drives one solve interaction and exposes the result as a UiState.
//
// A click runs `Loading -> Success | Failure`. The view is rendered on entering
// `Loading` and again on settlement, so the loading panel is never left visible.

use crate::client::{ClientError, GameService, SolveResult};

/// Styling of the qualitative message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Cautionary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolutionMessage {
    pub tone: Tone,
    pub text: String,
}

impl SolutionMessage {
    /// Message for the worst-case (win - lose) margin of the returned combination.
    pub fn from_margin(margin: f64) -> Self {
        if margin >= 0.0 {
            SolutionMessage {
                tone: Tone::Positive,
                text: format!(
                    "This combination guarantees a win probability greater than or equal to \
                     the lose probability against every opponent strategy \
                     (minimum win - lose margin: {margin:.4})."
                ),
            }
        } else {
            SolutionMessage {
                tone: Tone::Cautionary,
                text: format!(
                    "No pure strategy guarantees a win probability at least equal to the lose \
                     probability against every opponent strategy. This combination is the best \
                     found by maximizing the minimum (win - lose) margin: {margin:.4}."
                ),
            }
        }
    }
}

/// Display-ready text for a successful solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveView {
    pub solution_combo: String,
    pub win_prob: String,
    pub draw_prob: String,
    pub lose_prob: String,
    /// Absent when the response had no margin element.
    pub message: Option<SolutionMessage>,
}

impl SolveView {
    pub fn from_result(result: &SolveResult) -> Self {
        SolveView {
            solution_combo: format_combo(result.solution_combo.as_deref()),
            win_prob: format_probability(result.win_prob),
            draw_prob: format_probability(result.draw_prob),
            lose_prob: format_probability(result.lose_prob),
            message: result.min_win_minus_lose_diff.map(SolutionMessage::from_margin),
        }
    }
}

pub fn format_combo(combo: Option<&[f64]>) -> String {
    match combo {
        Some(values) => values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        None => "N/A".to_string(),
    }
}

pub fn format_probability(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.4}"),
        None => "N/A".to_string(),
    }
}

/// Which panels are shown. The browser frontend toggles these with a `hidden` class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Panels {
    pub loading: bool,
    pub results: bool,
    pub error: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Success(SolveView),
    /// Full error text, ready to display.
    Failure(String),
}

impl UiState {
    pub fn panels(&self) -> Panels {
        match self {
            UiState::Idle => Panels::default(),
            UiState::Loading => Panels {
                loading: true,
                ..Panels::default()
            },
            UiState::Success(_) => Panels {
                results: true,
                ..Panels::default()
            },
            UiState::Failure(_) => Panels {
                error: true,
                ..Panels::default()
            },
        }
    }
}

/// Something that displays a [`UiState`].
pub trait View {
    fn render(&mut self, state: &UiState);
}

/// Text shown in the error panel for a failed solve.
pub fn failure_text(error: &ClientError) -> String {
    format!("An error occurred: {error}. Please check your inputs.")
}

pub struct ResultPresenter<S, V> {
    service: S,
    view: V,
    state: UiState,
}

impl<S: GameService, V: View> ResultPresenter<S, V> {
    pub fn new(service: S, view: V) -> Self {
        Self {
            service,
            view,
            state: UiState::Idle,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Run `new_game` then `solve_blotto` with the raw input values and render the outcome.
    pub async fn on_solve_requested(&mut self, troops: &str, fields: &str) -> &UiState {
        self.transition(UiState::Loading);

        let next = match self.solve(troops, fields).await {
            Ok(view) => UiState::Success(view),
            Err(e) => {
                tracing::error!("Error: {e}");
                UiState::Failure(failure_text(&e))
            }
        };

        self.transition(next);
        &self.state
    }

    async fn solve(&self, troops: &str, fields: &str) -> Result<SolveView, ClientError> {
        self.service.new_game(troops, fields).await?;
        let result = self.service.solve_blotto().await?;
        Ok(SolveView::from_result(&result))
    }

    fn transition(&mut self, next: UiState) {
        self.state = next;
        self.view.render(&self.state);
    }
}
