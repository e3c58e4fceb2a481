// Terminal rendering of the presenter state for the interactive client.

use std::io::Write;

use crate::presenter::{Tone, UiState, View};

/// Writes each rendered state as plain text.
pub struct TerminalView<W: Write> {
    out: W,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_state(&mut self, state: &UiState) -> std::io::Result<()> {
        match state {
            UiState::Idle => {}
            UiState::Loading => writeln!(self.out, "\nCalculating solution...")?,
            UiState::Success(view) => {
                writeln!(self.out, "\nSolution to the puzzle: {}", view.solution_combo)?;
                writeln!(self.out, "  Probability of Winning: {}", view.win_prob)?;
                writeln!(self.out, "  Probability of Drawing: {}", view.draw_prob)?;
                writeln!(self.out, "  Probability of Losing:  {}", view.lose_prob)?;
                if let Some(message) = &view.message {
                    let label = match message.tone {
                        Tone::Positive => "OK",
                        Tone::Cautionary => "Note",
                    };
                    writeln!(self.out, "\n{label}: {}", message.text)?;
                }
            }
            UiState::Failure(text) => writeln!(self.out, "\n{text}")?,
        }
        self.out.flush()
    }
}

impl<W: Write> View for TerminalView<W> {
    fn render(&mut self, state: &UiState) {
        if let Err(e) = self.write_state(state) {
            tracing::warn!("Failed to write to terminal: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::{SolutionMessage, SolveView};

    fn rendered(state: &UiState) -> String {
        let mut view = TerminalView::new(Vec::new());
        view.render(state);
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn test_render_success() {
        let state = UiState::Success(SolveView {
            solution_combo: "3, 5, 2".to_string(),
            win_prob: "0.6200".to_string(),
            draw_prob: "0.1000".to_string(),
            lose_prob: "0.2800".to_string(),
            message: Some(SolutionMessage::from_margin(-0.05)),
        });
        let text = rendered(&state);
        assert!(text.contains("Solution to the puzzle: 3, 5, 2"));
        assert!(text.contains("Probability of Losing:  0.2800"));
        assert!(text.contains("Note: No pure strategy"));
    }

    #[test]
    fn test_render_failure_and_idle() {
        let text = rendered(&UiState::Failure("An error occurred: boom. Please check your inputs.".into()));
        assert_eq!(text.trim(), "An error occurred: boom. Please check your inputs.");
        assert_eq!(rendered(&UiState::Idle), "");
    }
}
