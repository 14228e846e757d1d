use serde::Serialize;

use super::model::Outcome;

/// Running and longest win/loss/draw runs for one player.
///
/// A decided game extends its own run and resets the other two. Undecided
/// games and games the player did not play leave every run untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakTracker {
    current_win: usize,
    current_loss: usize,
    current_draw: usize,
    longest_win: usize,
    longest_loss: usize,
    longest_draw: usize,
}

impl StreakTracker {
    pub fn record(&mut self, outcome: Outcome) {
        let (extend, reset_a, reset_b) = match outcome {
            Outcome::Win => (
                &mut self.current_win,
                &mut self.current_loss,
                &mut self.current_draw,
            ),
            Outcome::Loss => (
                &mut self.current_loss,
                &mut self.current_win,
                &mut self.current_draw,
            ),
            Outcome::Draw => (
                &mut self.current_draw,
                &mut self.current_win,
                &mut self.current_loss,
            ),
            Outcome::Undecided | Outcome::NotInvolved => return,
        };
        *extend += 1;
        *reset_a = 0;
        *reset_b = 0;

        self.longest_win = self.longest_win.max(self.current_win);
        self.longest_loss = self.longest_loss.max(self.current_loss);
        self.longest_draw = self.longest_draw.max(self.current_draw);
    }

    pub fn longest_win(&self) -> usize {
        self.longest_win
    }

    pub fn longest_loss(&self) -> usize {
        self.longest_loss
    }

    pub fn longest_draw(&self) -> usize {
        self.longest_draw
    }

    /// The run still open after the last decided game, if any.
    pub fn current(&self) -> Option<(Outcome, usize)> {
        [
            (Outcome::Win, self.current_win),
            (Outcome::Loss, self.current_loss),
            (Outcome::Draw, self.current_draw),
        ]
        .into_iter()
        .find(|(_, run)| *run > 0)
    }
}
