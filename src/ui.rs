//! Terminal prediction display.
//!
//! Renders one confidence bar per class plus a status line (current
//! letter, streak, typed text), mirroring what the session sees each tick.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::session::TickOutcome;

#[derive(Clone, Copy, Debug)]
pub enum UiMode {
    Auto,
    Plain,
    Pretty,
}

impl UiMode {
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some("plain") => UiMode::Plain,
            Some("pretty") => UiMode::Pretty,
            _ => UiMode::Auto,
        }
    }
}

/// Live per-class confidence bars.
pub struct PredictionBoard {
    board: Option<PrettyBoard>,
}

struct PrettyBoard {
    _multi: MultiProgress,
    bars: Vec<(String, ProgressBar)>,
    status: ProgressBar,
}

impl PredictionBoard {
    pub fn new(mode: UiMode, is_tty: bool, labels: &[String]) -> Self {
        let use_pretty = match mode {
            UiMode::Pretty => true,
            UiMode::Plain => false,
            UiMode::Auto => is_tty,
        };
        if !use_pretty {
            return Self { board: None };
        }

        let multi = MultiProgress::with_draw_target(ProgressDrawTarget::stderr());
        let bar_style = ProgressStyle::with_template("{prefix:>4} {bar:40} {pos:>3}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        let bars = labels
            .iter()
            .map(|label| {
                let bar = multi.add(ProgressBar::new(100));
                bar.set_style(bar_style.clone());
                bar.set_prefix(label.clone());
                bar.set_position(0);
                (label.clone(), bar)
            })
            .collect();

        let status = multi.add(ProgressBar::new_spinner());
        let status_style = ProgressStyle::with_template("{msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        status.set_style(status_style);

        Self {
            board: Some(PrettyBoard {
                _multi: multi,
                bars,
                status,
            }),
        }
    }

    /// Redraw from one tick's outcome.
    pub fn render(&self, outcome: &TickOutcome, typed: &str) {
        let Some(board) = &self.board else {
            // Plain mode: commits are already logged; stay quiet per tick.
            if let Some(commit) = &outcome.commit {
                eprintln!("typed: {} -> \"{}\"", commit.label, typed);
            }
            return;
        };

        if let Some(sample) = &outcome.sample {
            for prediction in sample.predictions() {
                if let Some((_, bar)) = board
                    .bars
                    .iter()
                    .find(|(label, _)| label == &prediction.label)
                {
                    bar.set_position((prediction.probability * 100.0).round() as u64);
                }
            }
        }

        let current = match &outcome.top {
            Some(top) => format!("{} {:.1}%", top.label, top.probability * 100.0),
            None => "-".to_string(),
        };
        board.status.set_message(format!(
            "current: {}  streak: {}  typed: \"{}\"",
            current, outcome.streak, typed
        ));
    }

    pub fn finish(&self) {
        if let Some(board) = &self.board {
            for (_, bar) in &board.bars {
                bar.finish_and_clear();
            }
            board.status.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_mode_builds_without_bars() {
        let labels = vec!["A".to_string(), "B".to_string()];
        let board = PredictionBoard::new(UiMode::Plain, false, &labels);
        board.render(&TickOutcome::default(), "");
        board.finish();
    }
}
