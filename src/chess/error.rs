use std::io;
use std::path::PathBuf;
use thiserror::Error;

use super::timecontrol::TimeControlError;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("game #{index}: {source}")]
    TimeControl {
        index: usize,
        #[source]
        source: TimeControlError,
    },

    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid input pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("no PGN files match '{0}'")]
    NoInput(String),

    #[error("giving up on '{origin}' after {count} consecutive unreadable games")]
    Unreadable { origin: String, count: usize },

    #[error("invalid config '{}': {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
}

/// Collects per-game conversion problems into one `"; "`-joined message.
#[derive(Debug, Clone, Default)]
pub struct ErrorAccumulator(Option<String>);

impl ErrorAccumulator {
    pub fn push(&mut self, msg: &str) {
        match &mut self.0 {
            Some(existing) => {
                existing.push_str("; ");
                existing.push_str(msg);
            }
            None => {
                self.0 = Some(msg.to_string());
            }
        }
    }

    pub fn take(&mut self) -> Option<String> {
        self.0.take()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::timecontrol::classify;

    #[test]
    fn test_push_single_message() {
        let mut accumulator = ErrorAccumulator::default();
        accumulator.push("first error");

        assert_eq!(accumulator.take().as_deref(), Some("first error"));
    }

    #[test]
    fn test_push_multiple_messages_uses_separator() {
        let mut accumulator = ErrorAccumulator::default();
        accumulator.push("first");
        accumulator.push("second");

        assert_eq!(accumulator.take().as_deref(), Some("first; second"));
    }

    #[test]
    fn test_take_consumes_accumulator() {
        let mut accumulator = ErrorAccumulator::default();
        accumulator.push("error");

        assert_eq!(accumulator.take().as_deref(), Some("error"));
        assert!(accumulator.is_empty());
        assert!(accumulator.take().is_none());
    }

    #[test]
    fn test_time_control_error_names_game_index() {
        let err = ProfileError::TimeControl {
            index: 4,
            source: classify("bad").unwrap_err(),
        };
        assert!(err.to_string().starts_with("game #4: invalid time control 'bad'"));
    }

    #[test]
    fn test_io_error_names_path() {
        let err = ProfileError::Io {
            path: PathBuf::from("games/missing.pgn"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(
            err.to_string(),
            "failed to read 'games/missing.pgn': not found"
        );
    }
}
