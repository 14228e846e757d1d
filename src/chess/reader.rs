use super::error::ProfileError;
use super::types::GameRecord;
use super::visitor::GameVisitor;

use pgn_reader::Reader;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use zstd::stream::read::Decoder as ZstdDecoder;

pub type PgnInput = Box<dyn Read + Send>;

/// A stream that keeps failing is not going to recover.
const MAX_CONSECUTIVE_PARSE_ERRORS: usize = 64;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Zstd for `.zst` files, plain otherwise.
    #[default]
    Auto,
    Plain,
    Zstd,
}

impl Compression {
    fn resolve(self, path: &Path) -> Self {
        match self {
            Self::Auto => {
                let is_zst = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("zst"));
                if is_zst { Self::Zstd } else { Self::Plain }
            }
            other => other,
        }
    }
}

impl FromStr for Compression {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim();
        if normalized.eq_ignore_ascii_case("auto") {
            Ok(Self::Auto)
        } else if normalized.eq_ignore_ascii_case("plain") || normalized.eq_ignore_ascii_case("none")
        {
            Ok(Self::Plain)
        } else if normalized.eq_ignore_ascii_case("zstd") {
            Ok(Self::Zstd)
        } else {
            Err(format!(
                "Invalid compression value '{}'. Supported values: 'auto', 'plain' or 'zstd'.",
                normalized
            ))
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Plain => "plain",
            Self::Zstd => "zstd",
        })
    }
}

/// Expands one input argument: glob patterns (containing `*` or `?`) are
/// matched and sorted, anything else is taken as a literal path.
pub fn expand_inputs(pattern: &str) -> Result<Vec<PathBuf>, ProfileError> {
    if !(pattern.contains('*') || pattern.contains('?')) {
        return Ok(vec![PathBuf::from(pattern)]);
    }

    let mut paths: Vec<PathBuf> = glob::glob(pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(ProfileError::NoInput(pattern.to_string()));
    }
    Ok(paths)
}

pub fn open_input_stream(path: &Path, compression: Compression) -> Result<PgnInput, ProfileError> {
    let io_err = |source: io::Error| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    match compression.resolve(path) {
        Compression::Zstd => ZstdDecoder::new(file)
            .map(|decoder| Box::new(decoder) as PgnInput)
            .map_err(io_err),
        Compression::Plain | Compression::Auto => Ok(Box::new(file)),
    }
}

/// Reads every game from `input`, in order.
///
/// Games the parser rejects are logged and skipped. `origin` names the
/// stream in log lines and errors.
pub fn read_games_from<R: Read>(input: R, origin: &str) -> Result<Vec<GameRecord>, ProfileError> {
    let mut reader = Reader::new(input);
    let mut visitor = GameVisitor::new();
    let mut games = Vec::new();
    let mut game_index = 1usize;
    let mut consecutive_errors = 0usize;

    loop {
        match reader.read_game(&mut visitor) {
            Ok(Some(())) => {
                consecutive_errors = 0;
                if let Some(diagnostics) = visitor.diagnostics.take() {
                    log::warn!("{origin}: game #{game_index}: {diagnostics}");
                }
                if let Some(game) = visitor.current_game.take() {
                    games.push(game);
                }
            }
            Ok(None) => break,
            Err(error) if error.kind() == io::ErrorKind::InvalidData => {
                consecutive_errors += 1;
                log::warn!("{origin}: skipping game #{game_index}: {error}");
                if consecutive_errors >= MAX_CONSECUTIVE_PARSE_ERRORS {
                    return Err(ProfileError::Unreadable {
                        origin: origin.to_string(),
                        count: consecutive_errors,
                    });
                }
            }
            Err(source) => {
                return Err(ProfileError::Io {
                    path: PathBuf::from(origin),
                    source,
                });
            }
        }
        game_index += 1;
    }

    log::debug!("{origin}: read {} games", games.len());
    Ok(games)
}

/// Reads all games from the given paths or glob patterns, preserving order.
///
/// When more than one file is involved, files that cannot be opened are
/// logged and skipped; a single unreadable file is an error.
pub fn read_games<S: AsRef<str>>(
    inputs: &[S],
    compression: Compression,
) -> Result<Vec<GameRecord>, ProfileError> {
    let mut paths = Vec::new();
    for input in inputs {
        paths.extend(expand_inputs(input.as_ref())?);
    }

    let mut games = Vec::new();
    for path in &paths {
        let stream = match open_input_stream(path, compression) {
            Ok(stream) => stream,
            Err(err) if paths.len() > 1 => {
                log::warn!("{err}");
                continue;
            }
            Err(err) => return Err(err),
        };
        games.extend(read_games_from(stream, &path.display().to_string())?);
    }
    Ok(games)
}
