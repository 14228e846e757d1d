use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Opening name used when a game carries neither `Opening` nor `ECO`.
pub const UNKNOWN_OPENING: &str = "Unknown";

/// Side to move first (`White`) or second (`Black`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

/// Game result as written in the PGN `Result` tag or movetext terminator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum GameResult {
    WhiteWin,
    BlackWin,
    Draw,
    #[default]
    Unknown,
}

impl GameResult {
    /// Maps `1-0`, `0-1` and `1/2-1/2`; anything else (including `*`) is `Unknown`.
    pub fn from_pgn(raw: &str) -> Self {
        match raw.trim() {
            "1-0" => Self::WhiteWin,
            "0-1" => Self::BlackWin,
            "1/2-1/2" | "½-½" => Self::Draw,
            _ => Self::Unknown,
        }
    }

    pub fn as_pgn(self) -> &'static str {
        match self {
            Self::WhiteWin => "1-0",
            Self::BlackWin => "0-1",
            Self::Draw => "1/2-1/2",
            Self::Unknown => "*",
        }
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            Self::WhiteWin => Some(Color::White),
            Self::BlackWin => Some(Color::Black),
            Self::Draw | Self::Unknown => None,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_pgn())
    }
}

/// One game's metadata, normalized from PGN headers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameRecord {
    pub white: String,
    pub black: String,
    pub result: GameResult,

    /// Raw `TimeControl` tag; classified lazily by the aggregation pass.
    pub time_control: String,
    pub date: Option<NaiveDate>,
    pub opening: String,

    pub white_elo: Option<u32>,
    pub black_elo: Option<u32>,
    pub white_rating_diff: Option<i32>,
    pub black_rating_diff: Option<i32>,

    /// Mainline half-moves.
    pub ply_count: u32,
}

impl GameRecord {
    /// Color played by `username`, or `None` if they played neither side.
    ///
    /// Names are compared exactly. A game with the same name on both sides
    /// resolves to White.
    pub fn color_of(&self, username: &str) -> Option<Color> {
        if username.is_empty() {
            None
        } else if self.white == username {
            Some(Color::White)
        } else if self.black == username {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// Name of the player facing `username`. Empty and `?` names count as missing.
    pub fn opponent_of(&self, username: &str) -> Option<&str> {
        let color = self.color_of(username)?;
        let name = self.player(color.opposite()).trim();
        (!name.is_empty() && name != "?").then_some(name)
    }

    pub fn player(&self, color: Color) -> &str {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    pub fn rating_of(&self, color: Color) -> Option<u32> {
        match color {
            Color::White => self.white_elo,
            Color::Black => self.black_elo,
        }
    }

    pub fn rating_diff_of(&self, color: Color) -> Option<i32> {
        match color {
            Color::White => self.white_rating_diff,
            Color::Black => self.black_rating_diff,
        }
    }

    /// Parses a PGN date (`YYYY.MM.DD`, dashes also accepted).
    ///
    /// Unknown components (`????.??.??`, `2024.??.??`) and impossible dates
    /// yield `None`.
    pub fn parse_date(raw: &str) -> Option<NaiveDate> {
        let s = raw.trim();
        if s.is_empty() || s.contains('?') {
            return None;
        }
        let norm = s.replace('.', "-");
        NaiveDate::parse_from_str(&norm, "%Y-%m-%d").ok()
    }
}
