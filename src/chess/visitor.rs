use super::error::ErrorAccumulator;
use super::types::{GameRecord, GameResult, UNKNOWN_OPENING};

use chrono::NaiveDate;
use pgn_reader::{Outcome, RawTag, SanPlus, Skip, Visitor};
use std::mem;
use std::ops::ControlFlow;
use std::str::FromStr;

/// Streaming PGN visitor (pgn-reader).
///
/// Keeps the header tags the profile needs, counts mainline half-moves and
/// skips variations. The finished game lands in `current_game`; conversion
/// problems (a non-numeric `WhiteElo`, say) land in `diagnostics`.
pub struct GameVisitor {
    headers: HeaderFields,
    ply_count: u32,
    result_marker: Option<String>,
    parse_error: ErrorAccumulator,
    pub current_game: Option<GameRecord>,
    pub diagnostics: Option<String>,
}

#[derive(Default)]
struct HeaderFields {
    white: String,
    black: String,
    result: String,
    utc_date: String,
    date: String,
    eco: String,
    opening: String,
    time_control: String,
    white_elo: String,
    black_elo: String,
    white_rating_diff: String,
    black_rating_diff: String,
}

impl HeaderFields {
    fn clear(&mut self) {
        *self = Self::default();
    }

    fn set_known_tag(&mut self, key: &[u8], value: RawTag<'_>) {
        let slot: &mut String = match key {
            b"White" => &mut self.white,
            b"Black" => &mut self.black,
            b"Result" => &mut self.result,
            b"UTCDate" => &mut self.utc_date,
            b"Date" => &mut self.date,
            b"ECO" => &mut self.eco,
            b"Opening" => &mut self.opening,
            b"TimeControl" => &mut self.time_control,
            b"WhiteElo" => &mut self.white_elo,
            b"BlackElo" => &mut self.black_elo,
            b"WhiteRatingDiff" => &mut self.white_rating_diff,
            b"BlackRatingDiff" => &mut self.black_rating_diff,
            _ => return,
        };

        if !slot.is_empty() {
            return;
        }

        let bytes = value.as_bytes();
        if bytes.is_empty() {
            return;
        }

        *slot = String::from_utf8_lossy(bytes).into_owned();
    }
}

impl Default for GameVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl GameVisitor {
    pub fn new() -> Self {
        Self {
            headers: HeaderFields::default(),
            ply_count: 0,
            result_marker: None,
            parse_error: ErrorAccumulator::default(),
            current_game: None,
            diagnostics: None,
        }
    }

    /// `?` placeholders (unrated players, unknown diffs) are not conversion errors.
    fn parse_numeric_field<T: FromStr>(
        raw: &str,
        label: &str,
        parse_error: &mut ErrorAccumulator,
    ) -> Option<T> {
        let s = raw.trim();
        if s.is_empty() || s.chars().all(|c| c == '?' || c == '-') {
            return None;
        }
        match s.parse::<T>() {
            Ok(v) => Some(v),
            Err(_) => {
                parse_error.push(&format!("Conversion error: {label}='{s}'"));
                None
            }
        }
    }

    /// First parseable of `UTCDate` then `Date`.
    fn parse_best_date(
        utc_date: &str,
        date: &str,
        parse_error: &mut ErrorAccumulator,
    ) -> Option<NaiveDate> {
        for (raw, label) in [(utc_date, "UTCDate"), (date, "Date")] {
            let s = raw.trim();
            if s.is_empty() {
                continue;
            }
            if let Some(parsed) = GameRecord::parse_date(s) {
                return Some(parsed);
            }
            // Unknown components are normal in PGN, anything else is worth reporting.
            if !s.contains('?') {
                parse_error.push(&format!("Conversion error: {label}='{s}'"));
            }
        }
        None
    }

    fn opening_name(&mut self) -> String {
        let opening = mem::take(&mut self.headers.opening);
        let eco = mem::take(&mut self.headers.eco);
        [opening, eco]
            .into_iter()
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty() && s != "?")
            .unwrap_or_else(|| UNKNOWN_OPENING.to_string())
    }

    fn build_game_record(&mut self) {
        let white_elo = Self::parse_numeric_field::<u32>(
            &self.headers.white_elo,
            "WhiteElo",
            &mut self.parse_error,
        );
        let black_elo = Self::parse_numeric_field::<u32>(
            &self.headers.black_elo,
            "BlackElo",
            &mut self.parse_error,
        );
        let white_rating_diff = Self::parse_numeric_field::<i32>(
            &self.headers.white_rating_diff,
            "WhiteRatingDiff",
            &mut self.parse_error,
        );
        let black_rating_diff = Self::parse_numeric_field::<i32>(
            &self.headers.black_rating_diff,
            "BlackRatingDiff",
            &mut self.parse_error,
        );
        let date = Self::parse_best_date(
            &self.headers.utc_date,
            &self.headers.date,
            &mut self.parse_error,
        );

        let result_raw = if self.headers.result.trim().is_empty() {
            self.result_marker.take().unwrap_or_default()
        } else {
            mem::take(&mut self.headers.result)
        };

        let opening = self.opening_name();

        self.current_game = Some(GameRecord {
            white: mem::take(&mut self.headers.white),
            black: mem::take(&mut self.headers.black),
            result: GameResult::from_pgn(&result_raw),
            time_control: mem::take(&mut self.headers.time_control),
            date,
            opening,
            white_elo,
            black_elo,
            white_rating_diff,
            black_rating_diff,
            ply_count: self.ply_count,
        });
        self.diagnostics = self.parse_error.take();
    }
}

impl Visitor for GameVisitor {
    type Tags = ();
    type Movetext = ();
    type Output = ();

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        self.headers.clear();
        self.ply_count = 0;
        self.result_marker = None;
        self.parse_error = ErrorAccumulator::default();
        self.current_game = None;
        self.diagnostics = None;
        ControlFlow::Continue(())
    }

    fn tag(
        &mut self,
        _: &mut Self::Tags,
        key: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        self.headers.set_known_tag(key, value);
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, _: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        ControlFlow::Continue(())
    }

    fn begin_variation(&mut self, _: &mut Self::Movetext) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn san(&mut self, _: &mut Self::Movetext, _: SanPlus) -> ControlFlow<Self::Output> {
        self.ply_count += 1;
        ControlFlow::Continue(())
    }

    fn outcome(&mut self, _: &mut Self::Movetext, outcome: Outcome) -> ControlFlow<Self::Output> {
        self.result_marker = Some(outcome.to_string());
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, _: Self::Movetext) -> Self::Output {
        self.build_game_record();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgn_reader::Reader;

    fn read_one(pgn: &str) -> (GameRecord, Option<String>) {
        let mut reader = Reader::new(pgn.as_bytes());
        let mut visitor = GameVisitor::new();

        reader.read_game(&mut visitor).unwrap();

        let game = visitor.current_game.take().expect("Should have parsed a game");
        (game, visitor.diagnostics.take())
    }

    #[test]
    fn test_visitor_basic_parsing() {
        let (game, diagnostics) = read_one(
            r#"[Event "Rated Blitz game"]
[White "alice"]
[Black "bob"]
[Result "1-0"]
[UTCDate "2024.02.15"]
[WhiteElo "1500"]
[BlackElo "1480"]
[WhiteRatingDiff "+6"]
[BlackRatingDiff "-6"]
[TimeControl "300+3"]
[ECO "C50"]
[Opening "Italian Game"]

1. e4 e5 2. Nf3 Nc6 3. Bc4 1-0"#,
        );

        assert_eq!(game.white, "alice");
        assert_eq!(game.black, "bob");
        assert_eq!(game.result, GameResult::WhiteWin);
        assert_eq!(game.date, NaiveDate::from_ymd_opt(2024, 2, 15));
        assert_eq!(game.white_elo, Some(1500));
        assert_eq!(game.black_elo, Some(1480));
        assert_eq!(game.white_rating_diff, Some(6));
        assert_eq!(game.black_rating_diff, Some(-6));
        assert_eq!(game.time_control, "300+3");
        assert_eq!(game.opening, "Italian Game");
        assert_eq!(game.ply_count, 5);
        assert_eq!(diagnostics, None);
    }

    #[test]
    fn test_visitor_variations_do_not_count_as_plies() {
        let (game, _) = read_one(
            r#"[White "a"]
[Black "b"]

1. e4 (1. d4 d5 2. c4) e5 2. Nf3 *"#,
        );

        assert_eq!(game.ply_count, 3);
        assert_eq!(game.result, GameResult::Unknown);
    }

    #[test]
    fn test_visitor_result_falls_back_to_movetext_marker() {
        let (game, _) = read_one(
            r#"[White "a"]
[Black "b"]

1. e4 e5 0-1"#,
        );

        assert_eq!(game.result, GameResult::BlackWin);
    }

    #[test]
    fn test_visitor_duplicate_headers_preserve_first_value() {
        let (game, _) = read_one(
            r#"[White "first"]
[White "second"]
[WhiteElo "2000"]
[WhiteElo "2500"]
1. e4 1-0"#,
        );

        assert_eq!(game.white, "first");
        assert_eq!(game.white_elo, Some(2000));
    }

    #[test]
    fn test_visitor_opening_falls_back_to_eco_then_unknown() {
        let (game, _) = read_one(
            r#"[ECO "B01"]
1. e4 d5 *"#,
        );
        assert_eq!(game.opening, "B01");

        let (game, _) = read_one(
            r#"[Event "No opening"]
1. e4 d5 *"#,
        );
        assert_eq!(game.opening, UNKNOWN_OPENING);
    }

    #[test]
    fn test_visitor_unknown_date_is_none_without_diagnostics() {
        let (game, diagnostics) = read_one(
            r#"[Date "????.??.??"]
1. e4 *"#,
        );

        assert_eq!(game.date, None);
        assert_eq!(diagnostics, None);
    }

    #[test]
    fn test_visitor_date_falls_back_from_utcdate_to_date() {
        let (game, diagnostics) = read_one(
            r#"[UTCDate "someday"]
[Date "2023.11.05"]
1. e4 *"#,
        );

        assert_eq!(game.date, NaiveDate::from_ymd_opt(2023, 11, 5));
        assert_eq!(
            diagnostics.as_deref(),
            Some("Conversion error: UTCDate='someday'")
        );
    }

    #[test]
    fn test_visitor_malformed_numeric_fields_are_reported() {
        let (game, diagnostics) = read_one(
            r#"[WhiteElo "abc"]
[BlackElo "?"]
[WhiteRatingDiff "+x"]
1. e4 *"#,
        );

        assert_eq!(game.white_elo, None);
        assert_eq!(game.black_elo, None);
        assert_eq!(game.white_rating_diff, None);
        assert_eq!(
            diagnostics.as_deref(),
            Some("Conversion error: WhiteElo='abc'; Conversion error: WhiteRatingDiff='+x'")
        );
    }

    #[test]
    fn test_visitor_resets_between_games() {
        let pgn = r#"[White "a"]
[Black "b"]
[WhiteElo "abc"]
[Result "1-0"]

1. e4 e5 2. Nf3 1-0

[White "c"]
[Black "d"]
[Result "0-1"]

1. d4 0-1
"#;
        let mut reader = Reader::new(pgn.as_bytes());
        let mut visitor = GameVisitor::new();

        reader.read_game(&mut visitor).unwrap();
        let first = visitor.current_game.take().unwrap();
        assert!(visitor.diagnostics.is_some());

        reader.read_game(&mut visitor).unwrap();
        let second = visitor.current_game.take().unwrap();

        assert_eq!(first.ply_count, 3);
        assert_eq!(second.white, "c");
        assert_eq!(second.result, GameResult::BlackWin);
        assert_eq!(second.ply_count, 1);
        assert_eq!(visitor.diagnostics, None);
    }

    #[test]
    fn test_visitor_empty_movetext() {
        let (game, _) = read_one(
            r#"[White "a"]
[Result "*"]
*"#,
        );

        assert_eq!(game.ply_count, 0);
        assert_eq!(game.result, GameResult::Unknown);
    }
}
