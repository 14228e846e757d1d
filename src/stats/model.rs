use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use super::streak::StreakTracker;
use crate::chess::timecontrol::{TimeControlCategory, TimeControlIssue};
use crate::chess::types::{Color, GameRecord, GameResult};

/// A game's result from the tracked player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
    Draw,
    /// The player took part but the result is `*` or unreadable.
    Undecided,
    /// The player is on neither side of the board.
    NotInvolved,
}

impl Outcome {
    pub fn for_player(game: &GameRecord, username: &str) -> Self {
        let Some(color) = game.color_of(username) else {
            return Self::NotInvolved;
        };
        match game.result {
            GameResult::Draw => Self::Draw,
            GameResult::Unknown => Self::Undecided,
            result if result.winner() == Some(color) => Self::Win,
            _ => Self::Loss,
        }
    }

    pub fn is_decided(self) -> bool {
        matches!(self, Self::Win | Self::Loss | Self::Draw)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeTally {
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
}

impl OutcomeTally {
    /// Counts a decided outcome; returns `false` for anything else.
    pub fn record(&mut self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Undecided | Outcome::NotInvolved => return false,
        }
        true
    }

    pub fn total(&self) -> usize {
        self.wins + self.losses + self.draws
    }

    /// `None` until at least one decided game has been counted.
    pub fn win_rate(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.wins as f64 / total as f64)
    }

    /// Win/loss/draw shares of `denominator`, as percentages.
    pub fn percentages_of(&self, denominator: usize) -> (f64, f64, f64) {
        if denominator == 0 {
            return (0.0, 0.0, 0.0);
        }
        let pct = |n: usize| n as f64 * 100.0 / denominator as f64;
        (pct(self.wins), pct(self.losses), pct(self.draws))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ColorSplit {
    pub white: OutcomeTally,
    pub black: OutcomeTally,
}

impl ColorSplit {
    pub fn get(&self, color: Color) -> &OutcomeTally {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    pub(crate) fn get_mut(&mut self, color: Color) -> &mut OutcomeTally {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
}

/// One rating observation; the rating may be missing from the headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingPoint {
    pub date: NaiveDate,
    pub rating: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameLength {
    pub plies: u32,
    pub result: GameResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpeningStats {
    pub games: usize,
    #[serde(flatten)]
    pub tally: OutcomeTally,
    #[serde(skip)]
    pub(crate) first_seen: usize,
}

impl OpeningStats {
    pub(crate) fn first_seen_at(first_seen: usize) -> Self {
        Self {
            games: 0,
            tally: OutcomeTally::default(),
            first_seen,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpponentStats {
    #[serde(flatten)]
    pub tally: OutcomeTally,
    pub undecided: usize,
    #[serde(skip)]
    pub(crate) first_seen: usize,
}

impl OpponentStats {
    pub(crate) fn first_seen_at(first_seen: usize) -> Self {
        Self {
            tally: OutcomeTally::default(),
            undecided: 0,
            first_seen,
        }
    }

    pub fn games(&self) -> usize {
        self.tally.total() + self.undecided
    }
}

/// Calendar month key, ordered chronologically and shown as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthStats {
    pub games: usize,
    pub wins: usize,
    /// Sum of the player's own rating diff over the month's wins.
    pub rating_gain: i64,
}

impl MonthStats {
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64
        }
    }
}

/// A game left out of the category tally because its time control did not parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnclassifiedGame {
    pub index: usize,
    pub time_control: String,
    pub issue: TimeControlIssue,
}

/// Everything one aggregation pass learns about a player.
///
/// Built by [`Aggregator`](super::Aggregator) and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatisticsBundle {
    pub(crate) username: String,
    pub(crate) total_games: usize,
    pub(crate) categories: BTreeMap<TimeControlCategory, usize>,
    pub(crate) unclassified: Vec<UnclassifiedGame>,
    pub(crate) results: OutcomeTally,
    pub(crate) undecided: usize,
    pub(crate) not_involved: usize,
    pub(crate) colors: ColorSplit,
    pub(crate) streaks: StreakTracker,
    pub(crate) ratings: BTreeMap<TimeControlCategory, Vec<RatingPoint>>,
    pub(crate) openings: BTreeMap<String, OpeningStats>,
    pub(crate) lengths: Vec<GameLength>,
    pub(crate) months: BTreeMap<YearMonth, MonthStats>,
    pub(crate) opponents: BTreeMap<String, OpponentStats>,
}

impl StatisticsBundle {
    pub(crate) fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            ..Default::default()
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn total_games(&self) -> usize {
        self.total_games
    }

    pub fn category_count(&self, category: TimeControlCategory) -> usize {
        self.categories.get(&category).copied().unwrap_or(0)
    }

    pub fn categories(&self) -> &BTreeMap<TimeControlCategory, usize> {
        &self.categories
    }

    pub fn unclassified(&self) -> &[UnclassifiedGame] {
        &self.unclassified
    }

    pub fn results(&self) -> &OutcomeTally {
        &self.results
    }

    pub fn undecided(&self) -> usize {
        self.undecided
    }

    pub fn not_involved(&self) -> usize {
        self.not_involved
    }

    pub fn colors(&self) -> &ColorSplit {
        &self.colors
    }

    pub fn streaks(&self) -> &StreakTracker {
        &self.streaks
    }

    /// Rating observations for `category`, in input order.
    pub fn ratings(&self, category: TimeControlCategory) -> &[RatingPoint] {
        self.ratings.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn openings(&self) -> &BTreeMap<String, OpeningStats> {
        &self.openings
    }

    pub fn opening(&self, name: &str) -> Option<&OpeningStats> {
        self.openings.get(name)
    }

    /// `(plies, result)` for every game, in input order.
    pub fn lengths(&self) -> &[GameLength] {
        &self.lengths
    }

    pub fn months(&self) -> &BTreeMap<YearMonth, MonthStats> {
        &self.months
    }

    pub fn month(&self, year: i32, month: u32) -> Option<&MonthStats> {
        self.months.get(&YearMonth { year, month })
    }

    pub fn opponents(&self) -> &BTreeMap<String, OpponentStats> {
        &self.opponents
    }

    pub fn opponent(&self, name: &str) -> Option<&OpponentStats> {
        self.opponents.get(name)
    }
}
