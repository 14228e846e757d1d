//! Single-pass statistics over one player's games.

mod aggregate;
mod model;
mod query;
mod streak;

pub use aggregate::{Aggregator, TimeControlPolicy, aggregate};
pub use model::{
    ColorSplit, GameLength, MonthStats, OpeningStats, OpponentStats, Outcome, OutcomeTally,
    RatingPoint, StatisticsBundle, UnclassifiedGame, YearMonth,
};
pub use query::{HeadToHeadEntry, LengthBucket, LengthSummary, MonthlyPerformance, OpeningEntry};
pub use streak::StreakTracker;
