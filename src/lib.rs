//! Player statistics over PGN game collections.
//!
//! Games are read with [`chess::read_games`], folded into a
//! [`StatisticsBundle`] by [`aggregate`], and rendered by [`report`].

pub mod chess;
pub mod config;
pub mod report;
pub mod stats;

pub use chess::{
    Color, Compression, GameRecord, GameResult, ProfileError, TimeControlCategory, classify,
    read_games, read_games_from,
};
pub use config::AnalysisConfig;
pub use stats::{Aggregator, StatisticsBundle, TimeControlPolicy, aggregate};
