use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;

use super::model::{GameLength, OpeningStats, OpponentStats, StatisticsBundle, YearMonth};
use crate::chess::timecontrol::TimeControlCategory;
use crate::chess::types::GameResult;

/// Games this short were aborted before they started.
const MIN_COUNTED_PLIES: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpeningEntry<'a> {
    pub name: &'a str,
    #[serde(flatten)]
    pub stats: &'a OpeningStats,
    pub win_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHeadEntry<'a> {
    pub opponent: &'a str,
    pub games: usize,
    #[serde(flatten)]
    pub stats: &'a OpponentStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyPerformance {
    pub month: YearMonth,
    pub games: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub rating_gain: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LengthBucket {
    pub from_plies: u32,
    pub to_plies: u32,
    pub games: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LengthSummary {
    pub games: usize,
    pub min_plies: u32,
    pub max_plies: u32,
    pub mean_plies: f64,
    pub mean_plies_by_result: BTreeMap<GameResult, f64>,
}

impl StatisticsBundle {
    fn opening_entries(&self) -> Vec<OpeningEntry<'_>> {
        let mut entries: Vec<_> = self
            .openings
            .iter()
            .map(|(name, stats)| OpeningEntry {
                name,
                stats,
                win_rate: stats.tally.win_rate(),
            })
            .collect();
        entries.sort_by_key(|e| e.stats.first_seen);
        entries
    }

    /// Most played openings; ties go to the opening seen first.
    pub fn top_openings_by_frequency(&self, n: usize) -> Vec<OpeningEntry<'_>> {
        let mut entries = self.opening_entries();
        entries.sort_by_key(|e| Reverse(e.stats.games));
        entries.truncate(n);
        entries
    }

    pub fn top_openings_by_wins(&self, n: usize) -> Vec<OpeningEntry<'_>> {
        let mut entries = self.opening_entries();
        entries.sort_by_key(|e| Reverse(e.stats.tally.wins));
        entries.truncate(n);
        entries
    }

    /// Best win rate over decided games. Openings with fewer than
    /// `min_games` decided games (and never fewer than one) are left out.
    pub fn top_openings_by_win_rate(&self, n: usize, min_games: usize) -> Vec<OpeningEntry<'_>> {
        let min_games = min_games.max(1);
        let mut entries: Vec<_> = self
            .opening_entries()
            .into_iter()
            .filter(|e| e.stats.tally.total() >= min_games)
            .collect();
        entries.sort_by(|a, b| {
            let rate = |e: &OpeningEntry<'_>| e.win_rate.unwrap_or(0.0);
            rate(b)
                .total_cmp(&rate(a))
                .then_with(|| b.stats.tally.total().cmp(&a.stats.tally.total()))
        });
        entries.truncate(n);
        entries
    }

    pub fn worst_openings_by_losses(&self, n: usize) -> Vec<OpeningEntry<'_>> {
        let mut entries: Vec<_> = self
            .opening_entries()
            .into_iter()
            .filter(|e| e.stats.tally.losses > 0)
            .collect();
        entries.sort_by_key(|e| Reverse(e.stats.tally.losses));
        entries.truncate(n);
        entries
    }

    /// `(date, rating)` for one category, oldest first, unrated points dropped.
    /// With `max_games`, only the most recent points are kept.
    pub fn rating_series(
        &self,
        category: TimeControlCategory,
        max_games: Option<usize>,
    ) -> Vec<(NaiveDate, u32)> {
        let mut points: Vec<(NaiveDate, u32)> = self
            .ratings(category)
            .iter()
            .filter_map(|p| p.rating.map(|rating| (p.date, rating)))
            .collect();
        points.sort_by_key(|(date, _)| *date);

        if let Some(max) = max_games
            && points.len() > max
        {
            points.drain(..points.len() - max);
        }
        points
    }

    /// Opponents by games played, most frequent first.
    pub fn head_to_head_ranked(&self) -> Vec<HeadToHeadEntry<'_>> {
        let mut entries: Vec<_> = self
            .opponents
            .iter()
            .map(|(opponent, stats)| HeadToHeadEntry {
                opponent,
                games: stats.games(),
                stats,
            })
            .collect();
        entries.sort_by_key(|e| (Reverse(e.games), e.stats.first_seen));
        entries
    }

    pub fn monthly_performance(&self) -> Vec<MonthlyPerformance> {
        self.months
            .iter()
            .map(|(month, stats)| MonthlyPerformance {
                month: *month,
                games: stats.games,
                wins: stats.wins,
                win_rate: stats.win_rate(),
                rating_gain: stats.rating_gain,
            })
            .collect()
    }

    /// Category with the most games; faster categories win ties.
    pub fn most_played_category(&self) -> Option<TimeControlCategory> {
        self.categories
            .iter()
            .filter(|(_, count)| **count > 0)
            .fold(None, |best: Option<(TimeControlCategory, usize)>, (c, n)| match best {
                Some((_, best_n)) if best_n >= *n => best,
                _ => Some((*c, *n)),
            })
            .map(|(category, _)| category)
    }

    fn counted_lengths(&self) -> impl Iterator<Item = &GameLength> {
        self.lengths
            .iter()
            .filter(|l| l.plies >= MIN_COUNTED_PLIES)
    }

    /// Histogram of game lengths in buckets of `bucket_plies`; aborted
    /// games (one ply or less) are not counted.
    pub fn length_distribution(&self, bucket_plies: u32) -> Vec<LengthBucket> {
        let width = bucket_plies.max(1);
        let mut buckets: BTreeMap<u32, usize> = BTreeMap::new();
        for length in self.counted_lengths() {
            *buckets.entry(length.plies / width).or_default() += 1;
        }
        buckets
            .into_iter()
            .map(|(bucket, games)| LengthBucket {
                from_plies: bucket * width,
                to_plies: bucket * width + width - 1,
                games,
            })
            .collect()
    }

    pub fn length_summary(&self) -> Option<LengthSummary> {
        let mut games = 0usize;
        let mut total = 0u64;
        let mut min_plies = u32::MAX;
        let mut max_plies = 0u32;
        let mut by_result: BTreeMap<GameResult, (u64, usize)> = BTreeMap::new();

        for length in self.counted_lengths() {
            games += 1;
            total += u64::from(length.plies);
            min_plies = min_plies.min(length.plies);
            max_plies = max_plies.max(length.plies);
            let slot = by_result.entry(length.result).or_default();
            slot.0 += u64::from(length.plies);
            slot.1 += 1;
        }

        if games == 0 {
            return None;
        }

        Some(LengthSummary {
            games,
            min_plies,
            max_plies,
            mean_plies: total as f64 / games as f64,
            mean_plies_by_result: by_result
                .into_iter()
                .map(|(result, (sum, n))| (result, sum as f64 / n as f64))
                .collect(),
        })
    }
}
