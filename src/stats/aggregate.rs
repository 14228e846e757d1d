use serde::{Deserialize, Serialize};

use super::model::{
    GameLength, OpeningStats, OpponentStats, Outcome, RatingPoint, StatisticsBundle,
    UnclassifiedGame, YearMonth,
};
use crate::chess::error::ProfileError;
use crate::chess::timecontrol::classify;
use crate::chess::types::{GameRecord, UNKNOWN_OPENING};

/// What to do with a game whose `TimeControl` tag does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeControlPolicy {
    /// Leave the game out of category counts and rating series only.
    #[default]
    Skip,
    /// Fail the whole aggregation.
    Abort,
}

/// Single-pass builder for a [`StatisticsBundle`].
///
/// Games must be pushed in the order they were played; streaks, monthly
/// rollups and rating series all depend on it.
#[derive(Debug)]
pub struct Aggregator {
    username: String,
    policy: TimeControlPolicy,
    bundle: StatisticsBundle,
}

impl Aggregator {
    pub fn new(username: &str, policy: TimeControlPolicy) -> Self {
        Self {
            username: username.to_string(),
            policy,
            bundle: StatisticsBundle::new(username),
        }
    }

    pub fn push(&mut self, game: &GameRecord) -> Result<(), ProfileError> {
        let index = self.bundle.total_games;
        let category = match classify(&game.time_control) {
            Ok(category) => Some(category),
            Err(source) if self.policy == TimeControlPolicy::Abort => {
                return Err(ProfileError::TimeControl { index, source });
            }
            Err(err) => {
                log::warn!("game #{index}: {err}; left out of time-control statistics");
                self.bundle.unclassified.push(UnclassifiedGame {
                    index,
                    time_control: game.time_control.clone(),
                    issue: err.issue,
                });
                None
            }
        };

        let username = self.username.as_str();
        let bundle = &mut self.bundle;
        bundle.total_games += 1;
        if let Some(category) = category {
            *bundle.categories.entry(category).or_default() += 1;
        }

        let color = game.color_of(username);
        let outcome = Outcome::for_player(game, username);
        match outcome {
            Outcome::Undecided => bundle.undecided += 1,
            Outcome::NotInvolved => {
                log::debug!("game #{index}: '{username}' played neither side");
                bundle.not_involved += 1;
            }
            _ => {
                bundle.results.record(outcome);
            }
        }

        if let Some(color) = color {
            bundle.colors.get_mut(color).record(outcome);
        }

        bundle.streaks.record(outcome);

        if let Some(date) = game.date {
            let month = bundle.months.entry(YearMonth::from(date)).or_default();
            month.games += 1;
            if outcome == Outcome::Win {
                month.wins += 1;
                let diff = color.and_then(|c| game.rating_diff_of(c)).unwrap_or(0);
                month.rating_gain += i64::from(diff);
            }
        }

        bundle.lengths.push(GameLength {
            plies: game.ply_count,
            result: game.result,
        });

        if let Some(opponent) = game.opponent_of(username) {
            let next = bundle.opponents.len();
            let stats = bundle
                .opponents
                .entry(opponent.to_string())
                .or_insert_with(|| OpponentStats::first_seen_at(next));
            if !stats.tally.record(outcome) {
                stats.undecided += 1;
            }
        } else if color.is_some() {
            log::debug!("game #{index}: no opponent name, skipping head-to-head");
        }

        let opening = match game.opening.trim() {
            "" => UNKNOWN_OPENING,
            name => name,
        };
        let next = bundle.openings.len();
        let stats = bundle
            .openings
            .entry(opening.to_string())
            .or_insert_with(|| OpeningStats::first_seen_at(next));
        stats.games += 1;
        stats.tally.record(outcome);

        if let (Some(category), Some(color), Some(date)) = (category, color, game.date) {
            bundle
                .ratings
                .entry(category)
                .or_default()
                .push(RatingPoint {
                    date,
                    rating: game.rating_of(color),
                });
        }

        Ok(())
    }

    pub fn finish(self) -> StatisticsBundle {
        self.bundle
    }
}

/// Runs one full pass over `games` for `username`.
pub fn aggregate(
    games: &[GameRecord],
    username: &str,
    policy: TimeControlPolicy,
) -> Result<StatisticsBundle, ProfileError> {
    let mut aggregator = Aggregator::new(username, policy);
    for game in games {
        aggregator.push(game)?;
    }
    let bundle = aggregator.finish();

    log::debug!(
        "aggregated {} games for '{}' ({} unclassified, {} not involving the player)",
        bundle.total_games,
        username,
        bundle.unclassified.len(),
        bundle.not_involved
    );
    Ok(bundle)
}
