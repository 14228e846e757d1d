use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::{self, Write};

use crate::chess::timecontrol::TimeControlCategory;
use crate::config::AnalysisConfig;
use crate::stats::{
    HeadToHeadEntry, LengthBucket, LengthSummary, MonthlyPerformance, OpeningEntry,
    StatisticsBundle,
};

/// Knobs for rendering; derived from [`AnalysisConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub top_n: usize,
    pub rating_category: Option<TimeControlCategory>,
    pub max_games: Option<usize>,
    pub length_bucket: u32,
}

impl From<&AnalysisConfig> for ReportOptions {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            top_n: config.top_n,
            rating_category: config.rating_category,
            max_games: config.max_games,
            length_bucket: config.length_bucket,
        }
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

#[derive(Debug, Serialize)]
struct RatingSeries {
    category: TimeControlCategory,
    points: Vec<(NaiveDate, u32)>,
}

/// Bundle plus every projection, as one JSON document.
#[derive(Debug, Serialize)]
struct Report<'a> {
    bundle: &'a StatisticsBundle,
    top_openings_by_frequency: Vec<OpeningEntry<'a>>,
    top_openings_by_wins: Vec<OpeningEntry<'a>>,
    top_openings_by_win_rate: Vec<OpeningEntry<'a>>,
    worst_openings_by_losses: Vec<OpeningEntry<'a>>,
    head_to_head: Vec<HeadToHeadEntry<'a>>,
    monthly_performance: Vec<MonthlyPerformance>,
    rating_series: Option<RatingSeries>,
    length_distribution: Vec<LengthBucket>,
    length_summary: Option<LengthSummary>,
}

fn rating_category(bundle: &StatisticsBundle, options: &ReportOptions) -> Option<TimeControlCategory> {
    options
        .rating_category
        .or_else(|| bundle.most_played_category())
}

pub fn render_json(bundle: &StatisticsBundle, options: &ReportOptions) -> serde_json::Result<String> {
    let report = Report {
        bundle,
        top_openings_by_frequency: bundle.top_openings_by_frequency(options.top_n),
        top_openings_by_wins: bundle.top_openings_by_wins(options.top_n),
        top_openings_by_win_rate: bundle.top_openings_by_win_rate(options.top_n, 1),
        worst_openings_by_losses: bundle.worst_openings_by_losses(options.top_n),
        head_to_head: bundle.head_to_head_ranked(),
        monthly_performance: bundle.monthly_performance(),
        rating_series: rating_category(bundle, options).map(|category| RatingSeries {
            category,
            points: bundle.rating_series(category, options.max_games),
        }),
        length_distribution: bundle.length_distribution(options.length_bucket),
        length_summary: bundle.length_summary(),
    };
    serde_json::to_string_pretty(&report)
}

pub fn render_text(bundle: &StatisticsBundle, options: &ReportOptions) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_text(&mut out, bundle, options);
    out
}

fn write_openings(out: &mut String, title: &str, entries: &[OpeningEntry<'_>]) -> fmt::Result {
    writeln!(out, "\n{title}:")?;
    if entries.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for e in entries {
        writeln!(
            out,
            "  {}: {} games, {} wins, {:.2}% success rate",
            e.name,
            e.stats.games,
            e.stats.tally.wins,
            e.win_rate.unwrap_or(0.0) * 100.0
        )?;
    }
    Ok(())
}

fn write_text(out: &mut String, bundle: &StatisticsBundle, options: &ReportOptions) -> fmt::Result {
    let total = bundle.total_games();
    writeln!(out, "Profile for {} ({} games)", bundle.username(), total)?;

    writeln!(out, "\nGame Breakdown:")?;
    for (category, count) in bundle.categories() {
        writeln!(out, "  {category}: {count}")?;
    }
    if !bundle.unclassified().is_empty() {
        writeln!(out, "  Unclassified: {}", bundle.unclassified().len())?;
    }

    let results = bundle.results();
    let (w, l, d) = results.percentages_of(total);
    writeln!(out, "\nGame Results:")?;
    writeln!(out, "  Wins: {} ({w:.2}%)", results.wins)?;
    writeln!(out, "  Losses: {} ({l:.2}%)", results.losses)?;
    writeln!(out, "  Draws: {} ({d:.2}%)", results.draws)?;
    if bundle.undecided() > 0 {
        writeln!(out, "  Undecided: {}", bundle.undecided())?;
    }
    if bundle.not_involved() > 0 {
        writeln!(out, "  Not involving {}: {}", bundle.username(), bundle.not_involved())?;
    }

    writeln!(out, "\nBy Color:")?;
    for (label, tally) in [("White", &bundle.colors().white), ("Black", &bundle.colors().black)] {
        writeln!(
            out,
            "  {label}: +{} -{} ={}",
            tally.wins, tally.losses, tally.draws
        )?;
    }

    let streaks = bundle.streaks();
    writeln!(out, "\nLongest Streaks:")?;
    writeln!(out, "  Wins: {}", streaks.longest_win())?;
    writeln!(out, "  Losses: {}", streaks.longest_loss())?;
    writeln!(out, "  Draws: {}", streaks.longest_draw())?;

    write_openings(
        out,
        &format!("Top {} Most Played Openings", options.top_n),
        &bundle.top_openings_by_frequency(options.top_n),
    )?;
    write_openings(
        out,
        &format!("Top {} Most Successful Openings by Wins", options.top_n),
        &bundle.top_openings_by_wins(options.top_n),
    )?;
    write_openings(
        out,
        &format!("Top {} Most Successful Openings by Win Percentage", options.top_n),
        &bundle.top_openings_by_win_rate(options.top_n, 1),
    )?;
    write_openings(
        out,
        &format!("Top {} Openings by Losses", options.top_n),
        &bundle.worst_openings_by_losses(options.top_n),
    )?;

    writeln!(out, "\nMonthly Performance:")?;
    for m in bundle.monthly_performance() {
        writeln!(
            out,
            "  {}: {} games, {} wins ({:.2}%), rating gained on wins {:+}",
            m.month,
            m.games,
            m.wins,
            m.win_rate * 100.0,
            m.rating_gain
        )?;
    }

    writeln!(out, "\nHead-to-Head:")?;
    for e in bundle.head_to_head_ranked().iter().take(options.top_n) {
        writeln!(
            out,
            "  {}: {} games, +{} -{} ={}",
            e.opponent, e.games, e.stats.tally.wins, e.stats.tally.losses, e.stats.tally.draws
        )?;
    }

    if let Some(summary) = bundle.length_summary() {
        writeln!(out, "\nGame Length:")?;
        writeln!(
            out,
            "  {} games, {}-{} plies, mean {:.1}",
            summary.games, summary.min_plies, summary.max_plies, summary.mean_plies
        )?;
        for (result, mean) in &summary.mean_plies_by_result {
            writeln!(out, "  {result}: mean {mean:.1} plies")?;
        }
    }

    match rating_category(bundle, options) {
        Some(category) => {
            let series = bundle.rating_series(category, options.max_games);
            writeln!(out, "\nRating Progression ({category}):")?;
            match (series.first(), series.last()) {
                (Some((from_date, from)), Some((to_date, to))) => writeln!(
                    out,
                    "  {} points, {from} on {from_date} -> {to} on {to_date} ({:+})",
                    series.len(),
                    i64::from(*to) - i64::from(*from)
                )?,
                _ => writeln!(out, "  No rating data available for {category}.")?,
            }
        }
        None => writeln!(out, "\nNo rating data available.")?,
    }

    Ok(())
}
