use clap::Parser;
use std::path::PathBuf;

use chess_profile::{AnalysisConfig, Compression, TimeControlCategory, TimeControlPolicy};

#[derive(Parser, Debug)]
#[command(author, version, about = "Player statistics from PGN game collections")]
pub struct Cli {
    /// PGN files or glob patterns (`.zst` files are decompressed)
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Player to profile
    #[arg(short, long)]
    pub user: Option<String>,

    /// TOML config file (defaults to ./chess-profile.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Category for the rating series (bullet, blitz, rapid, classical)
    #[arg(long)]
    pub category: Option<TimeControlCategory>,

    /// Keep only the most recent N rating points
    #[arg(long)]
    pub max_games: Option<usize>,

    /// Rows per ranking
    #[arg(long)]
    pub top: Option<usize>,

    /// Fail on the first unparseable time control instead of skipping it
    #[arg(long)]
    pub strict: bool,

    #[arg(long)]
    pub compression: Option<Compression>,

    /// Print the statistics as JSON
    #[arg(long)]
    pub json: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Flags given on the command line win over the config file.
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(user) = &self.user {
            config.username = Some(user.clone());
        }
        if self.category.is_some() {
            config.rating_category = self.category;
        }
        if self.max_games.is_some() {
            config.max_games = self.max_games;
        }
        if let Some(top) = self.top {
            config.top_n = top;
        }
        if self.strict {
            config.time_control_policy = TimeControlPolicy::Abort;
        }
        if let Some(compression) = self.compression {
            config.compression = compression;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "chess-profile",
            "games/*.pgn",
            "--user",
            "me",
            "--category",
            "rapid",
            "--top",
            "3",
            "--strict",
            "--compression",
            "zstd",
        ]);
        let mut config = AnalysisConfig {
            username: Some("someone".to_string()),
            max_games: Some(50),
            ..Default::default()
        };
        cli.apply(&mut config);

        assert_eq!(cli.inputs, ["games/*.pgn"]);
        assert_eq!(config.username.as_deref(), Some("me"));
        assert_eq!(config.rating_category, Some(TimeControlCategory::Rapid));
        assert_eq!(config.max_games, Some(50));
        assert_eq!(config.top_n, 3);
        assert_eq!(config.time_control_policy, TimeControlPolicy::Abort);
        assert_eq!(config.compression, Compression::Zstd);
    }

    #[test]
    fn test_inputs_are_required() {
        assert!(Cli::try_parse_from(["chess-profile", "--user", "me"]).is_err());
    }
}
