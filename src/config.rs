use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::chess::error::ProfileError;
use crate::chess::reader::Compression;
use crate::chess::timecontrol::TimeControlCategory;
use crate::stats::TimeControlPolicy;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "chess-profile.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub username: Option<String>,
    /// Rows shown per opening ranking.
    pub top_n: usize,
    /// Category for the rating series; the most played one when unset.
    pub rating_category: Option<TimeControlCategory>,
    pub max_games: Option<usize>,
    pub time_control_policy: TimeControlPolicy,
    pub compression: Compression,
    /// Width of a game-length histogram bucket, in plies.
    pub length_bucket: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            username: None,
            top_n: 5,
            rating_category: None,
            max_games: None,
            time_control_policy: TimeControlPolicy::Skip,
            compression: Compression::Auto,
            length_bucket: 20,
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let text = fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|e| ProfileError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Like [`load`](Self::load), but a missing file means defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ProfileError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(AnalysisConfig::from_toml("").unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn test_full_config() {
        let config = AnalysisConfig::from_toml(
            r#"
username = "DrNykterstein"
top_n = 10
rating_category = "blitz"
max_games = 200
time_control_policy = "abort"
compression = "zstd"
length_bucket = 10
"#,
        )
        .unwrap();

        assert_eq!(config.username.as_deref(), Some("DrNykterstein"));
        assert_eq!(config.top_n, 10);
        assert_eq!(config.rating_category, Some(TimeControlCategory::Blitz));
        assert_eq!(config.max_games, Some(200));
        assert_eq!(config.time_control_policy, TimeControlPolicy::Abort);
        assert_eq!(config.compression, Compression::Zstd);
        assert_eq!(config.length_bucket, 10);
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let config = AnalysisConfig::from_toml("top_n = 3").unwrap();
        assert_eq!(config.top_n, 3);
        assert_eq!(config.time_control_policy, TimeControlPolicy::Skip);
        assert_eq!(config.length_bucket, 20);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(AnalysisConfig::from_toml("colour = \"white\"").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"top_n = \"many\"").unwrap();

        let err = AnalysisConfig::load_or_default(&path).unwrap_err();
        assert!(matches!(err, ProfileError::Config { .. }));
    }
}
