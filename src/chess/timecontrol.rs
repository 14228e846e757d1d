use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

static BASE_INCREMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)\s*\+\s*(\d+)\s*$").expect("valid base+increment regex")
});

/// Speed bucket of a game, derived from its base time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeControlCategory {
    Bullet,
    Blitz,
    Rapid,
    Classical,
}

impl TimeControlCategory {
    pub const ALL: [Self; 4] = [Self::Bullet, Self::Blitz, Self::Rapid, Self::Classical];

    pub fn from_base_seconds(base_seconds: u32) -> Self {
        match base_seconds {
            0..=179 => Self::Bullet,
            180..=480 => Self::Blitz,
            481..=1500 => Self::Rapid,
            _ => Self::Classical,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bullet => "Bullet",
            Self::Blitz => "Blitz",
            Self::Rapid => "Rapid",
            Self::Classical => "Classical",
        }
    }
}

impl fmt::Display for TimeControlCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown time-control category '{0}'. Supported values: bullet, blitz, rapid, classical")]
pub struct UnknownCategoryError(pub String);

impl FromStr for TimeControlCategory {
    type Err = UnknownCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| UnknownCategoryError(normalized.to_string()))
    }
}

/// Why a `TimeControl` tag could not be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum TimeControlIssue {
    #[error("empty input")]
    Empty,
    #[error("expected '<base>+<increment>' in whole seconds")]
    NotBaseIncrement,
    #[error("value out of range")]
    Overflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time control '{raw}': {issue}")]
pub struct TimeControlError {
    pub raw: String,
    pub issue: TimeControlIssue,
}

impl TimeControlError {
    fn new(raw: &str, issue: TimeControlIssue) -> Self {
        Self {
            raw: raw.to_string(),
            issue,
        }
    }
}

/// A parsed `base+increment` time control, both in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeControl {
    pub base_seconds: u32,
    pub increment_seconds: u32,
}

impl TimeControl {
    /// The increment does not take part in classification.
    pub fn category(&self) -> TimeControlCategory {
        TimeControlCategory::from_base_seconds(self.base_seconds)
    }
}

pub fn parse_timecontrol(raw: &str) -> Result<TimeControl, TimeControlError> {
    if raw.trim().is_empty() {
        return Err(TimeControlError::new(raw, TimeControlIssue::Empty));
    }

    let captures = BASE_INCREMENT_RE
        .captures(raw)
        .ok_or_else(|| TimeControlError::new(raw, TimeControlIssue::NotBaseIncrement))?;

    // The pattern only admits digits, so a failed parse means overflow.
    let parse = |idx: usize| {
        captures[idx]
            .parse::<u32>()
            .map_err(|_| TimeControlError::new(raw, TimeControlIssue::Overflow))
    };

    Ok(TimeControl {
        base_seconds: parse(1)?,
        increment_seconds: parse(2)?,
    })
}

/// Classifies a raw `TimeControl` tag such as `"300+3"`.
pub fn classify(raw: &str) -> Result<TimeControlCategory, TimeControlError> {
    parse_timecontrol(raw).map(|tc| tc.category())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0+0", TimeControlCategory::Bullet)]
    #[case("60+1", TimeControlCategory::Bullet)]
    #[case("179+0", TimeControlCategory::Bullet)]
    #[case("180+0", TimeControlCategory::Blitz)]
    #[case("300+3", TimeControlCategory::Blitz)]
    #[case("480+0", TimeControlCategory::Blitz)]
    #[case("481+0", TimeControlCategory::Rapid)]
    #[case("600+5", TimeControlCategory::Rapid)]
    #[case("1500+0", TimeControlCategory::Rapid)]
    #[case("1501+0", TimeControlCategory::Classical)]
    #[case("5400+30", TimeControlCategory::Classical)]
    fn test_category_threshold_boundaries(
        #[case] raw: &str,
        #[case] expected: TimeControlCategory,
    ) {
        assert_eq!(classify(raw).unwrap(), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(2)]
    #[case(60)]
    #[case(3600)]
    fn test_increment_never_changes_category(#[case] increment: u32) {
        for base in [0u32, 179, 180, 480, 481, 1500, 1501] {
            let raw = format!("{base}+{increment}");
            assert_eq!(
                classify(&raw).unwrap(),
                TimeControlCategory::from_base_seconds(base),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_parse_keeps_both_fields() {
        let tc = parse_timecontrol("300+3").unwrap();
        assert_eq!(tc.base_seconds, 300);
        assert_eq!(tc.increment_seconds, 3);
    }

    #[test]
    fn test_surrounding_whitespace_is_tolerated() {
        assert_eq!(classify(" 180 + 2 ").unwrap(), TimeControlCategory::Blitz);
    }

    #[rstest]
    #[case("bad")]
    #[case("-")]
    #[case("?")]
    #[case("300")]
    #[case("1+2+3")]
    #[case("+5")]
    #[case("5+")]
    #[case("-60+0")]
    #[case("40/5400+30")]
    fn test_malformed_input_is_rejected(#[case] raw: &str) {
        let err = classify(raw).unwrap_err();
        assert_eq!(err.raw, raw);
        assert_eq!(err.issue, TimeControlIssue::NotBaseIncrement);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert_eq!(classify("  ").unwrap_err().issue, TimeControlIssue::Empty);
    }

    #[test]
    fn test_overflow_is_rejected() {
        let err = classify("99999999999+0").unwrap_err();
        assert_eq!(err.issue, TimeControlIssue::Overflow);
    }

    #[test]
    fn test_error_message_names_input() {
        let err = classify("bad").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid time control 'bad': expected '<base>+<increment>' in whole seconds"
        );
    }

    #[test]
    fn test_category_from_str_is_case_insensitive() {
        assert_eq!("blitz".parse(), Ok(TimeControlCategory::Blitz));
        assert_eq!(" Classical ".parse(), Ok(TimeControlCategory::Classical));
        assert_eq!(
            "correspondence".parse::<TimeControlCategory>(),
            Err(UnknownCategoryError("correspondence".to_string()))
        );
    }
}
