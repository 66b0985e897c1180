//! Raw play-by-play rows.
//!
//! `PlayEvent` deserializes from text cells as produced by the public
//! play-by-play exports: numeric cells may be written as floats (`"4.0"`),
//! and empty / `NA` / `nan` cells read as missing. Columns absent from the
//! source read as missing as well.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Regular season vs postseason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum SeasonType {
    #[default]
    Regular,
    Post,
}

impl SeasonType {
    /// `POST` in any case is postseason; everything else (including blanks)
    /// is regular season.
    pub fn parse_lenient(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("POST") {
            SeasonType::Post
        } else {
            SeasonType::Regular
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonType::Regular => "REG",
            SeasonType::Post => "POST",
        }
    }
}

impl std::fmt::Display for SeasonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SeasonType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SeasonType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(SeasonType::parse_lenient).unwrap_or_default())
    }
}

/// One row of the play-by-play source. Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PlayEvent {
    pub game_id: String,
    #[serde(default, deserialize_with = "cell::opt_i32")]
    pub season: Option<i32>,
    #[serde(default, deserialize_with = "cell::opt_i32")]
    pub week: Option<i32>,
    #[serde(default)]
    pub season_type: SeasonType,
    #[serde(default, deserialize_with = "cell::opt_string")]
    pub home_team: Option<String>,
    #[serde(default, deserialize_with = "cell::opt_string")]
    pub away_team: Option<String>,

    #[serde(deserialize_with = "cell::required_u8")]
    pub qtr: u8,
    #[serde(default, deserialize_with = "cell::opt_u32")]
    pub drive: Option<u32>,
    #[serde(deserialize_with = "cell::required_u32")]
    pub play_id: u32,

    /// Offense / defense team codes
    #[serde(default, deserialize_with = "cell::opt_string")]
    pub posteam: Option<String>,
    #[serde(default, deserialize_with = "cell::opt_string")]
    pub defteam: Option<String>,

    #[serde(default, deserialize_with = "cell::opt_i32")]
    pub quarter_seconds_remaining: Option<i32>,
    #[serde(default, deserialize_with = "cell::opt_i32")]
    pub game_seconds_remaining: Option<i32>,
    /// Quarter clock as `mm:ss`
    #[serde(default, deserialize_with = "cell::opt_string")]
    pub time: Option<String>,

    #[serde(default, deserialize_with = "cell::opt_i32")]
    pub posteam_score: Option<i32>,
    #[serde(default, deserialize_with = "cell::opt_i32")]
    pub defteam_score: Option<i32>,
    #[serde(default, deserialize_with = "cell::opt_i32")]
    pub posteam_score_post: Option<i32>,
    #[serde(default, deserialize_with = "cell::opt_i32")]
    pub defteam_score_post: Option<i32>,

    #[serde(default, deserialize_with = "cell::opt_string")]
    pub play_type: Option<String>,
    #[serde(default, deserialize_with = "cell::opt_string")]
    pub desc: Option<String>,
    #[serde(default, deserialize_with = "cell::opt_i32")]
    pub down: Option<i32>,
    #[serde(default, deserialize_with = "cell::opt_i32")]
    pub ydstogo: Option<i32>,

    #[serde(default, deserialize_with = "cell::opt_string")]
    pub qb_id: Option<String>,
    #[serde(default, deserialize_with = "cell::opt_string")]
    pub qb: Option<String>,
    #[serde(default, deserialize_with = "cell::opt_flag")]
    pub pass_attempt: Option<bool>,
    #[serde(default, deserialize_with = "cell::opt_string")]
    pub passer_id: Option<String>,
    #[serde(default, deserialize_with = "cell::opt_string")]
    pub passer: Option<String>,

    #[serde(default, deserialize_with = "cell::opt_flag")]
    pub touchdown: Option<bool>,
    #[serde(default, deserialize_with = "cell::opt_string")]
    pub td_team: Option<String>,
    #[serde(default, deserialize_with = "cell::opt_string")]
    pub field_goal_result: Option<String>,
}

impl PlayEvent {
    /// Offense score minus defense score at the snap.
    pub fn score_diff(&self) -> Option<i32> {
        self.posteam_score?.checked_sub(self.defteam_score?)
    }

    pub fn is_pass_attempt(&self) -> bool {
        self.pass_attempt == Some(true)
    }

    pub fn is_touchdown(&self) -> bool {
        self.touchdown == Some(true)
    }

    pub fn is_field_goal_made(&self) -> bool {
        self.field_goal_result.as_deref() == Some("made")
    }
}

/// Text-cell parsers shared by the `PlayEvent` fields.
pub mod cell {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    /// Missing-value markers written by common tabular exporters.
    const MISSING: [&str; 4] = ["", "NA", "nan", "NaN"];

    pub fn clean(raw: &str) -> Option<&str> {
        let trimmed = raw.trim();
        if MISSING.contains(&trimmed) {
            None
        } else {
            Some(trimmed)
        }
    }

    /// Parses integers that may be written as floats (`"180.0"`).
    pub fn parse_int(raw: &str) -> Option<i64> {
        let value = clean(raw)?;
        if let Ok(v) = value.parse::<i64>() {
            return Some(v);
        }
        let v = value.parse::<f64>().ok()?;
        if v.is_finite() {
            Some(v.round() as i64)
        } else {
            None
        }
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.as_deref().and_then(clean).map(str::to_string))
    }

    pub fn opt_i32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.as_deref().and_then(parse_int).and_then(|v| i32::try_from(v).ok()))
    }

    pub fn opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.as_deref().and_then(parse_int).and_then(|v| u32::try_from(v).ok()))
    }

    /// `1` / `1.0` / `true` are set, `0` / `false` are unset.
    pub fn opt_flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        let Some(value) = raw.as_deref().and_then(clean) else {
            return Ok(None);
        };
        if value.eq_ignore_ascii_case("true") {
            return Ok(Some(true));
        }
        if value.eq_ignore_ascii_case("false") {
            return Ok(Some(false));
        }
        Ok(parse_int(value).map(|v| v != 0))
    }

    pub fn required_u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        let raw = Option::<String>::deserialize(d)?.unwrap_or_default();
        parse_int(&raw)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| D::Error::custom(format!("invalid integer cell: '{}'", raw)))
    }

    pub fn required_u8<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
        let raw = Option::<String>::deserialize(d)?.unwrap_or_default();
        parse_int(&raw)
            .and_then(|v| u8::try_from(v).ok())
            .ok_or_else(|| D::Error::custom(format!("invalid integer cell: '{}'", raw)))
    }
}
